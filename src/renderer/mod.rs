//! Rendering abstraction layer.
//!
//! *The projection code never touches a pixel buffer directly.*
//! It issues a handful of primitives (colour, filled rectangle, line) to a
//! type that implements [`Renderer`].
//!
//! * You can plug multiple back-ends (`renderer::software`, a GPU one, a
//!   recording mock in tests) without changing the compositor.
//! * A helper blanket-impl [`RendererExt`] adds `clear` / `fill` so
//!   call-sites stay short.

pub mod compositor;
pub mod minimap;
pub mod software;

pub use compositor::{BOB_MAGNITUDE, Projector};
pub use minimap::Minimap;
pub use software::Software;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// 8-bit RGBA colour. `a` is straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    #[inline(always)]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline(always)]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline(always)]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Multiply every colour channel by `factor` (clamped to `0..=1`);
    /// alpha is kept.
    #[inline]
    pub fn shade(self, factor: f64) -> Self {
        let f = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        let ch = |c: u8| (c as f64 * f).round() as u8;
        Self {
            r: ch(self.r),
            g: ch(self.g),
            b: ch(self.b),
            a: self.a,
        }
    }

    /// Pack into the frame-buffer format, ignoring alpha.
    #[inline(always)]
    pub const fn to_rgba(self) -> Rgba {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Unpack a frame-buffer pixel (opaque).
    #[inline(always)]
    pub const fn from_rgba(px: Rgba) -> Self {
        Self::rgb((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }
}

/// Axis-aligned screen rectangle; `w`/`h` ≤ 0 is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline(always)]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// A rasterisation sink that owns (or fronts) a frame for its whole
/// lifetime.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager;
/// GPU back-ends can pass an empty slice because they never allocate one.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Current target size in pixels.
    fn size(&self) -> (usize, usize);

    /// Colour used by subsequent draw calls.
    fn set_color(&mut self, color: Color);

    /// Fill `rect` with the current colour, clipped to the target.
    fn fill_rect(&mut self, rect: Rect);

    /// One-pixel line from `(x0, y0)` to `(x1, y1)` inclusive.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with colour-and-draw one-liners.
pub trait RendererExt: Renderer {
    /// Paint the whole target with `color`.
    fn clear(&mut self, color: Color) {
        let (w, h) = self.size();
        self.set_color(color);
        self.fill_rect(Rect::new(0, 0, w as i32, h as i32));
    }

    fn fill(&mut self, color: Color, rect: Rect) {
        self.set_color(color);
        self.fill_rect(rect);
    }

    fn line(&mut self, color: Color, from: (i32, i32), to: (i32, i32)) {
        self.set_color(color);
        self.draw_line(from.0, from.1, to.0, to.1);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_scales_rgb_and_keeps_alpha() {
        let c = Color::rgba(200, 100, 50, 128).shade(0.5);
        assert_eq!(c, Color::rgba(100, 50, 25, 128));
        assert_eq!(Color::WHITE.shade(2.0), Color::WHITE);
        assert_eq!(Color::WHITE.shade(-1.0), Color::BLACK);
        assert_eq!(Color::WHITE.shade(f64::NAN), Color::BLACK);
    }

    #[test]
    fn pack_unpack() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.to_rgba(), 0x00_123456);
        assert_eq!(Color::from_rgba(0x00_123456), c);
    }
}
