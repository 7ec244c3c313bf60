//! ---------------------------------------------------------------------------
//! Software (CPU) rasteriser
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Colours with `a < 255` are blended over what is already there
//!   (the minimap overlay relies on this).
//! ---------------------------------------------------------------------------

use crate::renderer::{Color, Rect, Renderer, Rgba};

/// Frame clear colour (mid grey, visible behind the gradient edges).
pub const CLEAR: Color = Color::rgb(70, 70, 70);

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    color: Color,
    width: usize,
    height: usize,
}

impl Software {
    /// Frame-buffer of the frame in progress (row-major).
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    /// Pixel at `(x, y)`, `None` outside the target.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(Color::from_rgba(self.scratch[y * self.width + x]))
        } else {
            None
        }
    }

    #[inline(always)]
    fn plot(&mut self, idx: usize) {
        let c = self.color;
        self.scratch[idx] = match c.a {
            255 => c.to_rgba(),
            0 => return,
            a => blend(self.scratch[idx], c, a),
        };
    }
}

/// Straight-alpha "source over" for one pixel.
#[inline(always)]
fn blend(dst: Rgba, src: Color, a: u8) -> Rgba {
    let d = Color::from_rgba(dst);
    let a = a as u32;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    Color::rgb(mix(src.r, d.r), mix(src.g, d.g), mix(src.b, d.b)).to_rgba()
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR.to_rgba());
        self.color = Color::WHITE;
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn fill_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        /* clip to the target, in i64 so huge slices cannot overflow */
        let x0 = (rect.x as i64).max(0);
        let y0 = (rect.y as i64).max(0);
        let x1 = (rect.x as i64 + rect.w as i64).min(self.width as i64);
        let y1 = (rect.y as i64 + rect.h as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for y in y0 as usize..y1 as usize {
            let row = y * self.width;
            for x in x0 as usize..x1 as usize {
                self.plot(row + x);
            }
        }
    }

    /// Integer Bresenham line-drawing algorithm.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let mut x0 = x0;
        let mut y0 = y0;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if (0..self.width as i32).contains(&x0) && (0..self.height as i32).contains(&y0) {
                self.plot(y0 as usize * self.width + x0 as usize);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RendererExt;

    #[test]
    fn begin_frame_clears_and_resizes() {
        let mut sw = Software::default();
        sw.begin_frame(4, 3);
        assert_eq!(sw.size(), (4, 3));
        assert_eq!(sw.pixels().len(), 12);
        assert!(sw.pixels().iter().all(|&px| px == CLEAR.to_rgba()));
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut sw = Software::default();
        sw.begin_frame(8, 8);
        sw.fill(Color::BLUE, Rect::new(-4, 6, 6, 100));
        assert_eq!(sw.pixel(0, 6), Some(Color::BLUE));
        assert_eq!(sw.pixel(1, 7), Some(Color::BLUE));
        assert_eq!(sw.pixel(2, 7), Some(CLEAR));
        assert_eq!(sw.pixel(0, 5), Some(CLEAR));
    }

    #[test]
    fn translucent_colour_blends() {
        let mut sw = Software::default();
        sw.begin_frame(2, 1);
        sw.clear(Color::BLACK);
        sw.fill(Color::WHITE.with_alpha(128), Rect::new(0, 0, 1, 1));
        let px = sw.pixel(0, 0).unwrap();
        assert!((127..=129).contains(&px.r));
        assert_eq!(sw.pixel(1, 0), Some(Color::BLACK));
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut sw = Software::default();
        sw.begin_frame(10, 10);
        sw.line(Color::RED, (1, 1), (8, 5));
        assert_eq!(sw.pixel(1, 1), Some(Color::RED));
        assert_eq!(sw.pixel(8, 5), Some(Color::RED));
        // fully off-screen line draws nothing and does not panic
        sw.line(Color::GREEN, (-20, -20), (-5, -1));
        assert!(sw.pixels().iter().all(|&p| p != Color::GREEN.to_rgba()));
    }

    #[test]
    fn end_frame_lends_buffer() {
        let mut sw = Software::default();
        sw.begin_frame(3, 2);
        let mut seen = (0, 0, 0);
        sw.end_frame(|fb, w, h| seen = (fb.len(), w, h));
        assert_eq!(seen, (6, 3, 2));
    }
}
