//! Turns the per-column ray results into a first-person frame.
//!
//! Draw order is background gradient, then one wall slice per ray. Slices
//! never overlap, so no depth sorting or clip bands are needed.

use crate::engine::{Ray, WallHit};
use crate::renderer::{Color, Rect, Renderer, RendererExt};
use crate::world::TextureTable;

/// Head-bob amplitude before dividing by the screen height.
pub const BOB_MAGNITUDE: f64 = 2000.0;

/// Grey level of the background at the horizon line.
pub const HORIZON_BRIGHTNESS: u8 = 96;

/// Height in pixels of one background gradient band.
pub const BAND_HEIGHT: usize = 4;

#[derive(Clone, Copy, Debug)]
pub struct Projector {
    pub bob_magnitude: f64,
    pub horizon_brightness: u8,
    pub band_height: usize,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            bob_magnitude: BOB_MAGNITUDE,
            horizon_brightness: HORIZON_BRIGHTNESS,
            band_height: BAND_HEIGHT,
        }
    }
}

/// Screen span of one ray's column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Column {
    x: i32,
    w: i32,
}

impl Projector {
    /// Vertical shift in pixels for an agent moving at `speed` at wall
    /// clock `time` seconds.
    #[inline]
    pub fn bob_offset(&self, speed: f64, time: f64, screen_h: usize) -> f64 {
        if screen_h == 0 {
            return 0.0;
        }
        let off = self.bob_magnitude * speed * (4.0 * std::f64::consts::PI * time).cos()
            / screen_h as f64;
        if off.is_finite() { off } else { 0.0 }
    }

    /// Draw background and walls for `rays` into the frame `r` has open.
    pub fn draw<R: Renderer + ?Sized>(
        &self,
        r: &mut R,
        rays: &[Ray],
        speed: f64,
        time: f64,
        tex: &TextureTable,
    ) {
        let (_, h) = r.size();
        let offset = self.bob_offset(speed, time, h);

        self.draw_background(r, offset);

        let n = rays.len();
        for (i, ray) in rays.iter().enumerate() {
            let Some(hit) = ray.hit else { continue };
            let col = column(r.size().0, n, i);
            if col.w <= 0 {
                continue;
            }
            match hit.texture {
                Some(_) => draw_textured(r, col, &hit, offset, tex),
                None => draw_flat(r, col, &hit, offset),
            }
        }
    }

    /// Ceiling and floor gradient: brightest at the horizon, black at the
    /// top and bottom edges, shifted with the bob.
    pub fn draw_background<R: Renderer + ?Sized>(&self, r: &mut R, offset: f64) {
        let (w, h) = r.size();
        if w == 0 || h == 0 {
            return;
        }
        let half = h as f64 * 0.5;
        let horizon = half + offset;
        let band = self.band_height.max(1);

        for y in (0..h).step_by(band) {
            let mid = y as f64 + band as f64 * 0.5;
            let t = (1.0 - (mid - horizon).abs() / half).clamp(0.0, 1.0);
            let level = (self.horizon_brightness as f64 * t) as u8;
            r.fill(
                Color::rgb(level, level, level),
                Rect::new(0, y as i32, w as i32, band as i32),
            );
        }
    }
}

/// Ray `i` of `n` maps right-to-left: ray 0 owns the rightmost column.
#[inline]
fn column(width: usize, n: usize, i: usize) -> Column {
    let col_w = width as f64 / n as f64;
    let slot = (n - 1 - i) as f64;
    let x0 = (slot * col_w).floor() as i32;
    let x1 = ((slot + 1.0) * col_w).floor() as i32;
    Column { x: x0, w: x1 - x0 }
}

/// Top screen row of a slice `height` pixels tall centred on the shifted
/// horizon.
#[inline(always)]
fn slice_top<R: Renderer + ?Sized>(r: &R, height: f64, offset: f64) -> f64 {
    r.size().1 as f64 * 0.5 + offset - height * 0.5
}

fn draw_flat<R: Renderer + ?Sized>(r: &mut R, col: Column, hit: &WallHit, offset: f64) {
    let screen_h = r.size().1 as f64;
    // clip before the f64 → i32 conversion
    let top = slice_top(r, hit.height, offset).max(-1.0);
    let bottom = (slice_top(r, hit.height, offset) + hit.height).min(screen_h + 1.0);
    if bottom <= top {
        return;
    }
    let y0 = top.floor() as i32;
    let y1 = bottom.floor() as i32;
    r.fill(hit.color, Rect::new(col.x, y0, col.w, y1 - y0));
}

/// `resolution` stacked strips, one per texel row.
fn draw_textured<R: Renderer + ?Sized>(
    r: &mut R,
    col: Column,
    hit: &WallHit,
    offset: f64,
    tex: &TextureTable,
) {
    let Some(sample) = hit.texture else { return };
    let screen_h = r.size().1 as f64;
    let top = slice_top(r, hit.height, offset);
    let res = tex.resolution();
    let u = sample.column.min(res - 1);

    for row in 0..res {
        let y_top = top + row as f64 * sample.step;
        let y_bot = top + (row + 1) as f64 * sample.step;
        if y_bot < 0.0 || y_top > screen_h {
            continue;
        }
        let y0 = y_top.max(-1.0).floor() as i32;
        let y1 = y_bot.min(screen_h + 1.0).floor() as i32;
        if y1 <= y0 {
            continue;
        }
        r.fill(
            tex.sample(u, row).shade(hit.light),
            Rect::new(col.x, y0, col.w, y1 - y0),
        );
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
