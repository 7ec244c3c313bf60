//! DDA grid walk.
//!
//! [`Marcher`] yields every grid-line crossing along a ray in order,
//! always advancing to whichever of the next vertical or horizontal line is
//! nearer. Each crossing carries the face it went through, so callers never
//! need to track "which edge was hit last" themselves.
//!
//! ```text
//!   ┌───┬───┬───┐
//!   │ o─┼──►│   │   o = origin, every ┼/│ hit is one item
//!   └───┴───┴───┘
//! ```

use glam::{DVec2, dvec2};

use super::types::Side;

/// Push past each crossing along the ray so the next cell lookup lands on
/// the far side of the line.
pub const NUDGE: f64 = 1e-6;

/// One grid-line crossing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    /// Exact point on the grid line.
    pub point: DVec2,
    /// Cell entered by the crossing.
    pub cell: (i64, i64),
    /// Face of `cell` the ray came through.
    pub side: Side,
}

/// Iterator over the grid-line crossings of one ray. Unbounded – callers
/// cap it with `take(render_distance)`.
#[derive(Clone, Debug)]
pub struct Marcher {
    pos: DVec2,
    dir: DVec2,
    next_x: f64,
    next_y: f64,
}

impl Marcher {
    /// Start at `origin`, heading along unit vector `dir`.
    pub fn new(origin: DVec2, dir: DVec2) -> Self {
        Self {
            pos: origin,
            dir,
            next_x: next_line(origin.x, dir.x),
            next_y: next_line(origin.y, dir.y),
        }
    }

    /// Offset from the current point to the next vertical line, `None`
    /// when the ray runs parallel to it.
    #[inline(always)]
    fn to_vertical(&self) -> Option<DVec2> {
        if self.dir.x == 0.0 {
            return None;
        }
        let dx = self.next_x - self.pos.x;
        Some(dvec2(dx, dx * self.dir.y / self.dir.x))
    }

    #[inline(always)]
    fn to_horizontal(&self) -> Option<DVec2> {
        if self.dir.y == 0.0 {
            return None;
        }
        let dy = self.next_y - self.pos.y;
        Some(dvec2(dy * self.dir.x / self.dir.y, dy))
    }
}

impl Iterator for Marcher {
    type Item = Crossing;

    fn next(&mut self) -> Option<Crossing> {
        // squared lengths – no sqrt per step
        let (step, side) = match (self.to_vertical(), self.to_horizontal()) {
            (None, None) => return None,
            (Some(v), None) => (v, self.vertical_side()),
            (None, Some(h)) => (h, self.horizontal_side()),
            (Some(v), Some(h)) => {
                if v.length_squared() < h.length_squared() {
                    (v, self.vertical_side())
                } else {
                    (h, self.horizontal_side())
                }
            }
        };

        match side {
            Side::West => self.next_x += 1.0,
            Side::East => self.next_x -= 1.0,
            Side::North => self.next_y += 1.0,
            Side::South => self.next_y -= 1.0,
        }

        let point = self.pos + step;
        self.pos = point + self.dir * NUDGE;
        let cell = (self.pos.x.floor() as i64, self.pos.y.floor() as i64);

        Some(Crossing { point, cell, side })
    }
}

impl Marcher {
    #[inline(always)]
    fn vertical_side(&self) -> Side {
        if self.dir.x > 0.0 { Side::West } else { Side::East }
    }

    #[inline(always)]
    fn horizontal_side(&self) -> Side {
        if self.dir.y > 0.0 { Side::North } else { Side::South }
    }
}

/// First grid line ahead of `p` along an axis travelled with sign of `d`.
#[inline(always)]
fn next_line(p: f64, d: f64) -> f64 {
    if d > 0.0 { p.floor() + 1.0 } else { p.floor() }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
