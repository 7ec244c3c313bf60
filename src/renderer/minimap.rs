//! Top-down overlay in the top-left corner: translucent cells, the cast
//! rays and the agent.

use glam::DVec2;

use crate::engine::{Ray, types::base_color};
use crate::renderer::{Color, Rect, Renderer, RendererExt};
use crate::world::{CellTag, Grid, Pose};

const CELL_ALPHA: u8 = 128;
const RAY_ALPHA: u8 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Minimap {
    /// Fraction of the screen the map may cover: `1/scale` of the shorter
    /// side.
    pub scale: u32,
}

impl Minimap {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    /// Pixels per map cell for a `screen` of `(w, h)` (at least one).
    pub fn cell_size(&self, screen: (usize, usize), grid: &Grid) -> i32 {
        let short = screen.0.min(screen.1);
        let long_side = grid.width().max(grid.height());
        (short / long_side / self.scale.max(1) as usize).max(1) as i32
    }

    pub fn draw<R: Renderer + ?Sized>(&self, r: &mut R, grid: &Grid, pose: Pose, rays: &[Ray]) {
        let cell = self.cell_size(r.size(), grid);
        let to_px = |p: DVec2| ((p.x * cell as f64) as i32, (p.y * cell as f64) as i32);

        /* cells ------------------------------------------------------- */
        for (x, y, tag) in grid.iter() {
            let color = match tag {
                CellTag::Empty => Color::BLACK,
                other => base_color(other),
            };
            r.fill(
                color.with_alpha(CELL_ALPHA),
                Rect::new(x as i32 * cell, y as i32 * cell, cell, cell),
            );
        }

        /* rays; misses are skipped ------------------------------------ */
        let eye = to_px(pose.pos);
        for hit in rays.iter().filter_map(|ray| ray.hit) {
            r.line(Color::BLUE.with_alpha(RAY_ALPHA), eye, to_px(hit.point));
        }

        /* agent marker + heading -------------------------------------- */
        let half = DVec2::splat(0.5);
        let (mx, my) = to_px(pose.pos - half);
        r.fill(
            Color::RED.with_alpha(CELL_ALPHA),
            Rect::new(mx, my, cell, cell),
        );
        r.line(
            Color::YELLOW.with_alpha(RAY_ALPHA),
            eye,
            to_px(pose.pos + pose.forward()),
        );
    }
}
