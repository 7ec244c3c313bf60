//! Axis-separated grid collision.
//!
//! The X move is tested first on its own, then the Y move from the
//! resolved X. A blocked axis is clamped to the edge of the current cell
//! while the other axis keeps going, which is what lets the agent slide
//! along walls.

use glam::{DVec2, dvec2};

use crate::world::Grid;

/// Gap kept between the agent and a wall it was clamped against.
pub const SNAP_EPSILON: f64 = 1e-3;

/// Longest displacement resolved in one go; longer moves are split so a
/// fast agent cannot skip over a one-cell wall.
pub const MAX_SUBSTEP: f64 = 0.5;

/// What the caller gets back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    pub pos: DVec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

/// Move from `from` towards `to`, sliding along walls.
///
/// `footprint` is the agent's side length: an axis is only tested once the
/// footprint straddles a cell boundary on that axis.
pub fn slide_move(grid: &Grid, from: DVec2, to: DVec2, footprint: f64) -> MoveResult {
    let mut res = MoveResult {
        pos: from,
        blocked_x: false,
        blocked_y: false,
    };
    if !to.is_finite() {
        return res;
    }

    let delta = to - from;
    let slices = (delta.abs().max_element() / MAX_SUBSTEP).ceil().max(1.0);
    let slice = delta / slices;

    for _ in 0..slices as usize {
        let step = dvec2(
            if res.blocked_x { 0.0 } else { slice.x },
            if res.blocked_y { 0.0 } else { slice.y },
        );
        let next = resolve_step(grid, res.pos, res.pos + step, footprint);
        res.pos = next.pos;
        res.blocked_x |= next.blocked_x;
        res.blocked_y |= next.blocked_y;
    }
    res
}

/// One short move, X then Y.
fn resolve_step(grid: &Grid, from: DVec2, to: DVec2, footprint: f64) -> MoveResult {
    let half = footprint * 0.5;

    let mut x = to.x;
    let blocked_x = straddles(from.x, x, half) && !grid.is_walkable(x, from.y);
    if blocked_x {
        x = clamp_to_cell(from.x, to.x);
    }

    let mut y = to.y;
    let blocked_y = straddles(from.y, y, half) && !grid.is_walkable(x, y);
    if blocked_y {
        y = clamp_to_cell(from.y, to.y);
    }

    MoveResult {
        pos: dvec2(x, y),
        blocked_x,
        blocked_y,
    }
}

/// True if the footprint centred on `next` reaches outside the cell
/// holding `current`.
#[inline(always)]
fn straddles(current: f64, next: f64, half: f64) -> bool {
    let cell = current.floor();
    (next - half).floor() != cell || (next + half).floor() != cell
}

/// Stop at the boundary of the current cell, approached from the side of
/// travel.
#[inline(always)]
fn clamp_to_cell(current: f64, target: f64) -> f64 {
    if target > current {
        current.floor() + 1.0 - SNAP_EPSILON
    } else {
        current.floor()
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
