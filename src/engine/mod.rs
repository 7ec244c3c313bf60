//! Ray marching core: one ray per screen column against the cell grid.

pub mod caster;
pub mod march;
pub mod types;

pub use caster::{
    AngleSpread, CastSettings, DEFAULT_ATTENUATION, DEFAULT_RENDER_DISTANCE, Execution,
    MIN_DISTANCE, Raycaster, cast_ray,
};
pub use march::{Crossing, Marcher};
pub use types::{Ray, Side, TexSample, WallHit};
