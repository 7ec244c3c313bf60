//! Start-up configuration.
//!
//! Everything here is checked once, in [`Config::validate`], before any
//! subsystem is built; the per-frame path never re-validates.

use thiserror::Error;

use crate::engine::{
    AngleSpread, CastSettings, DEFAULT_ATTENUATION, DEFAULT_RENDER_DISTANCE, Execution,
};
use crate::sim::MotionModel;
use crate::world::{DEFAULT_SIZE, Grid, GridError, TextureTable};

pub const DEFAULT_WIDTH: usize = 1280;
pub const DEFAULT_HEIGHT: usize = 720;
pub const DEFAULT_FOV_DEG: f64 = 90.0;
pub const DEFAULT_MINIMAP_SCALE: u32 = 4;

/// Structural misconfiguration, fatal at start-up.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("screen size must be non-zero (got {0}x{1})")]
    ZeroScreen(usize, usize),

    #[error("at least one ray is required")]
    ZeroRays,

    #[error("field of view {0:.1}° outside [0°, 180°)")]
    BadFov(f64),

    #[error("render distance must be at least one cell")]
    BadRenderDistance,

    #[error("wall height {0} must be a positive number of pixels")]
    BadWallHeight(f64),

    #[error("attenuation {0} must be finite and non-negative")]
    BadAttenuation(f64),

    #[error("texture resolution must be non-zero")]
    BadTextureResolution,

    #[error("minimap scale must be non-zero")]
    BadMinimapScale,
}

/// Which map the app starts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapChoice {
    /// Empty room closed by a one-cell wall.
    Bordered { width: usize, height: usize },
    /// Hand-authored arena with coloured and textured walls.
    Demo,
}

impl Default for MapChoice {
    fn default() -> Self {
        MapChoice::Bordered {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }
}

impl MapChoice {
    pub fn build(self) -> Result<Grid, GridError> {
        match self {
            MapChoice::Bordered { width, height } => Grid::bordered(width, height),
            MapChoice::Demo => Ok(Grid::demo()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    /// Ray count; `None` casts one ray per screen column.
    pub rays: Option<usize>,
    pub fov_deg: f64,
    pub spread: AngleSpread,
    pub execution: Execution,
    pub motion: MotionModel,
    pub render_distance: usize,
    pub attenuation: f64,
    /// Slice height of a wall at distance 1; `None` uses the screen height.
    pub wall_height: Option<f64>,
    pub map: MapChoice,
    pub minimap: bool,
    pub minimap_scale: u32,
    /// Spawn RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rays: None,
            fov_deg: DEFAULT_FOV_DEG,
            spread: AngleSpread::default(),
            execution: Execution::default(),
            motion: MotionModel::default(),
            render_distance: DEFAULT_RENDER_DISTANCE,
            attenuation: DEFAULT_ATTENUATION,
            wall_height: None,
            map: MapChoice::default(),
            minimap: true,
            minimap_scale: DEFAULT_MINIMAP_SCALE,
            seed: None,
        }
    }
}

impl Config {
    #[inline]
    pub fn ray_count(&self) -> usize {
        self.rays.unwrap_or(self.width)
    }

    /// Raycaster settings derived from this config.
    pub fn cast_settings(&self) -> CastSettings {
        CastSettings {
            rays: self.ray_count(),
            fov: self.fov_deg.to_radians(),
            spread: self.spread,
            execution: self.execution,
            render_distance: self.render_distance,
            wall_height: self.wall_height.unwrap_or(self.height as f64),
            attenuation: self.attenuation,
            texture_resolution: TextureTable::shared().resolution(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroScreen(self.width, self.height));
        }
        if self.minimap_scale == 0 {
            return Err(ConfigError::BadMinimapScale);
        }
        self.cast_settings().validate()
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
