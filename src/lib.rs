//! Grid ray-marching renderer.
//!
//! A viewer walks a 2-D cell map; every frame one ray per screen column is
//! marched through the grid and the hits are drawn as vertical wall
//! slices.

pub mod app;
pub mod config;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;

pub use app::{App, AppError};
pub use config::{Config, ConfigError, MapChoice};
