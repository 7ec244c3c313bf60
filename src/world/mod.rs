pub mod grid;
mod pose;
pub mod texture;

pub use grid::{CellTag, DEFAULT_SIZE, Grid, GridError};

pub use pose::Pose;

pub use texture::{DEFAULT_TEXTURE_RESOLUTION, TextureError, TextureTable};
