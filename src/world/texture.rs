// Procedural wall texture shared by every textured cell.
// The raycaster only needs the resolution; the compositor samples texels.

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::renderer::Color;

/// Texels per side of the built-in texture.
pub const DEFAULT_TEXTURE_RESOLUTION: usize = 32;

/// Largest accepted resolution (keeps a table under 4 MiB).
pub const MAX_TEXTURE_RESOLUTION: usize = 1024;

static CHECKER: Lazy<TextureTable> =
    Lazy::new(|| TextureTable::build(DEFAULT_TEXTURE_RESOLUTION));

/// Things that can go wrong when building a table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture resolution {0} outside 1..={MAX_TEXTURE_RESOLUTION}")]
    BadResolution(usize),
}

/// Square XOR / checkerboard pattern, stored **column-major** because the
/// compositor walks one texture column per wall slice.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureTable {
    res: usize,
    texels: Vec<Color>,
}

impl TextureTable {
    /// Build a table of `res × res` texels.
    pub fn new(res: usize) -> Result<Self, TextureError> {
        if res == 0 || res > MAX_TEXTURE_RESOLUTION {
            return Err(TextureError::BadResolution(res));
        }
        Ok(Self::build(res))
    }

    /// Process-wide table at [`DEFAULT_TEXTURE_RESOLUTION`], built on first
    /// use and never mutated.
    pub fn shared() -> &'static TextureTable {
        &CHECKER
    }

    fn build(res: usize) -> Self {
        let tile = (res / 4).max(1);
        let mut texels = Vec::with_capacity(res * res);
        for u in 0..res {
            for v in 0..res {
                let xor = (((u ^ v) * 256) / res).min(255) as u8;
                let light = ((u / tile) + (v / tile)) & 1 == 0;
                texels.push(if light {
                    Color::rgb(xor, 96 + xor / 2, 255 - xor)
                } else {
                    Color::rgb(xor / 2, xor / 2, 64 + xor / 2)
                });
            }
        }
        Self { res, texels }
    }

    #[inline(always)]
    pub fn resolution(&self) -> usize {
        self.res
    }

    /// Texel at texture column `u`, row `v` (both wrap).
    #[inline]
    pub fn sample(&self, u: usize, v: usize) -> Color {
        self.texels[(u % self.res) * self.res + (v % self.res)]
    }

    /// One full texture column, top to bottom.
    #[inline]
    pub fn column(&self, u: usize) -> &[Color] {
        let start = (u % self.res) * self.res;
        &self.texels[start..start + self.res]
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
