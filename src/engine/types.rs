use glam::DVec2;

use crate::renderer::Color;
use crate::world::CellTag;

/// Face of the wall cell a ray entered through.
///
/// Crossing a vertical grid line while travelling `+x` enters the next
/// cell through its **west** face; crossing a horizontal line travelling
/// `+y` (down the screen) enters through the **north** face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    North,
    South,
    East,
    West,
}

impl Side {
    /// True for faces lying along a horizontal grid line.
    #[inline(always)]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::North | Side::South)
    }
}

/// Where to sample the wall texture for one slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexSample {
    /// Texture column, `0 .. resolution`.
    pub column: usize,
    /// Screen pixels covered by one texel row.
    pub step: f64,
}

/// Everything the compositor needs about one wall hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallHit {
    /// Perpendicular (fisheye-corrected) distance, always `> 0`.
    pub distance: f64,
    /// Euclidean distance from the eye to `point`.
    pub raw_distance: f64,
    /// Map position where the ray crossed into the wall cell.
    pub point: DVec2,
    pub cell: (i64, i64),
    pub tag: CellTag,
    pub side: Side,
    /// Projected slice height in pixels: `wall_height / distance`.
    pub height: f64,
    /// Distance shading factor in `0..=1`.
    pub light: f64,
    /// Slice colour, already shaded (tint for textured hits).
    pub color: Color,
    pub texture: Option<TexSample>,
}

/// One screen column's ray, recomputed every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub angle: f64,
    /// `None` when no wall lies within render distance.
    pub hit: Option<WallHit>,
}

impl Ray {
    pub const UNSET: Ray = Ray {
        angle: 0.0,
        hit: None,
    };

    /// Slice height in pixels, `0` for a miss.
    #[inline]
    pub fn wall_height(&self) -> f64 {
        self.hit.map_or(0.0, |h| h.height)
    }

    /// Corrected distance, `f64::INFINITY` for a miss.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.hit.map_or(f64::INFINITY, |h| h.distance)
    }
}

/// Flat colour of a wall cell before shading.
pub fn base_color(tag: CellTag) -> Color {
    match tag {
        CellTag::SolidColor(1) => Color::WHITE,
        CellTag::SolidColor(2) => Color::RED,
        CellTag::SolidColor(3) => Color::GREEN,
        CellTag::SolidColor(4) => Color::BLUE,
        // textured slices are tinted, the texel supplies the hue
        CellTag::Textured => Color::WHITE,
        _ => Color::BLACK,
    }
}
