//! Uniform cell grid the agent walks in and the rays march through.
//!
//! * Cells are addressed `(x, y)` with `0 ≤ x < width`, `0 ≤ y < height`,
//!   stored row-major (`x + y * width`).
//! * The grid is immutable once built – the app lends it by reference to
//!   the agent (collision) and to the raycaster (marching).

use thiserror::Error;

/// Hand-authored demo arena (`0` empty, `1`‥`4` flat colours, `5` textured).
const DEMO_ROWS: [&str; 16] = [
    "1111111111111111",
    "1000000000000001",
    "1000000000000001",
    "1002000000300001",
    "1000000000000001",
    "1000005555000001",
    "1000005005000001",
    "1000000005000001",
    "1040000005000041",
    "1000000000000001",
    "1000000000000001",
    "1000333000222001",
    "1000000000000001",
    "1005000000000501",
    "1000000000000001",
    "1111111111111111",
];

/// Side length of the default bordered room.
pub const DEFAULT_SIZE: usize = 32;

/// What occupies one map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellTag {
    #[default]
    Empty,
    /// Flat-shaded wall, variant `1..=4` (white, red, green, blue).
    SolidColor(u8),
    /// Wall drawn with the procedural texture table.
    Textured,
    /// Any code the palette does not know – rendered black.
    Unknown(u8),
}

impl CellTag {
    /// Decode a raw authoring code.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => CellTag::Empty,
            1..=4 => CellTag::SolidColor(code),
            5 => CellTag::Textured,
            other => CellTag::Unknown(other),
        }
    }

    /// Raw authoring code (inverse of [`CellTag::from_code`]).
    pub fn code(self) -> u8 {
        match self {
            CellTag::Empty => 0,
            CellTag::SolidColor(v) => v,
            CellTag::Textured => 5,
            CellTag::Unknown(v) => v,
        }
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self == CellTag::Empty
    }
}

/// Things that can go wrong when building a grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must be at least 1x1 (got {width}x{height})")]
    ZeroSize { width: usize, height: usize },

    #[error("cell array has {got} entries, {expected} expected")]
    CellCount { expected: usize, got: usize },

    #[error("layout row {row} has a different width than row 0")]
    RaggedRow { row: usize },

    #[error("unexpected character `{ch}` at ({x}, {y})")]
    BadCell { ch: char, x: usize, y: usize },
}

/// Fixed-resolution 2-D map of [`CellTag`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellTag>,
}

impl Default for Grid {
    /// 32×32 empty room closed by white walls.
    fn default() -> Self {
        Self::filled_bordered(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl Grid {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Empty room of `width × height` cells, the outer ring solid white.
    pub fn bordered(width: usize, height: usize) -> Result<Self, GridError> {
        check_size(width, height)?;
        Ok(Self::filled_bordered(width, height))
    }

    /// The hand-authored demo arena.
    pub fn demo() -> Self {
        // DEMO_ROWS is a fixed, well-formed literal.
        match Self::from_rows(&DEMO_ROWS) {
            Ok(grid) => grid,
            Err(_) => Self::default(),
        }
    }

    /// Wrap an existing cell array (row-major, `width * height` entries).
    pub fn from_cells(width: usize, height: usize, cells: Vec<CellTag>) -> Result<Self, GridError> {
        check_size(width, height)?;
        if cells.len() != width * height {
            return Err(GridError::CellCount {
                expected: width * height,
                got: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build from ASCII rows of decimal digits, one character per cell.
    /// Row 0 is `y = 0`.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        check_size(width, height)?;

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(GridError::RaggedRow { row: y });
            }
            for (x, ch) in row.chars().enumerate() {
                let code = ch
                    .to_digit(10)
                    .ok_or(GridError::BadCell { ch, x, y })?;
                cells.push(CellTag::from_code(code as u8));
            }
        }
        Self::from_cells(width, height, cells)
    }

    fn filled_bordered(width: usize, height: usize) -> Self {
        let mut cells = vec![CellTag::Empty; width * height];
        let wall = CellTag::SolidColor(1);
        for x in 0..width {
            cells[x] = wall;
            cells[x + (height - 1) * width] = wall;
        }
        for y in 0..height {
            cells[y * width] = wall;
            cells[width - 1 + y * width] = wall;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True if `(x, y)` addresses a cell of this grid.
    #[inline(always)]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Tag of cell `(x, y)`.
    ///
    /// Callers must pass valid coordinates; use [`Grid::get`] when unsure.
    #[inline(always)]
    pub fn classify(&self, x: usize, y: usize) -> CellTag {
        debug_assert!(x < self.width && y < self.height);
        self.cells[x + y * self.width]
    }

    /// Bounds-checked lookup, `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<CellTag> {
        if self.contains(x, y) {
            Some(self.classify(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Cell under a continuous map position; outside the grid reads as
    /// `None`.
    #[inline]
    pub fn at(&self, x: f64, y: f64) -> Option<CellTag> {
        self.get(x.floor() as i64, y.floor() as i64)
    }

    /// Walkable means inside the grid and `Empty`.
    #[inline]
    pub fn is_walkable(&self, x: f64, y: f64) -> bool {
        self.at(x, y).is_some_and(CellTag::is_empty)
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// Iterate `(x, y, tag)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellTag)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &tag)| (i % self.width, i / self.width, tag))
    }
}

fn check_size(width: usize, height: usize) -> Result<(), GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::ZeroSize { width, height });
    }
    Ok(())
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
