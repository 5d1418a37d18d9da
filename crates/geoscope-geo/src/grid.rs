//! Fixed-size latitude/longitude grid.
//!
//! A [`Grid`] divides the globe into square cells of `grid_size` degrees,
//! indexed by `x` (longitude, west to east, starting at -180°) and `y`
//! (latitude, south to north, starting at -90°). Cells are addressed by a typed
//! [`CellId`]; its string form `"(x|y)"` is used as the category name in
//! dictionary models and as the key of persisted coordinate tables.

use geoscope_core::error::{GeoscopeError, Result};
use geoscope_core::models::{validate_grid_size, Coordinate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer indices of a grid cell.
///
/// Only meaningful together with the grid size it was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId {
    pub x: u32,
    pub y: u32,
}

impl CellId {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}|{})", self.x, self.y)
    }
}

impl FromStr for CellId {
    type Err = GeoscopeError;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = parse_indices(s)?;
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) => Ok(CellId { x, y }),
            _ => Err(GeoscopeError::CellFormat {
                input: s.to_string(),
                reason: "indices must be non-negative 32-bit integers".to_string(),
            }),
        }
    }
}

impl TryFrom<String> for CellId {
    type Error = GeoscopeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.to_string()
    }
}

/// Parse `"(<int>|<int>)"` into raw indices, without range checks
fn parse_indices(input: &str) -> Result<(i64, i64)> {
    let format_error = |reason: &str| GeoscopeError::CellFormat {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let inner = input
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| format_error("expected the form (<x>|<y>)"))?;

    let (x, y) = inner.split_once('|').ok_or_else(|| format_error("missing '|' separator"))?;

    let parse_int = |part: &str| -> Result<i64> {
        let digits = part.strip_prefix('-').unwrap_or(part);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format_error("indices must be integers"));
        }
        if (digits.len() > 1 && digits.starts_with('0')) || part == "-0" {
            return Err(format_error("indices must not have leading zeros or a negative zero"));
        }
        part.parse::<i64>().map_err(|_| format_error("index does not fit a 64-bit integer"))
    };

    Ok((parse_int(x)?, parse_int(y)?))
}

/// One cell of a [`Grid`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    grid_size: f64,
    id: CellId,
    lat1: f64,
    lat2: f64,
    lng1: f64,
    lng2: f64,
}

impl GridCell {
    fn new(grid_size: f64, id: CellId) -> Self {
        let lat1 = id.y as f64 * grid_size - 90.0;
        let lng1 = id.x as f64 * grid_size - 180.0;
        Self { grid_size, id, lat1, lat2: lat1 + grid_size, lng1, lng2: lng1 + grid_size }
    }

    /// Size of the originating grid in degrees
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn x(&self) -> u32 {
        self.id.x
    }

    pub fn y(&self) -> u32 {
        self.id.y
    }

    /// Identifier string `"(x|y)"`
    pub fn identifier(&self) -> String {
        self.id.to_string()
    }

    /// Southern edge
    pub fn lat1(&self) -> f64 {
        self.lat1
    }

    /// Northern edge
    pub fn lat2(&self) -> f64 {
        self.lat2
    }

    /// Western edge
    pub fn lng1(&self) -> f64 {
        self.lng1
    }

    /// Eastern edge
    pub fn lng2(&self) -> f64 {
        self.lng2
    }

    /// Geometric center, clamped to valid coordinates.
    ///
    /// Only the last row/column of a grid whose size does not divide 180/360
    /// can reach past the poles or the antimeridian.
    pub fn center(&self) -> Coordinate {
        Coordinate::clamped(
            self.lat1 + self.grid_size / 2.0,
            self.lng1 + self.grid_size / 2.0,
        )
    }

    /// Whether the coordinate lies in this cell (upper edges exclusive)
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let (lat, lng) = (coordinate.lat(), coordinate.lng());
        lat >= self.lat1 && lat < self.lat2 && lng >= self.lng1 && lng < self.lng2
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}° [lat {}..{}, lng {}..{}]",
            self.id, self.grid_size, self.lat1, self.lat2, self.lng1, self.lng2
        )
    }
}

/// Immutable grid over the whole globe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    grid_size: f64,
    num_x: u32,
    num_y: u32,
}

impl Grid {
    /// Create a grid with cells of `grid_size` degrees, in (0, 180]
    pub fn new(grid_size: f64) -> Result<Self> {
        validate_grid_size(grid_size)?;
        let num_x = (360.0 / grid_size).ceil();
        let num_y = (180.0 / grid_size).ceil();
        if num_x > u32::MAX as f64 {
            return Err(GeoscopeError::InvalidGridSize { size: grid_size });
        }
        Ok(Self { grid_size, num_x: num_x as u32, num_y: num_y as u32 })
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn num_cells_x(&self) -> u32 {
        self.num_x
    }

    pub fn num_cells_y(&self) -> u32 {
        self.num_y
    }

    pub fn num_cells(&self) -> u64 {
        self.num_x as u64 * self.num_y as u64
    }

    /// Cell containing the coordinate
    pub fn cell_for_coordinate(&self, coordinate: &Coordinate) -> GridCell {
        self.cell_at(coordinate.lat(), coordinate.lng())
    }

    /// Floor-based binning with indices clamped into the grid
    fn cell_at(&self, lat: f64, lng: f64) -> GridCell {
        let x = clamp_index(((lng + 180.0) / self.grid_size).floor(), self.num_x);
        let y = clamp_index(((lat + 90.0) / self.grid_size).floor(), self.num_y);
        GridCell::new(self.grid_size, CellId { x, y })
    }

    /// Cell with the given indices
    pub fn cell(&self, id: CellId) -> Result<GridCell> {
        self.check_range(id.x as i64, id.y as i64)?;
        Ok(GridCell::new(self.grid_size, id))
    }

    /// Parse an identifier `"(x|y)"` into a cell of this grid
    pub fn cell_for_identifier(&self, identifier: &str) -> Result<GridCell> {
        let (x, y) = parse_indices(identifier)?;
        self.check_range(x, y)?;
        Ok(GridCell::new(self.grid_size, CellId { x: x as u32, y: y as u32 }))
    }

    fn check_range(&self, x: i64, y: i64) -> Result<()> {
        if (0..self.num_x as i64).contains(&x) && (0..self.num_y as i64).contains(&y) {
            Ok(())
        } else {
            Err(GeoscopeError::CellOutOfRange {
                x,
                y,
                grid_size: self.grid_size,
                num_x: self.num_x,
                num_y: self.num_y,
            })
        }
    }

    /// Cells of this grid whose center lies within `outer`.
    ///
    /// `outer` is normally a cell of a coarser grid. Membership uses the same
    /// binning as [`Grid::cell_for_coordinate`] on the outer grid, so every
    /// cell of this grid belongs to exactly one outer cell.
    pub fn cells_contained_in(&self, outer: &GridCell) -> Vec<GridCell> {
        let outer_grid = match Grid::new(outer.grid_size) {
            Ok(grid) => grid,
            Err(_) => return Vec::new(),
        };

        // Index window around the outer box; the center test below is exact.
        let x_lo = clamp_index(((outer.lng1 + 180.0) / self.grid_size).floor() - 1.0, self.num_x);
        let x_hi = clamp_index(((outer.lng2 + 180.0) / self.grid_size).floor() + 1.0, self.num_x);
        let y_lo = clamp_index(((outer.lat1 + 90.0) / self.grid_size).floor() - 1.0, self.num_y);
        let y_hi = clamp_index(((outer.lat2 + 90.0) / self.grid_size).floor() + 1.0, self.num_y);

        let mut cells = Vec::new();
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                let cell = GridCell::new(self.grid_size, CellId { x, y });
                let center = cell.center();
                if outer_grid.cell_at(center.lat(), center.lng()).id == outer.id {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// All cells, row by row from south to north, west to east within a row
    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        let grid = *self;
        (0..grid.num_y).flat_map(move |y| {
            (0..grid.num_x).map(move |x| GridCell::new(grid.grid_size, CellId { x, y }))
        })
    }
}

fn clamp_index(raw: f64, num: u32) -> u32 {
    if raw <= 0.0 {
        0
    } else if raw >= (num - 1) as f64 {
        num - 1
    } else {
        raw as u32
    }
}
