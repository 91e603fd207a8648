//! Chip grid construction.
//!
//! The grid builder turns a projected AOI into the maximal set of square,
//! axis-aligned cells of a fixed metric size that are fully contained in the
//! AOI. Cells sit on a global lattice anchored at the projected origin, so
//! independently processed AOIs produce cells that mosaic without gaps or
//! overlaps.

mod builder;

pub use builder::{build_chip_grid, build_projected_cells};

use geo_types::{Polygon, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::projection::{ProjectionError, GEOGRAPHIC_EPSG, PROJECTED_EPSG};

/// Default chip edge length in meters: 128 pixels at 10 m/pixel.
pub const DEFAULT_CELL_SIZE_M: f64 = 1280.0;

/// Tolerance absorbing floating-point drift when comparing snapped grid
/// bounds. Small enough that a partially-out-of-bounds cell can never pass.
pub const SNAP_TOLERANCE: f64 = 1e-9;

/// Errors produced by grid construction.
#[derive(Debug, Error)]
pub enum GridError {
    /// The cell size is zero, negative, or not finite.
    #[error("cell size must be a positive number of meters, got {0}")]
    InvalidCellSize(f64),

    /// The AOI polygon has fewer than 3 distinct vertices.
    #[error("AOI polygon must have at least 3 distinct vertices, got {0}")]
    DegenerateAoi(usize),

    /// Projection setup or transform failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Immutable configuration for one tiling run.
///
/// Replaces the module-level constants of the reference workflow with an
/// explicit value passed into the tiling function; there is no hidden global
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilingConfig {
    /// Cell edge length in meters.
    pub cell_size_m: f64,

    /// EPSG code of the geographic (input/output) reference system.
    pub geographic_epsg: u16,

    /// EPSG code of the projected (grid math) reference system.
    pub projected_epsg: u16,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            cell_size_m: DEFAULT_CELL_SIZE_M,
            geographic_epsg: GEOGRAPHIC_EPSG,
            projected_epsg: PROJECTED_EPSG,
        }
    }
}

impl TilingConfig {
    /// Set the cell size in meters.
    pub fn with_cell_size(mut self, cell_size_m: f64) -> Self {
        self.cell_size_m = cell_size_m;
        self
    }

    /// Set the geographic/projected EPSG pair.
    pub fn with_crs(mut self, geographic_epsg: u16, projected_epsg: u16) -> Self {
        self.geographic_epsg = geographic_epsg;
        self.projected_epsg = projected_epsg;
        self
    }
}

/// A candidate or accepted grid cell in projected coordinates.
///
/// `col` and `row` are global lattice indices: the cell's lower-left corner
/// is `(col * cell_size, row * cell_size)` meters from the projected origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedCell {
    /// Lattice column (west-east index).
    pub col: i64,
    /// Lattice row (south-north index).
    pub row: i64,
    /// Cell extent in projected meters.
    pub rect: Rect<f64>,
}

/// One accepted chip: a grid cell that passed the containment filter.
#[derive(Debug, Clone)]
pub struct Chip {
    /// Global lattice column of the lower-left corner.
    pub col: i64,
    /// Global lattice row of the lower-left corner.
    pub row: i64,
    /// Cell extent in projected meters.
    pub projected: Rect<f64>,
    /// Cell boundary re-expressed in geographic degrees.
    pub boundary: Polygon<f64>,
    /// Fraction of the cell covered by the reference layer, if computed.
    pub coverage: Option<f64>,
}

impl Chip {
    /// Stable identifier derived from the lattice position.
    pub fn id(&self) -> String {
        format!("r{}_c{}", self.row, self.col)
    }
}

/// The ordered output of one tiling run.
///
/// Chips appear in row-major order: south-to-north rows, west-to-east within
/// each row. The ordering is part of the contract; downstream dataset
/// indexing depends on it being reproducible.
#[derive(Debug, Clone, Default)]
pub struct TileCollection {
    chips: Vec<Chip>,
}

impl TileCollection {
    pub(crate) fn new(chips: Vec<Chip>) -> Self {
        Self { chips }
    }

    /// Number of chips.
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// Whether the run produced no chips. An empty collection is a valid
    /// outcome (AOI smaller than a cell), not an error.
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// The chips in row-major order.
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    pub(crate) fn chips_mut(&mut self) -> &mut [Chip] {
        &mut self.chips
    }

    /// Iterate over the chips in output order.
    pub fn iter(&self) -> std::slice::Iter<'_, Chip> {
        self.chips.iter()
    }
}

impl IntoIterator for TileCollection {
    type Item = Chip;
    type IntoIter = std::vec::IntoIter<Chip>;

    fn into_iter(self) -> Self::IntoIter {
        self.chips.into_iter()
    }
}

impl<'a> IntoIterator for &'a TileCollection {
    type Item = &'a Chip;
    type IntoIter = std::slice::Iter<'a, Chip>;

    fn into_iter(self) -> Self::IntoIter {
        self.chips.iter()
    }
}
