//! Chipgrid - deterministic AOI chip-grid tiling.
//!
//! This library prepares fixed-size ground tiles ("chips") inside an
//! area-of-interest polygon for a downstream image-classification pipeline
//! that separates mining-disturbed land from undisturbed land. Given an AOI
//! in geographic coordinates and a cell size in meters, it computes the
//! maximal set of axis-aligned square cells of exactly that size that sit on
//! a projection-anchored lattice and are fully contained in the AOI, then
//! returns them in geographic coordinates.
//!
//! # Example
//!
//! ```
//! use chipgrid::{build_chip_grid, Aoi, TilingConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let aoi = Aoi::from_bounds(-55.0, -8.0, -54.9, -7.9)?;
//! let tiles = build_chip_grid(&aoi, &TilingConfig::default())?;
//! for chip in &tiles {
//!     println!("{}: {} vertices", chip.id(), chip.boundary.exterior().0.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aoi;
pub mod coverage;
pub mod export;
pub mod grid;
pub mod projection;

pub use aoi::{Aoi, AoiError, MAX_LAT, MIN_LAT};
pub use coverage::{coverage_fraction, LayerError, ReferenceLayer};
pub use export::to_feature_collection;
pub use grid::{
    build_chip_grid, build_projected_cells, Chip, GridError, ProjectedCell, TileCollection,
    TilingConfig, DEFAULT_CELL_SIZE_M, SNAP_TOLERANCE,
};
pub use projection::{ProjectionError, Projector, GEOGRAPHIC_EPSG, PROJECTED_EPSG};
