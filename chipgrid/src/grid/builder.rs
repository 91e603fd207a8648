//! Snapping, enumeration, and containment filtering.

use geo::{BoundingRect, Contains};
use geo_types::{coord, Polygon, Rect};
use tracing::{debug, warn};

use crate::aoi::{distinct_vertex_count, Aoi};
use crate::projection::Projector;

use super::{Chip, GridError, ProjectedCell, TileCollection, TilingConfig, SNAP_TOLERANCE};

/// Build the chip grid for an AOI.
///
/// The AOI is projected into planar meters, tiled with
/// [`build_projected_cells`], and the accepted cells are projected back to
/// geographic degrees. The computation is a pure function of the AOI and the
/// configuration: repeated calls with identical inputs produce identical
/// output, in row-major order.
///
/// # Errors
///
/// Returns `GridError::InvalidCellSize` for a non-positive cell size and
/// `GridError::Projection` if the configured reference systems are unknown
/// or a transform fails. An AOI too small to contain a single cell yields an
/// empty [`TileCollection`], not an error.
pub fn build_chip_grid(aoi: &Aoi, config: &TilingConfig) -> Result<TileCollection, GridError> {
    let projector = Projector::new(config.geographic_epsg, config.projected_epsg)?;
    let projected_aoi = projector.to_projected(aoi.polygon())?;

    let cells = build_projected_cells(&projected_aoi, config.cell_size_m)?;
    if cells.is_empty() {
        warn!(
            cell_size_m = config.cell_size_m,
            "AOI contains no fully-enclosed cells; returning an empty grid"
        );
    }

    let mut chips = Vec::with_capacity(cells.len());
    for cell in cells {
        let boundary = projector.to_geographic(&cell.rect.to_polygon())?;
        chips.push(Chip {
            col: cell.col,
            row: cell.row,
            projected: cell.rect,
            boundary,
            coverage: None,
        });
    }

    debug!(
        chips = chips.len(),
        cell_size_m = config.cell_size_m,
        "chip grid built"
    );
    Ok(TileCollection::new(chips))
}

/// Tile a projected AOI polygon with lattice-aligned cells.
///
/// The AOI bounding box is snapped *outward* to multiples of `cell_size`
/// measured from the projected origin, candidates are enumerated row by row
/// (south to north, west to east), and a candidate is kept if and only if
/// the AOI fully contains it. Partially overlapping cells are discarded,
/// never clipped; a cell touching the AOI boundary from the inside is kept.
///
/// Cell corners are derived from integer lattice indices rather than by
/// accumulating `+= cell_size`, so enumeration cannot drift; the
/// [`SNAP_TOLERANCE`] guards only the comparisons against the snapped upper
/// bounds.
pub fn build_projected_cells(
    aoi: &Polygon<f64>,
    cell_size: f64,
) -> Result<Vec<ProjectedCell>, GridError> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(GridError::InvalidCellSize(cell_size));
    }
    let distinct = distinct_vertex_count(aoi);
    if distinct < 3 {
        return Err(GridError::DegenerateAoi(distinct));
    }

    // A polygon with >= 3 distinct vertices always has a bounding rect.
    let bounds = aoi
        .bounding_rect()
        .ok_or(GridError::DegenerateAoi(distinct))?;

    // Snap outward to the lattice anchored at the projected origin.
    let first_col = (bounds.min().x / cell_size).floor() as i64;
    let first_row = (bounds.min().y / cell_size).floor() as i64;
    let grid_xmax = (bounds.max().x / cell_size).ceil() * cell_size;
    let grid_ymax = (bounds.max().y / cell_size).ceil() * cell_size;

    let mut cells = Vec::new();
    let mut row = first_row;
    loop {
        let y = row as f64 * cell_size;
        if y + cell_size > grid_ymax + SNAP_TOLERANCE {
            break;
        }
        let mut col = first_col;
        loop {
            let x = col as f64 * cell_size;
            if x + cell_size > grid_xmax + SNAP_TOLERANCE {
                break;
            }
            let rect = Rect::new(
                coord! { x: x, y: y },
                coord! { x: x + cell_size, y: y + cell_size },
            );
            if aoi.contains(&rect.to_polygon()) {
                cells.push(ProjectedCell { col, row, rect });
            }
            col += 1;
        }
        row += 1;
    }

    Ok(cells)
}
