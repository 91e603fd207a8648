//! Reference-layer coverage statistics.
//!
//! The reference layer holds the known disturbed-land polygons (the garimpo
//! boundaries in the original workflow). The grid core never computes
//! against it, but a complete system wants to know what fraction of each
//! chip the layer covers, so labels can be assigned to chips before imagery
//! is cropped.

use std::str::FromStr;

use geo::{Area, BooleanOps};
use geo_types::Polygon;
use thiserror::Error;
use tracing::debug;

use crate::grid::{Chip, TileCollection};
use crate::projection::{ProjectionError, Projector};

/// Errors produced while loading a reference layer.
#[derive(Debug, Error)]
pub enum LayerError {
    /// The GeoJSON document could not be parsed.
    #[error("failed to parse reference layer GeoJSON: {0}")]
    Parse(String),

    /// The document declares a reference system other than WGS84.
    ///
    /// GeoJSON is WGS84 by definition (RFC 7946); a legacy `crs` member
    /// naming anything else is rejected instead of silently assumed.
    #[error("reference layer declares CRS \"{0}\"; only WGS84 (EPSG:4326 / CRS84) is supported")]
    UnsupportedCrs(String),

    /// The document contains no polygon geometry.
    #[error("reference layer contains no polygon geometry")]
    NoPolygons,

    /// Projecting the layer into planar coordinates failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// A read-only set of reference polygons, held in projected meters so that
/// intersection areas are metric.
#[derive(Debug, Clone)]
pub struct ReferenceLayer {
    polygons: Vec<Polygon<f64>>,
}

impl ReferenceLayer {
    /// Load a reference layer from a GeoJSON document in geographic
    /// coordinates and project it with the given projector.
    ///
    /// # Errors
    ///
    /// Returns `LayerError::UnsupportedCrs` if the document carries a legacy
    /// `crs` member naming a system other than WGS84, `Parse` for malformed
    /// GeoJSON, and `NoPolygons` if no polygonal geometry is present.
    pub fn from_geojson_str(document: &str, projector: &Projector) -> Result<Self, LayerError> {
        check_declared_crs(document)?;

        let geojson = geojson::GeoJson::from_str(document)
            .map_err(|e| LayerError::Parse(e.to_string()))?;
        let collection =
            geojson::quick_collection(&geojson).map_err(|e| LayerError::Parse(e.to_string()))?;

        let mut polygons = Vec::new();
        for geometry in collection {
            match geometry {
                geo_types::Geometry::Polygon(p) => {
                    polygons.push(projector.to_projected(&p)?);
                }
                geo_types::Geometry::MultiPolygon(mp) => {
                    for p in mp {
                        polygons.push(projector.to_projected(&p)?);
                    }
                }
                _ => continue,
            }
        }
        debug!(polygons = polygons.len(), "reference layer loaded");
        Self::from_projected_polygons(polygons)
    }

    /// Build a layer from polygons already expressed in projected meters.
    pub fn from_projected_polygons(polygons: Vec<Polygon<f64>>) -> Result<Self, LayerError> {
        if polygons.is_empty() {
            return Err(LayerError::NoPolygons);
        }
        Ok(Self { polygons })
    }

    /// Number of polygons in the layer.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Whether the layer is empty (never true for a constructed layer).
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Fraction of a chip's area covered by the reference layer, in `[0, 1]`.
///
/// Computed in projected meters. Reference polygons may overlap each other;
/// overlapping area is counted once per polygon and the result clamped, so
/// an overlap-heavy layer saturates at 1.0 rather than exceeding it.
pub fn coverage_fraction(chip: &Chip, layer: &ReferenceLayer) -> f64 {
    let cell = chip.projected.to_polygon();
    let cell_area = cell.unsigned_area();
    if cell_area == 0.0 {
        return 0.0;
    }

    let mut covered = 0.0;
    for polygon in &layer.polygons {
        covered += cell.intersection(polygon).unsigned_area();
    }
    (covered / cell_area).clamp(0.0, 1.0)
}

impl TileCollection {
    /// Annotate every chip with its reference-layer coverage fraction.
    pub fn with_coverage(mut self, layer: &ReferenceLayer) -> Self {
        for chip in self.chips_mut() {
            chip.coverage = Some(coverage_fraction(chip, layer));
        }
        self
    }
}

/// Reject documents whose legacy `crs` member names a non-WGS84 system.
///
/// Absence of the member means WGS84 per RFC 7946. The original workflow
/// silently ignored an unset CRS on the reference shapefile; here the check
/// is explicit.
fn check_declared_crs(document: &str) -> Result<(), LayerError> {
    let value: serde_json::Value =
        serde_json::from_str(document).map_err(|e| LayerError::Parse(e.to_string()))?;
    if let Some(name) = value
        .get("crs")
        .and_then(|crs| crs.get("properties"))
        .and_then(|properties| properties.get("name"))
        .and_then(|name| name.as_str())
    {
        let is_wgs84 = name.contains("4326") || name.contains("CRS84");
        if !is_wgs84 {
            return Err(LayerError::UnsupportedCrs(name.to_string()));
        }
    }
    Ok(())
}
