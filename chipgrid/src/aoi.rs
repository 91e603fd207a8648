//! Area-of-interest boundary handling.
//!
//! An [`Aoi`] is a closed, simple polygon in geographic coordinates
//! (x = longitude, y = latitude, degrees). It is validated once at
//! construction and immutable afterwards, so a tiling run can treat it as a
//! read-only value.

use std::str::FromStr;

use geo_types::{coord, Coord, Polygon, Rect};
use geojson::{quick_collection, GeoJson};
use thiserror::Error;

/// Maximum latitude representable in Web Mercator, in degrees.
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator, in degrees.
pub const MIN_LAT: f64 = -MAX_LAT;

/// Errors produced while constructing an AOI.
#[derive(Debug, Error)]
pub enum AoiError {
    /// The west/south/east/north bounds do not form a proper rectangle.
    #[error("invalid AOI bounds: west {west}, south {south}, east {east}, north {north}")]
    InvalidBounds {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },

    /// A latitude lies outside the Web Mercator domain.
    #[error("latitude {0} is outside the projectable range ({MIN_LAT} to {MAX_LAT})")]
    LatitudeOutOfRange(f64),

    /// A longitude lies outside the -180..180 range.
    #[error("longitude {0} is outside the valid range (-180 to 180)")]
    LongitudeOutOfRange(f64),

    /// The polygon ring has fewer than 3 distinct vertices.
    #[error("AOI polygon must have at least 3 distinct vertices, got {0}")]
    DegenerateRing(usize),

    /// The GeoJSON document could not be parsed.
    #[error("failed to parse AOI GeoJSON: {0}")]
    Parse(String),

    /// The GeoJSON document contains no polygon geometry.
    #[error("AOI GeoJSON contains no polygon geometry")]
    NoPolygon,
}

/// A validated area-of-interest boundary in geographic coordinates.
#[derive(Debug, Clone)]
pub struct Aoi {
    polygon: Polygon<f64>,
}

impl Aoi {
    /// Build a rectangular AOI from west/south/east/north bounds in degrees.
    ///
    /// This is the input shape of the reference workflow; arbitrary polygons
    /// go through [`Aoi::from_polygon`].
    pub fn from_bounds(west: f64, south: f64, east: f64, north: f64) -> Result<Self, AoiError> {
        let finite = [west, south, east, north].iter().all(|v| v.is_finite());
        if !finite || west >= east || south >= north {
            return Err(AoiError::InvalidBounds {
                west,
                south,
                east,
                north,
            });
        }
        for lon in [west, east] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(AoiError::LongitudeOutOfRange(lon));
            }
        }
        for lat in [south, north] {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(AoiError::LatitudeOutOfRange(lat));
            }
        }

        let polygon = Rect::new(coord! { x: west, y: south }, coord! { x: east, y: north })
            .to_polygon();
        Ok(Self { polygon })
    }

    /// Build an AOI from an arbitrary simple closed polygon in degrees.
    ///
    /// The ring may be explicitly or implicitly closed. Interior rings are
    /// kept and respected by the containment test.
    pub fn from_polygon(polygon: Polygon<f64>) -> Result<Self, AoiError> {
        let distinct = distinct_vertex_count(&polygon);
        if distinct < 3 {
            return Err(AoiError::DegenerateRing(distinct));
        }
        for c in polygon.exterior().coords() {
            if !(-180.0..=180.0).contains(&c.x) {
                return Err(AoiError::LongitudeOutOfRange(c.x));
            }
            if !(MIN_LAT..=MAX_LAT).contains(&c.y) {
                return Err(AoiError::LatitudeOutOfRange(c.y));
            }
        }
        Ok(Self { polygon })
    }

    /// Build an AOI from the first polygon in a GeoJSON document.
    ///
    /// Accepts a Feature, FeatureCollection, or bare geometry. MultiPolygon
    /// geometries contribute their first ring set.
    pub fn from_geojson_str(document: &str) -> Result<Self, AoiError> {
        let geojson = GeoJson::from_str(document).map_err(|e| AoiError::Parse(e.to_string()))?;
        let collection =
            quick_collection(&geojson).map_err(|e| AoiError::Parse(e.to_string()))?;
        for geometry in collection {
            match geometry {
                geo_types::Geometry::Polygon(p) => return Self::from_polygon(p),
                geo_types::Geometry::MultiPolygon(mp) => {
                    if let Some(p) = mp.into_iter().next() {
                        return Self::from_polygon(p);
                    }
                }
                _ => continue,
            }
        }
        Err(AoiError::NoPolygon)
    }

    /// The boundary polygon, x = longitude and y = latitude in degrees.
    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }
}

/// Count distinct vertices of the exterior ring, ignoring the closing
/// duplicate.
pub(crate) fn distinct_vertex_count(polygon: &Polygon<f64>) -> usize {
    let mut seen: Vec<Coord<f64>> = Vec::new();
    for c in polygon.exterior().coords() {
        if !seen.contains(c) {
            seen.push(*c);
        }
    }
    seen.len()
}
