//! Coordinate projection between geographic and planar reference systems.
//!
//! Chip sizes are metric quantities (a 128-pixel chip at 10 m/pixel is
//! 1280 m), so grid construction has to happen in a meters-based projected
//! system while inputs and outputs stay in geographic degrees. This module
//! provides the [`Projector`], a fixed pair of reference systems resolved
//! from EPSG codes via the `crs-definitions` database and transformed with
//! `proj4rs`.
//!
//! The default pair is WGS84 (EPSG:4326) to Web Mercator (EPSG:3857). Web
//! Mercator distorts area away from the equator, so a "1280 m" cell is only
//! approximately 1280 m on the ground; for AOIs spanning a few degrees of
//! latitude this is acceptable for chip extraction.

use geo::MapCoords;
use geo_types::{coord, Polygon};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use thiserror::Error;

/// EPSG code of the default geographic (degrees) reference system, WGS84.
pub const GEOGRAPHIC_EPSG: u16 = 4326;

/// EPSG code of the default projected (meters) reference system, Web Mercator.
pub const PROJECTED_EPSG: u16 = 3857;

/// Errors that can occur while setting up or applying a projection.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The EPSG code is not present in the CRS database.
    #[error("EPSG:{0} is not in the CRS database")]
    UnknownCrs(u16),

    /// The configured geographic system is not a longitude/latitude system.
    #[error("EPSG:{0} is not a geographic (longitude/latitude) reference system")]
    NotGeographic(u16),

    /// The configured projected system is not a planar system.
    #[error("EPSG:{0} is not a projected (planar meters) reference system")]
    NotProjected(u16),

    /// The projection definition could not be parsed.
    #[error("failed to initialize EPSG:{epsg}: {detail}")]
    Setup { epsg: u16, detail: String },

    /// A coordinate transform failed.
    #[error("coordinate transform failed: {0}")]
    Transform(String),
}

/// Converts geometry between one geographic and one projected reference
/// system, fixed for the lifetime of the projector.
///
/// Both transforms preserve topology: vertices are converted one by one in
/// order, so ring direction and vertex count never change. The forward and
/// inverse transforms round-trip within floating-point error.
///
/// # Example
///
/// ```
/// use chipgrid::projection::Projector;
///
/// # fn main() -> Result<(), chipgrid::projection::ProjectionError> {
/// let projector = Projector::web_mercator()?;
/// let (x, y) = projector.project_point(0.0, 0.0)?;
/// assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
/// # Ok(())
/// # }
/// ```
pub struct Projector {
    geographic: Proj,
    projected: Proj,
    geographic_epsg: u16,
    projected_epsg: u16,
}

impl Projector {
    /// Create a projector from a pair of EPSG codes.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::UnknownCrs` if either code is missing from
    /// the CRS database, `NotGeographic`/`NotProjected` if the codes do not
    /// name the expected kind of system, and `Setup` if the projection
    /// definition fails to parse.
    pub fn new(geographic_epsg: u16, projected_epsg: u16) -> Result<Self, ProjectionError> {
        let geographic_def = proj_string(geographic_epsg)?;
        let projected_def = proj_string(projected_epsg)?;

        if !is_geographic(geographic_def) {
            return Err(ProjectionError::NotGeographic(geographic_epsg));
        }
        if is_geographic(projected_def) {
            return Err(ProjectionError::NotProjected(projected_epsg));
        }

        let geographic = Proj::from_proj_string(geographic_def).map_err(|e| {
            ProjectionError::Setup {
                epsg: geographic_epsg,
                detail: e.to_string(),
            }
        })?;
        let projected = Proj::from_proj_string(projected_def).map_err(|e| {
            ProjectionError::Setup {
                epsg: projected_epsg,
                detail: e.to_string(),
            }
        })?;

        Ok(Self {
            geographic,
            projected,
            geographic_epsg,
            projected_epsg,
        })
    }

    /// Create the default WGS84 → Web Mercator projector.
    pub fn web_mercator() -> Result<Self, ProjectionError> {
        Self::new(GEOGRAPHIC_EPSG, PROJECTED_EPSG)
    }

    /// EPSG code of the geographic side.
    pub fn geographic_epsg(&self) -> u16 {
        self.geographic_epsg
    }

    /// EPSG code of the projected side.
    pub fn projected_epsg(&self) -> u16 {
        self.projected_epsg
    }

    /// Project a single geographic point (degrees) to planar meters.
    pub fn project_point(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        // proj4rs expects geographic coordinates in radians.
        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        transform(&self.geographic, &self.projected, &mut point)
            .map_err(|e| ProjectionError::Transform(e.to_string()))?;
        Ok((point.0, point.1))
    }

    /// Convert a planar point (meters) back to geographic degrees.
    pub fn unproject_point(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let mut point = (x, y, 0.0);
        transform(&self.projected, &self.geographic, &mut point)
            .map_err(|e| ProjectionError::Transform(e.to_string()))?;
        Ok((point.0.to_degrees(), point.1.to_degrees()))
    }

    /// Project a geographic polygon (degrees) into planar meters.
    ///
    /// Vertex order and ring direction are preserved.
    pub fn to_projected(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>, ProjectionError> {
        polygon.try_map_coords(|c| {
            let (x, y) = self.project_point(c.x, c.y)?;
            Ok(coord! { x: x, y: y })
        })
    }

    /// Convert a projected polygon (meters) back to geographic degrees.
    pub fn to_geographic(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>, ProjectionError> {
        polygon.try_map_coords(|c| {
            let (lon, lat) = self.unproject_point(c.x, c.y)?;
            Ok(coord! { x: lon, y: lat })
        })
    }
}

/// Look up the PROJ definition string for an EPSG code.
fn proj_string(epsg: u16) -> Result<&'static str, ProjectionError> {
    crs_definitions::from_code(epsg)
        .map(|def| def.proj4)
        .ok_or(ProjectionError::UnknownCrs(epsg))
}

/// Whether a PROJ definition describes a longitude/latitude system.
fn is_geographic(definition: &str) -> bool {
    definition.contains("+proj=longlat")
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{LineString, Rect};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_origin_maps_to_origin() {
        let projector = Projector::web_mercator().unwrap();
        let (x, y) = projector.project_point(0.0, 0.0).unwrap();
        assert!(approx_eq(x, 0.0, 1e-6));
        assert!(approx_eq(y, 0.0, 1e-6));
    }

    #[test]
    fn test_known_point_forward() {
        // -54 degrees of longitude on the equator in Web Mercator meters.
        let projector = Projector::web_mercator().unwrap();
        let (x, y) = projector.project_point(-54.0, 0.0).unwrap();
        assert!(approx_eq(x, -6_011_252.502836773, 1e-3), "x = {}", x);
        assert!(approx_eq(y, 0.0, 1e-3), "y = {}", y);
    }

    #[test]
    fn test_known_point_latitude_45() {
        let projector = Projector::web_mercator().unwrap();
        let (_, y) = projector.project_point(0.0, 45.0).unwrap();
        assert!(approx_eq(y, 5_621_521.486192335, 1e-2), "y = {}", y);
    }

    #[test]
    fn test_point_roundtrip() {
        let projector = Projector::web_mercator().unwrap();
        // Reference AOI corner in the Brazilian Amazon.
        let (lon, lat) = (-58.338611, -8.546111);
        let (x, y) = projector.project_point(lon, lat).unwrap();
        let (lon2, lat2) = projector.unproject_point(x, y).unwrap();
        assert!(approx_eq(lon, lon2, 1e-9), "lon {} -> {}", lon, lon2);
        assert!(approx_eq(lat, lat2, 1e-9), "lat {} -> {}", lat, lat2);
    }

    #[test]
    fn test_polygon_roundtrip_preserves_topology() {
        let projector = Projector::web_mercator().unwrap();
        let polygon = Polygon::new(
            LineString::from(vec![
                (-58.0, -8.0),
                (-55.0, -8.0),
                (-55.0, -5.0),
                (-58.0, -5.0),
                (-58.0, -8.0),
            ]),
            vec![],
        );

        let projected = projector.to_projected(&polygon).unwrap();
        assert_eq!(
            projected.exterior().coords().count(),
            polygon.exterior().coords().count(),
            "vertex count must survive projection"
        );

        let back = projector.to_geographic(&projected).unwrap();
        for (original, roundtripped) in polygon.exterior().coords().zip(back.exterior().coords()) {
            assert!(approx_eq(original.x, roundtripped.x, 1e-8));
            assert!(approx_eq(original.y, roundtripped.y, 1e-8));
        }
    }

    #[test]
    fn test_projected_rect_stays_axis_aligned() {
        // Mercator maps meridians and parallels to straight lines, so a
        // lat/lon-aligned rectangle stays axis-aligned in meters.
        let projector = Projector::web_mercator().unwrap();
        let rect = Rect::new(coord! { x: -58.0, y: -8.0 }, coord! { x: -55.0, y: -5.0 });
        let projected = projector.to_projected(&rect.to_polygon()).unwrap();

        let xs: Vec<f64> = projected.exterior().coords().map(|c| c.x).collect();
        let ys: Vec<f64> = projected.exterior().coords().map(|c| c.y).collect();
        let distinct = |values: &[f64]| {
            let mut seen: Vec<f64> = Vec::new();
            for v in values {
                if !seen.iter().any(|s| approx_eq(*s, *v, 1e-6)) {
                    seen.push(*v);
                }
            }
            seen.len()
        };
        assert_eq!(distinct(&xs), 2, "two distinct eastings expected");
        assert_eq!(distinct(&ys), 2, "two distinct northings expected");
    }

    #[test]
    fn test_unknown_epsg_code() {
        let result = Projector::new(4326, 65000);
        assert!(matches!(result, Err(ProjectionError::UnknownCrs(65000))));
    }

    #[test]
    fn test_rejects_projected_system_on_geographic_side() {
        let result = Projector::new(3857, 3857);
        assert!(matches!(result, Err(ProjectionError::NotGeographic(3857))));
    }

    #[test]
    fn test_rejects_geographic_system_on_projected_side() {
        let result = Projector::new(4326, 4326);
        assert!(matches!(result, Err(ProjectionError::NotProjected(4326))));
    }

    #[test]
    fn test_alternative_projected_system() {
        // UTM zone 21S covers the reference AOI; the projector is not tied
        // to Web Mercator.
        let projector = Projector::new(4326, 32721).unwrap();
        let (x, y) = projector.project_point(-57.0, -6.0).unwrap();
        assert!(x > 100_000.0 && x < 900_000.0, "UTM easting: {}", x);
        assert!(y > 9_000_000.0 && y < 10_000_000.0, "UTM northing: {}", y);
    }
}
