//! GeoJSON export of tiling results.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::grid::TileCollection;

/// Convert a tile collection into a GeoJSON feature collection.
///
/// One feature per chip, in output order. Each feature carries the chip's
/// lattice position (`col`, `row`), its stable `chip_id`, and the
/// reference-layer `coverage` fraction when it has been computed.
pub fn to_feature_collection(tiles: &TileCollection) -> FeatureCollection {
    let features = tiles
        .iter()
        .map(|chip| {
            let mut properties = JsonObject::new();
            properties.insert("chip_id".to_string(), chip.id().into());
            properties.insert("col".to_string(), chip.col.into());
            properties.insert("row".to_string(), chip.row.into());
            if let Some(coverage) = chip.coverage {
                properties.insert("coverage".to_string(), coverage.into());
            }

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::from(&chip.boundary))),
                id: Some(Id::String(chip.id())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
