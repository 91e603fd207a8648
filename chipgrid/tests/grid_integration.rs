//! End-to-end tiling pipeline tests: geographic AOI in, geographic chips out.

use chipgrid::{
    build_chip_grid, to_feature_collection, Aoi, GridError, Projector, ReferenceLayer,
    TilingConfig,
};

/// A small AOI inside the reference area (Brazilian Amazon), about
/// 22 km x 22 km, so the candidate set stays manageable.
const WEST: f64 = -55.0;
const SOUTH: f64 = -8.0;
const EAST: f64 = -54.8;
const NORTH: f64 = -7.8;

fn small_aoi() -> Aoi {
    Aoi::from_bounds(WEST, SOUTH, EAST, NORTH).unwrap()
}

#[test]
fn full_pipeline_produces_chips() {
    let tiles = build_chip_grid(&small_aoi(), &TilingConfig::default()).unwrap();
    assert!(!tiles.is_empty());

    // ~22 km across at 1280 m per cell leaves room for 15-17 columns.
    assert!(tiles.len() > 100, "expected a dense grid, got {}", tiles.len());
}

#[test]
fn chips_stay_inside_the_aoi() {
    let tiles = build_chip_grid(&small_aoi(), &TilingConfig::default()).unwrap();

    // Web Mercator maps meridians and parallels to straight lines, so each
    // chip boundary is still a lat/lon-aligned rectangle and vertex checks
    // against the AOI bounds are sufficient.
    for chip in &tiles {
        for c in chip.boundary.exterior().coords() {
            assert!(
                c.x >= WEST - 1e-9 && c.x <= EAST + 1e-9,
                "{}: longitude {} escapes the AOI",
                chip.id(),
                c.x
            );
            assert!(
                c.y >= SOUTH - 1e-9 && c.y <= NORTH + 1e-9,
                "{}: latitude {} escapes the AOI",
                chip.id(),
                c.y
            );
        }
    }
}

#[test]
fn chips_align_to_the_global_lattice() {
    let config = TilingConfig::default();
    let tiles = build_chip_grid(&small_aoi(), &config).unwrap();

    for chip in &tiles {
        let col = chip.projected.min().x / config.cell_size_m;
        let row = chip.projected.min().y / config.cell_size_m;
        assert!(
            (col - col.round()).abs() < 1e-6,
            "{}: easting {} off-lattice",
            chip.id(),
            chip.projected.min().x
        );
        assert!(
            (row - row.round()).abs() < 1e-6,
            "{}: northing {} off-lattice",
            chip.id(),
            chip.projected.min().y
        );
        assert_eq!(col.round() as i64, chip.col);
        assert_eq!(row.round() as i64, chip.row);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let config = TilingConfig::default();
    let first = build_chip_grid(&small_aoi(), &config).unwrap();
    let second = build_chip_grid(&small_aoi(), &config).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!((a.col, a.row), (b.col, b.row));
        let coords_a: Vec<_> = a.boundary.exterior().coords().copied().collect();
        let coords_b: Vec<_> = b.boundary.exterior().coords().copied().collect();
        assert_eq!(coords_a, coords_b, "chip {} moved between runs", a.id());
    }
}

#[test]
fn overlapping_aois_agree_on_shared_cells() {
    // Two AOIs overlapping in the middle: cells in the overlap must carry
    // the same lattice indices in both runs, so results mosaic.
    let config = TilingConfig::default();
    let left = Aoi::from_bounds(-55.0, -8.0, -54.85, -7.9).unwrap();
    let right = Aoi::from_bounds(-54.95, -8.0, -54.8, -7.9).unwrap();

    let left_tiles = build_chip_grid(&left, &config).unwrap();
    let right_tiles = build_chip_grid(&right, &config).unwrap();

    let left_ids: std::collections::HashMap<(i64, i64), Vec<(f64, f64)>> = left_tiles
        .iter()
        .map(|chip| {
            let coords = chip.boundary.exterior().coords().map(|c| (c.x, c.y)).collect();
            ((chip.col, chip.row), coords)
        })
        .collect();

    let mut shared = 0;
    for chip in &right_tiles {
        if let Some(coords) = left_ids.get(&(chip.col, chip.row)) {
            shared += 1;
            let right_coords: Vec<(f64, f64)> =
                chip.boundary.exterior().coords().map(|c| (c.x, c.y)).collect();
            assert_eq!(coords, &right_coords, "shared chip {} disagrees", chip.id());
        }
    }
    assert!(shared > 0, "the AOIs overlap; some cells must be shared");
}

#[test]
fn sub_cell_aoi_yields_empty_collection_not_error() {
    // Roughly 110 m x 110 m, far below one 1280 m cell.
    let aoi = Aoi::from_bounds(-55.0, -8.0, -54.999, -7.999).unwrap();
    let tiles = build_chip_grid(&aoi, &TilingConfig::default()).unwrap();
    assert!(tiles.is_empty());
}

#[test]
fn zero_cell_size_is_an_error() {
    let config = TilingConfig::default().with_cell_size(0.0);
    let result = build_chip_grid(&small_aoi(), &config);
    assert!(matches!(result, Err(GridError::InvalidCellSize(_))));
}

#[test]
fn unknown_projected_crs_is_an_error() {
    let config = TilingConfig::default().with_crs(4326, 65000);
    let result = build_chip_grid(&small_aoi(), &config);
    assert!(matches!(result, Err(GridError::Projection(_))));
}

#[test]
fn coverage_annotation_flows_into_geojson() {
    let projector = Projector::web_mercator().unwrap();
    // Reference polygon over the south-west quarter of the AOI.
    let document = format!(
        r#"{{
            "type": "Feature",
            "properties": {{}},
            "geometry": {{
                "type": "Polygon",
                "coordinates": [[
                    [{w}, {s}], [{midx}, {s}], [{midx}, {midy}],
                    [{w}, {midy}], [{w}, {s}]
                ]]
            }}
        }}"#,
        w = WEST,
        s = SOUTH,
        midx = (WEST + EAST) / 2.0,
        midy = (SOUTH + NORTH) / 2.0,
    );
    let layer = ReferenceLayer::from_geojson_str(&document, &projector).unwrap();

    let tiles = build_chip_grid(&small_aoi(), &TilingConfig::default())
        .unwrap()
        .with_coverage(&layer);

    let covered = tiles
        .iter()
        .filter(|chip| chip.coverage.unwrap() > 0.99)
        .count();
    let untouched = tiles
        .iter()
        .filter(|chip| chip.coverage.unwrap() < 0.01)
        .count();
    assert!(covered > 0, "some chips sit fully inside the reference area");
    assert!(untouched > 0, "some chips sit fully outside it");

    let collection = to_feature_collection(&tiles);
    let first = collection.features[0].properties.as_ref().unwrap();
    assert!(first.contains_key("coverage"));
}
