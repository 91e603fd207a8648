//! Grid command - compute the chip grid for an AOI and emit GeoJSON.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use chipgrid::{
    build_chip_grid, to_feature_collection, Aoi, Projector, ReferenceLayer, TilingConfig,
    DEFAULT_CELL_SIZE_M,
};

use crate::error::CliError;

/// Arguments for the grid command.
#[derive(Args)]
pub struct GridArgs {
    /// AOI boundary as a GeoJSON file (first polygon is used).
    #[arg(long, conflicts_with_all = ["west", "south", "east", "north"])]
    pub aoi: Option<PathBuf>,

    /// Western AOI bound in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub west: Option<f64>,

    /// Southern AOI bound in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub south: Option<f64>,

    /// Eastern AOI bound in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub east: Option<f64>,

    /// Northern AOI bound in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub north: Option<f64>,

    /// Chip edge length in meters (128 px at 10 m/px by default).
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE_M)]
    pub cell_size: f64,

    /// GeoJSON reference layer (disturbed-land polygons); when given, each
    /// chip is annotated with the fraction of its area the layer covers.
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Output file for the GeoJSON feature collection (stdout if omitted).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Run the grid command.
pub fn run(args: GridArgs) -> Result<(), CliError> {
    let aoi = resolve_aoi(&args)?;
    let config = TilingConfig::default().with_cell_size(args.cell_size);

    let mut tiles = build_chip_grid(&aoi, &config)?;
    info!(chips = tiles.len(), cell_size_m = args.cell_size, "grid computed");

    if let Some(reference) = &args.reference {
        let projector = Projector::new(config.geographic_epsg, config.projected_epsg)?;
        let document = fs::read_to_string(reference)?;
        let layer = ReferenceLayer::from_geojson_str(&document, &projector)?;
        tiles = tiles.with_coverage(&layer);
    }

    if tiles.is_empty() {
        eprintln!("Warning: AOI contains no fully-enclosed chips; writing an empty collection");
    }

    let collection = to_feature_collection(&tiles);
    let json = serde_json::to_string_pretty(&collection)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            eprintln!("Wrote {} chips to {}", tiles.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn resolve_aoi(args: &GridArgs) -> Result<Aoi, CliError> {
    if let Some(path) = &args.aoi {
        let document = fs::read_to_string(path)?;
        return Ok(Aoi::from_geojson_str(&document)?);
    }
    match (args.west, args.south, args.east, args.north) {
        (Some(west), Some(south), Some(east), Some(north)) => {
            Ok(Aoi::from_bounds(west, south, east, north)?)
        }
        _ => Err(CliError::Config(
            "provide --aoi FILE or all of --west/--south/--east/--north".to_string(),
        )),
    }
}
