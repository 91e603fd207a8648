//! CLI error type.

use thiserror::Error;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid or missing command-line configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// AOI input was rejected.
    #[error(transparent)]
    Aoi(#[from] chipgrid::AoiError),

    /// Grid construction failed.
    #[error(transparent)]
    Grid(#[from] chipgrid::GridError),

    /// Reference layer could not be loaded.
    #[error(transparent)]
    Layer(#[from] chipgrid::LayerError),

    /// Projection setup failed.
    #[error(transparent)]
    Projection(#[from] chipgrid::ProjectionError),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
