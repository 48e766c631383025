// kinetrack_sim/src/error.rs

use kinetrack_core::error::EstimationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the simulation application layer.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration or numerical failure from the estimation engine.
    #[error(transparent)]
    Estimation(#[from] EstimationError),

    #[error("scenario file not found: {}", .0.display())]
    ScenarioNotFound(PathBuf),

    #[error("failed to load scenario: {0}")]
    Config(#[from] figment::Error),

    #[error("failed to render scenario: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = std::result::Result<T, SimError>;
