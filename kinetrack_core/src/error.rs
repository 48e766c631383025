// kinetrack_core/src/error.rs

use thiserror::Error;

/// Everything that can make a simulation or filtering run fail.
/// Both kinds are fatal for the run that raised them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimationError {
    /// Invalid parameters: non-positive sampling interval, negative
    /// standard deviations, an empty sequence, and so on.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Arithmetic that cannot proceed: asymmetric or non-PSD covariance,
    /// singular innovation covariance.
    #[error("numerical error: {0}")]
    Numerical(String),
}

impl EstimationError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EstimationError>;
