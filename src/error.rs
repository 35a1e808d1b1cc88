//! Error types for Peach Flux
//!
//! Parsing and normalization never fail: malformed input degrades to absent
//! values and empty containers. The only errors the analysis layer raises are
//! "not found" conditions, plus the encoding errors of the outer surfaces.

use thiserror::Error;

/// Errors that can occur while analysing telemetry
#[derive(Debug, Error)]
pub enum FluxError {
    #[error("No stroke data found")]
    NoStrokeData,

    #[error("Stroke not found: {0}")]
    StrokeNotFound(i64),

    #[error("Periodic data not found")]
    NoPeriodicData,

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FluxError {
    /// Whether this error is a logical "not found" condition (a 404 upstream)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FluxError::NoStrokeData | FluxError::StrokeNotFound(_) | FluxError::NoPeriodicData
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FluxError>;
