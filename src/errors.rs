//! Error types for quakeshake.
//!
//! Uses `thiserror` for library-style error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading inputs or driving the calculator.
#[derive(Error, Debug)]
pub enum QuakeError {
    /// Reading a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Lookup table file is malformed
    #[error("Invalid table {path} (line {line}): {reason}")]
    Table {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Event validation failed
    #[error("Invalid event data: {0}")]
    InvalidEvent(String),

    /// Target, station or grid record could not be parsed
    #[error("Invalid point record at {path}:{line}: {reason}")]
    InvalidPoint {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Background worker is gone and no longer accepts events
    #[error("Shaking calculator worker has stopped")]
    WorkerStopped,
}

impl QuakeError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors returned by attenuation models for a single evaluation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ModelError {
    /// Period is not one of the model's tabulated periods
    #[error("period {0} s is not supported by this model")]
    UnsupportedPeriod(f64),

    /// Model has no data for the requested measure (e.g. table failed to load)
    #[error("no data available for this measure")]
    Unavailable,
}
