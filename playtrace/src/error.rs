//! Top-level error type

use playtrace_core::SamplerError;
use playtrace_diagnostics::DiagnosticsError;
use thiserror::Error;

/// Errors returned by the Playtrace facade
#[derive(Error, Debug)]
pub enum PlaytraceError {
    /// Missing configuration error
    #[error("Missing required configuration: {field}")]
    MissingConfiguration {
        /// Missing configuration field
        field: String,
    },

    /// Configuration file could not be read
    #[error("Failed to read configuration {path}: {source}")]
    ConfigRead {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {source}")]
    ConfigParse {
        /// Underlying serde_json error
        #[from]
        source: serde_json::Error,
    },

    /// Sampler error
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    /// Diagnostics error
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticsError),
}

/// Result type alias for facade operations
pub type PlaytraceResult<T> = Result<T, PlaytraceError>;
