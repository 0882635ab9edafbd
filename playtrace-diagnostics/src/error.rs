//! Diagnostics error types

use playtrace_core::SamplerError;
use thiserror::Error;

/// Error type for analysis, export and logging setup
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding failed
    #[error("Serialization error: {source}")]
    Serialization {
        /// Underlying serde_json error
        #[from]
        source: serde_json::Error,
    },

    /// Error surfaced by the sampler
    #[error("Sampler error: {source}")]
    Sampler {
        /// Underlying sampler error
        #[from]
        source: SamplerError,
    },

    /// Tracing subscriber could not be installed
    #[error("Logging initialization failed: {reason}")]
    LoggingInit {
        /// Failure reason
        reason: String,
    },

    /// Analysis settings were rejected
    #[error("Invalid analysis configuration for {field}: {reason}")]
    InvalidConfiguration {
        /// Offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type alias for diagnostics operations
pub type DiagnosticsResult<T> = Result<T, DiagnosticsError>;
