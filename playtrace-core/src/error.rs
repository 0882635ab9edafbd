//! Error types for the Playtrace sampler

use thiserror::Error;

/// Main error type for sampling operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    /// No tick has completed yet, so there is no last state to read
    #[error("No samples recorded yet")]
    NoSamples,

    /// The player handle could not be read
    #[error("Player unavailable: {reason}")]
    PlayerUnavailable {
        /// Reason reported by the player handle
        reason: String,
    },

    /// No async runtime to host the repeating sampling task
    #[error("Runtime unavailable: {reason}")]
    RuntimeUnavailable {
        /// Reason reported by the runtime lookup
        reason: String,
    },

    /// Sampler configuration was rejected
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration {
        /// Offending configuration field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Sequences in the sample store disagree on length
    #[error("Sample store corrupted: {field} has {actual} entries, expected {expected}")]
    StoreCorrupted {
        /// Column whose length diverged
        field: String,
        /// Length shared by the other columns
        expected: usize,
        /// Length of the diverging column
        actual: usize,
    },
}

impl SamplerError {
    /// Whether retrying on the next tick may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SamplerError::PlayerUnavailable { .. })
    }
}

/// Result type alias for sampler operations
pub type SamplerResult<T> = Result<T, SamplerError>;
