//! Structured logging setup

use crate::error::{DiagnosticsError, DiagnosticsResult};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a configured filter is set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global tracing subscriber
#[derive(Debug, Clone)]
pub struct DebugLogger {
    filter: String,
}

impl DebugLogger {
    /// Create a logger with the given fallback filter directive
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
        }
    }

    /// Fallback filter directive
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Install a fmt subscriber
    ///
    /// `RUST_LOG` takes precedence over the configured filter. Fails if a
    /// global subscriber is already set.
    pub fn init(&self) -> DiagnosticsResult<()> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.filter).map_err(|e| {
                DiagnosticsError::InvalidConfiguration {
                    field: "log_filter".to_string(),
                    reason: e.to_string(),
                }
            })?,
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
            .map_err(|e| DiagnosticsError::LoggingInit {
                reason: e.to_string(),
            })
    }

    /// Install a subscriber with [`DEFAULT_LOG_FILTER`]
    pub fn init_logging() -> DiagnosticsResult<()> {
        Self::default().init()
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = DebugLogger::new("debug").init();
        assert!(matches!(
            DebugLogger::init_logging(),
            Err(DiagnosticsError::LoggingInit { .. })
        ));
    }
}
