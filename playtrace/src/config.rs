//! Configuration types and defaults

use crate::error::{PlaytraceError, PlaytraceResult};
use playtrace_core::SamplerConfig;
use playtrace_diagnostics::{AnalysisConfig, DEFAULT_LOG_FILTER};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Global Playtrace configuration
///
/// Every field has a default, so a partial JSON document such as
/// `{"sampler": {"sampling_interval_ms": 500}}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Log filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Sampler settings applied to every session
    pub sampler: SamplerConfig,
    /// Analysis thresholds for session reports
    pub analysis: AnalysisConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            sampler: SamplerConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Parse from a JSON document and validate
    pub fn from_json_str(json: &str) -> PlaytraceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON file and validate
    pub fn from_file(path: impl AsRef<Path>) -> PlaytraceResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PlaytraceError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check every section
    pub fn validate(&self) -> PlaytraceResult<()> {
        if self.log_filter.trim().is_empty() {
            return Err(PlaytraceError::MissingConfiguration {
                field: "log_filter".to_string(),
            });
        }
        self.sampler.validate()?;
        self.analysis.validate()?;
        Ok(())
    }
}
