//! # Playtrace - Video Playback State Sampling
//!
//! Playtrace polls a video player's playback state on a fixed schedule and
//! keeps the history in memory for later retrieval, analysis and export.
//!
//! ## Key Features
//!
//! - **Column-oriented history**: eight parallel sequences that always share one length
//! - **Explicit lifecycle**: sessions start and stop sampling instead of relying on ambient timers
//! - **Playback diagnostics**: stalls, resolution switches, buffer level and resets
//! - **Export**: CSV and JSON dumps of the recorded history
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use playtrace::{Playtrace, StaticPlayer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), playtrace::PlaytraceError> {
//!     let playtrace = Playtrace::init()?;
//!     playtrace.init_logging()?;
//!
//!     let player = Arc::new(StaticPlayer::new());
//!     let session = playtrace.session("demo")?.player(player).start().await?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     println!("Last state: {:?}", session.last_state()?.into_tuple());
//!
//!     let summary = session.finish().await;
//!     println!("Recorded {} samples", summary.history.len());
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core types for easy access
pub use playtrace_core::{
    Clock, PlayerHandle, PlayerState, Sample, SampleField, SampleStore, SampleTuple, Sampler,
    SamplerConfig, SamplerError, SamplerStats, StaticPlayer, SystemClock, TimeRanges,
};

pub use playtrace_diagnostics::{
    AnalysisConfig, BufferReset, DebugLogger, DiagnosticsError, ExportFormat, PlaybackAnalyzer,
    PlaybackReport, ResolutionSwitch, StallEvent,
};

// Public API modules
pub mod config;
pub mod error;
pub mod session;

// Re-export main API types
pub use config::GlobalConfig;
pub use error::{PlaytraceError, PlaytraceResult};
pub use session::{PlaybackSession, SessionBuilder, SessionSummary};

/// Main entry point for Playtrace
#[derive(Debug, Clone)]
pub struct Playtrace {
    config: std::sync::Arc<GlobalConfig>,
}

impl Playtrace {
    /// Initialize Playtrace with default settings
    ///
    /// # Example
    /// ```rust
    /// use playtrace::Playtrace;
    ///
    /// let playtrace = Playtrace::init()?;
    /// # Ok::<(), playtrace::PlaytraceError>(())
    /// ```
    pub fn init() -> PlaytraceResult<Self> {
        Self::init_with(GlobalConfig::default())
    }

    /// Initialize with custom global configuration
    pub fn init_with(config: GlobalConfig) -> PlaytraceResult<Self> {
        config.validate()?;
        Ok(Self {
            config: std::sync::Arc::new(config),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Install the global tracing subscriber using the configured filter
    pub fn init_logging(&self) -> PlaytraceResult<()> {
        DebugLogger::new(self.config.log_filter.clone()).init()?;
        Ok(())
    }

    /// Create a session builder with the given name
    ///
    /// # Example
    /// ```rust,no_run
    /// use playtrace::{Playtrace, StaticPlayer};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), playtrace::PlaytraceError> {
    /// let playtrace = Playtrace::init()?;
    /// let session = playtrace
    ///     .session("experiment-1")?
    ///     .player(Arc::new(StaticPlayer::new()))
    ///     .start()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn session(&self, name: &str) -> PlaytraceResult<SessionBuilder> {
        SessionBuilder::new(self, name)
    }
}
