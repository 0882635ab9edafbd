//! Playback session management and API

use crate::error::{PlaytraceError, PlaytraceResult};
use crate::Playtrace;
use chrono::{DateTime, Utc};
use playtrace_core::{Clock, PlayerHandle, Sample, SampleStore, Sampler, SamplerConfig, SystemClock};
use playtrace_diagnostics::{export_to_file, ExportFormat, PlaybackAnalyzer, PlaybackReport};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Fluent builder for a playback session
pub struct SessionBuilder {
    name: String,
    player: Option<Arc<dyn PlayerHandle>>,
    clock: Arc<dyn Clock>,
    sampler_config: SamplerConfig,
    analyzer: PlaybackAnalyzer,
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("name", &self.name)
            .field("has_player", &self.player.is_some())
            .field("sampler_config", &self.sampler_config)
            .finish()
    }
}

impl SessionBuilder {
    pub(crate) fn new(playtrace: &Playtrace, name: &str) -> PlaytraceResult<Self> {
        let config = playtrace.config();
        Ok(Self {
            name: name.to_string(),
            player: None,
            clock: Arc::new(SystemClock),
            sampler_config: config.sampler.clone(),
            analyzer: PlaybackAnalyzer::with_config(config.analysis.clone())?,
        })
    }

    /// Set the player to observe (required)
    pub fn player(mut self, player: Arc<dyn PlayerHandle>) -> Self {
        self.player = Some(player);
        self
    }

    /// Override the sampling interval
    pub fn sampling_interval(mut self, interval: Duration) -> Self {
        self.sampler_config.sampling_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Use a custom timestamp source
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the session without starting the repeating task
    pub fn build(self) -> PlaytraceResult<PlaybackSession> {
        let player = self
            .player
            .ok_or_else(|| PlaytraceError::MissingConfiguration {
                field: "player".to_string(),
            })?;

        let sampler = Sampler::with_clock(player, self.clock, self.sampler_config)?;

        Ok(PlaybackSession {
            name: self.name,
            sampler,
            analyzer: self.analyzer,
            started_at: Utc::now(),
        })
    }

    /// Build the session and start sampling on the current runtime
    pub async fn start(self) -> PlaytraceResult<PlaybackSession> {
        let mut session = self.build()?;
        session.sampler.start()?;
        info!("Started playback session {}", session.name);
        Ok(session)
    }
}

/// A sampling session over one player
///
/// Created at session start; [`PlaybackSession::finish`] ends it and hands
/// back the recorded history.
#[derive(Debug)]
pub struct PlaybackSession {
    name: String,
    sampler: Sampler,
    analyzer: PlaybackAnalyzer,
    started_at: DateTime<Utc>,
}

impl PlaybackSession {
    /// Session name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When the session was created
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Underlying sampler
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Whether the repeating task is alive
    pub fn is_sampling(&self) -> bool {
        self.sampler.is_running()
    }

    /// Sample once, outside the schedule
    pub fn tick(&self) -> PlaytraceResult<Sample> {
        Ok(self.sampler.tick()?)
    }

    /// Most recent sample
    pub fn last_state(&self) -> PlaytraceResult<Sample> {
        Ok(self.sampler.last_state()?)
    }

    /// Number of recorded samples
    pub fn sample_count(&self) -> usize {
        self.sampler.sample_count()
    }

    /// Copy of the recorded history
    pub fn history(&self) -> SampleStore {
        self.sampler.history()
    }

    /// Analyse the history recorded so far
    pub fn report(&self) -> PlaybackReport {
        self.sampler.with_store(|store| self.analyzer.analyze(store))
    }

    /// Write the history recorded so far, format chosen by extension
    pub fn export(&self, path: impl AsRef<Path>) -> PlaytraceResult<()> {
        let path = path.as_ref();
        self.sampler
            .with_store(|store| export_to_file(store, path, ExportFormat::from_path(path)))?;
        Ok(())
    }

    /// Stop sampling and close the session
    pub async fn finish(mut self) -> SessionSummary {
        self.sampler.stop().await;

        let history = self.sampler.history();
        let report = self.analyzer.analyze(&history);
        let summary = SessionSummary {
            name: self.name,
            started_at: self.started_at,
            ended_at: Utc::now(),
            sampler_stats: self.sampler.stats(),
            report,
            history,
        };

        info!(
            "Finished playback session {} with {} samples",
            summary.name,
            summary.history.len()
        );
        summary
    }
}

/// Everything a finished session produced
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Session name
    pub name: String,
    /// Creation time
    pub started_at: DateTime<Utc>,
    /// Finish time
    pub ended_at: DateTime<Utc>,
    /// Tick counters
    pub sampler_stats: playtrace_core::SamplerStats,
    /// Analysis of the full history
    pub report: PlaybackReport,
    /// Recorded history
    pub history: SampleStore,
}
