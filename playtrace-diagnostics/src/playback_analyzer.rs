//! Playback quality analysis over a recorded sample history

use crate::error::{DiagnosticsError, DiagnosticsResult};
use playtrace_core::{Sample, SampleStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Played position after which a buffer drop counts as a reset, in seconds
pub const DEFAULT_BUFFER_RESET_MIN_PLAYED_S: f64 = 180.0;

/// Analysis thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Consecutive non-advancing sample pairs that make a stall
    pub min_stall_samples: usize,
    /// Played position required before a buffered-until drop is a reset
    pub buffer_reset_min_played_s: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_stall_samples: 1,
            buffer_reset_min_played_s: DEFAULT_BUFFER_RESET_MIN_PLAYED_S,
        }
    }
}

impl AnalysisConfig {
    /// Reject thresholds the analyzer cannot use
    pub fn validate(&self) -> DiagnosticsResult<()> {
        if self.min_stall_samples == 0 {
            return Err(DiagnosticsError::InvalidConfiguration {
                field: "min_stall_samples".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.buffer_reset_min_played_s.is_finite() || self.buffer_reset_min_played_s < 0.0 {
            return Err(DiagnosticsError::InvalidConfiguration {
                field: "buffer_reset_min_played_s".to_string(),
                reason: "must be a non-negative number of seconds".to_string(),
            });
        }
        Ok(())
    }
}

/// Playhead stuck while not paused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallEvent {
    /// Timestamp of the last sample before the playhead stopped
    pub started_at: u64,
    /// Timestamp of the last sample still stuck
    pub ended_at: u64,
    /// Played-until position the playhead was stuck at
    pub position_s: f64,
}

impl StallEvent {
    /// Stall length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.ended_at.saturating_sub(self.started_at)
    }
}

/// Change of decoded video resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSwitch {
    /// Timestamp of the first sample at the new resolution
    pub timestamp: u64,
    /// Previous `(width, height)`
    pub from: (u32, u32),
    /// New `(width, height)`
    pub to: (u32, u32),
}

impl ResolutionSwitch {
    /// Whether the pixel count went up
    pub fn is_upgrade(&self) -> bool {
        u64::from(self.to.0) * u64::from(self.to.1) > u64::from(self.from.0) * u64::from(self.from.1)
    }
}

/// Buffered-until moved backwards after substantial playback
///
/// Typically the player discarded its buffer, e.g. because it moved on to
/// another video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferReset {
    /// Timestamp of the sample where the drop was observed
    pub timestamp: u64,
    /// Buffered-until before the drop
    pub buffered_before_s: f64,
    /// Buffered-until after the drop
    pub buffered_after_s: f64,
    /// Played-until when the drop happened
    pub played_until_s: f64,
}

/// Summary of a sample history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackReport {
    /// Number of samples analysed
    pub sample_count: usize,
    /// Wall-clock span between first and last sample
    pub duration_ms: u64,
    /// Time from the first sample until the playhead first moved
    pub startup_delay_ms: Option<u64>,
    /// Share of samples with the paused flag set
    pub paused_ratio: f64,
    /// Mean seconds buffered ahead of the playhead
    pub mean_buffer_level_s: f64,
    /// Lowest buffer level seen once playback started
    pub min_buffer_level_s: f64,
    /// Highest buffer level seen
    pub max_buffer_level_s: f64,
    /// Last recorded played-until
    pub final_played_until_s: f64,
    /// Dropped over decoded frames at the last sample
    pub dropped_frame_ratio: f64,
    /// Detected stalls
    pub stalls: Vec<StallEvent>,
    /// Detected resolution switches
    pub resolution_switches: Vec<ResolutionSwitch>,
    /// First buffer reset, if any
    pub buffer_reset: Option<BufferReset>,
}

impl PlaybackReport {
    /// Total stalled time in milliseconds
    pub fn total_stall_ms(&self) -> u64 {
        self.stalls.iter().map(StallEvent::duration_ms).sum()
    }
}

/// Analyzer for recorded playback histories
#[derive(Debug, Clone, Default)]
pub struct PlaybackAnalyzer {
    config: AnalysisConfig,
}

impl PlaybackAnalyzer {
    /// Create an analyzer with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with explicit thresholds
    pub fn with_config(config: AnalysisConfig) -> DiagnosticsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active thresholds
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse a store
    pub fn analyze(&self, store: &SampleStore) -> PlaybackReport {
        self.analyze_samples(&store.to_samples())
    }

    /// Analyse samples ordered oldest first
    pub fn analyze_samples(&self, samples: &[Sample]) -> PlaybackReport {
        let (first, last) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return PlaybackReport::default(),
        };

        let paused = samples.iter().filter(|s| s.paused).count();
        let levels: Vec<f64> = samples.iter().map(Sample::buffer_level).collect();
        let playing_levels = samples
            .iter()
            .filter(|s| s.played_until > 0.0)
            .map(Sample::buffer_level);

        let report = PlaybackReport {
            sample_count: samples.len(),
            duration_ms: last.timestamp.saturating_sub(first.timestamp),
            startup_delay_ms: samples
                .iter()
                .find(|s| s.played_until > 0.0)
                .map(|s| s.timestamp.saturating_sub(first.timestamp)),
            paused_ratio: paused as f64 / samples.len() as f64,
            mean_buffer_level_s: levels.iter().sum::<f64>() / levels.len() as f64,
            min_buffer_level_s: playing_levels.fold(None, |min: Option<f64>, level| {
                Some(min.map_or(level, |m| m.min(level)))
            })
            .unwrap_or(0.0),
            max_buffer_level_s: levels.iter().copied().fold(0.0, f64::max),
            final_played_until_s: last.played_until,
            dropped_frame_ratio: dropped_frame_ratio(last),
            stalls: self.detect_stalls(samples),
            resolution_switches: detect_resolution_switches(samples),
            buffer_reset: self.detect_buffer_reset(samples),
        };

        debug!(
            "Analysed {} samples: {} stalls, {} resolution switches",
            report.sample_count,
            report.stalls.len(),
            report.resolution_switches.len()
        );
        report
    }

    /// Runs of unpaused samples whose played-until does not advance
    ///
    /// Only considered once the playhead has moved at least once, so the
    /// initial load shows up as startup delay instead.
    pub fn detect_stalls(&self, samples: &[Sample]) -> Vec<StallEvent> {
        let mut stalls = Vec::new();
        let mut run: Option<(StallEvent, usize)> = None;

        for pair in samples.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            let stuck = prev.played_until > 0.0
                && !prev.paused
                && !cur.paused
                && cur.played_until <= prev.played_until;

            if stuck {
                match run.as_mut() {
                    Some((event, pairs)) => {
                        event.ended_at = cur.timestamp;
                        *pairs += 1;
                    }
                    None => {
                        run = Some((
                            StallEvent {
                                started_at: prev.timestamp,
                                ended_at: cur.timestamp,
                                position_s: prev.played_until,
                            },
                            1,
                        ))
                    }
                }
            } else if let Some((event, pairs)) = run.take() {
                if pairs >= self.config.min_stall_samples {
                    stalls.push(event);
                }
            }
        }

        if let Some((event, pairs)) = run {
            if pairs >= self.config.min_stall_samples {
                stalls.push(event);
            }
        }
        stalls
    }

    /// First drop of buffered-until after the configured played position
    pub fn detect_buffer_reset(&self, samples: &[Sample]) -> Option<BufferReset> {
        samples.windows(2).find_map(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            let reset = cur.buffered_until < prev.buffered_until
                && prev.played_until > self.config.buffer_reset_min_played_s;
            reset.then(|| BufferReset {
                timestamp: cur.timestamp,
                buffered_before_s: prev.buffered_until,
                buffered_after_s: cur.buffered_until,
                played_until_s: prev.played_until,
            })
        })
    }
}

/// Resolution changes between consecutive samples
pub fn detect_resolution_switches(samples: &[Sample]) -> Vec<ResolutionSwitch> {
    samples
        .windows(2)
        .filter(|pair| pair[0].resolution() != pair[1].resolution())
        .map(|pair| ResolutionSwitch {
            timestamp: pair[1].timestamp,
            from: pair[0].resolution(),
            to: pair[1].resolution(),
        })
        .collect()
}

/// Dropped over decoded frames, 0 when nothing was decoded
pub fn dropped_frame_ratio(sample: &Sample) -> f64 {
    if sample.decoded_frames == 0 {
        return 0.0;
    }
    sample.dropped_frames as f64 / sample.decoded_frames as f64
}
