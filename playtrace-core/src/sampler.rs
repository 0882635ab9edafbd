//! Periodic playback state sampler
//!
//! This module reads a [`PlayerHandle`] on a fixed schedule and appends one
//! row per tick to a shared [`SampleStore`]. The repeating task is explicit:
//! callers start it, stop it, or drop the sampler to cancel it.

use crate::error::{SamplerError, SamplerResult};
use crate::player::PlayerHandle;
use crate::sample::Sample;
use crate::store::SampleStore;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// Default delay between ticks
pub const DEFAULT_SAMPLING_INTERVAL_MS: u64 = 1000;

/// Sampler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Delay between the end of one tick and the start of the next
    pub sampling_interval_ms: u64,
    /// Rows to preallocate per column
    pub initial_capacity: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sampling_interval_ms: DEFAULT_SAMPLING_INTERVAL_MS,
            initial_capacity: 0,
        }
    }
}

impl SamplerConfig {
    /// Sampling interval as a [`Duration`]
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_millis(self.sampling_interval_ms)
    }

    /// Reject values the repeating task cannot run with
    pub fn validate(&self) -> SamplerResult<()> {
        if self.sampling_interval_ms == 0 {
            return Err(SamplerError::InvalidConfiguration {
                field: "sampling_interval_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Source of wall-clock timestamps
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // Clocks set before 1970 clamp to zero.
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Tick counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerStats {
    /// Ticks that appended a row
    pub ticks_recorded: u64,
    /// Ticks that failed and appended nothing
    pub ticks_failed: u64,
    /// Message of the most recent failure
    pub last_error: Option<String>,
}

/// State shared between the sampler and its repeating task
struct SamplerShared {
    player: Arc<dyn PlayerHandle>,
    clock: Arc<dyn Clock>,
    store: RwLock<SampleStore>,
    stats: RwLock<SamplerStats>,
}

impl SamplerShared {
    fn tick(&self) -> SamplerResult<Sample> {
        let result = self.read_player();

        let mut stats = self.stats.write();
        match &result {
            Ok(sample) => {
                self.store.write().push(*sample);
                stats.ticks_recorded += 1;
            }
            Err(e) => {
                stats.ticks_failed += 1;
                stats.last_error = Some(e.to_string());
            }
        }
        result
    }

    fn read_player(&self) -> SamplerResult<Sample> {
        let player = &self.player;
        if !player.is_available() {
            return Err(SamplerError::PlayerUnavailable {
                reason: "player handle reported unavailable".to_string(),
            });
        }

        Ok(Sample {
            timestamp: self.clock.now_millis(),
            paused: player.paused(),
            played_until: player.played().last_end().unwrap_or(0.0),
            buffered_until: player.buffered().last_end().unwrap_or(0.0),
            video_width: player.video_width(),
            video_height: player.video_height(),
            decoded_frames: player.decoded_frame_count(),
            dropped_frames: player.dropped_frame_count(),
        })
    }
}

/// Samples a player's playback state into an in-memory history
pub struct Sampler {
    id: Uuid,
    config: SamplerConfig,
    shared: Arc<SamplerShared>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("samples", &self.sample_count())
            .field("running", &self.is_running())
            .finish()
    }
}

impl Sampler {
    /// Create a sampler reading `player` with the system clock
    pub fn new(player: Arc<dyn PlayerHandle>, config: SamplerConfig) -> SamplerResult<Self> {
        Self::with_clock(player, Arc::new(SystemClock), config)
    }

    /// Create a sampler with an explicit timestamp source
    pub fn with_clock(
        player: Arc<dyn PlayerHandle>,
        clock: Arc<dyn Clock>,
        config: SamplerConfig,
    ) -> SamplerResult<Self> {
        config.validate()?;

        let shared = SamplerShared {
            player,
            clock,
            store: RwLock::new(SampleStore::with_capacity(config.initial_capacity)),
            stats: RwLock::new(SamplerStats::default()),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            config,
            shared: Arc::new(shared),
            task_handle: None,
        })
    }

    /// Sampler identifier, used in log spans
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Active configuration
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Read the player once and append the result
    ///
    /// An empty played or buffered range collection records 0 for that
    /// field. An unavailable player fails the tick and nothing is appended.
    pub fn tick(&self) -> SamplerResult<Sample> {
        self.shared.tick()
    }

    /// Most recent sample
    pub fn last_state(&self) -> SamplerResult<Sample> {
        self.shared.store.read().last()
    }

    /// Number of recorded samples
    pub fn sample_count(&self) -> usize {
        self.shared.store.read().len()
    }

    /// Copy of the full history
    pub fn history(&self) -> SampleStore {
        self.shared.store.read().clone()
    }

    /// Borrow the history under the read lock
    pub fn with_store<R>(&self, f: impl FnOnce(&SampleStore) -> R) -> R {
        f(&self.shared.store.read())
    }

    /// Tick counters
    pub fn stats(&self) -> SamplerStats {
        self.shared.stats.read().clone()
    }

    /// Whether the repeating task is alive
    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Start ticking on the current tokio runtime
    ///
    /// The first tick runs immediately; each following tick waits the
    /// configured interval after the previous one completes. Calling this on
    /// a running sampler does nothing.
    pub fn start(&mut self) -> SamplerResult<()> {
        if self.is_running() {
            return Ok(()); // Already sampling
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            SamplerError::RuntimeUnavailable {
                reason: e.to_string(),
            }
        })?;

        let shared = self.shared.clone();
        let period = self.config.sampling_interval();
        let span = tracing::info_span!("sampler", id = %self.id);

        let task_handle = runtime.spawn(
            async move {
                let mut ticker = interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    ticker.tick().await;

                    match shared.tick() {
                        Ok(sample) => debug!(
                            timestamp = sample.timestamp,
                            paused = sample.paused,
                            played_until = sample.played_until,
                            buffered_until = sample.buffered_until,
                            "Recorded playback sample"
                        ),
                        Err(e) => warn!("Sampling tick failed: {}", e),
                    }
                }
            }
            .instrument(span),
        );

        self.task_handle = Some(task_handle);
        info!(
            "Started sampler {} every {:?}",
            self.id,
            self.config.sampling_interval()
        );
        Ok(())
    }

    /// Stop the repeating task and wait for it to wind down
    ///
    /// Recorded history is kept.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
            // Cancellation surfaces as a JoinError; only completion matters.
            let _ = handle.await;
            info!(
                "Stopped sampler {} after {} samples",
                self.id,
                self.sample_count()
            );
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerState, StaticPlayer, TimeRanges};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct StepClock(AtomicU64);

    impl Clock for StepClock {
        fn now_millis(&self) -> u64 {
            self.0.fetch_add(1000, Ordering::SeqCst)
        }
    }

    fn sampler_for(player: Arc<StaticPlayer>) -> Sampler {
        Sampler::with_clock(
            player,
            Arc::new(StepClock(AtomicU64::new(1_000))),
            SamplerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = SamplerConfig::default();
        assert_eq!(config.sampling_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = SamplerConfig {
            sampling_interval_ms: 0,
            ..SamplerConfig::default()
        };
        let result = Sampler::new(Arc::new(StaticPlayer::new()), config);
        assert!(matches!(
            result,
            Err(SamplerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_tick_records_player_state() {
        let player = Arc::new(StaticPlayer::with_state(PlayerState {
            available: true,
            paused: true,
            video_width: 854,
            video_height: 480,
            decoded_frames: 42,
            dropped_frames: 1,
            played: TimeRanges::from_ranges(vec![(0.0, 3.5)]),
            buffered: TimeRanges::from_ranges(vec![(0.0, 9.0)]),
        }));
        let sampler = sampler_for(player);

        let sample = sampler.tick().unwrap();
        assert_eq!(
            sample.into_tuple(),
            (1_000, true, 3.5, 9.0, 854, 480, 42, 1)
        );
        assert_eq!(sampler.last_state().unwrap(), sample);
    }

    #[test]
    fn test_fields_default_independently() {
        let player = Arc::new(StaticPlayer::new());
        player.update(|state| state.played.push(0.0, 7.0));
        let sampler = sampler_for(player);

        let sample = sampler.tick().unwrap();
        assert_eq!(sample.played_until, 7.0);
        assert_eq!(sample.buffered_until, 0.0);
    }

    #[test]
    fn test_unavailable_player_appends_nothing() {
        let player = Arc::new(StaticPlayer::new());
        let sampler = sampler_for(player.clone());
        sampler.tick().unwrap();

        player.update(|state| state.available = false);
        let err = sampler.tick().unwrap_err();
        assert!(err.is_recoverable());

        assert_eq!(sampler.sample_count(), 1);
        let stats = sampler.stats();
        assert_eq!(stats.ticks_recorded, 1);
        assert_eq!(stats.ticks_failed, 1);
        assert!(stats.last_error.is_some());
    }

    #[test]
    fn test_start_without_runtime() {
        let mut sampler = sampler_for(Arc::new(StaticPlayer::new()));
        assert!(matches!(
            sampler.start(),
            Err(SamplerError::RuntimeUnavailable { .. })
        ));
        assert!(!sampler.is_running());
    }
}
