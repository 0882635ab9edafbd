//! Integration tests for playback analysis
//!
//! Feeds histories recorded by a real sampler through the analyzer.

use playtrace_core::*;
use playtrace_diagnostics::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Clock advancing one second per reading
struct TickClock(AtomicU64);

impl Clock for TickClock {
    fn now_millis(&self) -> u64 {
        self.0.fetch_add(1000, Ordering::SeqCst)
    }
}

fn recording_sampler(player: Arc<StaticPlayer>) -> Sampler {
    Sampler::with_clock(
        player,
        Arc::new(TickClock(AtomicU64::new(0))),
        SamplerConfig::default(),
    )
    .unwrap()
}

fn play_to(player: &StaticPlayer, played: f64, buffered: f64) {
    player.update(|state| {
        state.played = TimeRanges::from_ranges(vec![(0.0, played)]);
        state.buffered = TimeRanges::from_ranges(vec![(0.0, buffered)]);
        state.decoded_frames += 30;
    });
}

#[test]
fn test_report_for_recorded_session() {
    let player = Arc::new(StaticPlayer::new());
    player.update(|state| {
        state.video_width = 640;
        state.video_height = 360;
    });
    let sampler = recording_sampler(player.clone());

    // Loading
    sampler.tick().unwrap();
    sampler.tick().unwrap();

    // Playing
    play_to(&player, 1.0, 6.0);
    sampler.tick().unwrap();
    play_to(&player, 2.0, 10.0);
    sampler.tick().unwrap();

    // Quality upgrade, then a rebuffer
    player.update(|state| {
        state.video_width = 1280;
        state.video_height = 720;
        state.dropped_frames = 6;
    });
    play_to(&player, 3.0, 3.0);
    sampler.tick().unwrap();
    sampler.tick().unwrap();
    sampler.tick().unwrap();
    play_to(&player, 4.0, 12.0);
    sampler.tick().unwrap();

    let report = PlaybackAnalyzer::new().analyze(&sampler.history());

    assert_eq!(report.sample_count, 8);
    assert_eq!(report.duration_ms, 7000);
    assert_eq!(report.startup_delay_ms, Some(2000));
    assert_eq!(report.final_played_until_s, 4.0);
    assert_eq!(report.max_buffer_level_s, 8.0);
    assert_eq!(report.min_buffer_level_s, 0.0);

    assert_eq!(report.stalls.len(), 1);
    assert_eq!(report.stalls[0].started_at, 4000);
    assert_eq!(report.stalls[0].ended_at, 6000);
    assert_eq!(report.total_stall_ms(), 2000);

    assert_eq!(report.resolution_switches.len(), 1);
    assert_eq!(report.resolution_switches[0].to, (1280, 720));
    assert_eq!(report.resolution_switches[0].timestamp, 4000);

    assert!(report.dropped_frame_ratio > 0.0);
    assert!(report.buffer_reset.is_none());
}

#[test]
fn test_buffer_reset_after_long_playback() {
    let player = Arc::new(StaticPlayer::new());
    let sampler = recording_sampler(player.clone());

    play_to(&player, 170.0, 200.0);
    sampler.tick().unwrap();
    play_to(&player, 181.0, 210.0);
    sampler.tick().unwrap();
    play_to(&player, 182.0, 20.0);
    sampler.tick().unwrap();

    let report = PlaybackAnalyzer::new().analyze(&sampler.history());
    let reset = report.buffer_reset.expect("buffer reset detected");

    assert_eq!(reset.timestamp, 2000);
    assert_eq!(reset.buffered_before_s, 210.0);
    assert_eq!(reset.buffered_after_s, 20.0);
    assert_eq!(reset.played_until_s, 181.0);
}

#[test]
fn test_early_buffer_drop_is_not_a_reset() {
    let player = Arc::new(StaticPlayer::new());
    let sampler = recording_sampler(player.clone());

    play_to(&player, 10.0, 40.0);
    sampler.tick().unwrap();
    play_to(&player, 11.0, 15.0);
    sampler.tick().unwrap();

    let report = PlaybackAnalyzer::new().analyze(&sampler.history());
    assert!(report.buffer_reset.is_none());
}

#[test]
fn test_paused_ratio() {
    let player = Arc::new(StaticPlayer::new());
    let sampler = recording_sampler(player.clone());

    player.update(|state| state.paused = true);
    sampler.tick().unwrap();
    player.update(|state| state.paused = false);
    sampler.tick().unwrap();
    sampler.tick().unwrap();
    sampler.tick().unwrap();

    let report = PlaybackAnalyzer::new().analyze(&sampler.history());
    assert_eq!(report.paused_ratio, 0.25);
    assert_eq!(report.startup_delay_ms, None);
}
