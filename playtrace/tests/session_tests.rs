//! Integration tests for playback sessions
//!
//! Exercises the builder, the session lifecycle and the finished summary.

use playtrace::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

fn playing_player() -> Arc<StaticPlayer> {
    Arc::new(StaticPlayer::with_state(PlayerState {
        available: true,
        paused: false,
        video_width: 1920,
        video_height: 1080,
        decoded_frames: 100,
        dropped_frames: 2,
        played: TimeRanges::new(),
        buffered: TimeRanges::new(),
    }))
}

#[test]
fn test_builder_requires_player() {
    let playtrace = Playtrace::init().unwrap();
    let result = playtrace.session("no-player").unwrap().build();

    assert!(matches!(
        result,
        Err(PlaytraceError::MissingConfiguration { ref field }) if field == "player"
    ));
}

#[test]
fn test_builder_rejects_zero_interval() {
    let playtrace = Playtrace::init().unwrap();
    let result = playtrace
        .session("zero")
        .unwrap()
        .player(playing_player())
        .sampling_interval(Duration::ZERO)
        .build();

    assert!(matches!(result, Err(PlaytraceError::Sampler(_))));
}

#[test]
fn test_manual_ticks_without_runtime() {
    let playtrace = Playtrace::init().unwrap();
    let session = playtrace
        .session("manual")
        .unwrap()
        .player(playing_player())
        .build()
        .unwrap();

    assert!(!session.is_sampling());
    assert_ok!(session.tick());

    let (_, paused, played, buffered, width, height, decoded, dropped) =
        session.last_state().unwrap().into_tuple();
    assert_eq!(
        (paused, played, buffered, width, height, decoded, dropped),
        (false, 0.0, 0.0, 1920, 1080, 100, 2)
    );
}

#[tokio::test(start_paused = true)]
async fn test_session_lifecycle() {
    let player = playing_player();
    let playtrace = Playtrace::init().unwrap();
    let session = playtrace
        .session("lifecycle")
        .unwrap()
        .player(player.clone())
        .start()
        .await
        .unwrap();

    assert!(session.is_sampling());
    assert_eq!(session.name(), "lifecycle");

    tokio::time::sleep(Duration::from_millis(500)).await;
    player.update(|state| state.decoded_frames = 150);
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    let summary = session.finish().await;
    assert_eq!(summary.name, "lifecycle");
    assert_eq!(summary.history.decoded_frames(), &[100, 150]);
    assert_eq!(summary.history.last().unwrap().decoded_frames, 150);
    assert_eq!(summary.sampler_stats.ticks_recorded, 2);
    assert_eq!(summary.report.sample_count, 2);
    assert!(summary.ended_at >= summary.started_at);
}

#[tokio::test(start_paused = true)]
async fn test_configured_interval_applies() {
    let config = GlobalConfig::from_json_str(r#"{"sampler": {"sampling_interval_ms": 200}}"#)
        .unwrap();
    let playtrace = Playtrace::init_with(config).unwrap();
    let session = playtrace
        .session("fast")
        .unwrap()
        .player(playing_player())
        .start()
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(900)).await;
    let summary = session.finish().await;

    // Ticks at 0, 200, 400, 600 and 800 ms
    assert_eq!(summary.history.len(), 5);
}

#[test]
fn test_export_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let playtrace = Playtrace::init().unwrap();
    let session = playtrace
        .session("export")
        .unwrap()
        .player(playing_player())
        .build()
        .unwrap();
    session.tick().unwrap();
    session.tick().unwrap();

    let csv_path = dir.path().join("state.csv");
    session.export(&csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 3);

    let json_path = dir.path().join("state.json");
    session.export(&json_path).unwrap();
    let samples: Vec<Sample> =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(samples.len(), 2);
}

#[test]
fn test_summary_serializes() {
    let playtrace = Playtrace::init().unwrap();
    let session = playtrace
        .session("serialize")
        .unwrap()
        .player(playing_player())
        .build()
        .unwrap();
    session.tick().unwrap();

    let summary = tokio_test::block_on(session.finish());
    let value = serde_json::to_value(&summary).unwrap();

    assert_eq!(value["name"], "serialize");
    assert_eq!(value["history"]["videoWidth"][0], 1920);
    assert_eq!(value["report"]["sample_count"], 1);
}
