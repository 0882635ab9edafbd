//! Simulated Playback Demo
//!
//! This example drives a simulated player through startup, steady playback,
//! a quality switch and a rebuffer while a session samples it, then prints
//! the analysis and exports the history.

use playtrace::{GlobalConfig, Playtrace, StaticPlayer, TimeRanges};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GlobalConfig::from_json_str(
        r#"{ "log_filter": "playtrace=debug,info", "sampler": { "sampling_interval_ms": 250 } }"#,
    )?;
    let playtrace = Playtrace::init_with(config)?;
    playtrace.init_logging()?;

    println!("🎬 Playtrace Simulated Playback Demo");
    println!("====================================");

    let player = Arc::new(StaticPlayer::new());
    player.update(|state| state.paused = true);

    let session = playtrace
        .session("simulated")?
        .player(player.clone())
        .start()
        .await?;

    simulate_playback(&player).await;

    let state = session.last_state()?;
    println!("\n📍 Last state: {:?}", state.into_tuple());

    let dir = std::env::temp_dir().join("playtrace-demo");
    std::fs::create_dir_all(&dir)?;
    session.export(dir.join("local_client_state_logger.csv"))?;
    session.export(dir.join("local_client_state_logger.json"))?;
    println!("💾 Exported history to {}", dir.display());

    let summary = session.finish().await;
    let report = &summary.report;

    println!("\n📊 Playback report");
    println!("------------------");
    println!("  Samples: {}", report.sample_count);
    println!("  Startup delay: {:?} ms", report.startup_delay_ms);
    println!("  Mean buffer: {:.2} s", report.mean_buffer_level_s);
    println!("  Dropped frames: {:.2}%", report.dropped_frame_ratio * 100.0);
    println!(
        "  Stalls: {} ({} ms total)",
        report.stalls.len(),
        report.total_stall_ms()
    );
    for switch in &report.resolution_switches {
        println!(
            "  Resolution {:?} -> {:?} ({})",
            switch.from,
            switch.to,
            if switch.is_upgrade() { "up" } else { "down" }
        );
    }

    println!("\n✨ Demo completed!");
    Ok(())
}

async fn simulate_playback(player: &StaticPlayer) {
    // Startup: loading, nothing played yet
    sleep(Duration::from_millis(600)).await;
    player.update(|state| {
        state.paused = false;
        state.video_width = 640;
        state.video_height = 360;
    });

    let mut position = 0.0;
    let mut buffered = 4.0;
    for step in 0..20 {
        let stalled = (12..15).contains(&step);
        if !stalled {
            position += 0.25;
            buffered += 0.5;
        }
        if step == 8 {
            // Quality upgrade once the buffer is healthy
            player.update(|state| {
                state.video_width = 1920;
                state.video_height = 1080;
            });
        }

        player.update(|state| {
            state.played = TimeRanges::from_ranges(vec![(0.0, position)]);
            state.buffered = TimeRanges::from_ranges(vec![(0.0, buffered)]);
            state.decoded_frames += if stalled { 0 } else { 8 };
            state.dropped_frames += u64::from(step % 7 == 0);
        });
        sleep(Duration::from_millis(250)).await;
    }
}
