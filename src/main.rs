// src/main.rs
//
// Headless driver: replays a recorded detector trace through the core at
// the configured tick cadence and logs every stage transition.

use anyhow::Result;
use gesture_stages::pipeline::{GamePipeline, TickEvent};
use gesture_stages::recognition::ObjectGate;
use gesture_stages::replay::Trace;
use gesture_stages::types::Config;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path =
        std::env::var("GESTURE_STAGES_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let trace_path =
        std::env::var("GESTURE_STAGES_TRACE").unwrap_or_else(|_| "trace.yaml".to_string());

    let config = Config::load(&config_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gesture_stages={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🎁 Gesture stages starting");
    info!("✓ Configuration loaded from {}", config_path);
    info!(
        "Timing: tick={}ms, intro cooldown={}ms, stage cooldown={}ms",
        config.timing.tick_interval_ms,
        config.timing.intro_cooldown_ms,
        config.timing.stage_cooldown_ms
    );

    let trace = Trace::load(&trace_path)?;
    info!("✓ Trace loaded: {} ticks from {}", trace.tick_count(), trace_path);

    let mut pipeline = GamePipeline::new(&config)?;
    let mut gate = ObjectGate::new(&config.objects);

    let mut interval = tokio::time::interval(Duration::from_millis(config.timing.tick_interval_ms));

    for entry in trace.ticks() {
        interval.tick().await;
        let now = Instant::now();

        if let Some(control) = entry.control {
            if !control.apply(&mut pipeline, now) {
                warn!("Control {:?} ignored", control);
            }
        }

        let frame = entry.frame(&mut gate, pipeline.next_frame_id());
        if let Some(output) = pipeline.tick(frame, now) {
            match output.event {
                TickEvent::StageComplete(index) => {
                    info!(
                        "🎉 Stage {} complete (frame {}), progress {}/{}",
                        index, output.frame_id, output.progress.completed, output.progress.total
                    );
                }
                TickEvent::Waiting => debug!("Cooling down (frame {})", output.frame_id),
                TickEvent::Idle => {}
            }
            if let Some(stage) = &output.stage {
                debug!(
                    "Frame {}: stage {} '{}' ({})",
                    output.frame_id, stage.index, stage.name, stage.kind
                );
            }
        }

        for event in pipeline.drain_events() {
            info!("Event: {:?}", event);
        }

        if pipeline.is_finished() {
            info!("🏁 All stages complete");
            break;
        }
    }

    let gate_stats = gate.get_stats();
    info!(
        "Object detector ran on {}/{} frames ({} detections admitted)",
        gate_stats.detector_runs, gate_stats.total_frames, gate_stats.admitted
    );

    let summary = pipeline.metrics().summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
