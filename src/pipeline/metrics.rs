// src/pipeline/metrics.rs
//
// Counters for the tick loop. Summarized to the log at shutdown.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub total_ticks: u64,
    pub skipped_ticks: u64,
    pub frames_with_hands: u64,
    pub frames_with_objects: u64,
    pub waiting_ticks: u64,
    pub stages_completed: u64,
    pub videos_advanced: u64,
    pub ignored_controls: u64,
    pub started_at: Instant,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            total_ticks: 0,
            skipped_ticks: 0,
            frames_with_hands: 0,
            frames_with_objects: 0,
            waiting_ticks: 0,
            stages_completed: 0,
            videos_advanced: 0,
            ignored_controls: 0,
            started_at: Instant::now(),
        }
    }

    pub fn processed_ticks(&self) -> u64 {
        self.total_ticks - self.skipped_ticks
    }

    pub fn tick_rate(&self) -> f64 {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            self.processed_ticks() as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_ticks: self.total_ticks,
            skipped_ticks: self.skipped_ticks,
            tick_rate: self.tick_rate(),
            frames_with_hands: self.frames_with_hands,
            frames_with_objects: self.frames_with_objects,
            waiting_ticks: self.waiting_ticks,
            stages_completed: self.stages_completed,
            videos_advanced: self.videos_advanced,
            ignored_controls: self.ignored_controls,
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub total_ticks: u64,
    pub skipped_ticks: u64,
    pub tick_rate: f64,
    pub frames_with_hands: u64,
    pub frames_with_objects: u64,
    pub waiting_ticks: u64,
    pub stages_completed: u64,
    pub videos_advanced: u64,
    pub ignored_controls: u64,
    pub elapsed_secs: f64,
}
