// src/recognition/object_gate.rs
//
// Upstream gate for the object detector: decides which frames run the
// detector and which detections are confident enough to report.

use crate::types::{ObjectConfig, ObjectDetection};
use std::collections::BTreeSet;
use tracing::debug;

pub struct ObjectGate {
    /// Detections must score strictly above this
    confidence_threshold: f32,

    /// Run the detector on every n-th frame
    every_n_frames: u64,

    /// Total frames seen
    total_frames: u64,

    /// Times the detector was scheduled
    detector_runs: u64,

    /// Detections admitted so far
    admitted: u64,
}

impl ObjectGate {
    pub fn new(config: &ObjectConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            every_n_frames: config.detect_every_n_frames.max(1),
            total_frames: 0,
            detector_runs: 0,
            admitted: 0,
        }
    }

    /// Whether the detector should run on `frame_id` (frame 0 included)
    pub fn should_detect(&mut self, frame_id: u64) -> bool {
        self.total_frames += 1;
        let run = frame_id % self.every_n_frames == 0;
        if run {
            self.detector_runs += 1;
        }
        run
    }

    /// Labels of detections above the confidence threshold
    pub fn admit(&mut self, detections: &[ObjectDetection]) -> BTreeSet<String> {
        let mut labels = BTreeSet::new();
        for detection in detections {
            if detection.confidence > self.confidence_threshold {
                debug!(
                    "Object detected: {} (conf: {:.2})",
                    detection.label, detection.confidence
                );
                self.admitted += 1;
                labels.insert(detection.label.clone());
            }
        }
        labels
    }

    /// Schedule and filter in one step. Off-cadence frames report no objects.
    pub fn process(&mut self, frame_id: u64, detections: &[ObjectDetection]) -> BTreeSet<String> {
        if self.should_detect(frame_id) {
            self.admit(detections)
        } else {
            BTreeSet::new()
        }
    }

    pub fn get_stats(&self) -> GateStats {
        GateStats {
            total_frames: self.total_frames,
            detector_runs: self.detector_runs,
            admitted: self.admitted,
            run_frequency: if self.total_frames > 0 {
                self.detector_runs as f32 / self.total_frames as f32
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GateStats {
    pub total_frames: u64,
    pub detector_runs: u64,
    pub admitted: u64,
    pub run_frequency: f32,
}
