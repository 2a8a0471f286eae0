// src/replay.rs
//
// Recorded detector output for driving the core without a camera.
// Each entry is one tick; `repeat` expands an entry into several ticks.

use crate::pipeline::{DetectorFrame, GamePipeline};
use crate::recognition::{hand_samples, ObjectGate};
use crate::types::{GestureSample, ObjectDetection};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    StartGame,
    IntroCompleted,
    VideoFinished,
}

impl ControlAction {
    /// Forward to the pipeline; returns whether it was accepted
    pub fn apply(&self, pipeline: &mut GamePipeline, now: Instant) -> bool {
        match self {
            ControlAction::StartGame => pipeline.start_game(),
            ControlAction::IntroCompleted => pipeline.intro_completed(now),
            ControlAction::VideoFinished => pipeline.video_finished(now),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraceEntry {
    /// Control signal delivered before this tick's frame
    #[serde(default)]
    pub control: Option<ControlAction>,
    /// Camera read failed on this tick
    #[serde(default)]
    pub dropped: bool,
    #[serde(default)]
    pub hands: Vec<GestureSample>,
    /// Raw detections, before the confidence gate
    #[serde(default)]
    pub objects: Vec<ObjectDetection>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

impl TraceEntry {
    /// Detector frame for this tick, `None` if the read was dropped
    pub fn frame(&self, gate: &mut ObjectGate, frame_id: u64) -> Option<DetectorFrame> {
        if self.dropped {
            return None;
        }
        let hands: Vec<GestureSample> = self
            .hands
            .iter()
            .map(|h| GestureSample::new(h.label, h.confidence))
            .collect();
        Some(DetectorFrame {
            hands: hand_samples(&hands),
            objects: gate.process(frame_id, &self.objects),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid trace {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let entries: Vec<TraceEntry> = serde_yaml::from_str(contents)?;
        if entries.is_empty() {
            bail!("trace has no entries");
        }
        Ok(Self { entries })
    }

    /// Entries expanded by `repeat`. The control fires on the first copy only.
    pub fn ticks(&self) -> impl Iterator<Item = TraceEntry> + '_ {
        self.entries.iter().flat_map(|entry| {
            (0..entry.repeat).map(move |i| {
                let mut tick = entry.clone();
                if i > 0 {
                    tick.control = None;
                }
                tick
            })
        })
    }

    pub fn tick_count(&self) -> usize {
        self.entries.iter().map(|e| e.repeat as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GestureLabel, ObjectConfig};

    const TRACE: &str = r#"
- control: start_game
- dropped: true
- { hands: [{ label: A, confidence: 0.9 }, { label: B, confidence: 1.4 }], repeat: 3 }
- { control: video_finished, objects: [{ label: cat, confidence: 0.8 }, { label: dog, confidence: 0.3 }] }
"#;

    #[test]
    fn test_trace_expands_repeats() {
        let trace = Trace::from_yaml(TRACE).unwrap();
        assert_eq!(trace.tick_count(), 6);
        let ticks: Vec<TraceEntry> = trace.ticks().collect();
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].control, Some(ControlAction::StartGame));
        assert!(ticks[1].dropped);
        assert!(ticks[2..5].iter().all(|t| t.control.is_none() && t.hands.len() == 2));
        assert_eq!(ticks[5].control, Some(ControlAction::VideoFinished));
    }

    #[test]
    fn test_entry_builds_gated_frame() {
        let trace = Trace::from_yaml(TRACE).unwrap();
        let ticks: Vec<TraceEntry> = trace.ticks().collect();
        let mut gate = ObjectGate::new(&ObjectConfig::default());

        assert!(ticks[1].frame(&mut gate, 0).is_none());

        let frame = ticks[2].frame(&mut gate, 1).unwrap();
        assert_eq!(frame.hands[0].map(|s| s.label), Some(GestureLabel::A));
        assert_eq!(frame.hands[1].map(|s| s.confidence), Some(1.0));

        let on_cadence = ticks[5].frame(&mut gate, 10).unwrap();
        assert_eq!(on_cadence.objects.len(), 1);
        assert!(on_cadence.objects.contains("cat"));
        let off_cadence = ticks[5].frame(&mut gate, 11).unwrap();
        assert!(off_cadence.objects.is_empty());
    }

    #[test]
    fn test_unknown_control_is_rejected() {
        assert!(Trace::from_yaml("- control: pause\n").is_err());
        assert!(Trace::from_yaml("[]\n").is_err());
    }
}
