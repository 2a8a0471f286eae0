// src/types.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::game::StageSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub objects: ObjectConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub event_bus: EventBusConfig,
    pub stages: Vec<StageSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_intro_cooldown_ms")]
    pub intro_cooldown_ms: u64,
    #[serde(default = "default_stage_cooldown_ms")]
    pub stage_cooldown_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            intro_cooldown_ms: default_intro_cooldown_ms(),
            stage_cooldown_ms: default_stage_cooldown_ms(),
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    33
}

fn default_intro_cooldown_ms() -> u64 {
    500
}

fn default_stage_cooldown_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectConfig {
    #[serde(default = "default_object_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_detect_every_n_frames")]
    pub detect_every_n_frames: u64,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_object_threshold(),
            detect_every_n_frames: default_detect_every_n_frames(),
        }
    }
}

fn default_object_threshold() -> f32 {
    0.6
}

fn default_detect_every_n_frames() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBusConfig {
    pub max_pending: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self { max_pending: 64 }
    }
}

/// Stabilized or raw gesture class produced by the hand classifier.
///
/// `NoHand` is the "nothing recognized" sentinel. It serializes as `None`
/// and also parses from the classifier's `Nenhum` class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureLabel {
    #[serde(rename = "None", alias = "Nenhum")]
    NoHand,
    A,
    B,
    C,
    D,
    E,
}

impl GestureLabel {
    pub fn is_gesture(&self) -> bool {
        !matches!(self, GestureLabel::NoHand)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::NoHand => "None",
            GestureLabel::A => "A",
            GestureLabel::B => "B",
            GestureLabel::C => "C",
            GestureLabel::D => "D",
            GestureLabel::E => "E",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "None" | "Nenhum" | "" => Ok(GestureLabel::NoHand),
            "A" => Ok(GestureLabel::A),
            "B" => Ok(GestureLabel::B),
            "C" => Ok(GestureLabel::C),
            "D" => Ok(GestureLabel::D),
            "E" => Ok(GestureLabel::E),
            other => anyhow::bail!("unknown gesture label '{}'", other),
        }
    }
}

/// Positional hand index as reported by the landmark detector.
///
/// Carries no identity: the detector may swap hands between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSlot {
    First,
    Second,
}

impl HandSlot {
    pub fn index(&self) -> usize {
        match self {
            HandSlot::First => 0,
            HandSlot::Second => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    pub label: GestureLabel,
    pub confidence: f32,
}

impl GestureSample {
    /// Confidence is clamped into [0, 1].
    pub fn new(label: GestureLabel, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDetection {
    pub label: String,
    pub confidence: f32,
}

/// Stable per-frame view handed to the stage machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSignal {
    pub label0: GestureLabel,
    pub label1: GestureLabel,
    pub confidence0: f32,
    pub confidence1: f32,
    pub objects: BTreeSet<String>,
}

impl FrameSignal {
    pub fn new(label0: GestureLabel, label1: GestureLabel, objects: BTreeSet<String>) -> Self {
        Self {
            label0,
            label1,
            confidence0: 0.0,
            confidence1: 0.0,
            objects,
        }
    }

    pub fn has_hands(&self) -> bool {
        self.label0.is_gesture() || self.label1.is_gesture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing_accepts_sentinel_aliases() {
        assert_eq!("None".parse::<GestureLabel>().unwrap(), GestureLabel::NoHand);
        assert_eq!("Nenhum".parse::<GestureLabel>().unwrap(), GestureLabel::NoHand);
        assert_eq!(" C ".parse::<GestureLabel>().unwrap(), GestureLabel::C);
        assert!("Z".parse::<GestureLabel>().is_err());
    }

    #[test]
    fn test_label_yaml_names() {
        let labels: Vec<GestureLabel> = serde_yaml::from_str("[A, None, Nenhum, E]").unwrap();
        assert_eq!(
            labels,
            vec![
                GestureLabel::A,
                GestureLabel::NoHand,
                GestureLabel::NoHand,
                GestureLabel::E
            ]
        );
        assert!(serde_yaml::from_str::<GestureLabel>("F").is_err());
    }

    #[test]
    fn test_sample_confidence_is_clamped() {
        assert_eq!(GestureSample::new(GestureLabel::A, 1.7).confidence, 1.0);
        assert_eq!(GestureSample::new(GestureLabel::A, -0.2).confidence, 0.0);
        assert_eq!(GestureSample::new(GestureLabel::A, f32::NAN).confidence, 0.0);
    }
}
