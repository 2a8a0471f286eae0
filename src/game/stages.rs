// src/game/stages.rs
//
// Fixed narrative sequence. Built once from config and never mutated.

use crate::types::{FrameSignal, GestureLabel};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StageKind {
    Video,
    SingleGesture,
    DualGesture,
    ObjectPresence,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Video => "video",
            StageKind::SingleGesture => "single_gesture",
            StageKind::DualGesture => "dual_gesture",
            StageKind::ObjectPresence => "object_presence",
        };
        f.write_str(name)
    }
}

/// How a stage is completed, with the parameters of that kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageCondition {
    /// Passive clip, advanced only by `video_finished`
    Video { media: String },
    /// Either hand shows `gesture`
    SingleGesture { gesture: GestureLabel },
    /// Both hands in the same frame, in either order
    DualGesture { gestures: [GestureLabel; 2] },
    /// Object detector reports `object`
    ObjectPresence { object: String },
}

impl StageCondition {
    pub fn kind(&self) -> StageKind {
        match self {
            StageCondition::Video { .. } => StageKind::Video,
            StageCondition::SingleGesture { .. } => StageKind::SingleGesture,
            StageCondition::DualGesture { .. } => StageKind::DualGesture,
            StageCondition::ObjectPresence { .. } => StageKind::ObjectPresence,
        }
    }

    /// Completion predicate for one frame. Video stages never complete here.
    pub fn is_met(&self, signal: &FrameSignal) -> bool {
        match self {
            StageCondition::Video { .. } => false,
            StageCondition::SingleGesture { gesture } => {
                signal.label0 == *gesture || signal.label1 == *gesture
            }
            StageCondition::DualGesture { gestures: [a, b] } => {
                (signal.label0 == *a && signal.label1 == *b)
                    || (signal.label0 == *b && signal.label1 == *a)
            }
            StageCondition::ObjectPresence { object } => signal.objects.contains(object),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSpec {
    pub name: String,
    #[serde(flatten)]
    pub condition: StageCondition,
    /// Clip looped while the player works on an interactive stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_media: Option<String>,
}

impl StageSpec {
    pub fn new(name: impl Into<String>, condition: StageCondition) -> Self {
        Self {
            name: name.into(),
            condition,
            loop_media: None,
        }
    }

    pub fn video(name: impl Into<String>, media: impl Into<String>) -> Self {
        Self::new(
            name,
            StageCondition::Video {
                media: media.into(),
            },
        )
    }

    pub fn single_gesture(name: impl Into<String>, gesture: GestureLabel) -> Self {
        Self::new(name, StageCondition::SingleGesture { gesture })
    }

    pub fn dual_gesture(name: impl Into<String>, a: GestureLabel, b: GestureLabel) -> Self {
        Self::new(name, StageCondition::DualGesture { gestures: [a, b] })
    }

    pub fn object_presence(name: impl Into<String>, object: impl Into<String>) -> Self {
        Self::new(
            name,
            StageCondition::ObjectPresence {
                object: object.into(),
            },
        )
    }

    pub fn with_loop_media(mut self, media: impl Into<String>) -> Self {
        self.loop_media = Some(media.into());
        self
    }

    pub fn kind(&self) -> StageKind {
        self.condition.kind()
    }

    pub fn is_interactive(&self) -> bool {
        self.kind() != StageKind::Video
    }

    /// Media the presentation layer should show for this stage
    pub fn media(&self) -> Option<&str> {
        match &self.condition {
            StageCondition::Video { media } => Some(media),
            _ => self.loop_media.as_deref(),
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("stage {} has an empty name", index);
        }
        match &self.condition {
            StageCondition::Video { media } => {
                if media.trim().is_empty() {
                    bail!("video stage '{}' has an empty media reference", self.name);
                }
            }
            StageCondition::SingleGesture { gesture } => {
                if !gesture.is_gesture() {
                    bail!("stage '{}' targets the no-hand sentinel", self.name);
                }
            }
            StageCondition::DualGesture { gestures } => {
                if gestures.iter().any(|g| !g.is_gesture()) {
                    bail!("stage '{}' targets the no-hand sentinel", self.name);
                }
            }
            StageCondition::ObjectPresence { object } => {
                if object.trim().is_empty() {
                    bail!("object stage '{}' has an empty object label", self.name);
                }
            }
        }
        if let Some(media) = &self.loop_media {
            if media.trim().is_empty() {
                bail!("stage '{}' has an empty loop_media reference", self.name);
            }
        }
        Ok(())
    }
}

/// Validated, ordered stage list
#[derive(Debug, Clone)]
pub struct StageTable {
    stages: Vec<StageSpec>,
}

impl StageTable {
    pub fn new(stages: Vec<StageSpec>) -> Result<Self> {
        if stages.is_empty() {
            bail!("stage table is empty");
        }

        let mut names = HashSet::new();
        for (index, stage) in stages.iter().enumerate() {
            stage.validate(index)?;
            if !names.insert(stage.name.as_str()) {
                bail!("duplicate stage name '{}'", stage.name);
            }
        }

        Ok(Self { stages })
    }

    pub fn get(&self, index: usize) -> Option<&StageSpec> {
        self.stages.get(index)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageSpec> {
        self.stages.iter()
    }

    pub fn interactive_count(&self) -> usize {
        self.stages.iter().filter(|s| s.is_interactive()).count()
    }

    /// Interactive stages strictly before `index`
    pub fn interactive_before(&self, index: usize) -> usize {
        self.stages
            .iter()
            .take(index)
            .filter(|s| s.is_interactive())
            .count()
    }
}
