// src/game/state_machine.rs
//
// Stage progression. Consumes stabilized frame signals plus the three
// narrative control signals and walks the stage table exactly once.

use super::stages::{StageKind, StageSpec, StageTable};
use crate::types::{FrameSignal, TimingConfig};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Menu,
    AwaitingIntro,
    Playing { stage_index: usize },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StageEvent {
    StageComplete { completed_index: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct Cooldowns {
    /// After `intro_completed` and `video_finished`
    pub intro: Duration,
    /// After a gesture or object stage completes
    pub stage: Duration,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            intro: Duration::from_millis(500),
            stage: Duration::from_millis(1000),
        }
    }
}

impl From<&TimingConfig> for Cooldowns {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            intro: Duration::from_millis(timing.intro_cooldown_ms),
            stage: Duration::from_millis(timing.stage_cooldown_ms),
        }
    }
}

/// What the presentation layer needs to render the current stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageView {
    pub index: usize,
    pub kind: StageKind,
    pub name: String,
    pub media: Option<String>,
    pub loop_media: Option<String>,
}

/// Interactive stages completed out of the interactive total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

pub struct GameStateMachine {
    table: StageTable,
    cooldowns: Cooldowns,
    phase: GamePhase,
    cooldown_deadline: Option<Instant>,
}

impl GameStateMachine {
    pub fn new(table: StageTable, cooldowns: Cooldowns) -> Self {
        Self {
            table,
            cooldowns,
            phase: GamePhase::Menu,
            cooldown_deadline: None,
        }
    }

    /// Menu confirmed. Only meaningful in `Menu`.
    pub fn start_game(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            warn!("start_game ignored in phase {:?}", self.phase);
            return false;
        }
        self.phase = GamePhase::AwaitingIntro;
        info!("Game started, waiting for intro");
        true
    }

    /// Intro narration finished. Only meaningful in `AwaitingIntro`.
    pub fn intro_completed(&mut self, now: Instant) -> bool {
        if self.phase != GamePhase::AwaitingIntro {
            warn!("intro_completed ignored in phase {:?}", self.phase);
            return false;
        }
        self.phase = GamePhase::Playing { stage_index: 0 };
        self.cooldown_deadline = Some(now + self.cooldowns.intro);
        self.settle();
        info!("Intro complete, entering stage 0");
        true
    }

    /// Current clip finished. Advances only past a video stage.
    pub fn video_finished(&mut self, now: Instant) -> bool {
        self.settle();
        let GamePhase::Playing { stage_index } = self.phase else {
            debug!("video_finished ignored in phase {:?}", self.phase);
            return false;
        };
        let Some(stage) = self.table.get(stage_index) else {
            return false;
        };
        if stage.kind() != StageKind::Video {
            warn!(
                "video_finished ignored on {} stage {} '{}'",
                stage.kind(),
                stage_index,
                stage.name
            );
            return false;
        }

        info!("Video stage {} '{}' finished", stage_index, stage.name);
        self.advance(stage_index, now + self.cooldowns.intro);
        true
    }

    /// Check this frame against the current stage's completion condition.
    ///
    /// No-op (returns `None`) outside `Playing`, during cooldown, on video
    /// stages and when the condition does not hold.
    pub fn update(&mut self, signal: &FrameSignal, now: Instant) -> Option<StageEvent> {
        self.settle();
        let GamePhase::Playing { stage_index } = self.phase else {
            return None;
        };
        if self.is_cooling_down(now) {
            return None;
        }

        let stage = self.table.get(stage_index)?;
        if stage.kind() == StageKind::Video {
            return None;
        }

        if signal.has_hands() || !signal.objects.is_empty() {
            debug!(
                "Stage {} ({}): label0={}, label1={}, objects={:?}",
                stage_index, stage.kind(), signal.label0, signal.label1, signal.objects
            );
        }

        if !stage.condition.is_met(signal) {
            return None;
        }

        info!("✓ Stage {} '{}' complete", stage_index, stage.name);
        self.advance(stage_index, now + self.cooldowns.stage);
        Some(StageEvent::StageComplete {
            completed_index: stage_index,
        })
    }

    fn advance(&mut self, from: usize, deadline: Instant) {
        self.phase = GamePhase::Playing {
            stage_index: from + 1,
        };
        self.cooldown_deadline = Some(deadline);
        self.settle();
        if let GamePhase::Playing { stage_index } = self.phase {
            debug!("→ Advancing to stage {}", stage_index);
        }
    }

    /// Collapse an out-of-range stage index into `Finished`.
    fn settle(&mut self) {
        if let GamePhase::Playing { stage_index } = self.phase {
            if stage_index >= self.table.len() {
                self.phase = GamePhase::Finished;
                info!("All {} stages complete", self.table.len());
            }
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn menu_active(&self) -> bool {
        self.phase == GamePhase::Menu
    }

    pub fn awaiting_intro_complete(&self) -> bool {
        self.phase == GamePhase::AwaitingIntro
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// `None` before the first stage; the table length once finished.
    pub fn stage_index(&self) -> Option<usize> {
        match self.phase {
            GamePhase::Menu | GamePhase::AwaitingIntro => None,
            GamePhase::Playing { stage_index } => Some(stage_index),
            GamePhase::Finished => Some(self.table.len()),
        }
    }

    pub fn cooldown_deadline(&self) -> Option<Instant> {
        self.cooldown_deadline
    }

    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.cooldown_deadline.is_some_and(|deadline| now < deadline)
    }

    pub fn current_stage(&self) -> Option<&StageSpec> {
        match self.phase {
            GamePhase::Playing { stage_index } => self.table.get(stage_index),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<StageView> {
        let GamePhase::Playing { stage_index } = self.phase else {
            return None;
        };
        let stage = self.table.get(stage_index)?;
        Some(StageView {
            index: stage_index,
            kind: stage.kind(),
            name: stage.name.clone(),
            media: stage.media().map(str::to_string),
            loop_media: stage.loop_media.clone(),
        })
    }

    pub fn progress(&self) -> Progress {
        let completed = match self.stage_index() {
            Some(index) => self.table.interactive_before(index),
            None => 0,
        };
        Progress {
            completed,
            total: self.table.interactive_count(),
        }
    }

    pub fn table(&self) -> &StageTable {
        &self.table
    }
}
