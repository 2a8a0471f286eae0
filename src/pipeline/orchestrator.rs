// src/pipeline/orchestrator.rs
//
// Single entry point for the periodic tick. Owns every piece of mutable
// core state; the caller only supplies detector output, control signals
// and the tick timestamp.

use super::event_bus::{EventBus, GameEvent};
use super::metrics::PipelineMetrics;
use crate::game::{
    Cooldowns, GamePhase, GameStateMachine, Progress, StageEvent, StageTable, StageView,
};
use crate::recognition::{FrameAggregator, HandSamples};
use crate::types::{Config, FrameSignal};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

/// Detector output for one successfully read camera frame
#[derive(Debug, Clone, Default)]
pub struct DetectorFrame {
    pub hands: HandSamples,
    /// Already confidence-filtered upstream
    pub objects: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TickEvent {
    StageComplete(usize),
    /// Playing, but inside a cooldown window
    Waiting,
    Idle,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickOutput {
    pub frame_id: u64,
    pub signal: FrameSignal,
    pub event: TickEvent,
    pub phase: GamePhase,
    pub stage: Option<StageView>,
    pub progress: Progress,
}

pub struct GamePipeline {
    aggregator: FrameAggregator,
    machine: GameStateMachine,
    events: EventBus,
    metrics: PipelineMetrics,
    next_frame_id: u64,
}

impl GamePipeline {
    pub fn new(config: &Config) -> Result<Self> {
        let table = config.stage_table()?;
        info!(
            "✓ Stage table loaded: {} stages ({} interactive)",
            table.len(),
            table.interactive_count()
        );
        Ok(Self::from_parts(
            table,
            Cooldowns::from(&config.timing),
            config.event_bus.max_pending,
        ))
    }

    pub fn from_parts(table: StageTable, cooldowns: Cooldowns, max_pending: usize) -> Self {
        Self {
            aggregator: FrameAggregator::new(),
            machine: GameStateMachine::new(table, cooldowns),
            events: EventBus::new(max_pending),
            metrics: PipelineMetrics::new(),
            next_frame_id: 0,
        }
    }

    /// Process one tick. `None` is a failed frame read: nothing advances.
    pub fn tick(&mut self, frame: Option<DetectorFrame>, now: Instant) -> Option<TickOutput> {
        self.metrics.total_ticks += 1;
        let Some(frame) = frame else {
            self.metrics.skipped_ticks += 1;
            debug!("No frame this tick, skipping");
            return None;
        };

        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;

        let signal = self.aggregator.aggregate(frame.hands, frame.objects);
        if signal.has_hands() {
            self.metrics.frames_with_hands += 1;
        }
        if !signal.objects.is_empty() {
            self.metrics.frames_with_objects += 1;
        }

        let was_finished = self.machine.is_finished();
        let stage = self.machine.current_stage().cloned();

        let event = match self.machine.update(&signal, now) {
            Some(StageEvent::StageComplete { completed_index }) => {
                self.metrics.stages_completed += 1;
                if let Some(stage) = stage {
                    self.events.publish(GameEvent::StageCompleted {
                        completed_index,
                        name: stage.name,
                        kind: stage.condition.kind(),
                        frame_id,
                    });
                }
                TickEvent::StageComplete(completed_index)
            }
            None if self.is_waiting(now) => {
                self.metrics.waiting_ticks += 1;
                TickEvent::Waiting
            }
            None => TickEvent::Idle,
        };

        self.announce_finish(was_finished);

        Some(TickOutput {
            frame_id,
            signal,
            event,
            phase: self.machine.phase(),
            stage: self.machine.view(),
            progress: self.machine.progress(),
        })
    }

    pub fn start_game(&mut self) -> bool {
        let accepted = self.machine.start_game();
        if accepted {
            self.events.publish(GameEvent::GameStarted);
        } else {
            self.metrics.ignored_controls += 1;
        }
        accepted
    }

    pub fn intro_completed(&mut self, now: Instant) -> bool {
        let was_finished = self.machine.is_finished();
        let accepted = self.machine.intro_completed(now);
        if accepted {
            self.events.publish(GameEvent::IntroCompleted);
            self.announce_finish(was_finished);
        } else {
            self.metrics.ignored_controls += 1;
        }
        accepted
    }

    pub fn video_finished(&mut self, now: Instant) -> bool {
        let was_finished = self.machine.is_finished();
        let finished_index = self.machine.stage_index();
        let accepted = self.machine.video_finished(now);
        match (accepted, finished_index) {
            (true, Some(finished_index)) => {
                self.metrics.videos_advanced += 1;
                self.events
                    .publish(GameEvent::VideoAdvanced { finished_index });
                self.announce_finish(was_finished);
            }
            _ => self.metrics.ignored_controls += 1,
        }
        accepted
    }

    fn is_waiting(&self, now: Instant) -> bool {
        matches!(self.machine.phase(), GamePhase::Playing { .. })
            && self.machine.is_cooling_down(now)
    }

    fn announce_finish(&mut self, was_finished: bool) {
        if !was_finished && self.machine.is_finished() {
            self.events.publish(GameEvent::Finished {
                total_stages: self.machine.table().len(),
            });
        }
    }

    /// Id the next successfully read frame will get
    pub fn next_frame_id(&self) -> u64 {
        self.next_frame_id
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn machine(&self) -> &GameStateMachine {
        &self.machine
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn is_finished(&self) -> bool {
        self.machine.is_finished()
    }
}
