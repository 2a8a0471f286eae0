// src/pipeline/event_bus.rs
//
// Decoupled event system. The presentation layer drains game events
// instead of polling the state machine for changes.

use crate::game::StageKind;
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum GameEvent {
    GameStarted,

    IntroCompleted,

    VideoAdvanced {
        finished_index: usize,
    },

    StageCompleted {
        completed_index: usize,
        name: String,
        kind: StageKind,
        frame_id: u64,
    },

    Finished {
        total_stages: usize,
    },
}

pub struct EventBus {
    events: VecDeque<GameEvent>,
    max_pending: usize,
}

impl EventBus {
    pub fn new(max_pending: usize) -> Self {
        let max_pending = max_pending.max(1);
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn publish(&mut self, event: GameEvent) {
        if self.events.len() >= self.max_pending {
            warn!(
                "Event bus full ({} events), dropping oldest",
                self.max_pending
            );
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.events.len()
    }
}
