// src/game/mod.rs
//
// Narrative stage table and the state machine that walks it.

mod stages;
mod state_machine;

pub use stages::{StageCondition, StageKind, StageSpec, StageTable};
pub use state_machine::{Cooldowns, GamePhase, GameStateMachine, Progress, StageEvent, StageView};
