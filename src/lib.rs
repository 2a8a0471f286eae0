// src/lib.rs
//
// Gesture-driven stage progression core.
//
// Signal flow:
//   Detector output → recognition (smoothing) → FrameSignal
//   FrameSignal + control signals → game::GameStateMachine → stage events
//
// Orchestrated by pipeline::GamePipeline, one call per tick.

pub mod config;
pub mod game;
pub mod pipeline;
pub mod recognition;
pub mod replay;
pub mod smoother;
pub mod types;

pub use game::{GamePhase, GameStateMachine, StageEvent, StageSpec, StageTable};
pub use pipeline::{DetectorFrame, GamePipeline, TickEvent, TickOutput};
pub use smoother::{GestureSmoother, HISTORY_WINDOW};
pub use types::{Config, FrameSignal, GestureLabel, GestureSample, HandSlot};
