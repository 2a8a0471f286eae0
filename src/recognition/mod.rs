// src/recognition/mod.rs
//
// Detector-facing side of the core.
//
// Signal flow:
//   Hand landmarks → landmarks::classify_hands ─┐
//   Object detections → object_gate ────────────┼→ aggregator → FrameSignal
//                                               ┘

pub mod aggregator;
pub mod landmarks;
pub mod object_gate;

pub use aggregator::{hand_samples, FrameAggregator, HandSamples};
pub use landmarks::{classify_hands, wrist_relative_features, GestureClassifier, Landmark};
pub use object_gate::{GateStats, ObjectGate};
