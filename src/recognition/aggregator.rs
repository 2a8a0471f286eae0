// src/recognition/aggregator.rs
//
// Turns raw per-frame detector output into one stable FrameSignal.
// The stage machine only ever sees smoothed labels.

use crate::smoother::{GestureSmoother, SmoothedGesture};
use crate::types::{FrameSignal, GestureSample, HandSlot};
use std::collections::BTreeSet;
use tracing::debug;

/// Per-slot samples for one frame; `None` means no usable hand in that slot
pub type HandSamples = [Option<GestureSample>; 2];

/// Fill slots in detector order. Hands beyond the second are dropped.
pub fn hand_samples(detected: &[GestureSample]) -> HandSamples {
    let mut samples: HandSamples = [None, None];
    for (slot, sample) in samples.iter_mut().zip(detected.iter()) {
        *slot = Some(*sample);
    }
    samples
}

pub struct FrameAggregator {
    smoothers: [GestureSmoother; 2],
}

impl FrameAggregator {
    pub fn new() -> Self {
        Self {
            smoothers: [GestureSmoother::new(), GestureSmoother::new()],
        }
    }

    /// Smooth both slots and attach this frame's objects verbatim.
    pub fn aggregate(&mut self, samples: HandSamples, objects: BTreeSet<String>) -> FrameSignal {
        let [first, second] = samples;
        let hand0 = self.smoothers[HandSlot::First.index()].observe(first);
        let hand1 = self.smoothers[HandSlot::Second.index()].observe(second);

        debug!(
            "Hands: {} ({:.2}) / {} ({:.2}), objects={:?}",
            hand0.label, hand0.confidence, hand1.label, hand1.confidence, objects
        );

        FrameSignal {
            label0: hand0.label,
            label1: hand1.label,
            confidence0: hand0.confidence,
            confidence1: hand1.confidence,
            objects,
        }
    }

    pub fn current(&self, slot: HandSlot) -> SmoothedGesture {
        self.smoothers[slot.index()].current()
    }

    pub fn reset(&mut self) {
        for smoother in &mut self.smoothers {
            smoother.reset();
        }
    }
}

impl Default for FrameAggregator {
    fn default() -> Self {
        Self::new()
    }
}
