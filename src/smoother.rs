// src/smoother.rs

use crate::types::{GestureLabel, GestureSample};
use std::collections::VecDeque;

/// Number of recent samples each hand slot votes over.
pub const HISTORY_WINDOW: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedGesture {
    pub label: GestureLabel,
    pub confidence: f32,
}

impl SmoothedGesture {
    pub fn none() -> Self {
        Self {
            label: GestureLabel::NoHand,
            confidence: 0.0,
        }
    }
}

/// Temporal smoother for one hand slot using a sliding window
///
/// - Label: mode over the window, ties go to the label seen first (oldest → newest)
/// - Confidence: average over the same window
pub struct GestureSmoother {
    history: VecDeque<GestureSample>,
    last: SmoothedGesture,
}

impl GestureSmoother {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_WINDOW),
            last: SmoothedGesture::none(),
        }
    }

    /// Feed this frame's sample, if any, and return the stabilized output.
    ///
    /// A missing sample leaves the window untouched and repeats the last
    /// output; there is no decay toward `NoHand`.
    pub fn observe(&mut self, sample: Option<GestureSample>) -> SmoothedGesture {
        let Some(sample) = sample else {
            return self.last;
        };

        self.history.push_back(sample);
        if self.history.len() > HISTORY_WINDOW {
            self.history.pop_front();
        }

        self.last = SmoothedGesture {
            label: self.smooth_label(),
            confidence: self.smooth_confidence(),
        };
        self.last
    }

    /// Most frequent label in the window
    fn smooth_label(&self) -> GestureLabel {
        // Insertion-ordered tally so the first maximal label wins a tie.
        let mut counts: Vec<(GestureLabel, usize)> = Vec::with_capacity(HISTORY_WINDOW);
        for sample in &self.history {
            match counts.iter_mut().find(|(label, _)| *label == sample.label) {
                Some((_, count)) => *count += 1,
                None => counts.push((sample.label, 1)),
            }
        }

        let max = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);
        counts
            .into_iter()
            .find(|(_, count)| *count == max)
            .map(|(label, _)| label)
            .unwrap_or(GestureLabel::NoHand)
    }

    fn smooth_confidence(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.history.iter().map(|s| s.confidence).sum();
        sum / self.history.len() as f32
    }

    /// Last output without feeding anything
    pub fn current(&self) -> SmoothedGesture {
        self.last
    }

    pub fn history_size(&self) -> usize {
        self.history.len()
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last = SmoothedGesture::none();
    }
}

impl Default for GestureSmoother {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GestureLabel::*;

    fn feed(smoother: &mut GestureSmoother, labels: &[GestureLabel]) -> SmoothedGesture {
        let mut out = smoother.current();
        for label in labels {
            out = smoother.observe(Some(GestureSample::new(*label, 0.8)));
        }
        out
    }

    #[test]
    fn test_empty_history_reports_sentinel() {
        let mut smoother = GestureSmoother::new();
        let out = smoother.observe(None);
        assert_eq!(out.label, NoHand);
        assert_eq!(out.confidence, 0.0);
        assert_eq!(smoother.history_size(), 0);
    }

    #[test]
    fn test_majority_wins() {
        let mut smoother = GestureSmoother::new();
        let out = feed(&mut smoother, &[A, A, B, B, B]);
        assert_eq!(out.label, B);
    }

    #[test]
    fn test_tie_goes_to_first_seen_label() {
        let mut smoother = GestureSmoother::new();
        assert_eq!(feed(&mut smoother, &[A, B]).label, A);

        let mut smoother = GestureSmoother::new();
        assert_eq!(feed(&mut smoother, &[C, B, B, C]).label, C);
    }

    #[test]
    fn test_window_is_bounded_and_evicts_oldest() {
        let mut smoother = GestureSmoother::new();
        // [A, A, A, B, B, B, C] → tie A/B, A seen first
        assert_eq!(feed(&mut smoother, &[A, A, A, B, B, B, C]).label, A);
        assert_eq!(smoother.history_size(), HISTORY_WINDOW);

        // 8th sample evicts the first A: [A, A, B, B, B, C, B]
        assert_eq!(feed(&mut smoother, &[B]).label, B);
        assert_eq!(smoother.history_size(), HISTORY_WINDOW);

        feed(&mut smoother, &[D, D, D, D, D]);
        assert_eq!(smoother.history_size(), HISTORY_WINDOW);
    }

    #[test]
    fn test_confidence_is_window_mean() {
        let mut smoother = GestureSmoother::new();
        smoother.observe(Some(GestureSample::new(A, 0.5)));
        let out = smoother.observe(Some(GestureSample::new(A, 1.0)));
        assert!((out.confidence - 0.75).abs() < 1e-6);

        for _ in 0..HISTORY_WINDOW {
            smoother.observe(Some(GestureSample::new(B, 0.25)));
        }
        assert!((smoother.current().confidence - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_absent_sample_repeats_last_output() {
        let mut smoother = GestureSmoother::new();
        let before = feed(&mut smoother, &[E, E, A]);
        let after = smoother.observe(None);
        assert_eq!(before, after);
        assert_eq!(smoother.history_size(), 3);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut smoother = GestureSmoother::new();
        feed(&mut smoother, &[A, A]);
        smoother.reset();
        assert_eq!(smoother.history_size(), 0);
        assert_eq!(smoother.current(), SmoothedGesture::none());
    }
}
