// src/recognition/landmarks.rs
//
// Hand landmarks → classifier features. The gesture model itself is a
// black box behind `GestureClassifier`.

use super::aggregator::HandSamples;
use crate::types::GestureSample;
use serde::{Deserialize, Serialize};

/// Landmarks per hand (MediaPipe hand model)
pub const HAND_LANDMARK_COUNT: usize = 21;
/// x, y, z per landmark
pub const FEATURE_DIM: usize = HAND_LANDMARK_COUNT * 3;

pub const WRIST: usize = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Flattened landmark coordinates relative to the wrist.
///
/// Returns `None` unless exactly `HAND_LANDMARK_COUNT` landmarks are given.
pub fn wrist_relative_features(landmarks: &[Landmark]) -> Option<Vec<f32>> {
    if landmarks.len() != HAND_LANDMARK_COUNT {
        return None;
    }
    let wrist = landmarks[WRIST];
    let mut features = Vec::with_capacity(FEATURE_DIM);
    for lm in landmarks {
        features.push(lm.x - wrist.x);
        features.push(lm.y - wrist.y);
        features.push(lm.z - wrist.z);
    }
    Some(features)
}

/// Gesture model seam: one feature vector in, best class and its probability out
pub trait GestureClassifier {
    fn classify(&mut self, features: &[f32]) -> Option<GestureSample>;
}

impl<F> GestureClassifier for F
where
    F: FnMut(&[f32]) -> Option<GestureSample>,
{
    fn classify(&mut self, features: &[f32]) -> Option<GestureSample> {
        self(features)
    }
}

/// Classify up to two hands in detector order.
///
/// A hand with the wrong landmark count, or one the classifier declines,
/// leaves its slot empty.
pub fn classify_hands<C>(hands: &[Vec<Landmark>], classifier: &mut C) -> HandSamples
where
    C: GestureClassifier + ?Sized,
{
    let mut samples: HandSamples = [None, None];
    for (slot, hand) in samples.iter_mut().zip(hands.iter()) {
        *slot = wrist_relative_features(hand).and_then(|features| classifier.classify(&features));
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GestureLabel;

    fn hand(offset: f32) -> Vec<Landmark> {
        (0..HAND_LANDMARK_COUNT)
            .map(|i| Landmark::new(offset + i as f32 * 0.01, offset, 0.5))
            .collect()
    }

    #[test]
    fn test_features_are_wrist_relative() {
        let features = wrist_relative_features(&hand(0.3)).unwrap();
        assert_eq!(features.len(), FEATURE_DIM);
        assert_eq!(&features[0..3], &[0.0f32; 3]);
        assert!((features[3] - 0.01).abs() < 1e-6);
        assert!(features.iter().skip(2).step_by(3).all(|z| *z == 0.0));
    }

    #[test]
    fn test_wrong_dimensionality_is_absent() {
        assert!(wrist_relative_features(&[]).is_none());
        assert!(wrist_relative_features(&hand(0.0)[..20]).is_none());
    }

    #[test]
    fn test_classify_hands_fills_slots_in_order() {
        let mut calls = 0;
        let mut classifier = |features: &[f32]| {
            calls += 1;
            assert_eq!(features.len(), FEATURE_DIM);
            Some(GestureSample::new(GestureLabel::B, 0.7))
        };

        let short: Vec<Landmark> = hand(0.0).into_iter().take(5).collect();
        let samples = classify_hands(&[short, hand(0.1), hand(0.2)], &mut classifier);

        assert!(samples[0].is_none());
        assert_eq!(samples[1].map(|s| s.label), Some(GestureLabel::B));
        assert_eq!(calls, 1);
    }
}
