//! Geometric predicates - instantaneous gesture candidates for one frame
//!
//! Every rule reads raw coordinates from the current frame only. A signal
//! whose landmarks are missing stays false.

use serde::{Deserialize, Serialize};

use kelp_core::{
    FrameLandmarks, HandLandmark, HandSnapshot, Handedness, KelpError, KelpResult, PoseLandmark,
    PoseSnapshot, Signal, SignalSet,
};

use crate::geometry::{is_above, is_folded};

/// Thresholds for the geometric rules (normalized image units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredicateConfig {
    /// How far above its shoulder a wrist must be to count as raised
    pub hand_up_margin: f32,
    /// Maximum wrist-to-wrist distance for hands together
    pub hands_together_distance: f32,
    /// Closed digits (folded fingers plus adducted thumb) needed for a fist
    pub grab_min_closed: u32,
    /// How far above its base the thumb tip must be for thumbs up
    pub thumb_up_margin: f32,
    /// Maximum horizontal thumb tip to base distance for an adducted thumb
    pub thumb_adduction_distance: f32,
}

impl Default for PredicateConfig {
    fn default() -> Self {
        PredicateConfig {
            hand_up_margin: 0.1,
            hands_together_distance: 0.15,
            grab_min_closed: 4,
            thumb_up_margin: 0.05,
            thumb_adduction_distance: 0.05,
        }
    }
}

impl PredicateConfig {
    pub fn validate(&self) -> KelpResult<()> {
        let distances = [
            ("hand_up_margin", self.hand_up_margin),
            ("hands_together_distance", self.hands_together_distance),
            ("thumb_up_margin", self.thumb_up_margin),
            ("thumb_adduction_distance", self.thumb_adduction_distance),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(KelpError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if !(1..=5).contains(&self.grab_min_closed) {
            return Err(KelpError::InvalidConfig(format!(
                "grab_min_closed must be between 1 and 5, got {}",
                self.grab_min_closed
            )));
        }

        Ok(())
    }
}

/// Hand-level classification for a single hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandGestures {
    pub handedness: Option<Handedness>,
    pub grab: bool,
    pub thumbs_up: bool,
}

/// Computes candidate signals from landmark snapshots
#[derive(Debug, Clone, Default)]
pub struct PredicateEvaluator {
    config: PredicateConfig,
}

impl PredicateEvaluator {
    pub fn new(config: PredicateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredicateConfig {
        &self.config
    }

    /// Candidate signals for one frame
    pub fn evaluate(&self, frame: &FrameLandmarks) -> SignalSet {
        let mut candidates = SignalSet::new();

        if let Some(pose) = frame.pose() {
            self.evaluate_pose(pose, &mut candidates);
        }

        // Hands are classified independently; the frame signal is true if any
        // hand shows the gesture.
        for hand in frame.hands() {
            let gestures = self.classify_hand(hand);
            if gestures.grab {
                candidates.set(Signal::Grab, true);
            }
            if gestures.thumbs_up {
                candidates.set(Signal::ThumbsUp, true);
            }
        }

        candidates
    }

    fn evaluate_pose(&self, pose: &PoseSnapshot, candidates: &mut SignalSet) {
        let right_up = self.hand_raised(pose, Handedness::Right);
        let left_up = self.hand_raised(pose, Handedness::Left);

        candidates.set(Signal::RightHandUp, right_up);
        candidates.set(Signal::LeftHandUp, left_up);
        candidates.set(Signal::BothHandsUp, right_up && left_up);

        let left_wrist = pose.get(PoseLandmark::LeftWrist);
        let right_wrist = pose.get(PoseLandmark::RightWrist);
        candidates.set(
            Signal::PalmsTogetherPraying,
            left_wrist.distance(&right_wrist) < self.config.hands_together_distance,
        );
    }

    fn hand_raised(&self, pose: &PoseSnapshot, side: Handedness) -> bool {
        let wrist = pose.get(PoseLandmark::wrist(side));
        let shoulder = pose.get(PoseLandmark::shoulder(side));
        is_above(&wrist, &shoulder, self.config.hand_up_margin)
    }

    /// Grab and thumbs-up for a single hand
    ///
    /// Thumbs up suppresses grab on the same hand only.
    pub fn classify_hand(&self, hand: &HandSnapshot) -> HandGestures {
        let thumb_tip = hand.get(HandLandmark::ThumbTip);
        let thumb_mcp = hand.get(HandLandmark::ThumbMcp);

        let folded = HandLandmark::finger_pairs()
            .iter()
            .filter(|(tip, knuckle)| is_folded(&hand.get(*tip), &hand.get(*knuckle)))
            .count() as u32;

        let thumbs_up = is_above(&thumb_tip, &thumb_mcp, self.config.thumb_up_margin)
            && folded == HandLandmark::finger_pairs().len() as u32;

        let thumb_closed = (thumb_tip.x - thumb_mcp.x).abs() < self.config.thumb_adduction_distance;
        let closed = folded + u32::from(thumb_closed);

        HandGestures {
            handedness: Some(hand.handedness()),
            grab: closed >= self.config.grab_min_closed && !thumbs_up,
            thumbs_up,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use kelp_core::{HandLandmark, HandSnapshot, Handedness, Landmark, PoseLandmark, PoseSnapshot};

    /// Pose with both shoulders at y=0.5 and wrists at the given points
    pub fn pose_with_wrists(left: (f32, f32), right: (f32, f32)) -> PoseSnapshot {
        PoseSnapshot::zeroed()
            .with(PoseLandmark::LeftShoulder, Landmark::new(0.6, 0.5))
            .with(PoseLandmark::RightShoulder, Landmark::new(0.4, 0.5))
            .with(PoseLandmark::LeftWrist, Landmark::new(left.0, left.1))
            .with(PoseLandmark::RightWrist, Landmark::new(right.0, right.1))
    }

    fn hand_with_fingers(handedness: Handedness, folded: bool) -> HandSnapshot {
        let tip_y = if folded { 0.7 } else { 0.3 };
        let mut hand = HandSnapshot::zeroed(handedness);
        for (tip, knuckle) in HandLandmark::finger_pairs() {
            hand.set(*knuckle, Landmark::new(0.5, 0.6));
            hand.set(*tip, Landmark::new(0.5, tip_y));
        }
        hand
    }

    /// Four fingers folded, thumb tucked against the palm
    pub fn fist(handedness: Handedness) -> HandSnapshot {
        hand_with_fingers(handedness, true)
            .with(HandLandmark::ThumbMcp, Landmark::new(0.52, 0.6))
            .with(HandLandmark::ThumbTip, Landmark::new(0.50, 0.6))
    }

    /// Four fingers folded, thumb pointing up
    pub fn thumbs_up(handedness: Handedness) -> HandSnapshot {
        hand_with_fingers(handedness, true)
            .with(HandLandmark::ThumbMcp, Landmark::new(0.5, 0.5))
            .with(HandLandmark::ThumbTip, Landmark::new(0.5, 0.3))
    }

    /// All fingers extended, thumb spread out
    pub fn open_hand(handedness: Handedness) -> HandSnapshot {
        hand_with_fingers(handedness, false)
            .with(HandLandmark::ThumbMcp, Landmark::new(0.5, 0.6))
            .with(HandLandmark::ThumbTip, Landmark::new(0.3, 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn evaluator() -> PredicateEvaluator {
        PredicateEvaluator::new(PredicateConfig::default())
    }

    #[test]
    fn test_empty_frame_all_false() {
        let candidates = evaluator().evaluate(&FrameLandmarks::empty());
        assert_eq!(candidates, SignalSet::new());
    }

    #[test]
    fn test_right_hand_up() {
        // wrist 0.30 < shoulder 0.50 - margin 0.1
        let frame = FrameLandmarks::empty().with_pose(pose_with_wrists((0.8, 0.7), (0.2, 0.30)));
        let candidates = evaluator().evaluate(&frame);

        assert!(candidates[Signal::RightHandUp]);
        assert!(!candidates[Signal::LeftHandUp]);
        assert!(!candidates[Signal::BothHandsUp]);
    }

    #[test]
    fn test_hand_within_margin_not_raised() {
        let frame = FrameLandmarks::empty().with_pose(pose_with_wrists((0.8, 0.45), (0.2, 0.45)));
        let candidates = evaluator().evaluate(&frame);

        assert!(!candidates[Signal::RightHandUp]);
        assert!(!candidates[Signal::LeftHandUp]);
    }

    #[test]
    fn test_both_hands_up() {
        let frame = FrameLandmarks::empty().with_pose(pose_with_wrists((0.8, 0.2), (0.2, 0.2)));
        let candidates = evaluator().evaluate(&frame);

        assert!(candidates[Signal::RightHandUp]);
        assert!(candidates[Signal::LeftHandUp]);
        assert!(candidates[Signal::BothHandsUp]);
        assert!(!candidates[Signal::PalmsTogetherPraying]);
    }

    #[test]
    fn test_palms_together() {
        let frame = FrameLandmarks::empty().with_pose(pose_with_wrists((0.52, 0.6), (0.48, 0.6)));
        let candidates = evaluator().evaluate(&frame);

        assert!(candidates[Signal::PalmsTogetherPraying]);
        assert!(!candidates[Signal::BothHandsUp]);
    }

    #[test]
    fn test_pose_only_hand_signals_false() {
        let frame = FrameLandmarks::empty().with_pose(pose_with_wrists((0.8, 0.2), (0.2, 0.2)));
        let candidates = evaluator().evaluate(&frame);

        assert!(!candidates[Signal::Grab]);
        assert!(!candidates[Signal::ThumbsUp]);
    }

    #[test]
    fn test_hands_only_pose_signals_false() {
        let frame = FrameLandmarks::empty().with_hand(fist(Handedness::Right)).unwrap();
        let candidates = evaluator().evaluate(&frame);

        assert!(candidates[Signal::Grab]);
        for signal in [
            Signal::RightHandUp,
            Signal::LeftHandUp,
            Signal::BothHandsUp,
            Signal::PalmsTogetherPraying,
        ] {
            assert!(!candidates[signal], "{} should be false", signal);
        }
    }

    #[test]
    fn test_fist_is_grab() {
        let gestures = evaluator().classify_hand(&fist(Handedness::Left));
        assert!(gestures.grab);
        assert!(!gestures.thumbs_up);
        assert_eq!(gestures.handedness, Some(Handedness::Left));
    }

    #[test]
    fn test_thumbs_up_suppresses_grab_on_same_hand() {
        let gestures = evaluator().classify_hand(&thumbs_up(Handedness::Right));
        assert!(gestures.thumbs_up);
        assert!(!gestures.grab);
    }

    #[test]
    fn test_open_hand_is_nothing() {
        let gestures = evaluator().classify_hand(&open_hand(Handedness::Right));
        assert!(!gestures.grab);
        assert!(!gestures.thumbs_up);
    }

    #[test]
    fn test_thumbs_up_does_not_suppress_other_hand() {
        let frame = FrameLandmarks::empty()
            .with_hand(thumbs_up(Handedness::Left))
            .unwrap()
            .with_hand(fist(Handedness::Right))
            .unwrap();
        let candidates = evaluator().evaluate(&frame);

        assert!(candidates[Signal::ThumbsUp]);
        assert!(candidates[Signal::Grab]);
    }

    #[test]
    fn test_grab_min_closed_threshold() {
        // Three folded fingers and a spread thumb: 3 closed digits
        let mut hand = fist(Handedness::Right).with(HandLandmark::ThumbTip, kelp_core::Landmark::new(0.3, 0.6));
        hand.set(HandLandmark::PinkyTip, kelp_core::Landmark::new(0.5, 0.3));

        let strict = evaluator();
        assert!(!strict.classify_hand(&hand).grab);

        let lenient = PredicateEvaluator::new(PredicateConfig {
            grab_min_closed: 3,
            ..PredicateConfig::default()
        });
        assert!(lenient.classify_hand(&hand).grab);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(PredicateConfig::default().validate().is_ok());

        let negative = PredicateConfig {
            hand_up_margin: -0.1,
            ..PredicateConfig::default()
        };
        assert!(negative.validate().is_err());

        let nan = PredicateConfig {
            hands_together_distance: f32::NAN,
            ..PredicateConfig::default()
        };
        assert!(nan.validate().is_err());

        let zero_fingers = PredicateConfig {
            grab_min_closed: 0,
            ..PredicateConfig::default()
        };
        assert!(zero_fingers.validate().is_err());
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: PredicateConfig = serde_json::from_str(r#"{"hand_up_margin": 0.2}"#).unwrap();
        assert_eq!(config.hand_up_margin, 0.2);
        assert_eq!(config.grab_min_closed, 4);
    }
}
