//! Landmark snapshots - body and hand keypoints for one frame
//!
//! Coordinates are normalized to [0, 1] with a top-left origin, so a
//! smaller `y` is higher in the image. Snapshots are fixed-shape: a pose
//! always carries `PoseLandmark::count()` points and a hand always carries
//! `HandLandmark::count()` points.

use serde::{Deserialize, Serialize};

use crate::{KelpError, KelpResult};

/// Maximum number of hands per frame
pub const MAX_HANDS: usize = 2;

/// A single normalized 2D keypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Detector confidence that the point is visible
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

fn full_visibility() -> f32 {
    1.0
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visibility: 1.0,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    /// Euclidean distance to another landmark
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Body pose keypoints (33-point topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseLandmark {
    // Face
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,

    // Arms
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,

    // Legs
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl PoseLandmark {
    /// Number of pose keypoints
    pub fn count() -> usize {
        33
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Shoulder on the given side
    pub fn shoulder(side: Handedness) -> PoseLandmark {
        match side {
            Handedness::Left => PoseLandmark::LeftShoulder,
            Handedness::Right => PoseLandmark::RightShoulder,
        }
    }

    /// Wrist on the given side
    pub fn wrist(side: Handedness) -> PoseLandmark {
        match side {
            Handedness::Left => PoseLandmark::LeftWrist,
            Handedness::Right => PoseLandmark::RightWrist,
        }
    }
}

/// Hand keypoints (21-point topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,

    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,

    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,

    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,

    RingMcp,
    RingPip,
    RingDip,
    RingTip,

    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// Number of hand keypoints
    pub fn count() -> usize {
        21
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// (tip, knuckle) pairs for the four non-thumb fingers
    pub fn finger_pairs() -> &'static [(HandLandmark, HandLandmark); 4] {
        &[
            (HandLandmark::IndexTip, HandLandmark::IndexMcp),
            (HandLandmark::MiddleTip, HandLandmark::MiddleMcp),
            (HandLandmark::RingTip, HandLandmark::RingMcp),
            (HandLandmark::PinkyTip, HandLandmark::PinkyMcp),
        ]
    }
}

/// Which hand a hand snapshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    #[serde(alias = "left")]
    Left,
    #[serde(alias = "right")]
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// Pose landmarks for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct PoseSnapshot {
    landmarks: Vec<Landmark>,
}

impl PoseSnapshot {
    /// Build from a full point list, in `PoseLandmark` order
    pub fn from_landmarks(landmarks: Vec<Landmark>) -> KelpResult<Self> {
        if landmarks.len() != PoseLandmark::count() {
            return Err(KelpError::LandmarkCount {
                expected: PoseLandmark::count(),
                actual: landmarks.len(),
            });
        }
        Ok(Self { landmarks })
    }

    /// Every point at the origin; useful as a base for setting a few points
    pub fn zeroed() -> Self {
        Self {
            landmarks: vec![Landmark::default(); PoseLandmark::count()],
        }
    }

    pub fn get(&self, point: PoseLandmark) -> Landmark {
        self.landmarks[point.index()]
    }

    pub fn set(&mut self, point: PoseLandmark, landmark: Landmark) {
        self.landmarks[point.index()] = landmark;
    }

    pub fn with(mut self, point: PoseLandmark, landmark: Landmark) -> Self {
        self.set(point, landmark);
        self
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}

impl TryFrom<Vec<Landmark>> for PoseSnapshot {
    type Error = KelpError;

    fn try_from(landmarks: Vec<Landmark>) -> KelpResult<Self> {
        Self::from_landmarks(landmarks)
    }
}

impl From<PoseSnapshot> for Vec<Landmark> {
    fn from(pose: PoseSnapshot) -> Self {
        pose.landmarks
    }
}

/// Hand landmarks for one detected hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHand", into = "RawHand")]
pub struct HandSnapshot {
    handedness: Handedness,
    landmarks: Vec<Landmark>,
}

/// Serialized shape of a hand snapshot
#[derive(Serialize, Deserialize)]
struct RawHand {
    handedness: Handedness,
    landmarks: Vec<Landmark>,
}

impl HandSnapshot {
    /// Build from a full point list, in `HandLandmark` order
    pub fn from_landmarks(handedness: Handedness, landmarks: Vec<Landmark>) -> KelpResult<Self> {
        if landmarks.len() != HandLandmark::count() {
            return Err(KelpError::LandmarkCount {
                expected: HandLandmark::count(),
                actual: landmarks.len(),
            });
        }
        Ok(Self {
            handedness,
            landmarks,
        })
    }

    pub fn zeroed(handedness: Handedness) -> Self {
        Self {
            handedness,
            landmarks: vec![Landmark::default(); HandLandmark::count()],
        }
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn get(&self, point: HandLandmark) -> Landmark {
        self.landmarks[point.index()]
    }

    pub fn set(&mut self, point: HandLandmark, landmark: Landmark) {
        self.landmarks[point.index()] = landmark;
    }

    pub fn with(mut self, point: HandLandmark, landmark: Landmark) -> Self {
        self.set(point, landmark);
        self
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}

impl TryFrom<RawHand> for HandSnapshot {
    type Error = KelpError;

    fn try_from(raw: RawHand) -> KelpResult<Self> {
        Self::from_landmarks(raw.handedness, raw.landmarks)
    }
}

impl From<HandSnapshot> for RawHand {
    fn from(hand: HandSnapshot) -> Self {
        RawHand {
            handedness: hand.handedness,
            landmarks: hand.landmarks,
        }
    }
}

/// Everything the landmark extractor found in one frame
///
/// Pose and hands are independent: either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame", into = "RawFrame")]
pub struct FrameLandmarks {
    pose: Option<PoseSnapshot>,
    hands: Vec<HandSnapshot>,
}

#[derive(Serialize, Deserialize)]
struct RawFrame {
    #[serde(default)]
    pose: Option<PoseSnapshot>,
    #[serde(default)]
    hands: Vec<HandSnapshot>,
}

impl FrameLandmarks {
    /// No detection at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_pose(mut self, pose: PoseSnapshot) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Add a hand. Fails once `MAX_HANDS` hands are present.
    pub fn push_hand(&mut self, hand: HandSnapshot) -> KelpResult<()> {
        if self.hands.len() >= MAX_HANDS {
            return Err(KelpError::TooManyHands { max: MAX_HANDS });
        }
        self.hands.push(hand);
        Ok(())
    }

    pub fn with_hand(mut self, hand: HandSnapshot) -> KelpResult<Self> {
        self.push_hand(hand)?;
        Ok(self)
    }

    pub fn pose(&self) -> Option<&PoseSnapshot> {
        self.pose.as_ref()
    }

    pub fn hands(&self) -> &[HandSnapshot] {
        &self.hands
    }

    /// True when neither a pose nor any hand was detected
    pub fn is_empty(&self) -> bool {
        self.pose.is_none() && self.hands.is_empty()
    }
}

impl TryFrom<RawFrame> for FrameLandmarks {
    type Error = KelpError;

    fn try_from(raw: RawFrame) -> KelpResult<Self> {
        let mut frame = FrameLandmarks {
            pose: raw.pose,
            hands: Vec::with_capacity(raw.hands.len()),
        };
        for hand in raw.hands {
            frame.push_hand(hand)?;
        }
        Ok(frame)
    }
}

impl From<FrameLandmarks> for RawFrame {
    fn from(frame: FrameLandmarks) -> Self {
        RawFrame {
            pose: frame.pose,
            hands: frame.hands,
        }
    }
}
