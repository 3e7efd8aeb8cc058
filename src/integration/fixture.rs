//! Synthetic hand landmark sets in pixel space.
//!
//! Used by demos and tests to generate frames without a camera. Geometry is
//! an upright right hand, fingers pointing up the image (negative y), about
//! 180 px tall.

use crate::landmarks::{
    AdapterConfig, HandObservation, Handedness, KEYPOINT_COUNT, Keypoint, RawHand, index,
};

/// x offsets of the index, middle, ring and pinky columns.
const FINGER_X: [f32; 4] = [-25.0, 0.0, 20.0, 40.0];
const MCP_Y: f32 = -40.0;
/// Bend of each distal segment in a relaxed hand (radians).
const RELAXED_BEND: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandShape {
    OpenPalm,
    Fist,
    /// Half-curled fingers, neither open nor closed.
    Relaxed,
    /// Every keypoint at the center.
    Collapsed,
}

#[derive(Debug, Clone)]
pub struct HandFixture {
    shape: HandShape,
    center: (f32, f32),
    handedness: Handedness,
    score: f32,
    rotation: f32,
}

impl HandFixture {
    fn new(shape: HandShape, x: f32, y: f32) -> Self {
        Self {
            shape,
            center: (x, y),
            handedness: Handedness::Right,
            score: 0.9,
            rotation: 0.0,
        }
    }

    pub fn open_palm(x: f32, y: f32) -> Self {
        Self::new(HandShape::OpenPalm, x, y)
    }

    pub fn fist(x: f32, y: f32) -> Self {
        Self::new(HandShape::Fist, x, y)
    }

    pub fn relaxed(x: f32, y: f32) -> Self {
        Self::new(HandShape::Relaxed, x, y)
    }

    pub fn collapsed(x: f32, y: f32) -> Self {
        Self::new(HandShape::Collapsed, x, y)
    }

    /// Move the hand center.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.center = (x, y);
        self
    }

    pub fn handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Rotate the hand in the image plane about its center.
    pub fn rotated(mut self, theta: f32) -> Self {
        self.rotation = theta;
        self
    }

    /// Keypoints in pixels.
    pub fn keypoints(&self) -> [Keypoint; KEYPOINT_COUNT] {
        let offsets = match self.shape {
            HandShape::OpenPalm => open_offsets(),
            HandShape::Fist => fist_offsets(),
            HandShape::Relaxed => relaxed_offsets(),
            HandShape::Collapsed => [Keypoint::default(); KEYPOINT_COUNT],
        };
        let (sin, cos) = self.rotation.sin_cos();
        let (cx, cy) = self.center;
        offsets.map(|o| Keypoint::new(cx + o.x * cos - o.y * sin, cy + o.x * sin + o.y * cos, o.z))
    }

    pub fn observation(&self, timestamp_ms: u64) -> HandObservation {
        HandObservation::new(self.keypoints(), self.handedness, self.score, timestamp_ms)
    }

    /// The same hand as the upstream model would report it, in relative
    /// coordinates for the given frame size.
    pub fn raw(&self, config: &AdapterConfig) -> RawHand {
        let (w, h) = (config.frame_width, config.frame_height);
        RawHand {
            keypoints: self
                .keypoints()
                .iter()
                .map(|k| Keypoint::new(k.x / w, k.y / h, k.z / w))
                .collect(),
            handedness: Some(self.handedness),
            score: self.score,
        }
    }
}

fn kp(x: f32, y: f32) -> Keypoint {
    Keypoint::new(x, y, 0.0)
}

/// Wrist and the four finger MCP joints, shared by every shape.
fn palm(out: &mut [Keypoint; KEYPOINT_COUNT]) {
    out[index::WRIST] = kp(0.0, 60.0);
    out[index::THUMB_CMC] = kp(-30.0, 40.0);
    for (finger, x) in FINGER_X.iter().enumerate() {
        out[finger_base(finger)] = kp(*x, MCP_Y);
    }
}

/// Index of the MCP joint of finger 0 (index) to 3 (pinky).
fn finger_base(finger: usize) -> usize {
    index::INDEX_MCP + finger * 4
}

fn open_offsets() -> [Keypoint; KEYPOINT_COUNT] {
    let mut out = [Keypoint::default(); KEYPOINT_COUNT];
    palm(&mut out);
    out[index::THUMB_MCP] = kp(-50.0, 15.0);
    out[index::THUMB_IP] = kp(-65.0, -10.0);
    out[index::THUMB_TIP] = kp(-75.0, -30.0);
    for (finger, x) in FINGER_X.iter().enumerate() {
        let base = finger_base(finger);
        out[base + 1] = kp(*x, -75.0);
        out[base + 2] = kp(*x, -100.0);
        out[base + 3] = kp(*x, -120.0);
    }
    out
}

fn fist_offsets() -> [Keypoint; KEYPOINT_COUNT] {
    let mut out = [Keypoint::default(); KEYPOINT_COUNT];
    palm(&mut out);
    out[index::THUMB_MCP] = kp(-45.0, 15.0);
    out[index::THUMB_IP] = kp(-25.0, -5.0);
    out[index::THUMB_TIP] = kp(-5.0, 0.0);
    for (finger, x) in FINGER_X.iter().enumerate() {
        let base = finger_base(finger);
        out[base + 1] = kp(*x, -70.0);
        out[base + 2] = kp(*x, -45.0);
        out[base + 3] = kp(*x, -30.0);
    }
    out
}

fn relaxed_offsets() -> [Keypoint; KEYPOINT_COUNT] {
    let mut out = [Keypoint::default(); KEYPOINT_COUNT];
    palm(&mut out);
    let (sin, cos) = RELAXED_BEND.sin_cos();
    // Distal segments bend out of the image plane.
    let bent = |from: Keypoint, len: f32| Keypoint::new(from.x, from.y - len * cos, from.z + len * sin);

    out[index::THUMB_MCP] = kp(-45.0, 15.0);
    out[index::THUMB_IP] = kp(-55.0, -5.0);
    let ip = out[index::THUMB_IP];
    out[index::THUMB_TIP] = Keypoint::new(ip.x - 5.0, ip.y - 20.0 * cos, ip.z + 20.0 * sin);
    for (finger, x) in FINGER_X.iter().enumerate() {
        let base = finger_base(finger);
        let pip = kp(*x, -70.0);
        let dip = bent(pip, 25.0);
        out[base + 1] = pip;
        out[base + 2] = dip;
        out[base + 3] = bent(dip, 20.0);
    }
    out
}
