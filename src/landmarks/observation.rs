//! Validated per-hand observation records.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Number of keypoints in a hand landmark set.
pub const KEYPOINT_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand landmark model convention).
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single 3-D landmark. `z` is depth and defaults to 0 when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Keypoint {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    #[inline]
    pub fn to_vector(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Planar (x, y) distance to another keypoint.
    #[inline]
    pub fn planar_distance(&self, other: &Keypoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Which hand the upstream model believes it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    #[serde(alias = "left", alias = "LEFT")]
    Left,
    #[serde(alias = "right", alias = "RIGHT")]
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// One hand's state at one frame, in pixel space.
#[derive(Debug, Clone)]
pub struct HandObservation {
    keypoints: [Keypoint; KEYPOINT_COUNT],
    centroid: Keypoint,
    /// Handedness label reported upstream.
    pub handedness: Handedness,
    /// Confidence of the handedness label (0.0-1.0).
    pub score: f32,
    /// Frame timestamp in monotonic milliseconds.
    pub timestamp_ms: u64,
}

impl HandObservation {
    pub fn new(
        keypoints: [Keypoint; KEYPOINT_COUNT],
        handedness: Handedness,
        score: f32,
        timestamp_ms: u64,
    ) -> Self {
        let centroid = centroid_of(&keypoints);
        Self {
            keypoints,
            centroid,
            handedness,
            score,
            timestamp_ms,
        }
    }

    pub fn keypoints(&self) -> &[Keypoint; KEYPOINT_COUNT] {
        &self.keypoints
    }

    #[inline]
    pub fn keypoint(&self, idx: usize) -> Keypoint {
        self.keypoints[idx]
    }

    /// Mean of all 21 keypoints.
    #[inline]
    pub fn centroid(&self) -> Keypoint {
        self.centroid
    }
}

fn centroid_of(keypoints: &[Keypoint; KEYPOINT_COUNT]) -> Keypoint {
    let (sx, sy, sz) = keypoints
        .iter()
        .fold((0.0f32, 0.0f32, 0.0f32), |(x, y, z), k| (x + k.x, y + k.y, z + k.z));
    let n = KEYPOINT_COUNT as f32;
    Keypoint::new(sx / n, sy / n, sz / n)
}
