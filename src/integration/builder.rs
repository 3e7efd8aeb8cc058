//! Builder for creating `RawHand` values by hand.

use crate::landmarks::{Handedness, Keypoint, RawHand};

/// Builder for `RawHand` values, e.g. when adapting a model's output tensor.
#[derive(Debug, Clone, Default)]
pub struct RawHandBuilder {
    keypoints: Vec<Keypoint>,
    handedness: Option<Handedness>,
    score: f32,
}

impl RawHandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all keypoints (relative coordinates).
    pub fn keypoints(mut self, keypoints: impl IntoIterator<Item = Keypoint>) -> Self {
        self.keypoints = keypoints.into_iter().collect();
        self
    }

    /// Append one keypoint (relative coordinates).
    pub fn keypoint(mut self, x: f32, y: f32, z: f32) -> Self {
        self.keypoints.push(Keypoint::new(x, y, z));
        self
    }

    /// Append keypoints from a flat `[x0, y0, z0, x1, y1, z1, ...]` slice.
    pub fn flat_xyz(mut self, values: &[f32]) -> Self {
        self.keypoints.extend(
            values
                .chunks_exact(3)
                .map(|c| Keypoint::new(c[0], c[1], c[2])),
        );
        self
    }

    pub fn handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = Some(handedness);
        self
    }

    /// Set the handedness confidence.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn build(self) -> RawHand {
        RawHand {
            keypoints: self.keypoints,
            handedness: self.handedness,
            score: self.score,
        }
    }
}
