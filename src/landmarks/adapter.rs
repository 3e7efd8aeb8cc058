//! Normalizes raw per-frame detection results into `HandObservation`s.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ObservationError;
use crate::landmarks::observation::{HandObservation, Handedness, KEYPOINT_COUNT, Keypoint};

/// One hand as delivered by the upstream landmark model.
///
/// Keypoints are in relative image coordinates (0.0-1.0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHand {
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    #[serde(default)]
    pub handedness: Option<Handedness>,
    /// Confidence of the handedness label.
    #[serde(default)]
    pub score: f32,
}

/// One detection result: zero or more hands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFrame {
    #[serde(default)]
    pub hands: Vec<RawHand>,
}

impl RawFrame {
    pub fn new(hands: Vec<RawHand>) -> Self {
        Self { hands }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Adapter tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Handedness confidence must be strictly above this for a hand to be
    /// accepted.
    pub min_handedness_score: f32,
    /// Frame width in pixels; relative x (and z) are scaled by it.
    pub frame_width: f32,
    /// Frame height in pixels; relative y is scaled by it.
    pub frame_height: f32,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            min_handedness_score: 0.5,
            frame_width: 960.0,
            frame_height: 540.0,
        }
    }
}

impl RawHand {
    /// Validate this hand and convert it into a pixel-space observation.
    pub fn to_observation(
        &self,
        timestamp_ms: u64,
        config: &AdapterConfig,
    ) -> Result<HandObservation, ObservationError> {
        if self.keypoints.len() != KEYPOINT_COUNT {
            return Err(ObservationError::KeypointCount {
                expected: KEYPOINT_COUNT,
                got: self.keypoints.len(),
            });
        }
        let handedness = self.handedness.ok_or(ObservationError::MissingHandedness)?;
        if !(self.score > config.min_handedness_score) {
            return Err(ObservationError::LowHandedness {
                score: self.score,
                min: config.min_handedness_score,
            });
        }

        let mut keypoints = [Keypoint::default(); KEYPOINT_COUNT];
        for (i, (dst, src)) in keypoints.iter_mut().zip(&self.keypoints).enumerate() {
            if !src.is_finite() {
                return Err(ObservationError::NonFinite { index: i });
            }
            *dst = Keypoint::new(
                src.x * config.frame_width,
                src.y * config.frame_height,
                src.z * config.frame_width,
            );
        }

        Ok(HandObservation::new(
            keypoints,
            handedness,
            self.score,
            timestamp_ms,
        ))
    }
}

/// Convert one raw frame into observations, dropping malformed hands.
pub fn adapt_frame(
    frame: &RawFrame,
    timestamp_ms: u64,
    config: &AdapterConfig,
) -> Vec<HandObservation> {
    frame
        .hands
        .iter()
        .enumerate()
        .filter_map(|(i, hand)| match hand.to_observation(timestamp_ms, config) {
            Ok(obs) => Some(obs),
            Err(err) => {
                debug!("dropping hand {} at t={}ms: {}", i, timestamp_ms, err);
                None
            }
        })
        .collect()
}
