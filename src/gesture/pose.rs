//! Static hand pose classification from landmark geometry.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::landmarks::{HandObservation, index};

/// Discrete hand pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pose {
    Open,
    Closed,
    #[default]
    Unknown,
}

/// Pose derived from one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub timestamp_ms: u64,
    pub pose: Pose,
    /// 0.0 for `Unknown`.
    pub confidence: f32,
}

/// Thresholds for pose classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Minimum palm length and width (pixels) for the geometry to be trusted.
    pub min_palm_span: f32,
    /// A finger with curl (radians) below this is extended.
    pub extended_max_curl: f32,
    /// A finger with curl (radians) above this is curled.
    pub curled_min_curl: f32,
    /// Fingers out of five that must agree for OPEN or CLOSED.
    pub min_agreeing_fingers: usize,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            min_palm_span: 10.0,
            extended_max_curl: 0.6,
            curled_min_curl: 1.2,
            min_agreeing_fingers: 4,
        }
    }
}

/// Proximal, middle and distal joint of each finger, thumb first.
const FINGER_JOINTS: [(usize, usize, usize); 5] = [
    (index::THUMB_MCP, index::THUMB_IP, index::THUMB_TIP),
    (index::INDEX_MCP, index::INDEX_PIP, index::INDEX_DIP),
    (index::MIDDLE_MCP, index::MIDDLE_PIP, index::MIDDLE_DIP),
    (index::RING_MCP, index::RING_PIP, index::RING_DIP),
    (index::PINKY_MCP, index::PINKY_PIP, index::PINKY_DIP),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FingerState {
    Extended,
    Curled,
    Ambiguous,
}

#[derive(Debug, Clone, Default)]
pub struct PoseClassifier {
    config: PoseConfig,
}

impl PoseClassifier {
    pub fn new(config: PoseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PoseConfig {
        &self.config
    }

    /// Classify one observation.
    pub fn classify(&self, obs: &HandObservation) -> PoseSample {
        let unknown = PoseSample {
            timestamp_ms: obs.timestamp_ms,
            pose: Pose::Unknown,
            confidence: 0.0,
        };
        let Some(curls) = self.finger_curls(obs) else {
            return unknown;
        };

        let states = curls.map(|c| match c {
            Some(c) if c < self.config.extended_max_curl => FingerState::Extended,
            Some(c) if c > self.config.curled_min_curl => FingerState::Curled,
            _ => FingerState::Ambiguous,
        });
        let extended = states.iter().filter(|s| **s == FingerState::Extended).count();
        let curled = states.iter().filter(|s| **s == FingerState::Curled).count();

        let min = self.config.min_agreeing_fingers;
        let (pose, agreeing) = if extended >= min && extended >= curled {
            (Pose::Open, extended)
        } else if curled >= min {
            (Pose::Closed, curled)
        } else {
            return unknown;
        };

        PoseSample {
            timestamp_ms: obs.timestamp_ms,
            pose,
            confidence: agreeing as f32 / FINGER_JOINTS.len() as f32 * obs.score,
        }
    }

    /// Per-finger curl in radians, thumb first.
    ///
    /// `None` when the palm is degenerate; an inner `None` when a finger's
    /// segments vanish after projection onto the flexion plane.
    pub fn finger_curls(&self, obs: &HandObservation) -> Option<[Option<f32>; 5]> {
        let p = |i: usize| obs.keypoint(i).to_vector();
        let min_span = self.config.min_palm_span;

        let longitudinal = p(index::MIDDLE_MCP) - p(index::WRIST);
        let lateral = p(index::PINKY_MCP) - p(index::INDEX_MCP);
        if longitudinal.norm() < min_span || lateral.norm() < min_span {
            return None;
        }

        let normal = longitudinal.cross(&lateral);
        if normal.norm() < 1e-3 * longitudinal.norm() * lateral.norm() {
            return None;
        }
        // Flexion happens in the plane spanned by the palm normal and the
        // longitudinal axis; strip the component along its normal.
        let side_axis = normal.cross(&longitudinal).normalize();
        let flatten = |v: Vector3<f32>| v - side_axis * v.dot(&side_axis);

        let eps = min_span * 0.05;
        Some(FINGER_JOINTS.map(|(a, b, c)| {
            let proximal = flatten(p(b) - p(a));
            let distal = flatten(p(c) - p(b));
            if proximal.norm() < eps || distal.norm() < eps {
                None
            } else {
                Some(proximal.angle(&distal))
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::HandFixture;

    #[test]
    fn test_open_palm() {
        let c = PoseClassifier::default();
        let s = c.classify(&HandFixture::open_palm(400.0, 300.0).observation(5));
        assert_eq!(s.pose, Pose::Open);
        assert_eq!(s.timestamp_ms, 5);
        assert!((s.confidence - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_fist() {
        let c = PoseClassifier::default();
        let s = c.classify(&HandFixture::fist(400.0, 300.0).observation(0));
        assert_eq!(s.pose, Pose::Closed);
        assert!(s.confidence > 0.7);
    }

    #[test]
    fn test_relaxed_hand_is_unknown() {
        let c = PoseClassifier::default();
        let obs = HandFixture::relaxed(400.0, 300.0).observation(0);
        let curls = c.finger_curls(&obs).unwrap();
        for curl in curls {
            let curl = curl.unwrap();
            assert!(curl > 0.6 && curl < 1.2, "curl {curl}");
        }
        assert_eq!(c.classify(&obs).pose, Pose::Unknown);
    }

    #[test]
    fn test_degenerate_palm_is_unknown() {
        let c = PoseClassifier::default();
        let s = c.classify(&HandFixture::collapsed(400.0, 300.0).observation(0));
        assert_eq!(s.pose, Pose::Unknown);
        assert_eq!(s.confidence, 0.0);
    }

    #[test]
    fn test_poses_survive_rotation() {
        // Hand pointing sideways instead of up.
        let c = PoseClassifier::default();
        let open = HandFixture::open_palm(400.0, 300.0).rotated(1.2).observation(0);
        let fist = HandFixture::fist(400.0, 300.0).rotated(-2.0).observation(0);
        assert_eq!(c.classify(&open).pose, Pose::Open);
        assert_eq!(c.classify(&fist).pose, Pose::Closed);
    }

    #[test]
    fn test_stricter_agreement() {
        let c = PoseClassifier::new(PoseConfig {
            min_agreeing_fingers: 5,
            ..PoseConfig::default()
        });
        let s = c.classify(&HandFixture::open_palm(400.0, 300.0).observation(0));
        assert_eq!(s.pose, Pose::Open);
        assert!((s.confidence - 0.9).abs() < 1e-5);
    }
}
