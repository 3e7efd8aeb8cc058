//! Single hand track.

use std::fmt;

use crate::gesture::{Pose, PoseSample};
use crate::landmarks::{HandObservation, Handedness, Keypoint};
use crate::tracker::history::History;
use crate::tracker::track_state::TrackState;

/// Stable identifier of a hand track. Never reused by the tracker that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hand-{}", self.0)
    }
}

/// One physical hand followed across frames.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique track identifier
    pub track_id: TrackId,
    /// Handedness of the most recent observation
    pub handedness: Handedness,
    /// Current lifecycle state
    pub state: TrackState,
    /// Confirmed pose label
    pub pose: Pose,
    /// Consecutive frames without a matching observation
    pub misses: u32,
    /// Timestamp of the first observation
    pub start_ms: u64,
    /// Timestamp of the most recent observation
    pub last_seen_ms: u64,
    observations: History<HandObservation>,
    poses: History<PoseSample>,
    last_centroid: Keypoint,
    sample_count: u64,
    pose_streak: (Pose, u32),
}

impl Track {
    pub(crate) fn new(
        track_id: TrackId,
        observation: HandObservation,
        sample: PoseSample,
        capacity: usize,
        confirm_frames: u32,
    ) -> Self {
        let mut track = Self {
            track_id,
            handedness: observation.handedness,
            state: TrackState::Tracked,
            pose: Pose::Unknown,
            misses: 0,
            start_ms: observation.timestamp_ms,
            last_seen_ms: observation.timestamp_ms,
            observations: History::new(capacity),
            poses: History::new(capacity),
            last_centroid: observation.centroid(),
            sample_count: 0,
            pose_streak: (Pose::Unknown, 0),
        };
        track.append(observation, sample, confirm_frames);
        track
    }

    /// Recent observations, oldest first.
    pub fn observations(&self) -> &History<HandObservation> {
        &self.observations
    }

    /// Recent pose samples, oldest first.
    pub fn poses(&self) -> &History<PoseSample> {
        &self.poses
    }

    pub fn latest(&self) -> Option<&HandObservation> {
        self.observations.latest()
    }

    pub fn latest_pose(&self) -> Option<&PoseSample> {
        self.poses.latest()
    }

    /// Centroid of the most recent observation.
    pub fn centroid(&self) -> Keypoint {
        self.last_centroid
    }

    /// Total number of observations appended over the track's lifetime.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn is_active(&self) -> bool {
        self.state != TrackState::Removed
    }

    pub(crate) fn update(
        &mut self,
        observation: HandObservation,
        sample: PoseSample,
        confirm_frames: u32,
    ) {
        self.misses = 0;
        self.state = TrackState::Tracked;
        self.append(observation, sample, confirm_frames);
    }

    fn append(&mut self, observation: HandObservation, sample: PoseSample, confirm_frames: u32) {
        self.handedness = observation.handedness;
        self.last_seen_ms = observation.timestamp_ms;
        self.last_centroid = observation.centroid();
        self.sample_count += 1;

        if self.pose_streak.0 == sample.pose {
            self.pose_streak.1 = self.pose_streak.1.saturating_add(1);
        } else {
            self.pose_streak = (sample.pose, 1);
        }
        if self.pose_streak.1 >= confirm_frames {
            self.pose = self.pose_streak.0;
        }

        self.observations.push(observation);
        self.poses.push(sample);
    }

    pub(crate) fn mark_missed(&mut self) {
        self.misses += 1;
        self.state = TrackState::Lost;
    }

    pub(crate) fn mark_removed(&mut self) {
        self.state = TrackState::Removed;
        self.observations.clear();
        self.poses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::HandFixture;

    fn open(t: u64) -> (HandObservation, PoseSample) {
        let sample = PoseSample {
            timestamp_ms: t,
            pose: Pose::Open,
            confidence: 0.9,
        };
        (HandFixture::open_palm(400.0, 300.0).observation(t), sample)
    }

    #[test]
    fn test_pose_confirmed_after_streak() {
        let (obs, sample) = open(0);
        let mut track = Track::new(TrackId(1), obs, sample, 8, 3);
        assert_eq!(track.pose, Pose::Unknown);
        for t in [33, 66] {
            let (obs, sample) = open(t);
            track.update(obs, sample, 3);
        }
        assert_eq!(track.pose, Pose::Open);
        assert_eq!(track.sample_count(), 3);
    }

    #[test]
    fn test_pose_streak_saturates() {
        let (obs, sample) = open(0);
        let mut track = Track::new(TrackId(1), obs, sample, 8, 3);
        track.pose_streak.1 = u32::MAX;
        let (obs, sample) = open(33);
        track.update(obs, sample, 3);
        assert_eq!(track.pose_streak, (Pose::Open, u32::MAX));
        assert_eq!(track.pose, Pose::Open);
    }
}
