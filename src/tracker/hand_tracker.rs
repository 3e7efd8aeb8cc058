//! Hand track manager: frame-to-frame identity for detected hands.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::gesture::{PoseClassifier, PoseConfig};
use crate::landmarks::HandObservation;
use crate::tracker::matching::{self, Anchor, AssignmentResult};
use crate::tracker::track::{Track, TrackId};
use crate::tracker::track_state::TrackState;

/// Configuration for the HandTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum centroid distance (pixels) for an observation to continue a track.
    pub match_distance: f32,
    /// A track is destroyed once it has missed more than this many consecutive frames.
    pub max_misses: u32,
    /// Number of observations kept per track.
    pub history_capacity: usize,
    /// Consecutive agreeing samples before a track's confirmed pose changes.
    pub pose_confirm_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            match_distance: 120.0,
            max_misses: 10,
            history_capacity: 48,
            pose_confirm_frames: 3,
        }
    }
}

/// What changed during one `ingest` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackUpdate {
    /// Existing tracks that received an observation.
    pub updated: Vec<TrackId>,
    /// Tracks created this frame.
    pub created: Vec<TrackId>,
    /// Surviving tracks that got no observation this frame.
    pub missed: Vec<TrackId>,
    /// Tracks destroyed this frame.
    pub removed: Vec<TrackId>,
}

impl TrackUpdate {
    /// Tracks with a fresh observation this frame.
    pub fn touched(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.updated.iter().chain(&self.created).copied()
    }
}

pub struct HandTracker {
    tracks: Vec<Track>,
    next_id: u64,
    config: TrackerConfig,
    classifier: PoseClassifier,
}

impl HandTracker {
    pub fn new(config: TrackerConfig, pose: PoseConfig) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 0,
            config,
            classifier: PoseClassifier::new(pose),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Associate this frame's observations with tracks.
    pub fn ingest(&mut self, observations: Vec<HandObservation>, timestamp_ms: u64) -> TrackUpdate {
        let mut update = TrackUpdate::default();

        let anchors: Vec<Anchor> = self
            .tracks
            .iter()
            .map(|t| Anchor {
                centroid: t.centroid(),
                handedness: t.handedness,
            })
            .collect();
        let dists = matching::centroid_distance(&anchors, &observations);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&dists, self.config.match_distance);

        let mut pending: Vec<Option<HandObservation>> = observations.into_iter().map(Some).collect();
        let confirm = self.config.pose_confirm_frames;

        for (itrack, iobs) in matches {
            let Some(obs) = pending[iobs].take() else {
                continue;
            };
            let sample = self.classifier.classify(&obs);
            let track = &mut self.tracks[itrack];
            trace!(
                "{} matched at ({:.1}, {:.1}) pose={:?}",
                track.track_id,
                obs.centroid().x,
                obs.centroid().y,
                sample.pose
            );
            track.update(obs, sample, confirm);
            update.updated.push(track.track_id);
        }

        for itrack in unmatched_tracks {
            self.tracks[itrack].mark_missed();
        }

        let max_misses = self.config.max_misses;
        let TrackUpdate {
            missed, removed, ..
        } = &mut update;
        self.tracks.retain_mut(|track| {
            if track.state == TrackState::Lost && track.misses <= max_misses {
                missed.push(track.track_id);
            }
            if track.misses > max_misses {
                track.mark_removed();
                debug!(
                    "{} removed at t={}ms after {} missed frames",
                    track.track_id, timestamp_ms, track.misses
                );
                removed.push(track.track_id);
                false
            } else {
                true
            }
        });

        for iobs in unmatched_detections {
            let Some(obs) = pending[iobs].take() else {
                continue;
            };
            let track_id = self.next_track_id();
            let sample = self.classifier.classify(&obs);
            debug!(
                "{} created at t={}ms ({})",
                track_id,
                timestamp_ms,
                obs.handedness.as_str()
            );
            self.tracks.push(Track::new(
                track_id,
                obs,
                sample,
                self.config.history_capacity,
                confirm,
            ));
            update.created.push(track_id);
        }

        update
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }

    pub fn contains(&self, track_id: TrackId) -> bool {
        self.track(track_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop every track. Ids issued so far are still never reused.
    pub fn reset(&mut self) {
        self.tracks.clear();
    }

    fn next_track_id(&mut self) -> TrackId {
        self.next_id += 1;
        TrackId(self.next_id)
    }
}
