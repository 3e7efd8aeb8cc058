//! End-to-end intent classification, one call per frame tick.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::ConfigError;
use crate::gesture::arbiter::{ArbiterConfig, IntentArbiter};
use crate::gesture::event::IntentEvent;
use crate::gesture::hold::{HoldConfig, HoldDetector};
use crate::gesture::ids::{EventIdSource, RandomIdSource};
use crate::gesture::pose::PoseConfig;
use crate::gesture::swipe::{SwipeConfig, SwipeDetector};
use crate::landmarks::{AdapterConfig, HandObservation, RawFrame, adapt_frame};
use crate::tracker::{HandTracker, TrackerConfig};

/// All classifier tunables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub adapter: AdapterConfig,
    pub tracker: TrackerConfig,
    pub pose: PoseConfig,
    pub hold: HoldConfig,
    pub swipe: SwipeConfig,
    pub arbiter: ArbiterConfig,
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn in_range(
    field: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}

impl ClassifierConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.adapter;
        positive("adapter.frame_width", a.frame_width as f64)?;
        positive("adapter.frame_height", a.frame_height as f64)?;
        in_range(
            "adapter.min_handedness_score",
            a.min_handedness_score as f64,
            0.0,
            1.0,
            "0.0..=1.0",
        )?;

        let t = &self.tracker;
        positive("tracker.match_distance", t.match_distance as f64)?;
        in_range(
            "tracker.history_capacity",
            t.history_capacity as f64,
            2.0,
            f64::MAX,
            ">= 2",
        )?;
        positive("tracker.pose_confirm_frames", t.pose_confirm_frames as f64)?;

        let p = &self.pose;
        positive("pose.min_palm_span", p.min_palm_span as f64)?;
        positive("pose.extended_max_curl", p.extended_max_curl as f64)?;
        if p.curled_min_curl < p.extended_max_curl {
            return Err(ConfigError::CurlThresholdsInverted {
                extended: p.extended_max_curl,
                curled: p.curled_min_curl,
            });
        }
        in_range(
            "pose.min_agreeing_fingers",
            p.min_agreeing_fingers as f64,
            1.0,
            5.0,
            "1..=5",
        )?;

        let h = &self.hold;
        positive("hold.hold_ms", h.hold_ms as f64)?;
        positive("hold.max_gap_ms", h.max_gap_ms as f64)?;
        in_range(
            "hold.min_confidence",
            h.min_confidence as f64,
            0.0,
            1.0,
            "0.0..=1.0",
        )?;

        let s = &self.swipe;
        positive("swipe.window_ms", s.window_ms as f64)?;
        positive("swipe.min_displacement", s.min_displacement as f64)?;
        in_range(
            "swipe.reversal_tolerance",
            s.reversal_tolerance as f64,
            f64::MIN_POSITIVE,
            s.min_displacement as f64,
            "0.0<..=min_displacement",
        )?;
        in_range(
            "swipe.path_tolerance",
            s.path_tolerance as f64,
            1.0,
            f64::MAX,
            ">= 1.0",
        )?;
        in_range(
            "swipe.neutral_zone",
            s.neutral_zone as f64,
            0.0,
            s.min_displacement as f64,
            "0.0..=min_displacement",
        )?;
        in_range(
            "swipe.min_samples",
            s.min_samples as f64,
            2.0,
            f64::MAX,
            ">= 2",
        )?;

        Ok(())
    }
}

/// The full pipeline: adapter, track manager, hold and swipe detectors,
/// and arbiter.
///
/// Frame-synchronous and single-threaded: every call to [`ingest`] runs
/// the whole pipeline for one frame and returns that frame's events.
///
/// [`ingest`]: IntentClassifier::ingest
pub struct IntentClassifier {
    config: ClassifierConfig,
    tracker: HandTracker,
    hold: HoldDetector,
    swipe: SwipeDetector,
    arbiter: IntentArbiter,
    last_frame_ms: Option<u64>,
}

impl IntentClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ConfigError> {
        Self::with_id_source(config, Box::new(RandomIdSource::new()))
    }

    pub fn with_id_source(
        config: ClassifierConfig,
        ids: Box<dyn EventIdSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tracker: HandTracker::new(config.tracker.clone(), config.pose.clone()),
            hold: HoldDetector::new(config.hold.clone()),
            swipe: SwipeDetector::new(config.swipe.clone()),
            arbiter: IntentArbiter::with_id_source(config.arbiter.clone(), ids),
            config,
            last_frame_ms: None,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn tracker(&self) -> &HandTracker {
        &self.tracker
    }

    /// Process one raw detection frame.
    pub fn ingest(&mut self, frame: &RawFrame, timestamp_ms: u64) -> Vec<IntentEvent> {
        let observations = adapt_frame(frame, timestamp_ms, &self.config.adapter);
        self.ingest_observations(observations, timestamp_ms)
    }

    /// Process already-adapted observations for one frame.
    ///
    /// Observations are expected to carry `timestamp_ms`. Frames older than
    /// the previous one are dropped.
    pub fn ingest_observations(
        &mut self,
        observations: Vec<HandObservation>,
        timestamp_ms: u64,
    ) -> Vec<IntentEvent> {
        if self.last_frame_ms.is_some_and(|last| timestamp_ms < last) {
            warn!(
                "dropping frame at t={}ms: earlier than previous frame at t={:?}ms",
                timestamp_ms, self.last_frame_ms
            );
            return Vec::new();
        }
        self.last_frame_ms = Some(timestamp_ms);

        trace!("t={}ms: {} hands", timestamp_ms, observations.len());
        let update = self.tracker.ingest(observations, timestamp_ms);

        for track_id in &update.removed {
            self.hold.forget(*track_id);
            self.swipe.forget(*track_id);
            self.arbiter.forget(*track_id);
        }

        let mut candidates = Vec::new();
        for track_id in &update.missed {
            candidates.extend(self.swipe.flush(*track_id));
        }
        for track_id in update.touched() {
            let Some(track) = self.tracker.track(track_id) else {
                continue;
            };
            candidates.extend(self.hold.detect(track));
            candidates.extend(self.swipe.detect(track));
        }

        let tracker = &self.tracker;
        self.arbiter
            .arbitrate(candidates, |id| tracker.contains(id), timestamp_ms)
    }

    /// Report strokes still waiting for confirmation when input ends.
    ///
    /// Events carry the last frame's timestamp. Returns nothing before the
    /// first frame.
    pub fn finish(&mut self) -> Vec<IntentEvent> {
        let Some(timestamp_ms) = self.last_frame_ms else {
            return Vec::new();
        };
        let candidates = self.swipe.flush_all();
        let tracker = &self.tracker;
        self.arbiter
            .arbitrate(candidates, |id| tracker.contains(id), timestamp_ms)
    }

    /// Drop all tracks and detector state, e.g. after the camera stops.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.hold.reset();
        self.swipe.reset();
        self.arbiter.reset();
        self.last_frame_ms = None;
    }
}
