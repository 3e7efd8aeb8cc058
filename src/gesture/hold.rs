//! Sustained-pose detection for OPEN_MENU / CLOSE_MENU.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gesture::candidate::{GestureCandidate, IntentKind};
use crate::gesture::pose::{Pose, PoseSample};
use crate::tracker::{Track, TrackId};

/// Hold detection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    /// Minimum span (ms) of an unbroken run of one pose.
    pub hold_ms: u64,
    /// Minimum average pose confidence over the run.
    pub min_confidence: f32,
    /// A gap between samples longer than this (ms) breaks the run.
    pub max_gap_ms: u64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            hold_ms: 500,
            min_confidence: 0.6,
            max_gap_ms: 250,
        }
    }
}

#[derive(Debug, Clone)]
struct Run {
    pose: Pose,
    start_ms: u64,
    last_ms: u64,
    confidence_sum: f32,
    samples: u32,
    /// UNKNOWN samples seen since the run started.
    dropouts: u32,
    emitted: bool,
}

impl Run {
    fn start(sample: &PoseSample, emitted: bool) -> Self {
        Self {
            pose: sample.pose,
            start_ms: sample.timestamp_ms,
            last_ms: sample.timestamp_ms,
            confidence_sum: sample.confidence,
            samples: 1,
            dropouts: 0,
            emitted,
        }
    }

    fn extend(&mut self, sample: &PoseSample) {
        self.last_ms = sample.timestamp_ms;
        self.confidence_sum += sample.confidence;
        self.samples += 1;
    }

    fn span_ms(&self) -> u64 {
        self.last_ms - self.start_ms
    }

    fn mean_confidence(&self) -> f32 {
        self.confidence_sum / self.samples as f32
    }
}

#[derive(Debug, Clone, Default)]
struct HoldState {
    run: Option<Run>,
    unknown_streak: u32,
    /// Pose of the last emitted hold. Cleared only by a label change, so a
    /// run split by a gap does not fire again.
    held: Option<Pose>,
    seen: u64,
    last_emitted_ms: Option<u64>,
}

/// Per-track hold detector.
#[derive(Debug, Default)]
pub struct HoldDetector {
    config: HoldConfig,
    states: HashMap<TrackId, HoldState>,
}

impl HoldDetector {
    pub fn new(config: HoldConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
        }
    }

    pub fn config(&self) -> &HoldConfig {
        &self.config
    }

    /// Feed the track's newest pose sample; returns a candidate when a hold
    /// completes. Each run emits at most once.
    pub fn detect(&mut self, track: &Track) -> Option<GestureCandidate> {
        let sample = *track.latest_pose()?;
        let state = self.states.entry(track.track_id).or_default();
        if state.seen == track.sample_count() {
            return None;
        }
        state.seen = track.sample_count();

        if sample.pose == Pose::Unknown {
            state.unknown_streak = state.unknown_streak.saturating_add(1);
            if state.unknown_streak >= 2 {
                state.held = None;
            }
            if let Some(run) = state.run.as_mut() {
                run.dropouts += 1;
                if run.dropouts > 1 {
                    state.run = None;
                }
            }
            return None;
        }

        state.unknown_streak = 0;
        if state.held.is_some_and(|held| held != sample.pose) {
            state.held = None;
        }
        let continues = state.run.as_ref().is_some_and(|run| {
            run.pose == sample.pose
                && sample.timestamp_ms.saturating_sub(run.last_ms) <= self.config.max_gap_ms
        });
        match state.run.as_mut() {
            Some(run) if continues => run.extend(&sample),
            _ => state.run = Some(Run::start(&sample, state.held == Some(sample.pose))),
        }

        let run = state.run.as_mut()?;
        if run.emitted
            || run.span_ms() < self.config.hold_ms
            || run.mean_confidence() < self.config.min_confidence
        {
            return None;
        }

        run.emitted = true;
        state.held = Some(run.pose);
        state.last_emitted_ms = Some(sample.timestamp_ms);
        let kind = match run.pose {
            Pose::Open => IntentKind::OpenMenu,
            Pose::Closed => IntentKind::CloseMenu,
            Pose::Unknown => return None,
        };
        debug!(
            "hold {:?} on {} for {}ms (conf {:.2})",
            run.pose,
            track.track_id,
            run.span_ms(),
            run.mean_confidence()
        );
        Some(GestureCandidate {
            kind,
            track_id: track.track_id,
            start_ms: run.start_ms,
            end_ms: sample.timestamp_ms,
            confidence: run.mean_confidence(),
        })
    }

    /// Timestamp of the last candidate emitted for a track.
    pub fn last_emitted(&self, track_id: TrackId) -> Option<u64> {
        self.states.get(&track_id)?.last_emitted_ms
    }

    /// Discard in-flight state for a destroyed track.
    pub fn forget(&mut self, track_id: TrackId) {
        self.states.remove(&track_id);
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::PoseConfig;
    use crate::integration::HandFixture;
    use crate::tracker::{HandTracker, TrackerConfig};

    struct Rig {
        tracker: HandTracker,
        hold: HoldDetector,
        emitted: Vec<GestureCandidate>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                tracker: HandTracker::new(TrackerConfig::default(), PoseConfig::default()),
                hold: HoldDetector::new(HoldConfig::default()),
                emitted: Vec::new(),
            }
        }

        fn feed(&mut self, fixture: HandFixture, t: u64) {
            let update = self.tracker.ingest(vec![fixture.observation(t)], t);
            for id in update.touched() {
                let track = self.tracker.track(id).unwrap();
                self.emitted.extend(self.hold.detect(track));
            }
        }
    }

    #[test]
    fn test_open_hold_emits_once_after_window() {
        let mut rig = Rig::new();
        for frame in 0..=60u64 {
            rig.feed(HandFixture::open_palm(400.0, 300.0), frame * 33);
        }
        assert_eq!(rig.emitted.len(), 1);
        let c = &rig.emitted[0];
        assert_eq!(c.kind, IntentKind::OpenMenu);
        assert_eq!(c.start_ms, 0);
        assert!(c.end_ms >= 500);
        assert!(c.end_ms < 500 + 33);
        assert!((c.confidence - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_short_hold_emits_nothing() {
        let mut rig = Rig::new();
        for frame in 0..14u64 {
            rig.feed(HandFixture::fist(400.0, 300.0), frame * 33);
        }
        assert!(rig.emitted.is_empty());
    }

    #[test]
    fn test_single_dropout_tolerated() {
        let mut rig = Rig::new();
        for frame in 0..=16u64 {
            let fixture = if frame == 8 {
                HandFixture::relaxed(400.0, 300.0)
            } else {
                HandFixture::fist(400.0, 300.0)
            };
            rig.feed(fixture, frame * 33);
        }
        assert_eq!(rig.emitted.len(), 1);
        assert_eq!(rig.emitted[0].kind, IntentKind::CloseMenu);
        assert_eq!(rig.emitted[0].start_ms, 0);
    }

    #[test]
    fn test_double_dropout_breaks_run() {
        let mut rig = Rig::new();
        for frame in 0..=16u64 {
            let fixture = if frame == 8 || frame == 9 {
                HandFixture::relaxed(400.0, 300.0)
            } else {
                HandFixture::fist(400.0, 300.0)
            };
            rig.feed(fixture, frame * 33);
        }
        // Run restarts at frame 10 and only spans 198ms by frame 16.
        assert!(rig.emitted.is_empty());
    }

    #[test]
    fn test_separated_dropouts_break_run() {
        let mut rig = Rig::new();
        for frame in 0..=20u64 {
            let fixture = if frame == 4 || frame == 10 {
                HandFixture::relaxed(400.0, 300.0)
            } else {
                HandFixture::fist(400.0, 300.0)
            };
            rig.feed(fixture, frame * 33);
        }
        // Second dropout at frame 10 ends the run; frames 11..=20 span 297ms.
        assert!(rig.emitted.is_empty());
    }

    #[test]
    fn test_alternating_dropouts_never_hold() {
        let mut rig = Rig::new();
        for frame in 0..=40u64 {
            let fixture = if frame % 2 == 0 {
                HandFixture::open_palm(400.0, 300.0)
            } else {
                HandFixture::relaxed(400.0, 300.0)
            };
            rig.feed(fixture, frame * 33);
        }
        assert!(rig.emitted.is_empty());
    }

    #[test]
    fn test_gap_does_not_rearm() {
        let mut rig = Rig::new();
        for frame in 0..=20u64 {
            rig.feed(HandFixture::open_palm(400.0, 300.0), frame * 33);
        }
        assert_eq!(rig.emitted.len(), 1);
        assert_eq!(rig.emitted[0].end_ms, 528);

        let mut t = 960;
        while t <= 1660 {
            rig.feed(HandFixture::open_palm(400.0, 300.0), t);
            t += 33;
        }
        assert_eq!(rig.emitted.len(), 1);

        // Two UNKNOWN frames count as a label change.
        for _ in 0..2 {
            rig.feed(HandFixture::relaxed(400.0, 300.0), t);
            t += 33;
        }
        let reopen = t;
        while t <= reopen + 600 {
            rig.feed(HandFixture::open_palm(400.0, 300.0), t);
            t += 33;
        }
        assert_eq!(rig.emitted.len(), 2);
        assert_eq!(rig.emitted[1].kind, IntentKind::OpenMenu);
        assert_eq!(rig.emitted[1].start_ms, reopen);
    }

    #[test]
    fn test_label_change_rearms() {
        let mut rig = Rig::new();
        let mut t = 0;
        for _ in 0..20 {
            rig.feed(HandFixture::open_palm(400.0, 300.0), t);
            t += 33;
        }
        for _ in 0..20 {
            rig.feed(HandFixture::fist(400.0, 300.0), t);
            t += 33;
        }
        for _ in 0..20 {
            rig.feed(HandFixture::open_palm(400.0, 300.0), t);
            t += 33;
        }
        let kinds: Vec<IntentKind> = rig.emitted.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![IntentKind::OpenMenu, IntentKind::CloseMenu, IntentKind::OpenMenu]
        );
        let id = rig.tracker.tracks()[0].track_id;
        assert_eq!(rig.hold.last_emitted(id), Some(rig.emitted[2].end_ms));
    }

    #[test]
    fn test_low_confidence_never_holds() {
        let mut rig = Rig::new();
        for frame in 0..40u64 {
            rig.feed(HandFixture::open_palm(400.0, 300.0).score(0.55), frame * 33);
        }
        // 5/5 fingers at score 0.55 averages below the 0.6 minimum.
        assert!(rig.emitted.is_empty());
    }

    #[test]
    fn test_long_gap_breaks_run() {
        let mut rig = Rig::new();
        for t in [0, 33, 66, 99, 132, 165, 198, 231] {
            rig.feed(HandFixture::open_palm(400.0, 300.0), t);
        }
        for t in [600, 633, 666] {
            rig.feed(HandFixture::open_palm(400.0, 300.0), t);
        }
        assert!(rig.emitted.is_empty());
    }
}
