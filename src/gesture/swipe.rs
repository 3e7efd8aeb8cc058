//! Lateral swipe detection for SWITCH_LEFT / SWITCH_RIGHT.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::gesture::candidate::{GestureCandidate, IntentKind};
use crate::landmarks::HandObservation;
use crate::tracker::{Track, TrackId};

/// Swipe detection thresholds. Distances are in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Trailing time window (ms) a swipe must complete within.
    pub window_ms: u64,
    /// Minimum net horizontal centroid displacement.
    pub min_displacement: f32,
    /// Path length may be at most `|displacement| * path_tolerance`.
    pub path_tolerance: f32,
    /// Horizontal spread of the window under which the hand counts as at
    /// rest, re-arming the detector after a swipe.
    pub neutral_zone: f32,
    /// Retreat from the furthest point of a pending stroke that marks it as
    /// an out-and-back motion.
    pub reversal_tolerance: f32,
    /// Time (ms) a qualifying stroke must go without reversing before it is
    /// reported. Losing the hand reports it immediately.
    pub confirm_ms: u64,
    /// Minimum samples inside the window.
    pub min_samples: usize,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            window_ms: 400,
            min_displacement: 150.0,
            path_tolerance: 1.3,
            neutral_zone: 40.0,
            reversal_tolerance: 40.0,
            confirm_ms: 150,
            min_samples: 3,
        }
    }
}

/// Centroid motion over a window of observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Net horizontal displacement, positive to the right.
    pub dx: f32,
    /// Total 2-D path length.
    pub path: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub start_ms: u64,
    pub end_ms: u64,
    pub mean_score: f32,
    pub samples: usize,
}

impl Stroke {
    pub fn measure(window: &[&HandObservation]) -> Option<Self> {
        let first = window.first()?;
        let last = window.last()?;

        let path = window
            .windows(2)
            .map(|pair| pair[0].centroid().planar_distance(&pair[1].centroid()))
            .sum();
        let (min_x, max_x) = window
            .iter()
            .map(|o| o.centroid().x)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });

        Some(Self {
            dx: last.centroid().x - first.centroid().x,
            path,
            min_x,
            max_x,
            start_ms: first.timestamp_ms,
            end_ms: last.timestamp_ms,
            mean_score: window.iter().map(|o| o.score).sum::<f32>() / window.len() as f32,
            samples: window.len(),
        })
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Horizontal extent covered by the window.
    pub fn spread(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Ratio of net displacement to path length, 1.0 for a straight stroke.
    pub fn straightness(&self) -> f32 {
        if self.path > 0.0 {
            (self.dx.abs() / self.path).min(1.0)
        } else {
            0.0
        }
    }
}

/// A qualifying stroke waiting to be confirmed.
#[derive(Debug, Clone)]
struct Pending {
    candidate: GestureCandidate,
    since_ms: u64,
    /// Furthest centroid x reached in the stroke direction.
    peak_x: f32,
}

impl Pending {
    fn direction(&self) -> f32 {
        match self.candidate.kind {
            IntentKind::SwitchLeft => -1.0,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
struct SwipeState {
    armed: bool,
    pending: Option<Pending>,
    seen: u64,
}

impl Default for SwipeState {
    fn default() -> Self {
        Self {
            armed: true,
            pending: None,
            seen: 0,
        }
    }
}

/// Per-track swipe detector.
///
/// The window is evaluated on every new sample. A qualifying stroke is held
/// back until it has gone `confirm_ms` without the hand turning around, or
/// until the hand is lost. A stroke that reverses by more than
/// `reversal_tolerance` is dropped as an out-and-back motion. After a swipe
/// or a reversal the detector stays disarmed until the hand rests within
/// `neutral_zone`.
#[derive(Debug, Default)]
pub struct SwipeDetector {
    config: SwipeConfig,
    states: HashMap<TrackId, SwipeState>,
}

impl SwipeDetector {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn detect(&mut self, track: &Track) -> Option<GestureCandidate> {
        let latest = track.latest()?;
        let state = self.states.entry(track.track_id).or_default();
        if state.seen == track.sample_count() {
            return None;
        }
        state.seen = track.sample_count();

        let now = latest.timestamp_ms;
        let x = latest.centroid().x;

        if let Some(pending) = state.pending.as_mut() {
            let progress = (x - pending.peak_x) * pending.direction();
            if progress > 0.0 {
                pending.peak_x = x;
            } else if -progress > self.config.reversal_tolerance {
                debug!(
                    "{:?} on {} dropped: hand turned back {:.0}px",
                    pending.candidate.kind, track.track_id, -progress
                );
                state.pending = None;
                state.armed = false;
                return None;
            }
        }

        let since = now.saturating_sub(self.config.window_ms);
        let window: Vec<&HandObservation> = track.observations().since(since).collect();
        let stroke = Stroke::measure(&window)?;

        if !state.armed {
            if stroke.spread() <= self.config.neutral_zone {
                trace!("swipe re-armed on {}", track.track_id);
                state.armed = true;
            }
            return None;
        }

        if let Some(candidate) = qualify(&self.config, track.track_id, &stroke) {
            match state.pending.as_mut() {
                Some(pending) if pending.candidate.kind == candidate.kind => {
                    pending.candidate = candidate;
                }
                Some(_) => {}
                None => {
                    trace!("{:?} pending on {}", candidate.kind, track.track_id);
                    state.pending = Some(Pending {
                        candidate,
                        since_ms: now,
                        peak_x: x,
                    });
                }
            }
        }

        let pending = state.pending.as_ref()?;
        if now.saturating_sub(pending.since_ms) < self.config.confirm_ms {
            return None;
        }
        fire(state, track.track_id)
    }

    /// Report a pending stroke for a track that missed this frame.
    ///
    /// A hand that leaves the frame mid-swipe cannot turn back, so the stroke
    /// is final.
    pub fn flush(&mut self, track_id: TrackId) -> Option<GestureCandidate> {
        let state = self.states.get_mut(&track_id)?;
        fire(state, track_id)
    }

    /// Emit every pending stroke, e.g. when the input stream ends.
    pub fn flush_all(&mut self) -> Vec<GestureCandidate> {
        let mut ids: Vec<TrackId> = self.states.keys().copied().collect();
        ids.sort();
        ids.into_iter().filter_map(|id| self.flush(id)).collect()
    }

    pub fn is_armed(&self, track_id: TrackId) -> bool {
        self.states.get(&track_id).is_none_or(|s| s.armed)
    }

    /// Whether a qualifying stroke is waiting for confirmation.
    pub fn is_pending(&self, track_id: TrackId) -> bool {
        self.states
            .get(&track_id)
            .is_some_and(|s| s.pending.is_some())
    }

    /// Discard in-flight state for a destroyed track.
    pub fn forget(&mut self, track_id: TrackId) {
        self.states.remove(&track_id);
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }
}

fn qualify(config: &SwipeConfig, track_id: TrackId, stroke: &Stroke) -> Option<GestureCandidate> {
    if stroke.samples < config.min_samples
        || stroke.elapsed_ms() == 0
        || stroke.elapsed_ms() > config.window_ms
        || stroke.dx.abs() < config.min_displacement
    {
        return None;
    }
    if stroke.path > stroke.dx.abs() * config.path_tolerance {
        trace!(
            "stroke on {} rejected: path {:.0} for net {:.0}",
            track_id, stroke.path, stroke.dx
        );
        return None;
    }
    let kind = if stroke.dx > 0.0 {
        IntentKind::SwitchRight
    } else {
        IntentKind::SwitchLeft
    };
    Some(GestureCandidate {
        kind,
        track_id,
        start_ms: stroke.start_ms,
        end_ms: stroke.end_ms,
        confidence: stroke.straightness() * stroke.mean_score,
    })
}

fn fire(state: &mut SwipeState, track_id: TrackId) -> Option<GestureCandidate> {
    let candidate = state.pending.take()?.candidate;
    state.armed = false;
    debug!(
        "swipe {:?} on {} over {}ms (conf {:.2})",
        candidate.kind,
        track_id,
        candidate.end_ms - candidate.start_ms,
        candidate.confidence
    );
    Some(candidate)
}
