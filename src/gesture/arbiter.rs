//! Per-track candidate arbitration and cooldown.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::gesture::candidate::GestureCandidate;
use crate::gesture::event::IntentEvent;
use crate::gesture::ids::{EventIdSource, RandomIdSource};
use crate::tracker::TrackId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Minimum interval (ms) between two events from the same track.
    pub cooldown_ms: u64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self { cooldown_ms: 800 }
    }
}

/// Promotes at most one candidate per track per tick into an `IntentEvent`.
///
/// Tracks are independent gesture sources; there is no cross-track
/// arbitration.
pub struct IntentArbiter {
    config: ArbiterConfig,
    last_emitted: HashMap<TrackId, u64>,
    ids: Box<dyn EventIdSource>,
}

impl IntentArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self::with_id_source(config, Box::new(RandomIdSource::new()))
    }

    pub fn with_id_source(config: ArbiterConfig, ids: Box<dyn EventIdSource>) -> Self {
        Self {
            config,
            last_emitted: HashMap::new(),
            ids,
        }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Arbitrate one tick's candidates.
    ///
    /// `is_known` reports whether a track id is still alive; candidates for
    /// unknown tracks are dropped with a diagnostic.
    pub fn arbitrate<F>(
        &mut self,
        candidates: Vec<GestureCandidate>,
        is_known: F,
        now_ms: u64,
    ) -> Vec<IntentEvent>
    where
        F: Fn(TrackId) -> bool,
    {
        let mut best: BTreeMap<TrackId, GestureCandidate> = BTreeMap::new();
        for candidate in candidates {
            if !is_known(candidate.track_id) {
                warn!(
                    "dropping {:?} candidate for unknown track {}",
                    candidate.kind, candidate.track_id
                );
                continue;
            }
            match best.get(&candidate.track_id) {
                Some(current) if !candidate.outranks(current) => {}
                _ => {
                    best.insert(candidate.track_id, candidate);
                }
            }
        }

        let mut events = Vec::new();
        for (track_id, candidate) in best {
            if self.in_cooldown(track_id, now_ms) {
                debug!("{:?} on {} suppressed by cooldown", candidate.kind, track_id);
                continue;
            }
            let event = IntentEvent::from_candidate(self.ids.next_id(now_ms), &candidate, now_ms);
            self.last_emitted.insert(track_id, now_ms);
            debug!(
                "emit {} from {} at t={}ms (conf {:.2})",
                event.kind.as_str(),
                track_id,
                now_ms,
                event.confidence
            );
            events.push(event);
        }
        events
    }

    /// Whether a track emitted an event less than `cooldown_ms` before `now_ms`.
    pub fn in_cooldown(&self, track_id: TrackId, now_ms: u64) -> bool {
        self.last_emitted
            .get(&track_id)
            .is_some_and(|&t| now_ms.saturating_sub(t) < self.config.cooldown_ms)
    }

    /// Drop cooldown state for a destroyed track.
    pub fn forget(&mut self, track_id: TrackId) {
        self.last_emitted.remove(&track_id);
    }

    pub fn reset(&mut self) {
        self.last_emitted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::SequentialIdSource;
    use crate::gesture::candidate::IntentKind;

    fn arbiter() -> IntentArbiter {
        IntentArbiter::with_id_source(ArbiterConfig::default(), Box::new(SequentialIdSource::new()))
    }

    fn cand(kind: IntentKind, track: u64, end_ms: u64, confidence: f32) -> GestureCandidate {
        GestureCandidate {
            kind,
            track_id: TrackId(track),
            start_ms: end_ms.saturating_sub(500),
            end_ms,
            confidence,
        }
    }

    #[test]
    fn test_highest_confidence_wins() {
        let mut a = arbiter();
        let events = a.arbitrate(
            vec![
                cand(IntentKind::OpenMenu, 1, 500, 0.7),
                cand(IntentKind::SwitchRight, 1, 500, 0.9),
            ],
            |_| true,
            500,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, IntentKind::SwitchRight);
        assert_eq!(events[0].id, "evt-1");
        assert_eq!(events[0].track_id.as_deref(), Some("hand-1"));
        assert!(!events[0].synthetic);
    }

    #[test]
    fn test_tie_goes_to_latest_end() {
        let mut a = arbiter();
        let events = a.arbitrate(
            vec![
                cand(IntentKind::SwitchLeft, 1, 480, 0.8),
                cand(IntentKind::CloseMenu, 1, 500, 0.8),
            ],
            |_| true,
            500,
        );
        assert_eq!(events[0].kind, IntentKind::CloseMenu);
    }

    #[test]
    fn test_cooldown_suppresses_second_hold() {
        let mut a = arbiter();
        let first = a.arbitrate(vec![cand(IntentKind::OpenMenu, 1, 500, 0.9)], |_| true, 500);
        let second = a.arbitrate(vec![cand(IntentKind::CloseMenu, 1, 800, 0.9)], |_| true, 800);
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(a.in_cooldown(TrackId(1), 1299));
        assert!(!a.in_cooldown(TrackId(1), 1300));

        let third = a.arbitrate(vec![cand(IntentKind::CloseMenu, 1, 1300, 0.9)], |_| true, 1300);
        assert_eq!(third.len(), 1);
        assert!(third[0].timestamp - first[0].timestamp >= 800);
    }

    #[test]
    fn test_tracks_are_independent() {
        let mut a = arbiter();
        let events = a.arbitrate(
            vec![
                cand(IntentKind::SwitchLeft, 2, 500, 0.8),
                cand(IntentKind::OpenMenu, 1, 500, 0.9),
            ],
            |_| true,
            500,
        );
        let tracks: Vec<_> = events.iter().map(|e| e.track_id.clone().unwrap()).collect();
        assert_eq!(tracks, vec!["hand-1", "hand-2"]);

        // Cooldown on one track does not block the other.
        let events = a.arbitrate(vec![cand(IntentKind::CloseMenu, 3, 600, 0.8)], |_| true, 600);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_unknown_track_dropped() {
        let mut a = arbiter();
        let events = a.arbitrate(
            vec![
                cand(IntentKind::OpenMenu, 9, 500, 0.9),
                cand(IntentKind::CloseMenu, 1, 500, 0.6),
            ],
            |id| id == TrackId(1),
            500,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, IntentKind::CloseMenu);
        assert!(!a.in_cooldown(TrackId(9), 500));
    }

    #[test]
    fn test_forget_clears_cooldown() {
        let mut a = arbiter();
        a.arbitrate(vec![cand(IntentKind::OpenMenu, 1, 500, 0.9)], |_| true, 500);
        a.forget(TrackId(1));
        assert!(!a.in_cooldown(TrackId(1), 600));
    }
}
