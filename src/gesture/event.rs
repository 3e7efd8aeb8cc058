//! Final output records.

use serde::{Deserialize, Serialize};

use crate::gesture::candidate::{GestureCandidate, IntentKind};

/// An emitted intent. Immutable once emitted.
///
/// Serializes to `{ id, type, timestamp, trackId, confidence, synthetic }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IntentKind,
    /// Emission time (frame timestamp, milliseconds).
    pub timestamp: u64,
    /// Source track, `None` for synthetic events.
    pub track_id: Option<String>,
    pub confidence: f32,
    /// True for events injected through the trigger path.
    #[serde(default)]
    pub synthetic: bool,
}

impl IntentEvent {
    pub(crate) fn from_candidate(id: String, candidate: &GestureCandidate, timestamp: u64) -> Self {
        Self {
            id,
            kind: candidate.kind,
            timestamp,
            track_id: Some(candidate.track_id.to_string()),
            confidence: candidate.confidence,
            synthetic: false,
        }
    }

    pub(crate) fn synthetic(id: String, kind: IntentKind, timestamp: u64) -> Self {
        Self {
            id,
            kind,
            timestamp,
            track_id: None,
            confidence: 1.0,
            synthetic: true,
        }
    }
}
