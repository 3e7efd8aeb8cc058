//! Intent kinds and detector proposals.

use serde::{Deserialize, Serialize};

use crate::tracker::TrackId;

/// UI intents the classifier can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentKind {
    OpenMenu,
    CloseMenu,
    SwitchLeft,
    SwitchRight,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenMenu => "OPEN_MENU",
            Self::CloseMenu => "CLOSE_MENU",
            Self::SwitchLeft => "SWITCH_LEFT",
            Self::SwitchRight => "SWITCH_RIGHT",
        }
    }
}

/// An unconfirmed gesture proposed by a detector, awaiting arbitration.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureCandidate {
    pub kind: IntentKind,
    pub track_id: TrackId,
    pub start_ms: u64,
    pub end_ms: u64,
    pub confidence: f32,
}

impl GestureCandidate {
    /// Higher confidence wins; ties go to the most recent end timestamp.
    pub fn outranks(&self, other: &GestureCandidate) -> bool {
        self.confidence
            .total_cmp(&other.confidence)
            .then(self.end_ms.cmp(&other.end_ms))
            .is_gt()
    }
}
