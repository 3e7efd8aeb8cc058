//! Synthetic intent injection for demos and deterministic testing.
//!
//! Bypasses the classifier entirely. Events from this path are flagged
//! `synthetic` and carry no track.

use tracing::debug;

use crate::gesture::candidate::IntentKind;
use crate::gesture::event::IntentEvent;
use crate::gesture::ids::{EventIdSource, RandomIdSource};

const TRIGGERS: [(&str, IntentKind); 4] = [
    ("1", IntentKind::OpenMenu),
    ("2", IntentKind::CloseMenu),
    ("3", IntentKind::SwitchRight),
    ("4", IntentKind::SwitchLeft),
];

/// Map a trigger code to its intent.
pub fn intent_from_trigger(code: &str) -> Option<IntentKind> {
    TRIGGERS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, kind)| *kind)
}

pub struct SyntheticTrigger {
    ids: Box<dyn EventIdSource>,
}

impl Default for SyntheticTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticTrigger {
    pub fn new() -> Self {
        Self::with_id_source(Box::new(RandomIdSource::new()))
    }

    pub fn with_id_source(ids: Box<dyn EventIdSource>) -> Self {
        Self { ids }
    }

    /// Fire the intent mapped to `code`, if any.
    pub fn fire(&mut self, code: &str, timestamp_ms: u64) -> Option<IntentEvent> {
        let kind = intent_from_trigger(code)?;
        Some(self.inject(kind, timestamp_ms))
    }

    /// Emit a synthetic event of the given kind.
    pub fn inject(&mut self, kind: IntentKind, timestamp_ms: u64) -> IntentEvent {
        debug!("synthetic {} at t={}ms", kind.as_str(), timestamp_ms);
        IntentEvent::synthetic(self.ids.next_id(timestamp_ms), kind, timestamp_ms)
    }
}
