//! Event identifier generation.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

/// Source of unique event ids.
pub trait EventIdSource: Send {
    /// Produce the id for an event emitted at `timestamp_ms`.
    fn next_id(&mut self, timestamp_ms: u64) -> String;
}

/// Random v4 UUIDs from the OS entropy source.
///
/// If the OS source is unavailable, ids fall back to
/// `evt-{timestamp}-{suffix}` with a SplitMix64 suffix.
#[derive(Debug, Clone)]
pub struct RandomIdSource {
    state: u64,
}

impl Default for RandomIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomIdSource {
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_seed(nanos)
    }

    /// Seed the fallback sequence explicitly.
    pub fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn fallback_id(&mut self, timestamp_ms: u64) -> String {
        format!("evt-{}-{:016x}", timestamp_ms, self.next_u64())
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl EventIdSource for RandomIdSource {
    fn next_id(&mut self, timestamp_ms: u64) -> String {
        let mut bytes = [0u8; 16];
        match getrandom::getrandom(&mut bytes) {
            Ok(()) => uuid::Builder::from_random_bytes(bytes).into_uuid().to_string(),
            Err(err) => {
                warn!("os randomness unavailable ({}), using fallback event id", err);
                self.fallback_id(timestamp_ms)
            }
        }
    }
}

/// Deterministic `evt-1`, `evt-2`, ... ids for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdSource {
    next: u64,
}

impl SequentialIdSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventIdSource for SequentialIdSource {
    fn next_id(&mut self, _timestamp_ms: u64) -> String {
        self.next += 1;
        format!("evt-{}", self.next)
    }
}
