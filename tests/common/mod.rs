#![allow(dead_code)]

use gesture_intent_rs::integration::HandFixture;
use gesture_intent_rs::{
    AdapterConfig, ClassifierConfig, IntentClassifier, IntentEvent, RawFrame, SequentialIdSource,
    TimedFrame,
};
use tracing_subscriber::EnvFilter;

/// Roughly 30 fps.
pub const FRAME_MS: u64 = 33;
/// Swipe strokes are sampled at 50 fps.
pub const SWIPE_FRAME_MS: u64 = 20;

/// Route library logs to the test output; set `RUST_LOG=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A classifier with default tunables and deterministic event ids.
pub fn classifier() -> IntentClassifier {
    classifier_with(ClassifierConfig::default())
}

pub fn classifier_with(config: ClassifierConfig) -> IntentClassifier {
    IntentClassifier::with_id_source(config, Box::new(SequentialIdSource::new()))
        .expect("valid config")
}

pub fn frame_of(hands: &[HandFixture]) -> RawFrame {
    let adapter = AdapterConfig::default();
    RawFrame::new(hands.iter().map(|h| h.raw(&adapter)).collect())
}

/// One hand held still for `duration_ms`, starting at `start`.
pub fn hold(hand: &HandFixture, start: u64, duration_ms: u64) -> Vec<TimedFrame> {
    (0..=duration_ms / FRAME_MS)
        .map(|i| TimedFrame::new(start + i * FRAME_MS, frame_of(std::slice::from_ref(hand))))
        .collect()
}

/// A relaxed (pose-neutral) hand resting at `x` for `frames` frames.
pub fn rest(x: f32, start: u64, frames: u64) -> Vec<TimedFrame> {
    (0..frames)
        .map(|i| {
            TimedFrame::new(
                start + i * SWIPE_FRAME_MS,
                frame_of(&[HandFixture::relaxed(x, 270.0)]),
            )
        })
        .collect()
}

/// A relaxed hand moving horizontally from `from` to `to` over `ms`.
pub fn stroke(from: f32, to: f32, start: u64, ms: u64) -> Vec<TimedFrame> {
    let steps = ms / SWIPE_FRAME_MS;
    (1..=steps)
        .map(|i| {
            let x = from + (to - from) * i as f32 / steps as f32;
            TimedFrame::new(
                start + (i - 1) * SWIPE_FRAME_MS,
                frame_of(&[HandFixture::relaxed(x, 270.0)]),
            )
        })
        .collect()
}

/// Timestamp right after the last frame of a swipe-rate segment.
pub fn after(frames: &[TimedFrame]) -> u64 {
    frames.last().map_or(0, |f| f.timestamp + SWIPE_FRAME_MS)
}

pub fn run(classifier: &mut IntentClassifier, frames: &[TimedFrame]) -> Vec<IntentEvent> {
    frames
        .iter()
        .flat_map(|f| classifier.ingest(&f.frame, f.timestamp))
        .collect()
}
