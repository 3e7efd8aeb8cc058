//! Trait for upstream landmark sources.

use serde::{Deserialize, Serialize};

use crate::landmarks::RawFrame;

/// One detection result together with its capture timestamp.
///
/// Serializes flat, e.g. `{"timestamp": 33, "hands": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedFrame {
    /// Capture time in monotonic milliseconds.
    pub timestamp: u64,
    #[serde(flatten)]
    pub frame: RawFrame,
}

impl TimedFrame {
    pub fn new(timestamp: u64, frame: RawFrame) -> Self {
        Self { timestamp, frame }
    }
}

/// Trait for anything that delivers hand landmark frames.
///
/// Implement this to connect a camera plus landmark model, a recording, or
/// a synthetic generator to the classifier.
///
/// # Example
///
/// ```ignore
/// use gesture_intent_rs::{ObservationSource, TimedFrame};
///
/// struct MyCamera {
///     // Your capture loop and model here
/// }
///
/// impl ObservationSource for MyCamera {
///     type Error = std::io::Error;
///
///     fn next_frame(&mut self) -> Result<Option<TimedFrame>, Self::Error> {
///         // Grab a frame, run the landmark model, return its hands
///         Ok(None)
///     }
/// }
/// ```
pub trait ObservationSource {
    /// Error type for capture or decoding failures.
    type Error;

    /// Return the next frame, or `None` once the stream has stopped.
    fn next_frame(&mut self) -> Result<Option<TimedFrame>, Self::Error>;
}
