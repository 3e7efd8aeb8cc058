//! Hand landmark types and the per-frame adapter.
//!
//! Landmark indices follow the 21-point MediaPipe hand topology.

mod adapter;
mod observation;

pub use adapter::{AdapterConfig, RawFrame, RawHand, adapt_frame};
pub use observation::{HandObservation, Handedness, KEYPOINT_COUNT, Keypoint, index};
