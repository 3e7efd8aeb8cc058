//! Temporal hand-gesture classifier.
//!
//! Turns a per-frame stream of 21-point hand landmark detections into a small
//! set of debounced intent events (`OPEN_MENU`, `CLOSE_MENU`, `SWITCH_LEFT`,
//! `SWITCH_RIGHT`). The pipeline is frame-synchronous: call
//! [`IntentClassifier::ingest`] once per camera frame.

pub mod error;
pub mod gesture;
pub mod integration;
pub mod landmarks;
pub mod tracker;

pub use error::{ConfigError, ObservationError, ReplayError};
pub use gesture::{
    ArbiterConfig, ClassifierConfig, EventIdSource, GestureCandidate, HoldConfig, IntentArbiter,
    IntentClassifier, IntentEvent, IntentKind, Pose, PoseClassifier, PoseConfig, PoseSample,
    RandomIdSource, SequentialIdSource, SwipeConfig, SyntheticTrigger, intent_from_trigger,
};
pub use integration::{
    IntentPipeline, ObservationSource, RawHandBuilder, ReplaySource, ScriptedSource, TimedFrame,
};
pub use landmarks::{
    AdapterConfig, HandObservation, Handedness, KEYPOINT_COUNT, Keypoint, RawFrame, RawHand,
};
pub use tracker::{HandTracker, Track, TrackId, TrackState, TrackUpdate, TrackerConfig};
