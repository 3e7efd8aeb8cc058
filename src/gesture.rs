//! Gesture recognition on top of hand tracks.
//!
//! Pose classification, hold and swipe detection, arbitration into
//! `IntentEvent`s, and the synthetic trigger path.

mod arbiter;
mod candidate;
mod classifier;
mod event;
mod hold;
mod ids;
mod pose;
mod swipe;
mod synthetic;

pub use arbiter::{ArbiterConfig, IntentArbiter};
pub use candidate::{GestureCandidate, IntentKind};
pub use classifier::{ClassifierConfig, IntentClassifier};
pub use event::IntentEvent;
pub use hold::{HoldConfig, HoldDetector};
pub use ids::{EventIdSource, RandomIdSource, SequentialIdSource};
pub use pose::{Pose, PoseClassifier, PoseConfig, PoseSample};
pub use swipe::{SwipeConfig, SwipeDetector};
pub use synthetic::{SyntheticTrigger, intent_from_trigger};
