mod hand_tracker;
mod history;
mod matching;
mod track;
mod track_state;

pub use hand_tracker::{HandTracker, TrackUpdate, TrackerConfig};
pub use history::{History, Timestamped};
pub use matching::{Anchor, AssignmentResult, centroid_distance, greedy_assignment};
pub use track::{Track, TrackId};
pub use track_state::TrackState;
