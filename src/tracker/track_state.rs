/// Track lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Matched an observation on the latest frame
    #[default]
    Tracked,
    /// Missed one or more frames, still eligible for matching
    Lost,
    /// Exceeded the miss limit; history released
    Removed,
}
