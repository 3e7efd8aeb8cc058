//! Error types.
//!
//! None of these reach the per-frame path as failures: observation errors are
//! logged and the offending hand is dropped. Config and replay errors are
//! returned to the caller that builds the pipeline.

use thiserror::Error;

/// Reasons a raw hand entry is rejected by the adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationError {
    #[error("expected {expected} keypoints, got {got}")]
    KeypointCount { expected: usize, got: usize },

    #[error("hand has no handedness label")]
    MissingHandedness,

    #[error("handedness score {score} below minimum {min}")]
    LowHandedness { score: f32, min: f32 },

    #[error("keypoint {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// Invalid classifier tunables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("curled_min_curl ({curled}) must not be below extended_max_curl ({extended})")]
    CurlThresholdsInverted { extended: f32, curled: f32 },

    #[error("invalid config json: {0}")]
    Parse(String),
}

/// Failures while reading a recorded observation stream.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay input: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
