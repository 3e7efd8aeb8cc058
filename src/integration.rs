//! Integration module for connecting landmark sources with the classifier.
//!
//! This module provides the source trait, a pipeline that drives a
//! classifier from any source, replay sources for recordings and scripted
//! frames, and synthetic hand fixtures.

mod builder;
mod fixture;
mod pipeline;
mod replay;
mod source;

pub use builder::RawHandBuilder;
pub use fixture::HandFixture;
pub use pipeline::IntentPipeline;
pub use replay::{ReplaySource, ScriptedSource};
pub use source::{ObservationSource, TimedFrame};
