//! IntentPipeline for combining a landmark source with the classifier.

use crate::error::ConfigError;
use crate::gesture::{ClassifierConfig, IntentClassifier, IntentEvent};

use super::ObservationSource;

/// Bundles an `ObservationSource` with an `IntentClassifier`.
///
/// Pulls one frame per call and feeds it through the classifier at the
/// frame's own timestamp.
pub struct IntentPipeline<S: ObservationSource> {
    source: S,
    classifier: IntentClassifier,
}

impl<S: ObservationSource> IntentPipeline<S> {
    pub fn new(source: S, classifier: IntentClassifier) -> Self {
        Self { source, classifier }
    }

    /// Create a pipeline with a freshly built classifier.
    pub fn with_config(source: S, config: ClassifierConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(source, IntentClassifier::new(config)?))
    }

    /// Process the next frame.
    ///
    /// Returns `Ok(None)` once the source is exhausted, otherwise the events
    /// emitted on that frame (often none).
    pub fn process_next(&mut self) -> Result<Option<Vec<IntentEvent>>, S::Error> {
        let Some(timed) = self.source.next_frame()? else {
            return Ok(None);
        };
        Ok(Some(self.classifier.ingest(&timed.frame, timed.timestamp)))
    }

    /// Drain the source and collect every emitted event in order, including
    /// strokes still pending when the source runs out.
    pub fn run_to_end(&mut self) -> Result<Vec<IntentEvent>, S::Error> {
        let mut events = Vec::new();
        while let Some(batch) = self.process_next()? {
            events.extend(batch);
        }
        events.extend(self.classifier.finish());
        Ok(events)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut IntentClassifier {
        &mut self.classifier
    }

    /// Release the source and the classifier.
    pub fn into_parts(self) -> (S, IntentClassifier) {
        (self.source, self.classifier)
    }
}
