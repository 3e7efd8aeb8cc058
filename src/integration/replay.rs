//! In-memory and recorded frame sources.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use tracing::debug;

use crate::error::ReplayError;

use super::{ObservationSource, TimedFrame};

/// Plays back a fixed list of frames.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    frames: VecDeque<TimedFrame>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = TimedFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame: TimedFrame) {
        self.frames.push_back(frame);
    }

    /// Frames not yet delivered.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl ObservationSource for ScriptedSource {
    type Error = Infallible;

    fn next_frame(&mut self) -> Result<Option<TimedFrame>, Self::Error> {
        Ok(self.frames.pop_front())
    }
}

/// Reads a JSON-lines recording, one `TimedFrame` per line.
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub struct ReplaySource<R> {
    lines: Lines<R>,
    line: usize,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        debug!("replaying {}", path.display());
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> ObservationSource for ReplaySource<R> {
    type Error = ReplayError;

    fn next_frame(&mut self) -> Result<Option<TimedFrame>, Self::Error> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line += 1;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
                line: self.line,
                source,
            })?;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Handedness, RawFrame};
    use std::io::Cursor;

    #[test]
    fn test_scripted_source_drains_in_order() {
        let mut src = ScriptedSource::new([
            TimedFrame::new(0, RawFrame::empty()),
            TimedFrame::new(33, RawFrame::empty()),
        ]);
        assert_eq!(src.len(), 2);
        assert_eq!(src.next_frame().unwrap().unwrap().timestamp, 0);
        assert_eq!(src.next_frame().unwrap().unwrap().timestamp, 33);
        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_replay_parses_lines() {
        let input = concat!(
            r#"{"timestamp": 0, "hands": []}"#,
            "\n\n",
            r#"{"timestamp": 33, "hands": [{"keypoints": [{"x": 0.5, "y": 0.5}], "handedness": "Left", "score": 0.8}]}"#,
            "\n",
        );
        let mut src = ReplaySource::new(Cursor::new(input));

        let first = src.next_frame().unwrap().unwrap();
        assert_eq!(first.timestamp, 0);
        assert!(first.frame.hands.is_empty());

        let second = src.next_frame().unwrap().unwrap();
        assert_eq!(second.timestamp, 33);
        assert_eq!(second.frame.hands[0].handedness, Some(Handedness::Left));
        assert_eq!(second.frame.hands[0].keypoints[0].z, 0.0);
        assert_eq!(src.line(), 3);

        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_replay_reports_line_of_bad_json() {
        let input = "{\"timestamp\": 0}\n{\"timestamp\": \"soon\"}\n";
        let mut src = ReplaySource::new(Cursor::new(input));
        assert!(src.next_frame().unwrap().is_some());
        match src.next_frame() {
            Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_recording() {
        assert!(matches!(
            ReplaySource::open("/nonexistent/recording.jsonl"),
            Err(ReplayError::Io(_))
        ));
    }
}
