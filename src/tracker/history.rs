//! Fixed-capacity ring buffer for per-track history.

use std::collections::VecDeque;

use crate::gesture::PoseSample;
use crate::landmarks::HandObservation;

/// Anything carrying a frame timestamp.
pub trait Timestamped {
    fn timestamp_ms(&self) -> u64;
}

impl Timestamped for HandObservation {
    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

impl Timestamped for PoseSample {
    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

/// Bounded history in chronological order (oldest first).
///
/// Pushing into a full buffer evicts the oldest entry, so memory stays
/// bounded however long the stream runs.
#[derive(Debug, Clone)]
pub struct History<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning the evicted one if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.buf.len() == self.capacity {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.buf.iter()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl<T: Timestamped> History<T> {
    /// Entries with a timestamp at or after `since_ms`, oldest first.
    pub fn since(&self, since_ms: u64) -> impl Iterator<Item = &T> {
        let start = self.buf.partition_point(|e| e.timestamp_ms() < since_ms);
        self.buf.range(start..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Tick(u64);

    impl Timestamped for Tick {
        fn timestamp_ms(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut h = History::new(3);
        assert_eq!(h.push(Tick(1)), None);
        assert_eq!(h.push(Tick(2)), None);
        assert_eq!(h.push(Tick(3)), None);
        assert_eq!(h.push(Tick(4)), Some(Tick(1)));
        assert_eq!(h.len(), 3);
        assert_eq!(h.latest(), Some(&Tick(4)));
        let order: Vec<u64> = h.iter().map(|t| t.0).collect();
        assert_eq!(order, vec![2, 3, 4]);
    }

    #[test]
    fn test_since_window() {
        let mut h = History::new(10);
        for t in [0, 30, 60, 90, 120] {
            h.push(Tick(t));
        }
        let window: Vec<u64> = h.since(60).map(|t| t.0).collect();
        assert_eq!(window, vec![60, 90, 120]);
        assert_eq!(h.since(500).count(), 0);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut h = History::new(0);
        h.push(Tick(1));
        h.push(Tick(2));
        assert_eq!(h.len(), 1);
        assert_eq!(h.capacity(), 1);
    }
}
