use std::collections::VecDeque;

use crate::protocol::LogEvent;

/// Fixed-capacity FIFO of the most recent worker lines; the oldest entry is
/// dropped when a new one arrives at capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRing {
    capacity: usize,
    entries: VecDeque<LogEvent>,
}

impl LogRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: LogEvent) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEvent> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_still_holds_one_line() {
        let mut ring = LogRing::new(0);
        assert_eq!(ring.capacity(), 1);
        assert!(ring.is_empty());
        ring.push(LogEvent::new("[INFO] a"));
        ring.push(LogEvent::new("[INFO] b"));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.iter().next().map(LogEvent::body), Some("b"));
    }
}
