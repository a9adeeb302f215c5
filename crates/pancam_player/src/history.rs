// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bounded navigation history.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of remembered frame visits
pub const DEFAULT_HISTORY_DEPTH: usize = 64;

/// How a frame was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arrival {
    /// By an explicit navigation request
    Manual,
    /// By the auto-advance timer
    Timeout,
}

/// A frame that was left, and how it had been reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Index of the frame
    pub frame_index: usize,
    /// How the frame had been reached
    pub arrival: Arrival,
}

/// Frames visited before the current one, oldest first
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<HistoryEntry>,
    max_depth: usize,
}

impl NavigationHistory {
    /// Create an empty history keeping at most `max_depth` entries
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record leaving a frame
    pub fn push(&mut self, frame_index: usize, arrival: Arrival) {
        self.entries.push_back(HistoryEntry {
            frame_index,
            arrival,
        });
        while self.entries.len() > self.max_depth {
            self.entries.pop_front();
        }
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// How `frame_index` was reached on its most recent recorded visit
    pub fn last_arrival_at(&self, frame_index: usize) -> Option<Arrival> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.frame_index == frame_index)
            .map(|e| e.arrival)
    }

    /// Entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_HISTORY_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_entries_are_evicted() {
        let mut history = NavigationHistory::with_max_depth(3);
        for i in 0..5 {
            history.push(i, Arrival::Manual);
        }
        let indices: Vec<_> = history.iter().map(|e| e.frame_index).collect();
        assert_eq!(indices, vec![2, 3, 4]);
    }

    #[test]
    fn test_last_arrival_uses_most_recent_visit() {
        let mut history = NavigationHistory::default();
        history.push(1, Arrival::Timeout);
        history.push(2, Arrival::Manual);
        history.push(1, Arrival::Manual);
        assert_eq!(history.last_arrival_at(1), Some(Arrival::Manual));
        assert_eq!(history.last_arrival_at(2), Some(Arrival::Manual));
        assert_eq!(history.last_arrival_at(7), None);
    }
}
