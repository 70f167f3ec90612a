use crate::prelude::{SIGNAL_HISTORY_CAPACITY, SIGNAL_SENTINEL_DBM};
use std::collections::VecDeque;

/// Bounded FIFO of bandit signal samples in dBm.
#[derive(Debug, Clone)]
pub struct SignalHistory {
    samples: VecDeque<i64>,
    capacity: usize,
    revision: u64,
}

impl SignalHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            revision: 0,
        }
    }

    /// Appends a sample, evicting the oldest once full.
    pub fn push(&mut self, dbm: i64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(dbm);
        self.revision += 1;
    }

    /// Appends the signal of a snapshot or the sentinel when it has none.
    pub fn push_signal(&mut self, dbm: Option<i64>) {
        self.push(dbm.unwrap_or(SIGNAL_SENTINEL_DBM));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.samples.iter().copied()
    }

    pub fn latest(&self) -> Option<i64> {
        self.samples.back().copied()
    }

    /// Bumped on every push; renderers compare it to know when to redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for SignalHistory {
    fn default() -> Self {
        Self::with_capacity(SIGNAL_HISTORY_CAPACITY)
    }
}
