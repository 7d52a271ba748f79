// MazeRace: Bounded History
// Ring-buffer deque backing the per-agent move and path histories. The cap
// is explicit so long races stay bounded in memory.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Append-only history that drops its oldest entry beyond a fixed cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    cap: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            items: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Append an entry, evicting the oldest when full
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.cap {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Oldest surviving entry
    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest-to-newest iteration
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// The most recent `n` entries, oldest first
    pub fn last_n(&self, n: usize) -> Vec<T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip).cloned().collect()
    }

    /// Full surviving history, oldest first
    pub fn as_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T: PartialEq> BoundedHistory<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}
