// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recently surfaced activity ids.

use std::collections::VecDeque;

use crate::models::ActivityId;

/// Number of recent interactions kept out of rotation.
pub const HISTORY_CAPACITY: usize = 20;

/// Bounded most-recent-first list of activity ids.
///
/// Pushing past capacity drops the oldest entry. Duplicates are kept; an
/// activity swiped right and then completed occupies two slots.
#[derive(Debug, Clone)]
pub struct RecentHistory {
    ids: VecDeque<ActivityId>,
    capacity: usize,
}

impl Default for RecentHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl RecentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record `id` as the most recent interaction.
    pub fn push(&mut self, id: impl Into<ActivityId>) {
        if self.capacity == 0 {
            return;
        }
        self.ids.push_front(id.into());
        self.ids.truncate(self.capacity);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|seen| seen == id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ids from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<ActivityId>> FromIterator<S> for RecentHistory {
    /// Build from ids given most-recent-first.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut history = RecentHistory::new();
        let ids: Vec<ActivityId> = iter.into_iter().map(Into::into).collect();
        for id in ids.into_iter().rev() {
            history.push(id);
        }
        history
    }
}
