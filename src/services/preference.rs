// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Preference reinforcement on completion.

use std::collections::HashMap;

use crate::models::{PreferenceMap, PreferenceRow};

/// Score added to a category each time one of its activities is completed.
pub const COMPLETION_STEP: f64 = 0.1;

/// Return `preferences` with `category` reinforced by one completion.
///
/// `min(1.0, current + 0.1)`, with `current` defaulting to 0.5. Repeated
/// calls converge on 1.0.
pub fn update_on_completion(category: &str, preferences: &PreferenceMap) -> PreferenceMap {
    let mut updated = preferences.clone();
    updated.set(category, reinforced_score(preferences.score(category)));
    updated
}

fn reinforced_score(current: f64) -> f64 {
    (current + COMPLETION_STEP).min(1.0)
}

/// Session-local preference state: scores plus per-category completion counts.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    scores: PreferenceMap,
    completions: HashMap<String, u32>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the user's stored rows.
    pub fn from_rows(rows: &[PreferenceRow]) -> Self {
        let mut store = Self::new();
        for row in rows {
            store.scores.set(row.category.clone(), row.preference_score);
            store
                .completions
                .insert(row.category.clone(), row.completion_count);
        }
        store
    }

    pub fn scores(&self) -> &PreferenceMap {
        &self.scores
    }

    pub fn completion_count(&self, category: &str) -> u32 {
        self.completions.get(category).copied().unwrap_or(0)
    }

    /// Apply one completion of `category` and return the row to persist.
    pub fn record_completion(&mut self, user_id: &str, category: &str) -> PreferenceRow {
        self.scores = update_on_completion(category, &self.scores);

        let count = self.completions.entry(category.to_string()).or_insert(0);
        *count = count.saturating_add(1);

        PreferenceRow {
            user_id: user_id.to_string(),
            category: category.to_string(),
            preference_score: self.scores.score(category),
            completion_count: *count,
        }
    }

    pub fn clear(&mut self) {
        self.scores = PreferenceMap::new();
        self.completions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_from_default() {
        let updated = update_on_completion("food", &PreferenceMap::new());
        assert!((updated.score("food") - 0.6).abs() < 1e-9);
        assert_eq!(updated.len(), 1);
    }

    #[test]
    fn test_update_saturates_at_one() {
        let prefs: PreferenceMap = [("exercise", 0.95)].into_iter().collect();
        let once = update_on_completion("exercise", &prefs);
        let twice = update_on_completion("exercise", &once);
        assert_eq!(once.score("exercise"), 1.0);
        assert_eq!(twice.score("exercise"), 1.0);
    }

    #[test]
    fn test_update_leaves_input_untouched() {
        let prefs: PreferenceMap = [("social", 0.3)].into_iter().collect();
        let _ = update_on_completion("social", &prefs);
        assert_eq!(prefs.score("social"), 0.3);
    }

    #[test]
    fn test_store_counts_start_at_zero_and_increment() {
        let mut store = PreferenceStore::from_rows(&[PreferenceRow {
            user_id: "u1".to_string(),
            category: "food".to_string(),
            preference_score: 0.7,
            completion_count: 2,
        }]);
        assert_eq!(store.completion_count("creative"), 0);

        let row = store.record_completion("u1", "food");
        assert_eq!(row.completion_count, 3);
        assert!((row.preference_score - 0.8).abs() < 1e-9);

        let row = store.record_completion("u1", "creative");
        assert_eq!(row.completion_count, 1);
        assert!((row.preference_score - 0.6).abs() < 1e-9);
    }
}
