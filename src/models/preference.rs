//! Category preference model.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::UserId;

/// Score assumed for a category the user has no entry for.
pub const DEFAULT_PREFERENCE: f64 = 0.5;

/// Per-category affinity scores, each clamped to `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceMap {
    scores: HashMap<String, f64>,
}

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for `category`, or [`DEFAULT_PREFERENCE`] if unseen.
    pub fn score(&self, category: &str) -> f64 {
        self.get(category).unwrap_or(DEFAULT_PREFERENCE)
    }

    /// Stored score for `category`, if any.
    pub fn get(&self, category: &str) -> Option<f64> {
        self.scores.get(category).copied()
    }

    /// Set the score for `category`, clamped into `[0, 1]`.
    ///
    /// Non-finite scores are stored as the default.
    pub fn set(&mut self, category: impl Into<String>, score: f64) {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            DEFAULT_PREFERENCE
        };
        self.scores.insert(category.into(), score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PreferenceMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = PreferenceMap::new();
        for (category, score) in iter {
            map.set(category, score);
        }
        map
    }
}

/// One row of the `user_preferences` table, keyed by (user, category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PreferenceRow {
    pub user_id: UserId,
    pub category: String,
    pub preference_score: f64,
    /// Completions recorded for this category; starts at 0
    #[serde(default, deserialize_with = "null_as_zero")]
    pub completion_count: u32,
}

/// Rows written before the counter column existed hold `null`.
fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}
