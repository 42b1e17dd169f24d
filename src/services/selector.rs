// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Next-activity selection.
//!
//! Scores every activity not in the recent history by
//! `category preference × time-of-day boost` and picks the best one. When the
//! history covers the whole catalog the caller is told to clear it and the
//! first catalog entry is shown again, unscored.

use crate::models::{Activity, PreferenceMap};
use crate::services::history::RecentHistory;

/// Multiplier applied when the hour is in the category's preferred set.
pub const PREFERRED_HOUR_BOOST: f64 = 1.5;

const NEUTRAL_TIME_SCORE: f64 = 1.0;

/// Hours of day at which each known category is most appealing.
const PREFERRED_HOURS: &[(&str, &[u32])] = &[
    ("exercise", &[6, 7, 8, 17, 18, 19]),
    ("food", &[7, 8, 12, 13, 18, 19, 20]),
    ("social", &[11, 12, 17, 18, 19, 20, 21]),
    ("creative", &[9, 10, 14, 15, 16, 20, 21]),
    ("recovery", &[20, 21, 22]),
    ("productivity", &[9, 10, 11, 14, 15, 16]),
];

/// Preferred hours for `category`; empty for categories not in the table.
pub fn preferred_hours(category: &str) -> &'static [u32] {
    PREFERRED_HOURS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, hours)| *hours)
        .unwrap_or(&[])
}

/// Time-of-day multiplier for `category` at `hour`.
pub fn time_score(category: &str, hour: u32) -> f64 {
    if preferred_hours(category).contains(&hour) {
        PREFERRED_HOUR_BOOST
    } else {
        NEUTRAL_TIME_SCORE
    }
}

/// Combined score of one activity.
pub fn score_activity(activity: &Activity, preferences: &PreferenceMap, hour: u32) -> f64 {
    preferences.score(&activity.category) * time_score(&activity.category, hour)
}

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    /// Best-scoring unseen activity.
    Scored { activity: &'a Activity, score: f64 },
    /// Every activity was in the history. The caller must clear it; this is
    /// the first catalog entry.
    Reset(&'a Activity),
    /// The catalog is empty.
    Empty,
}

impl<'a> Selection<'a> {
    /// The chosen activity, if any.
    pub fn activity(&self) -> Option<&'a Activity> {
        match *self {
            Selection::Scored { activity, .. } | Selection::Reset(activity) => Some(activity),
            Selection::Empty => None,
        }
    }

    pub fn requires_history_reset(&self) -> bool {
        matches!(self, Selection::Reset(_))
    }
}

/// Pick the next activity to show.
///
/// Pure: neither `history` nor `preferences` is modified. Ties go to the
/// activity that comes first in `catalog`.
pub fn select_next<'a>(
    catalog: &'a [Activity],
    history: &RecentHistory,
    preferences: &PreferenceMap,
    hour: u32,
) -> Selection<'a> {
    let Some(first) = catalog.first() else {
        return Selection::Empty;
    };

    let mut best: Option<(&Activity, f64)> = None;
    for activity in catalog.iter().filter(|a| !history.contains(&a.id)) {
        let score = score_activity(activity, preferences, hour);
        // Strictly greater keeps the earliest of equal scores.
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((activity, score));
        }
    }

    match best {
        Some((activity, score)) => Selection::Scored { activity, score },
        None => Selection::Reset(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, category: &str) -> Activity {
        Activity {
            id: id.to_string(),
            category: category.to_string(),
            title: format!("Activity {}", id),
            description: String::new(),
            duration_minutes: 15,
            energy_level: 3,
            location_type: None,
            image_url: None,
        }
    }

    #[test]
    fn test_time_score_table() {
        assert_eq!(time_score("exercise", 7), PREFERRED_HOUR_BOOST);
        assert_eq!(time_score("exercise", 12), 1.0);
        assert_eq!(time_score("recovery", 22), PREFERRED_HOUR_BOOST);
        assert_eq!(time_score("learning", 9), 1.0);
        assert!(preferred_hours("outdoor").is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let selection = select_next(&[], &RecentHistory::new(), &PreferenceMap::new(), 7);
        assert_eq!(selection, Selection::Empty);
        assert_eq!(selection.activity(), None);
    }

    #[test]
    fn test_tie_goes_to_catalog_order() {
        let catalog = vec![activity("a", "learning"), activity("b", "outdoor")];
        let selection = select_next(&catalog, &RecentHistory::new(), &PreferenceMap::new(), 3);
        assert_eq!(selection.activity().map(|a| a.id.as_str()), Some("a"));
    }

    #[test]
    fn test_reset_returns_first_even_if_lower_scored() {
        let catalog = vec![activity("a", "learning"), activity("b", "exercise")];
        let history: RecentHistory = ["b", "a"].into_iter().collect();
        let prefs: PreferenceMap = [("exercise", 1.0), ("learning", 0.1)].into_iter().collect();

        let selection = select_next(&catalog, &history, &prefs, 7);
        assert!(selection.requires_history_reset());
        assert_eq!(selection.activity().map(|a| a.id.as_str()), Some("a"));
    }
}
