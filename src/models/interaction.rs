// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interaction log model.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::models::{ActivityId, UserId};
use crate::time_utils::{day_of_week, hour_of_day};

/// What the user did with a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    SwipedRight,
    SwipedLeft,
    Saved,
    Completed,
    Skipped,
}

impl InteractionKind {
    /// Wire name, as stored in the `interaction_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::SwipedRight => "swiped_right",
            InteractionKind::SwipedLeft => "swiped_left",
            InteractionKind::Saved => "saved",
            InteractionKind::Completed => "completed",
            InteractionKind::Skipped => "skipped",
        }
    }
}

/// Wall-clock context captured when the interaction happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InteractionContext {
    /// 0–23
    pub hour: u32,
    /// Sunday = 0
    pub day_of_week: u32,
}

impl InteractionContext {
    pub fn at<Tz: TimeZone>(date: &DateTime<Tz>) -> Self {
        Self {
            hour: hour_of_day(date),
            day_of_week: day_of_week(date),
        }
    }

    pub fn now() -> Self {
        Self::at(&Local::now())
    }
}

/// Append-only interaction row. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InteractionRecord {
    pub user_id: UserId,
    pub activity_id: ActivityId,
    pub interaction_type: InteractionKind,
    /// Optional 1–5 rating, given on completion
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
    pub context: InteractionContext,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_record_wire_shape() {
        // 2024-03-02 is a Saturday
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 18, 5, 0).unwrap();
        let record = InteractionRecord {
            user_id: "u1".to_string(),
            activity_id: "a1".to_string(),
            interaction_type: InteractionKind::Completed,
            rating: Some(5),
            context: InteractionContext::at(&at),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user_id": "u1",
                "activity_id": "a1",
                "interaction_type": "completed",
                "rating": 5,
                "context": { "hour": 18, "day_of_week": 6 }
            })
        );
    }

    #[test]
    fn test_kind_wire_names_match_serde() {
        for kind in [
            InteractionKind::SwipedRight,
            InteractionKind::SwipedLeft,
            InteractionKind::Saved,
            InteractionKind::Completed,
            InteractionKind::Skipped,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.as_str()));
        }
    }
}
