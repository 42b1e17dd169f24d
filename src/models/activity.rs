// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog activity model.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Opaque activity identifier assigned by the data service.
pub type ActivityId = String;

/// A suggested activity from the shared catalog.
///
/// Rows are immutable once fetched; the session keeps them in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    #[validate(length(min = 1))]
    pub id: ActivityId,
    /// Open category tag (exercise, food, social, ...)
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[validate(range(min = 1))]
    pub duration_minutes: u32,
    /// 1 (restful) to 5 (intense)
    #[validate(range(min = 1, max = 5))]
    pub energy_level: u8,
    /// indoor, outdoor, anywhere, ...
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// The catalog table stores `description` as nullable text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
