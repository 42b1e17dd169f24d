// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod interaction;
pub mod preference;
pub mod user;

pub use activity::{Activity, ActivityId};
pub use interaction::{InteractionContext, InteractionKind, InteractionRecord};
pub use preference::{PreferenceMap, PreferenceRow, DEFAULT_PREFERENCE};
pub use user::{AuthUser, Credentials, Profile, UserId};
