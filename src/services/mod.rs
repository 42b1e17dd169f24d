// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - selection, preferences, and the session loop.

pub mod history;
pub mod preference;
pub mod recorder;
pub mod retry;
pub mod selector;
pub mod session;

pub use history::{RecentHistory, HISTORY_CAPACITY};
pub use preference::{update_on_completion, PreferenceStore};
pub use recorder::{InteractionRecorder, WriteReport};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use selector::{select_next, Selection};
pub use session::{Session, SessionState, SessionStats};
