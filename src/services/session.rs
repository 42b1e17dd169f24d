// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user swipe session.
//!
//! Owns everything the card loop mutates: the catalog cache, the preference
//! store, the recent history, and in-flight remote writes. Lifecycle:
//!
//! `Uninitialized -> Loading -> Ready -> ... -> Terminated`
//!
//! Load failures leave the session `Ready` with empty collections. Only auth
//! failures are returned to the caller.

use std::sync::Arc;

use validator::{Validate, ValidationErrors};

use crate::db::DataService;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, AuthUser, Credentials, InteractionContext, InteractionKind, InteractionRecord,
    PreferenceMap, Profile,
};
use crate::services::history::RecentHistory;
use crate::services::preference::PreferenceStore;
use crate::services::recorder::{InteractionRecorder, WriteReport};
use crate::services::retry::RetryPolicy;
use crate::services::selector::{select_next, Selection};
use crate::time_utils::current_local_hour;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
    Terminated,
}

/// Figures shown in the header of the card screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Activities in the catalog
    pub activities: usize,
    /// Categories with a stored preference
    pub interests: usize,
    /// Entries in the recent history
    pub recent: usize,
    pub writes: WriteReport,
}

/// A signed-in user's swipe session.
pub struct Session {
    service: Arc<dyn DataService>,
    state: SessionState,
    user: Option<AuthUser>,
    catalog: Vec<Activity>,
    preferences: PreferenceStore,
    history: RecentHistory,
    recorder: InteractionRecorder,
}

impl Session {
    pub fn new(service: Arc<dyn DataService>, retry_policy: RetryPolicy) -> Self {
        Self {
            recorder: InteractionRecorder::new(Arc::clone(&service), retry_policy),
            service,
            state: SessionState::Uninitialized,
            user: None,
            catalog: Vec::new(),
            preferences: PreferenceStore::new(),
            history: RecentHistory::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn catalog(&self) -> &[Activity] {
        &self.catalog
    }

    pub fn preferences(&self) -> &PreferenceMap {
        self.preferences.scores()
    }

    pub fn completion_count(&self, category: &str) -> u32 {
        self.preferences.completion_count(category)
    }

    pub fn history(&self) -> &RecentHistory {
        &self.history
    }

    // ─── Auth ────────────────────────────────────────────────────

    /// Sign in and load the user's catalog and preferences.
    ///
    /// Returns the auth error for display. Malformed credentials leave the
    /// session unchanged; otherwise any previous user is signed out first.
    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<()> {
        validate_credentials(credentials)?;
        self.end_previous_user().await;
        let user = self.service.sign_in(credentials).await?;
        self.begin(user).await;
        Ok(())
    }

    /// Register, create the profile row, and load.
    pub async fn sign_up(&mut self, credentials: &Credentials) -> Result<()> {
        validate_credentials(credentials)?;
        self.end_previous_user().await;
        let user = self.service.sign_up(credentials).await?;

        if let Err(e) = self.service.upsert_profile(&Profile::new_for(&user.id)).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to create profile");
        }

        self.begin(user).await;
        Ok(())
    }

    /// Resume an already-authenticated user (e.g. a persisted login).
    pub async fn restore(&mut self, user: AuthUser) {
        self.end_previous_user().await;
        self.begin(user).await;
    }

    /// Cancel pending writes, end the remote session and clear local state.
    pub async fn sign_out(&mut self) {
        self.teardown().await;
        if let Err(e) = self.service.sign_out().await {
            tracing::warn!(error = %e, "Remote sign-out failed");
        }
        self.state = SessionState::Terminated;
        tracing::info!("Signed out");
    }

    /// Sign out the current user, if any, before another one takes over.
    ///
    /// Runs before the new auth call so the remote sign-out revokes the old
    /// token rather than the new one.
    async fn end_previous_user(&mut self) {
        if let Some(previous) = self.user.as_ref().map(|u| u.id.clone()) {
            tracing::info!(user_id = %previous, "Switching users; ending previous session");
            self.sign_out().await;
        }
    }

    async fn begin(&mut self, user: AuthUser) {
        tracing::info!(user_id = %user.id, "Session starting");
        self.user = Some(user);
        self.load().await;
    }

    async fn teardown(&mut self) {
        self.recorder.cancel_all().await;
        self.recorder.reset_counters();
        self.user = None;
        self.catalog.clear();
        self.preferences.clear();
        self.history.clear();
    }

    /// Load catalog and preferences, degrading each to empty on failure.
    async fn load(&mut self) {
        self.state = SessionState::Loading;

        self.catalog = match self.service.fetch_catalog().await {
            Ok(rows) => valid_activities(rows),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load catalog; continuing with none");
                Vec::new()
            }
        };

        let user_id = self.user.as_ref().map(|u| u.id.clone()).unwrap_or_default();
        self.preferences = match self.service.fetch_preferences(&user_id).await {
            Ok(rows) => PreferenceStore::from_rows(&rows),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to load preferences; using defaults"
                );
                PreferenceStore::new()
            }
        };

        self.state = SessionState::Ready;
        tracing::info!(
            user_id = %user_id,
            activities = self.catalog.len(),
            interests = self.preferences.scores().len(),
            "Session ready"
        );
    }

    // ─── Card loop ───────────────────────────────────────────────

    /// Next card for the current local hour.
    pub fn next_activity(&mut self) -> Option<Activity> {
        self.next_activity_at(current_local_hour())
    }

    /// Next card for `hour`. Clears the history when it covers the catalog.
    pub fn next_activity_at(&mut self, hour: u32) -> Option<Activity> {
        let selection = select_next(
            &self.catalog,
            &self.history,
            self.preferences.scores(),
            hour,
        );

        match selection {
            Selection::Scored { activity, score } => {
                tracing::debug!(activity_id = %activity.id, score, hour, "Selected activity");
            }
            Selection::Reset(activity) => {
                tracing::debug!(
                    activity_id = %activity.id,
                    "All activities recently seen; starting over"
                );
            }
            Selection::Empty => {}
        }

        let chosen = selection.activity().cloned();
        if selection.requires_history_reset() {
            self.history.clear();
        }
        chosen
    }

    /// Record an interaction with the current wall-clock context.
    pub fn record(
        &mut self,
        activity_id: &str,
        kind: InteractionKind,
        rating: Option<u8>,
    ) -> Result<()> {
        self.record_with_context(activity_id, kind, rating, InteractionContext::now())
    }

    /// Record an interaction.
    ///
    /// The history and preferences update immediately; the remote writes run
    /// in the background and never fail this call. Errors here mean nothing
    /// was recorded: no user is signed in, or the rating is out of range.
    pub fn record_with_context(
        &mut self,
        activity_id: &str,
        kind: InteractionKind,
        rating: Option<u8>,
        context: InteractionContext,
    ) -> Result<()> {
        let user_id = self
            .user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or(AppError::NotSignedIn)?;

        let record = InteractionRecord {
            user_id: user_id.clone(),
            activity_id: activity_id.to_string(),
            interaction_type: kind,
            rating,
            context,
        };
        record
            .validate()
            .map_err(|errors| invalid_input(&errors, "Invalid interaction"))?;

        tracing::debug!(activity_id, kind = kind.as_str(), "Recording interaction");
        self.recorder.submit_interaction(record);
        self.history.push(activity_id);

        if kind == InteractionKind::Completed {
            self.reinforce(&user_id, activity_id);
        }
        Ok(())
    }

    /// Bump the preference of the completed activity's category.
    fn reinforce(&mut self, user_id: &str, activity_id: &str) {
        let Some(category) = self
            .catalog
            .iter()
            .find(|a| a.id == activity_id)
            .map(|a| a.category.clone())
        else {
            tracing::debug!(activity_id, "Completed activity not in catalog; no preference update");
            return;
        };

        let row = self.preferences.record_completion(user_id, &category);
        tracing::info!(
            category = %row.category,
            score = row.preference_score,
            completions = row.completion_count,
            "Preference reinforced"
        );
        self.recorder.submit_preference(row);
    }

    /// Wait for all in-flight remote writes.
    pub async fn flush(&mut self) -> WriteReport {
        self.recorder.flush().await
    }

    pub fn stats(&mut self) -> SessionStats {
        self.recorder.reap();
        SessionStats {
            activities: self.catalog.len(),
            interests: self.preferences.scores().len(),
            recent: self.history.len(),
            writes: self.recorder.report(),
        }
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<()> {
    credentials
        .validate()
        .map_err(|errors| invalid_input(&errors, "Invalid email or password"))
}

/// First rule message from `errors`, shown to the user as is.
fn invalid_input(errors: &ValidationErrors, fallback: &str) -> AppError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| fallback.to_string());
    AppError::InvalidInput(message)
}

/// Drop catalog rows that break the model's rules, keeping order.
fn valid_activities(rows: Vec<Activity>) -> Vec<Activity> {
    rows.into_iter()
        .filter(|activity| match activity.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(activity_id = %activity.id, error = %e, "Skipping invalid activity");
                false
            }
        })
        .collect()
}
