//! In-memory stand-in for the hosted service.
//!
//! Used by tests. Supports failure injection for the
//! degrade-to-empty and retry paths.

use crate::db::DataService;
use crate::error::{AppError, Result};
use crate::models::{Activity, AuthUser, Credentials, InteractionRecord, PreferenceRow, Profile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Default)]
struct MockState {
    /// email -> (password, user id)
    accounts: HashMap<String, (String, String)>,
    signed_in: Option<String>,
    catalog: Vec<Activity>,
    preferences: Vec<PreferenceRow>,
    interactions: Vec<InteractionRecord>,
    profiles: Vec<Profile>,
    append_attempts: u32,
    /// Remaining appends that fail with a network error.
    failing_appends: u32,
    /// Remaining preference upserts that fail with a network error.
    failing_upserts: u32,
    sign_out_calls: u32,
    failing_loads: bool,
    offline: bool,
    write_delay: Option<Duration>,
}

/// Offline data service backed by in-process collections.
#[derive(Default)]
pub struct MockDataService {
    state: Mutex<MockState>,
}

impl MockDataService {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide state from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_account(self, email: &str, password: &str, user_id: &str) -> Self {
        self.state().accounts.insert(
            email.to_string(),
            (password.to_string(), user_id.to_string()),
        );
        self
    }

    pub fn with_catalog(self, catalog: Vec<Activity>) -> Self {
        self.state().catalog = catalog;
        self
    }

    pub fn with_preferences(self, rows: Vec<PreferenceRow>) -> Self {
        self.state().preferences = rows;
        self
    }

    /// Make the next `count` interaction appends fail with a network error.
    pub fn fail_next_appends(&self, count: u32) {
        self.state().failing_appends = count;
    }

    /// Make the next `count` preference upserts fail with a network error.
    pub fn fail_next_upserts(&self, count: u32) {
        self.state().failing_upserts = count;
    }

    /// Fail catalog and preference reads while set; auth still works.
    pub fn set_failing_loads(&self, failing: bool) {
        self.state().failing_loads = failing;
    }

    /// Fail every call with a network error while set.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Delay every write by `delay` before it lands.
    pub fn set_write_delay(&self, delay: Duration) {
        self.state().write_delay = Some(delay);
    }

    pub fn interactions(&self) -> Vec<InteractionRecord> {
        self.state().interactions.clone()
    }

    pub fn preference_rows(&self) -> Vec<PreferenceRow> {
        self.state().preferences.clone()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.state().profiles.clone()
    }

    /// User the service currently considers signed in.
    pub fn signed_in_user(&self) -> Option<String> {
        self.state().signed_in.clone()
    }

    /// Remote sign-outs requested so far.
    pub fn sign_out_calls(&self) -> u32 {
        self.state().sign_out_calls
    }

    /// Appends attempted so far, failed ones included.
    pub fn append_attempts(&self) -> u32 {
        self.state().append_attempts
    }

    fn check_online(&self) -> Result<()> {
        if self.state().offline {
            return Err(AppError::Network("mock service offline".to_string()));
        }
        Ok(())
    }

    fn check_loads(&self) -> Result<()> {
        self.check_online()?;
        if self.state().failing_loads {
            return Err(AppError::Network("injected load failure".to_string()));
        }
        Ok(())
    }

    async fn delay_write(&self) {
        let delay = self.state().write_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DataService for MockDataService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser> {
        self.check_online()?;
        let mut state = self.state();
        let user_id = match state.accounts.get(&credentials.email) {
            Some((password, user_id)) if *password == credentials.password => user_id.clone(),
            _ => return Err(AppError::Auth("Invalid login credentials".to_string())),
        };
        state.signed_in = Some(user_id.clone());
        Ok(AuthUser {
            id: user_id,
            email: Some(credentials.email.clone()),
        })
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthUser> {
        self.check_online()?;
        let mut state = self.state();
        if state.accounts.contains_key(&credentials.email) {
            return Err(AppError::Auth("User already registered".to_string()));
        }
        let user_id = format!("user-{}", state.accounts.len() + 1);
        state.accounts.insert(
            credentials.email.clone(),
            (credentials.password.clone(), user_id.clone()),
        );
        state.signed_in = Some(user_id.clone());
        Ok(AuthUser {
            id: user_id,
            email: Some(credentials.email.clone()),
        })
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.state();
        state.sign_out_calls += 1;
        state.signed_in = None;
        Ok(())
    }

    async fn fetch_catalog(&self) -> Result<Vec<Activity>> {
        self.check_loads()?;
        Ok(self.state().catalog.clone())
    }

    async fn fetch_preferences(&self, user_id: &str) -> Result<Vec<PreferenceRow>> {
        self.check_loads()?;
        Ok(self
            .state()
            .preferences
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append_interaction(&self, record: &InteractionRecord) -> Result<()> {
        self.delay_write().await;
        let mut state = self.state();
        state.append_attempts += 1;
        if state.offline {
            return Err(AppError::Network("mock service offline".to_string()));
        }
        if state.failing_appends > 0 {
            state.failing_appends -= 1;
            return Err(AppError::Network("injected append failure".to_string()));
        }
        state.interactions.push(record.clone());
        Ok(())
    }

    async fn upsert_preference(&self, row: &PreferenceRow) -> Result<()> {
        self.delay_write().await;
        self.check_online()?;
        let mut state = self.state();
        if state.failing_upserts > 0 {
            state.failing_upserts -= 1;
            return Err(AppError::Network("injected upsert failure".to_string()));
        }
        match state
            .preferences
            .iter()
            .position(|r| r.user_id == row.user_id && r.category == row.category)
        {
            Some(index) => state.preferences[index] = row.clone(),
            None => state.preferences.push(row.clone()),
        }
        Ok(())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        self.check_online()?;
        let mut state = self.state();
        state.profiles.retain(|p| p.id != profile.id);
        state.profiles.push(profile.clone());
        Ok(())
    }
}
