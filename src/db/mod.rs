//! Data layer: the remote data/auth service seam.

pub mod mock;
pub mod supabase;

pub use mock::MockDataService;
pub use supabase::SupabaseClient;

use crate::error::Result;
use crate::models::{Activity, AuthUser, Credentials, InteractionRecord, PreferenceRow, Profile};
use async_trait::async_trait;

/// Table names as constants.
pub mod tables {
    pub const ACTIVITIES: &str = "activities";
    pub const USER_PREFERENCES: &str = "user_preferences";
    pub const ACTIVITY_INTERACTIONS: &str = "activity_interactions";
    pub const PROFILES: &str = "profiles";
}

/// Operations the session needs from the hosted data/auth service.
///
/// Implementations own whatever auth state the remote needs (e.g. the bearer
/// token obtained at sign-in) so callers only deal in domain types.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser>;

    /// Register a new account and sign it in.
    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthUser>;

    /// End the remote session.
    async fn sign_out(&self) -> Result<()>;

    /// Full activity catalog, in the order it should be presented.
    async fn fetch_catalog(&self) -> Result<Vec<Activity>>;

    /// All preference rows for `user_id`.
    async fn fetch_preferences(&self, user_id: &str) -> Result<Vec<PreferenceRow>>;

    /// Append one interaction row.
    async fn append_interaction(&self, record: &InteractionRecord) -> Result<()>;

    /// Insert or replace the row keyed by (user, category).
    async fn upsert_preference(&self, row: &PreferenceRow) -> Result<()>;

    /// Insert or replace a profile row.
    async fn upsert_profile(&self, profile: &Profile) -> Result<()>;
}
