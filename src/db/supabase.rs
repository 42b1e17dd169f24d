// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST client for the hosted data/auth service.
//!
//! Handles:
//! - Email/password auth (sign-in, sign-up, sign-out)
//! - Catalog and preference reads
//! - Interaction appends and preference/profile upserts
//! - Mapping HTTP status codes onto the error taxonomy

use crate::config::Config;
use crate::db::{tables, DataService};
use crate::error::{AppError, Result};
use crate::models::{Activity, AuthUser, Credentials, InteractionRecord, PreferenceRow, Profile};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::RwLock;

/// PostgREST preference header for insert-or-update.
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=minimal";
const PREFER_MINIMAL: &str = "return=minimal";

/// Client for the hosted project's REST and auth endpoints.
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    /// Bearer token for the signed-in user, if any.
    access_token: RwLock<Option<String>>,
}

impl SupabaseClient {
    /// Create a client for the configured project.
    ///
    /// Every request is bounded by `config.request_timeout()`.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client setup: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            access_token: RwLock::new(None),
        })
    }

    /// Whether a user session token is currently held.
    pub fn has_session(&self) -> bool {
        self.bearer_token_opt().is_some()
    }

    fn bearer_token_opt(&self) -> Option<String> {
        self.access_token
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    /// Bearer for REST calls: the user token, or the anon key when signed out.
    fn bearer_token(&self) -> String {
        self.bearer_token_opt()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn store_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.access_token.write() {
            *guard = token;
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer_token())
    }

    /// GET rows from a table with PostgREST query parameters.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .request(reqwest::Method::GET, &self.rest_url(table))
            .query(query)
            .send()
            .await?;

        check_response_json(response, Endpoint::Rest).await
    }

    /// POST a JSON body to a table.
    async fn insert<B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, &str)],
        prefer: &str,
        body: &B,
    ) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, &self.rest_url(table))
            .query(query)
            .header("Prefer", prefer)
            .json(body)
            .send()
            .await?;

        check_response(response, Endpoint::Rest).await
    }

    /// Exchange a token grant and remember the resulting session.
    async fn establish_session(&self, url: &str, credentials: &Credentials) -> Result<AuthUser> {
        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(credentials)
            .send()
            .await?;

        let body: serde_json::Value = check_response_json(response, Endpoint::Auth).await?;
        let grant = AuthGrant::from_body(body)?;
        self.store_token(grant.access_token);
        Ok(grant.user)
    }
}

#[async_trait]
impl DataService for SupabaseClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser> {
        let url = format!("{}?grant_type=password", self.auth_url("token"));
        let user = self.establish_session(&url, credentials).await?;
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthUser> {
        let user = self
            .establish_session(&self.auth_url("signup"), credentials)
            .await?;
        tracing::info!(
            user_id = %user.id,
            has_session = self.has_session(),
            "Signed up"
        );
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        let Some(token) = self.bearer_token_opt() else {
            return Ok(());
        };
        // The local token is dropped even if the remote call fails.
        self.store_token(None);

        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        check_response(response, Endpoint::Auth).await
    }

    async fn fetch_catalog(&self) -> Result<Vec<Activity>> {
        let rows: Vec<serde_json::Value> = self
            .select(
                tables::ACTIVITIES,
                &[
                    ("select", "*".to_string()),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await?;

        let total = rows.len();
        let activities: Vec<Activity> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Activity>(row) {
                Ok(activity) => Some(activity),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable catalog row");
                    None
                }
            })
            .collect();

        tracing::debug!(total, decoded = activities.len(), "Fetched catalog");
        Ok(activities)
    }

    async fn fetch_preferences(&self, user_id: &str) -> Result<Vec<PreferenceRow>> {
        let rows: Vec<serde_json::Value> = self
            .select(
                tables::USER_PREFERENCES,
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                ],
            )
            .await?;

        let total = rows.len();
        let preferences: Vec<PreferenceRow> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<PreferenceRow>(row) {
                Ok(preference) => Some(preference),
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "Skipping undecodable preference row");
                    None
                }
            })
            .collect();

        tracing::debug!(user_id, total, decoded = preferences.len(), "Fetched preferences");
        Ok(preferences)
    }

    async fn append_interaction(&self, record: &InteractionRecord) -> Result<()> {
        self.insert(tables::ACTIVITY_INTERACTIONS, &[], PREFER_MINIMAL, record)
            .await
    }

    async fn upsert_preference(&self, row: &PreferenceRow) -> Result<()> {
        self.insert(
            tables::USER_PREFERENCES,
            &[("on_conflict", "user_id,category")],
            PREFER_UPSERT,
            row,
        )
        .await
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        self.insert(tables::PROFILES, &[], PREFER_UPSERT, profile)
            .await
    }
}

/// Which API family a response came from; they report bad input differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Auth,
    Rest,
}

/// Map a non-success status onto the error taxonomy.
fn error_for_status(status: StatusCode, body: &str, endpoint: Endpoint) -> AppError {
    let message = extract_error_message(body).unwrap_or_else(|| format!("HTTP {}", status));

    match status.as_u16() {
        401 | 403 => AppError::Auth(message),
        400 | 422 if endpoint == Endpoint::Auth => AppError::Auth(message),
        404 => AppError::NotFound(message),
        408 | 429 => {
            tracing::warn!(status = status.as_u16(), "Remote asked us to back off");
            AppError::Network(message)
        }
        500..=599 => AppError::Network(format!("HTTP {}: {}", status, message)),
        _ => AppError::InvalidInput(message),
    }
}

/// Pull a readable message out of an auth or PostgREST error body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response, endpoint: Endpoint) -> Result<()> {
    if response.status().is_success() {
        return Ok(());
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, &body, endpoint))
}

/// Check response and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
    endpoint: Endpoint,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(error_for_status(status, &body, endpoint));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Decode(e.to_string()))
}

/// Token grant response; sign-up without auto-confirm returns the bare user.
#[derive(Debug, Deserialize)]
struct AuthGrant {
    access_token: Option<String>,
    user: AuthUser,
}

impl AuthGrant {
    fn from_body(body: serde_json::Value) -> Result<Self> {
        if body.get("user").is_some() {
            return serde_json::from_value(body).map_err(|e| AppError::Decode(e.to_string()));
        }

        let user: AuthUser =
            serde_json::from_value(body).map_err(|e| AppError::Decode(e.to_string()))?;
        Ok(Self {
            access_token: None,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let auth_400 = error_for_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
            Endpoint::Auth,
        );
        assert!(matches!(auth_400, AppError::Auth(ref m) if m == "Invalid login credentials"));

        let rest_400 = error_for_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":"bad column"}"#,
            Endpoint::Rest,
        );
        assert!(matches!(rest_400, AppError::InvalidInput(_)));

        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "", Endpoint::Rest),
            AppError::NotFound(_)
        ));
        assert!(error_for_status(StatusCode::SERVICE_UNAVAILABLE, "", Endpoint::Rest).is_transient());
        assert!(error_for_status(StatusCode::TOO_MANY_REQUESTS, "", Endpoint::Rest).is_transient());
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, r#"{"msg":"JWT expired"}"#, Endpoint::Rest),
            AppError::Auth(ref m) if m == "JWT expired"
        ));
    }

    #[test]
    fn test_grant_with_session() {
        let grant = AuthGrant::from_body(serde_json::json!({
            "access_token": "tok",
            "token_type": "bearer",
            "user": { "id": "u1", "email": "a@example.com" }
        }))
        .unwrap();
        assert_eq!(grant.access_token.as_deref(), Some("tok"));
        assert_eq!(grant.user.id, "u1");
    }

    #[test]
    fn test_grant_bare_user_from_unconfirmed_signup() {
        let grant = AuthGrant::from_body(serde_json::json!({
            "id": "u2",
            "email": "b@example.com",
            "confirmation_sent_at": "2024-01-15T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(grant.access_token, None);
        assert_eq!(grant.user.id, "u2");
    }
}
