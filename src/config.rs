//! Client configuration loaded from environment variables.
//!
//! The anon key is a public client key; it identifies the project to the
//! hosted service and carries no privileges beyond row-level policies.

use crate::services::retry::RetryPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted project (e.g. `https://xyz.supabase.co`)
    pub supabase_url: String,
    /// Public anon key sent as the `apikey` header
    pub supabase_anon_key: String,
    /// Timeout applied to every remote call
    pub request_timeout_secs: u64,

    // --- Interaction write retry policy ---
    /// Maximum attempts for a single interaction write (first try included)
    pub write_max_attempts: u32,
    /// Delay before the second attempt; doubles afterwards
    pub write_initial_backoff_ms: u64,
    /// Upper bound on the delay between attempts
    pub write_max_backoff_ms: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test_anon_key".to_string(),
            request_timeout_secs: 10,
            write_max_attempts: 4,
            write_initial_backoff_ms: 250,
            write_max_backoff_ms: 4000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 10)?,
            write_max_attempts: parse_or("WRITE_MAX_ATTEMPTS", 4)?,
            write_initial_backoff_ms: parse_or("WRITE_INITIAL_BACKOFF_MS", 250)?,
            write_max_backoff_ms: parse_or("WRITE_MAX_BACKOFF_MS", 4000)?,
        })
    }

    /// Timeout for a single remote request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retry policy for remote writes.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.write_max_attempts.max(1),
            initial_backoff: Duration::from_millis(self.write_initial_backoff_ms),
            max_backoff: Duration::from_millis(self.write_max_backoff_ms),
        }
    }
}

/// Read an optional variable, falling back to `default` when unset.
fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases touch process-wide env vars, so they run as one test.
    #[test]
    fn test_config_from_env() {
        env::set_var("SUPABASE_URL", "https://example.supabase.co/");
        env::set_var("SUPABASE_ANON_KEY", " anon ");
        env::remove_var("REQUEST_TIMEOUT_SECS");
        env::set_var("WRITE_MAX_ATTEMPTS", "6");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.supabase_url, "https://example.supabase.co");
        assert_eq!(config.supabase_anon_key, "anon");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.write_max_attempts, 6);

        env::set_var("WRITE_MAX_ATTEMPTS", "lots");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("WRITE_MAX_ATTEMPTS", _)));

        env::remove_var("WRITE_MAX_ATTEMPTS");
    }

    #[test]
    fn test_retry_policy_never_zero_attempts() {
        let config = Config {
            write_max_attempts: 0,
            ..Config::default()
        };
        assert_eq!(config.retry_policy().max_attempts, 1);
    }
}
