// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

/// Application error type shared by the data layer and the session.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The remote call did not complete (transport error, timeout, 5xx, 429).
    #[error("Network failure: {0}")]
    Network(String),

    /// Bad credentials or an expired/invalid session token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether retrying the same call may succeed.
    ///
    /// Only network failures are retried; auth and lookup failures will not
    /// change on their own.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Network(_))
    }

    /// Message shown to the user when an auth operation fails.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(msg) if msg.is_empty() => "Invalid email or password".to_string(),
            AppError::Auth(msg) => msg.clone(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            AppError::NotSignedIn => "Please sign in first".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, AppError>;
