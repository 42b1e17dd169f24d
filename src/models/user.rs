//! User and auth models.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Opaque user identifier issued by the auth service.
pub type UserId = String;

/// Email/password pair submitted on sign-in or sign-up.
#[derive(Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated user returned by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

/// Profile row created on sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub onboarding_completed: bool,
    /// Free-form client settings
    pub preferences: serde_json::Value,
}

impl Profile {
    /// Fresh profile for a newly registered user.
    pub fn new_for(user_id: &str) -> Self {
        Self {
            id: user_id.to_string(),
            onboarding_completed: false,
            preferences: serde_json::json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("a@example.com", "secret1").validate().is_ok());
        assert!(Credentials::new("not-an-email", "secret1").validate().is_err());
        assert!(Credentials::new("a@example.com", "short").validate().is_err());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("a@example.com", "hunter22"));
        assert!(!rendered.contains("hunter22"));
    }
}
