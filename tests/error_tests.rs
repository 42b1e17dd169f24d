// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_deck::error::AppError;

#[test]
fn test_only_network_failures_are_transient() {
    assert!(AppError::Network("timeout".into()).is_transient());

    assert!(!AppError::Auth("JWT expired".into()).is_transient());
    assert!(!AppError::NotFound("activities".into()).is_transient());
    assert!(!AppError::InvalidInput("bad column".into()).is_transient());
    assert!(!AppError::Decode("missing field".into()).is_transient());
    assert!(!AppError::NotSignedIn.is_transient());
}

#[test]
fn test_user_messages() {
    assert_eq!(
        AppError::Auth("Invalid login credentials".into()).user_message(),
        "Invalid login credentials"
    );
    assert_eq!(
        AppError::Auth(String::new()).user_message(),
        "Invalid email or password"
    );
    assert_eq!(
        AppError::InvalidInput("Password must be at least 6 characters".into()).user_message(),
        "Password must be at least 6 characters"
    );
    assert_eq!(AppError::NotSignedIn.user_message(), "Please sign in first");
    assert!(AppError::Network("connection refused".into())
        .user_message()
        .contains("connection"));
}

#[test]
fn test_internal_details_not_shown_to_user() {
    let err: AppError = anyhow::anyhow!("pool exhausted at 0x7f").into();
    assert!(err.to_string().contains("pool exhausted"));
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");

    let decode = AppError::Decode("expected u8 at line 1".into());
    assert!(!decode.user_message().contains("line 1"));
}
