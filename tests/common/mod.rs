// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_deck::db::MockDataService;
use activity_deck::models::{Activity, Credentials, PreferenceRow};
use activity_deck::services::RetryPolicy;
use activity_deck::Session;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_EMAIL: &str = "swiper@example.com";
pub const TEST_PASSWORD: &str = "correct horse";
pub const TEST_USER_ID: &str = "user-abc";

/// Build a minimal valid activity.
#[allow(dead_code)]
pub fn activity(id: &str, category: &str) -> Activity {
    Activity {
        id: id.to_string(),
        category: category.to_string(),
        title: format!("Test Activity {}", id),
        description: "Something to do".to_string(),
        duration_minutes: 15,
        energy_level: 3,
        location_type: Some("anywhere".to_string()),
        image_url: None,
    }
}

/// Catalog with one activity per category, in a fixed order.
#[allow(dead_code)]
pub fn sample_catalog() -> Vec<Activity> {
    [
        ("run", "exercise"),
        ("brunch", "food"),
        ("call-friend", "social"),
        ("sketch", "creative"),
        ("stretch", "recovery"),
        ("inbox-zero", "productivity"),
        ("duolingo", "learning"),
        ("hike", "outdoor"),
    ]
    .into_iter()
    .map(|(id, category)| activity(id, category))
    .collect()
}

#[allow(dead_code)]
pub fn preference_row(category: &str, score: f64, count: u32) -> PreferenceRow {
    PreferenceRow {
        user_id: TEST_USER_ID.to_string(),
        category: category.to_string(),
        preference_score: score,
        completion_count: count,
    }
}

#[allow(dead_code)]
pub fn credentials() -> Credentials {
    Credentials::new(TEST_EMAIL, TEST_PASSWORD)
}

/// Retry quickly so failure tests stay fast.
#[allow(dead_code)]
pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(4),
    }
}

/// Mock service with the test account and the given catalog.
#[allow(dead_code)]
pub fn mock_service(catalog: Vec<Activity>) -> Arc<MockDataService> {
    Arc::new(
        MockDataService::new()
            .with_account(TEST_EMAIL, TEST_PASSWORD, TEST_USER_ID)
            .with_catalog(catalog),
    )
}

/// Session already signed in against `service`.
#[allow(dead_code)]
pub async fn signed_in_session(service: &Arc<MockDataService>) -> Session {
    let mut session = Session::new(service.clone(), fast_retry(3));
    session
        .sign_in(&credentials())
        .await
        .expect("Test account should sign in");
    session
}
