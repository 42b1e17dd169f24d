// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Deck terminal client.
//!
//! Signs in against the hosted service and runs the swipe loop on stdin:
//!
//! ```text
//! right | left | up | done [rating] | skip | stats | quit
//! ```

use activity_deck::{
    config::Config,
    db::SupabaseClient,
    models::{Activity, Credentials, InteractionKind},
    Session,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(url = %config.supabase_url, "Starting Activity Deck");

    let service = Arc::new(SupabaseClient::new(&config)?);
    let mut session = Session::new(service, config.retry_policy());

    let credentials = Credentials::new(
        std::env::var("DECK_EMAIL").unwrap_or_default(),
        std::env::var("DECK_PASSWORD").unwrap_or_default(),
    );
    let signing_up = std::env::var("DECK_SIGN_UP").is_ok_and(|v| v == "1" || v == "true");

    let auth = if signing_up {
        session.sign_up(&credentials).await
    } else {
        session.sign_in(&credentials).await
    };
    if let Err(e) = auth {
        eprintln!("{}", e.user_message());
        return Ok(());
    }

    run_loop(&mut session).await?;

    let report = session.flush().await;
    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "Remote writes settled"
    );
    session.sign_out().await;
    Ok(())
}

/// Present cards and forward commands until `quit` or end of input.
async fn run_loop(session: &mut Session) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current = session.next_activity();
    // Card swiped right; `done` and `skip` apply to it.
    let mut awaiting_outcome: Option<Activity> = None;

    show(current.as_ref());

    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("");

        let swipe = match command {
            "right" => Some(InteractionKind::SwipedRight),
            "left" => Some(InteractionKind::SwipedLeft),
            "up" => Some(InteractionKind::Saved),
            "done" | "skip" => {
                let Some(activity) = awaiting_outcome.as_ref() else {
                    println!("Swipe right on a card first.");
                    continue;
                };
                let (kind, rating) = match parse_outcome(command, words.next()) {
                    Ok(outcome) => outcome,
                    Err(message) => {
                        println!("{}", message);
                        continue;
                    }
                };
                // Keep the card pending until the outcome is accepted.
                match session.record(&activity.id, kind, rating) {
                    Ok(()) => awaiting_outcome = None,
                    Err(e) => println!("{}", e.user_message()),
                }
                continue;
            }
            "stats" => {
                let stats = session.stats();
                println!(
                    "{} activities · {} interests · {} recent · {} failed writes",
                    stats.activities, stats.interests, stats.recent, stats.writes.failed
                );
                continue;
            }
            "quit" | "q" => break,
            "" => continue,
            other => {
                println!("Unknown command: {}", other);
                continue;
            }
        };

        let (Some(kind), Some(activity)) = (swipe, current.take()) else {
            println!("No activity to swipe.");
            continue;
        };

        if let Err(e) = session.record(&activity.id, kind, None) {
            println!("{}", e.user_message());
        }
        if kind == InteractionKind::SwipedRight {
            println!("Did you complete \"{}\"? (done [1-5] / skip)", activity.title);
            awaiting_outcome = Some(activity);
        }

        current = session.next_activity();
        show(current.as_ref());
    }

    Ok(())
}

/// Outcome for a right-swiped card: `done [rating]` or `skip`.
///
/// A missing rating is recorded as none given.
fn parse_outcome(
    command: &str,
    rating: Option<&str>,
) -> Result<(InteractionKind, Option<u8>), String> {
    match (command, rating) {
        ("skip", _) => Ok((InteractionKind::Skipped, None)),
        ("done", None) => Ok((InteractionKind::Completed, None)),
        ("done", Some(raw)) => raw
            .parse()
            .map(|r| (InteractionKind::Completed, Some(r)))
            .map_err(|_| format!("Rating must be a number from 1 to 5, got {:?}", raw)),
        (other, _) => Err(format!("Unknown command: {}", other)),
    }
}

fn show(activity: Option<&Activity>) {
    match activity {
        Some(a) => {
            println!();
            println!("[{}] {}", a.category, a.title);
            if !a.description.is_empty() {
                println!("  {}", a.description);
            }
            println!(
                "  {} min · energy {}/5{}",
                a.duration_minutes,
                a.energy_level,
                a.location_type
                    .as_deref()
                    .map(|l| format!(" · {}", l))
                    .unwrap_or_default()
            );
        }
        None => println!("No activities available."),
    }
}

/// Initialize structured JSON logging on stderr; stdout carries the cards.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("activity_deck=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
