// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Background remote writes for interactions and preference upserts.
//!
//! Writes are spawned as tasks so the selection loop never waits on the
//! network. Interaction appends are independent and may land out of order.
//! Preference upserts carry absolute scores, so each one waits for the
//! previous upsert to settle before it is sent. Failures are retried per the
//! [`RetryPolicy`], then logged and counted.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinSet};

use crate::db::DataService;
use crate::error::Result;
use crate::models::{InteractionRecord, PreferenceRow};
use crate::services::retry::{retry_with_backoff, RetryPolicy};

/// Which kind of write a task performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Interaction,
    Preference,
}

impl WriteKind {
    fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Interaction => "append_interaction",
            WriteKind::Preference => "upsert_preference",
        }
    }
}

struct WriteOutcome {
    kind: WriteKind,
    result: Result<()>,
}

/// Running totals for remote writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub succeeded: u32,
    /// Writes that ran out of attempts or failed permanently.
    pub failed: u32,
    /// Writes still in flight.
    pub pending: usize,
}

/// Owner of in-flight remote writes.
pub struct InteractionRecorder {
    service: Arc<dyn DataService>,
    policy: RetryPolicy,
    pending: JoinSet<WriteOutcome>,
    /// Fires when the most recently submitted preference upsert settles.
    preference_tail: Option<oneshot::Receiver<()>>,
    succeeded: u32,
    failed: u32,
}

impl InteractionRecorder {
    pub fn new(service: Arc<dyn DataService>, policy: RetryPolicy) -> Self {
        Self {
            service,
            policy,
            pending: JoinSet::new(),
            preference_tail: None,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Spawn the append of `record`. Must be called within a Tokio runtime.
    pub fn submit_interaction(&mut self, record: InteractionRecord) {
        let service = Arc::clone(&self.service);
        let policy = self.policy;
        self.pending.spawn(async move {
            let result = retry_with_backoff(&policy, WriteKind::Interaction.as_str(), || {
                service.append_interaction(&record)
            })
            .await;
            WriteOutcome {
                kind: WriteKind::Interaction,
                result,
            }
        });
        self.reap();
    }

    /// Spawn the upsert of `row`, ordered after earlier upserts. Must be
    /// called within a Tokio runtime.
    pub fn submit_preference(&mut self, row: PreferenceRow) {
        let service = Arc::clone(&self.service);
        let policy = self.policy;
        let previous = self.preference_tail.take();
        let (done_tx, done_rx) = oneshot::channel();
        self.preference_tail = Some(done_rx);

        self.pending.spawn(async move {
            if let Some(previous) = previous {
                // Err means the earlier task was aborted; nothing to wait for.
                let _ = previous.await;
            }
            let result = retry_with_backoff(&policy, WriteKind::Preference.as_str(), || {
                service.upsert_preference(&row)
            })
            .await;
            let _ = done_tx.send(());
            WriteOutcome {
                kind: WriteKind::Preference,
                result,
            }
        });
        self.reap();
    }

    /// Collect writes that have already finished, without waiting.
    pub fn reap(&mut self) {
        while let Some(joined) = self.pending.try_join_next() {
            self.settle(joined);
        }
    }

    /// Wait for every in-flight write to finish.
    pub async fn flush(&mut self) -> WriteReport {
        while let Some(joined) = self.pending.join_next().await {
            self.settle(joined);
        }
        self.report()
    }

    /// Abort every in-flight write. Returns how many were still pending.
    ///
    /// Used on sign-out so a previous user's writes cannot land later.
    pub async fn cancel_all(&mut self) -> usize {
        self.reap();
        let cancelled = self.pending.len();
        self.preference_tail = None;
        self.pending.shutdown().await;
        if cancelled > 0 {
            tracing::info!(cancelled, "Cancelled pending remote writes");
        }
        cancelled
    }

    pub fn report(&self) -> WriteReport {
        WriteReport {
            succeeded: self.succeeded,
            failed: self.failed,
            pending: self.pending.len(),
        }
    }

    pub fn reset_counters(&mut self) {
        self.succeeded = 0;
        self.failed = 0;
    }

    fn settle(&mut self, joined: std::result::Result<WriteOutcome, JoinError>) {
        match joined {
            Ok(WriteOutcome { result: Ok(()), .. }) => self.succeeded += 1,
            Ok(WriteOutcome {
                kind,
                result: Err(err),
            }) => {
                self.failed += 1;
                tracing::error!(write = kind.as_str(), error = %err, "Remote write failed");
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                self.failed += 1;
                tracing::error!(error = %err, "Remote write task panicked");
            }
        }
    }
}
