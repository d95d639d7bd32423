// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration submission: validate, store returning-user contact details,
//! then resolve the registration link.
//!
//! Persistence and resolution are sequential gates. A failed write stops the
//! attempt before any link is handed out, so a returning user's details are
//! never silently skipped. Nothing is retried here; every failure goes back
//! to the caller once.

use crate::models::registration::{
    Navigation, NavigationTarget, Registration, ReturningUserRecord, SubmissionOutcome,
};
use crate::models::selection::{Selection, SelectionError};
use crate::services::catalog::{resolve_cost, ProgramCatalog};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// Durable storage for returning-user records.
pub trait RegistrationStore: Send + Sync {
    /// Insert one record. Called at most once per submission.
    fn persist(
        &self,
        record: &ReturningUserRecord,
    ) -> impl Future<Output = Result<(), PersistError>> + Send;
}

impl<S: RegistrationStore + ?Sized> RegistrationStore for &S {
    fn persist(
        &self,
        record: &ReturningUserRecord,
    ) -> impl Future<Output = Result<(), PersistError>> + Send {
        (**self).persist(record)
    }
}

impl<S: RegistrationStore + ?Sized> RegistrationStore for Arc<S> {
    fn persist(
        &self,
        record: &ReturningUserRecord,
    ) -> impl Future<Output = Result<(), PersistError>> + Send {
        (**self).persist(record)
    }
}

/// A failed write to the registration store.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("{0}")]
    Store(String),

    #[error("write timed out after {0:?}")]
    Timeout(Duration),
}

/// Progress of a single submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    PersistingIfReturning,
    Resolving,
    Navigating,
    Failed,
}

impl SubmitPhase {
    /// Whether `next` may follow `self`.
    pub fn can_advance_to(self, next: SubmitPhase) -> bool {
        use SubmitPhase::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, PersistingIfReturning | Resolving | Failed)
                | (PersistingIfReturning, Resolving | Failed)
                | (Resolving, Navigating | Failed)
        )
    }
}

/// Tracks and logs the phase of one attempt.
#[derive(Debug)]
struct Attempt {
    phase: SubmitPhase,
}

impl Attempt {
    fn start() -> Self {
        Self {
            phase: SubmitPhase::Idle,
        }
    }

    fn advance(&mut self, next: SubmitPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal submit transition {:?} -> {:?}",
            self.phase,
            next
        );
        tracing::debug!(from = ?self.phase, to = ?next, "Submission phase");
        self.phase = next;
    }
}

/// Runs submissions against a catalog and a registration store.
pub struct Submitter<'a, S> {
    catalog: &'a ProgramCatalog,
    store: S,
}

impl<'a, S: RegistrationStore> Submitter<'a, S> {
    pub fn new(catalog: &'a ProgramCatalog, store: S) -> Self {
        Self { catalog, store }
    }

    /// Run one submission attempt.
    ///
    /// Validation failures are returned as `Err` before the store is
    /// touched. Everything after validation is reported as a
    /// [`SubmissionOutcome`]. When `target` is given the successful outcome
    /// redirects that context instead of opening a new one.
    pub async fn submit(
        &self,
        selection: &Selection,
        target: Option<NavigationTarget>,
    ) -> Result<SubmissionOutcome, SelectionError> {
        let mut attempt = Attempt::start();
        attempt.advance(SubmitPhase::Validating);

        let validated = selection.complete().and_then(|complete| {
            let record = complete.returning_record(chrono::Utc::now());
            if let Some(record) = &record {
                record.validate()?;
            }
            Ok((complete, record))
        });
        let (complete, record) = match validated {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(error = %err, "Submission rejected");
                attempt.advance(SubmitPhase::Failed);
                return Err(err);
            }
        };

        if let Some(record) = record {
            attempt.advance(SubmitPhase::PersistingIfReturning);
            if let Err(err) = self.store.persist(&record).await {
                tracing::warn!(
                    error = %err,
                    email_domain = record.email_domain(),
                    "Failed to store returning user"
                );
                attempt.advance(SubmitPhase::Failed);
                return Ok(SubmissionOutcome::PersistenceFailed(err.to_string()));
            }
            tracing::info!(
                email_domain = record.email_domain(),
                track = %record.track,
                "Stored returning user"
            );
        }

        attempt.advance(SubmitPhase::Resolving);
        let Some(url) = self.catalog.lookup(&complete.key) else {
            tracing::info!(key = %complete.key, "No program for selection");
            attempt.advance(SubmitPhase::Failed);
            return Ok(SubmissionOutcome::NotFound { key: complete.key });
        };

        attempt.advance(SubmitPhase::Navigating);
        let cost = resolve_cost(selection);
        tracing::info!(key = %complete.key, cost, "Registration resolved");

        Ok(SubmissionOutcome::Success(Registration {
            url: url.to_string(),
            cost,
            navigation: Navigation::to(url, target),
        }))
    }
}
