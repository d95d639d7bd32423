// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-session form state with a single outstanding submission.

use crate::models::registration::{NavigationTarget, SubmissionOutcome};
use crate::models::selection::{Field, Selection, SelectionError, TrainingMode};
use crate::services::catalog::resolve_cost;
use crate::services::submitter::{RegistrationStore, Submitter};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Price and legal options for the selection as it currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Quote {
    pub cost: u32,
    pub training_modes: Vec<TrainingMode>,
    /// Required fields still empty
    pub missing: Vec<Field>,
}

impl Quote {
    pub fn for_selection(selection: &Selection) -> Self {
        Self {
            cost: resolve_cost(selection),
            training_modes: selection.training_modes().to_vec(),
            missing: selection.missing_fields(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("a submission is already in progress")]
    AlreadySubmitting,

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// One user's form: the selection plus the "is submitting" gate.
///
/// The selection is cleared after a successful submission and kept as-is
/// after any failure so the user can correct it and resubmit.
#[derive(Debug, Default)]
pub struct RegistrationForm {
    selection: Selection,
    submitting: bool,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn update(&mut self, field: Field, value: &str) -> Result<(), FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        self.selection = self.selection.apply(field, value)?;
        Ok(())
    }

    pub fn quote(&self) -> Quote {
        Quote::for_selection(&self.selection)
    }

    /// Close the form for edits and hand out the selection to submit.
    pub fn begin_submit(&mut self) -> Result<Selection, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        self.submitting = true;
        Ok(self.selection.clone())
    }

    /// Reopen the form after an attempt finished.
    pub fn finish_submit(&mut self, result: &Result<SubmissionOutcome, SelectionError>) {
        self.submitting = false;
        if matches!(result, Ok(outcome) if outcome.is_success()) {
            self.selection = Selection::default();
        }
    }

    /// Run a whole submission through `submitter`.
    pub async fn submit<S: RegistrationStore>(
        &mut self,
        submitter: &Submitter<'_, S>,
        target: Option<NavigationTarget>,
    ) -> Result<SubmissionOutcome, FormError> {
        let selection = self.begin_submit()?;
        let result = {
            // Reopens the form even if this future is dropped mid-flight.
            let _reopen = Reopen(&mut self.submitting);
            submitter.submit(&selection, target).await
        };
        self.finish_submit(&result);
        Ok(result?)
    }
}

/// Clears a submitting flag when dropped.
struct Reopen<'a>(&'a mut bool);

impl Drop for Reopen<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
