// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Program listing, quoting, and registration submission.

use crate::error::{AppError, Result};
use crate::models::selection::empty_as_none;
use crate::models::{
    ActivityType, DraftSelection, NavigationTarget, ProgramCategory, Registration, Segment,
    Selection, SubmissionOutcome, TrainingMode,
};
use crate::services::{available_training_modes, Quote, Submitter};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use dashmap::DashSet;
use serde::Deserialize;
use std::sync::Arc;

/// Registration routes (public).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/programs", get(list_programs))
        .route("/api/training-modes", get(training_modes))
        .route("/api/quote", post(quote))
        .route("/api/registrations", post(register))
}

// ─── Catalog ─────────────────────────────────────────────────

/// List every program with its registration link.
async fn list_programs(State(state): State<Arc<AppState>>) -> Json<Vec<ProgramCategory>> {
    Json(state.catalog.programs())
}

#[derive(Deserialize)]
struct TrainingModesQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    activity_type: Option<ActivityType>,
    #[serde(default, deserialize_with = "empty_as_none")]
    segment: Option<Segment>,
}

/// Training modes the form may offer for an activity/segment pair.
async fn training_modes(
    WithRejection(Query(params), _): WithRejection<Query<TrainingModesQuery>, AppError>,
) -> Json<Vec<TrainingMode>> {
    Json(available_training_modes(params.activity_type, params.segment).to_vec())
}

/// Price and outstanding fields for a partial selection.
///
/// Unrecognized choices are ignored rather than rejected.
async fn quote(
    WithRejection(Json(draft), _): WithRejection<Json<DraftSelection>, AppError>,
) -> Json<Quote> {
    Json(Quote::for_selection(&Selection::from(draft)))
}

// ─── Submission ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationRequest {
    selection: Selection,
    /// Name of a browsing context the client already opened
    #[serde(default)]
    navigation_target: Option<NavigationTarget>,
}

/// Marks a returning user's email as in flight until dropped.
struct InFlight<'a> {
    set: &'a DashSet<String>,
    email: String,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a DashSet<String>, email: &str) -> Option<Self> {
        let email = email.trim().to_lowercase();
        set.insert(email.clone()).then(|| Self { set, email })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.email);
    }
}

/// Submit a completed selection.
///
/// Returns the registration link on success. Returning users get their
/// contact record stored first; if that fails no link is returned.
async fn register(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<RegistrationRequest>, AppError>,
) -> Result<Json<Registration>> {
    let selection = request.selection;

    let _guard = match selection.email.as_deref() {
        Some(email) if selection.is_returning() => Some(
            InFlight::acquire(&state.in_flight, email).ok_or_else(|| {
                AppError::Conflict("A registration for this email is already in progress".to_string())
            })?,
        ),
        _ => None,
    };

    let submitter = Submitter::new(&state.catalog, &state.db);
    match submitter.submit(&selection, request.navigation_target).await? {
        SubmissionOutcome::Success(registration) => Ok(Json(registration)),
        SubmissionOutcome::NotFound { key } => Err(AppError::NotFound(format!(
            "No registration link for {}",
            key
        ))),
        SubmissionOutcome::PersistenceFailed(reason) => Err(AppError::Persistence(reason)),
    }
}
