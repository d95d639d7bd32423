// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Submission records and outcomes.

use crate::models::program::ProgramKey;
use crate::models::selection::{
    ActivityType, CoachPreference, ReturningContact, Segment, Track, TrainingMode,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Contact record stored in Firestore for a returning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReturningUserRecord {
    #[validate(custom(function = "validate_contact_email"))]
    pub email: String,
    pub coach_preference: CoachPreference,
    pub track: Track,
    pub activity_type: ActivityType,
    pub segment: Segment,
    pub training_mode: TrainingMode,
    /// When the form was submitted (RFC3339, UTC)
    pub created_at: String,
}

impl ReturningUserRecord {
    pub fn new(key: &ProgramKey, contact: &ReturningContact, created_at: DateTime<Utc>) -> Self {
        Self {
            email: contact.email.clone(),
            coach_preference: contact.coach_preference,
            track: key.track,
            activity_type: key.activity_type,
            segment: key.segment,
            training_mode: key.training_mode,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Domain part of the email, safe to put in logs.
    pub fn email_domain(&self) -> &str {
        self.email
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("")
    }
}

/// Require a `local@domain.tld` shaped address.
fn validate_contact_email(email: &str) -> Result<(), ValidationError> {
    let dotted_domain = email.rsplit_once('@').is_some_and(|(_, domain)| {
        domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
    });

    if email.validate_email() && dotted_domain {
        Ok(())
    } else {
        Err(ValidationError::new("email")
            .with_message("expected an address like name@example.com".into()))
    }
}

/// Browsing context the client pre-opened and wants redirected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(transparent)]
pub struct NavigationTarget(pub String);

/// How the client should reach the registration page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Navigation {
    /// Open the URL in a fresh browsing context.
    OpenNew { url: String },
    /// Point an already-open placeholder context at the URL.
    Redirect { target: NavigationTarget, url: String },
}

impl Navigation {
    pub fn to(url: impl Into<String>, target: Option<NavigationTarget>) -> Self {
        let url = url.into();
        match target {
            Some(target) => Navigation::Redirect { target, url },
            None => Navigation::OpenNew { url },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Navigation::OpenNew { url } | Navigation::Redirect { url, .. } => url,
        }
    }
}

/// A successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Registration {
    pub url: String,
    pub cost: u32,
    pub navigation: Navigation,
}

/// Result of one submit attempt that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success(Registration),
    /// No registration link exists for this combination.
    NotFound { key: ProgramKey },
    /// The returning-user record could not be stored; nothing was resolved.
    PersistenceFailed(String),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }
}
