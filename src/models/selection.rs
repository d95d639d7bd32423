// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The registration form's in-progress selection.
//!
//! Every choice field has exactly one canonical vocabulary. Labels used by
//! earlier revisions of the form (`Pro`, `Lite`, `New`, `Standard`, ...) are
//! accepted when parsing and immediately mapped onto the canonical value, so
//! lookup keys are always built from a single vocabulary.

use crate::models::program::ProgramKey;
use crate::models::registration::ReturningUserRecord;
use crate::services::catalog::available_training_modes;
use chrono::{DateTime, Utc};
use serde::de::{value, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A value that does not belong to a choice vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized value {0:?}")]
pub struct UnknownChoice(pub String);

/// Implements `as_str`-based `Display` and alias-aware `FromStr` for a choice enum.
macro_rules! choice {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let de: value::StrDeserializer<'_, value::Error> = s.trim().into_deserializer();
                Self::deserialize(de).map_err(|_| UnknownChoice(s.to_string()))
            }
        }
    };
}

/// Season the program runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    #[serde(alias = "Spring")]
    Spring,
    #[serde(alias = "Summer")]
    Summer,
    #[serde(alias = "Fall")]
    Fall,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Spring => "spring",
            Track::Summer => "summer",
            Track::Fall => "fall",
        }
    }
}

choice!(Track);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Running,
    Walking,
    Masters,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Walking => "Walking",
            ActivityType::Masters => "Masters",
        }
    }
}

choice!(ActivityType);

/// Level of coaching included with the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Segment {
    #[serde(rename = "Coach Guided", alias = "Pro")]
    CoachGuided,
    #[serde(rename = "Self Serve", alias = "Lite")]
    SelfServe,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::CoachGuided => "Coach Guided",
            Segment::SelfServe => "Self Serve",
        }
    }

    pub fn is_coach_assisted(self) -> bool {
        self == Segment::CoachGuided
    }
}

choice!(Segment);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[serde(alias = "New")]
    New,
    #[serde(alias = "Return", alias = "returning")]
    Return,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::New => "new",
            UserType::Return => "return",
        }
    }
}

choice!(UserType);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TrainingMode {
    #[serde(alias = "Standard")]
    Std,
    #[serde(alias = "Experienced")]
    Exp,
    Speed,
}

impl TrainingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingMode::Std => "Std",
            TrainingMode::Exp => "Exp",
            TrainingMode::Speed => "Speed",
        }
    }
}

choice!(TrainingMode);

/// Whether a returning runner keeps their previous coach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum CoachPreference {
    #[serde(alias = "Stay")]
    Stay,
    #[serde(alias = "Open")]
    Open,
}

impl CoachPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoachPreference::Stay => "stay",
            CoachPreference::Open => "open",
        }
    }
}

choice!(CoachPreference);

/// The user-editable fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Track,
    ActivityType,
    Segment,
    UserType,
    TrainingMode,
    Email,
    CoachPreference,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Track => "track",
            Field::ActivityType => "activityType",
            Field::Segment => "segment",
            Field::UserType => "userType",
            Field::TrainingMode => "trainingMode",
            Field::Email => "email",
            Field::CoachPreference => "coachPreference",
        }
    }
}

choice!(Field);

/// Reasons a selection cannot be edited or submitted.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("missing required fields: {}", join_fields(.0))]
    Missing(Vec<Field>),

    #[error("unrecognized {field} value {value:?}")]
    UnknownValue { field: Field, value: String },

    #[error("invalid contact details: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The user's in-progress choices. Empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub track: Option<Track>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub segment: Option<Segment>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub training_mode: Option<TrainingMode>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub coach_preference: Option<CoachPreference>,
}

/// Deserialize an optional value, treating blank strings as absent.
///
/// Form controls post `""` for an untouched select; values go through
/// `FromStr` so legacy labels are canonicalized here too.
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Like [`empty_as_none`], but values outside the vocabulary also become `None`.
fn unknown_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// A half-filled form as posted for pricing.
///
/// Unrecognized choices are dropped instead of rejected, so an unknown
/// activity prices at 0 like any other activity without a price.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSelection {
    #[serde(default, deserialize_with = "unknown_as_none")]
    track: Option<Track>,
    #[serde(default, deserialize_with = "unknown_as_none")]
    activity_type: Option<ActivityType>,
    #[serde(default, deserialize_with = "unknown_as_none")]
    segment: Option<Segment>,
    #[serde(default, deserialize_with = "unknown_as_none")]
    user_type: Option<UserType>,
    #[serde(default, deserialize_with = "unknown_as_none")]
    training_mode: Option<TrainingMode>,
    #[serde(default, deserialize_with = "empty_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "unknown_as_none")]
    coach_preference: Option<CoachPreference>,
}

impl From<DraftSelection> for Selection {
    fn from(draft: DraftSelection) -> Self {
        Selection {
            track: draft.track,
            activity_type: draft.activity_type,
            segment: draft.segment,
            user_type: draft.user_type,
            training_mode: draft.training_mode,
            email: draft.email,
            coach_preference: draft.coach_preference,
        }
    }
}

fn parse_choice<T>(field: Field, value: &str) -> Result<Option<T>, SelectionError>
where
    T: FromStr<Err = UnknownChoice>,
{
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|UnknownChoice(value)| SelectionError::UnknownValue { field, value })
}

impl Selection {
    /// Apply one field edit and return the resulting selection.
    ///
    /// An empty value clears the field. Changing the activity or segment
    /// drops a training mode that is no longer offered, or snaps it to the
    /// only mode left.
    pub fn apply(&self, field: Field, value: &str) -> Result<Selection, SelectionError> {
        let mut next = self.clone();
        let value = value.trim();

        match field {
            Field::Track => next.track = parse_choice(field, value)?,
            Field::ActivityType => next.activity_type = parse_choice(field, value)?,
            Field::Segment => next.segment = parse_choice(field, value)?,
            Field::UserType => next.user_type = parse_choice(field, value)?,
            Field::TrainingMode => next.training_mode = parse_choice(field, value)?,
            Field::Email => next.email = (!value.is_empty()).then(|| value.to_string()),
            Field::CoachPreference => next.coach_preference = parse_choice(field, value)?,
        }

        if matches!(field, Field::ActivityType | Field::Segment) {
            next.reconcile_training_mode();
        }

        Ok(next)
    }

    fn reconcile_training_mode(&mut self) {
        let Some(mode) = self.training_mode else {
            return;
        };
        let offered = self.training_modes();
        if !offered.contains(&mode) {
            self.training_mode = match offered {
                [only] => Some(*only),
                _ => None,
            };
        }
    }

    /// Training modes the form should offer for the current activity and segment.
    pub fn training_modes(&self) -> &'static [TrainingMode] {
        available_training_modes(self.activity_type, self.segment)
    }

    pub fn is_returning(&self) -> bool {
        self.user_type == Some(UserType::Return)
    }

    /// Fields required by the current user type that are still empty.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.track.is_none() {
            missing.push(Field::Track);
        }
        if self.activity_type.is_none() {
            missing.push(Field::ActivityType);
        }
        if self.segment.is_none() {
            missing.push(Field::Segment);
        }
        if self.user_type.is_none() {
            missing.push(Field::UserType);
        }
        if self.training_mode.is_none() {
            missing.push(Field::TrainingMode);
        }
        if self.is_returning() {
            if self.email.is_none() {
                missing.push(Field::Email);
            }
            if self.coach_preference.is_none() {
                missing.push(Field::CoachPreference);
            }
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Check completeness and produce the typed, fully-populated selection.
    pub fn complete(&self) -> Result<CompleteSelection, SelectionError> {
        let Some(key) = ProgramKey::from_selection(self) else {
            return Err(SelectionError::Missing(self.missing_fields()));
        };

        let returning = match key.user_type {
            UserType::New => None,
            UserType::Return => match (&self.email, self.coach_preference) {
                (Some(email), Some(coach_preference)) => Some(ReturningContact {
                    email: email.clone(),
                    coach_preference,
                }),
                _ => return Err(SelectionError::Missing(self.missing_fields())),
            },
        };

        Ok(CompleteSelection { key, returning })
    }
}

/// Contact details collected only from returning users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturningContact {
    pub email: String,
    pub coach_preference: CoachPreference,
}

/// A selection with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteSelection {
    pub key: ProgramKey,
    pub returning: Option<ReturningContact>,
}

impl CompleteSelection {
    /// Build the record persisted for a returning user, if this is one.
    pub fn returning_record(&self, created_at: DateTime<Utc>) -> Option<ReturningUserRecord> {
        self.returning
            .as_ref()
            .map(|contact| ReturningUserRecord::new(&self.key, contact, created_at))
    }
}
