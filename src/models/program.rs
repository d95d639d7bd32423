// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Program lookup keys and catalog listing types.

use crate::models::selection::{
    ActivityType, Selection, Segment, Track, TrainingMode, UnknownChoice, UserType,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Separator between the parts of a composite key.
pub const KEY_SEPARATOR: char = '|';

/// Composite lookup key for a registration link.
///
/// Renders as `track|segment|activity|userType|trainingMode` using the
/// canonical vocabulary, e.g. `spring|Coach Guided|Running|new|Std`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramKey {
    pub track: Track,
    pub segment: Segment,
    pub activity_type: ActivityType,
    pub user_type: UserType,
    pub training_mode: TrainingMode,
}

impl ProgramKey {
    /// Build the key for a selection, or `None` if any key field is empty.
    pub fn from_selection(selection: &Selection) -> Option<Self> {
        Some(Self {
            track: selection.track?,
            segment: selection.segment?,
            activity_type: selection.activity_type?,
            user_type: selection.user_type?,
            training_mode: selection.training_mode?,
        })
    }

    /// A selection with exactly this key's choices filled in.
    pub fn to_selection(&self) -> Selection {
        Selection {
            track: Some(self.track),
            segment: Some(self.segment),
            activity_type: Some(self.activity_type),
            user_type: Some(self.user_type),
            training_mode: Some(self.training_mode),
            ..Default::default()
        }
    }
}

impl fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = KEY_SEPARATOR;
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.track, self.segment, self.activity_type, self.user_type, self.training_mode
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramKeyError {
    #[error("expected 5 key parts, found {0}")]
    WrongArity(usize),

    #[error(transparent)]
    Choice(#[from] UnknownChoice),
}

impl FromStr for ProgramKey {
    type Err = ProgramKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(KEY_SEPARATOR).collect();
        let [track, segment, activity_type, user_type, training_mode] = parts[..] else {
            return Err(ProgramKeyError::WrongArity(parts.len()));
        };

        Ok(Self {
            track: track.parse()?,
            segment: segment.parse()?,
            activity_type: activity_type.parse()?,
            user_type: user_type.parse()?,
            training_mode: training_mode.parse()?,
        })
    }
}

/// A registration link as shown in the program listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Program {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Programs grouped under one heading (one per track).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgramCategory {
    pub name: String,
    pub programs: Vec<Program>,
}
