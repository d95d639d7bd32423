// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod program;
pub mod registration;
pub mod selection;

pub use program::{Program, ProgramCategory, ProgramKey};
pub use registration::{
    Navigation, NavigationTarget, Registration, ReturningUserRecord, SubmissionOutcome,
};
pub use selection::{
    ActivityType, CoachPreference, DraftSelection, Field, Segment, Selection, SelectionError, Track,
    TrainingMode, UserType,
};
