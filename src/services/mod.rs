// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod form;
pub mod submitter;

pub use catalog::{available_training_modes, resolve_cost, CatalogError, ProgramCatalog};
pub use form::{FormError, Quote, RegistrationForm};
pub use submitter::{PersistError, RegistrationStore, SubmitPhase, Submitter};
