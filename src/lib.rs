// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Program-Signup: registration backend for the running/walking training program
//!
//! This crate resolves a user's program choices (track, activity, segment,
//! user type, training mode) to a price and an external registration link,
//! capturing contact details for returning users along the way.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use dashmap::DashSet;
use db::FirestoreDb;
use services::ProgramCatalog;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: ProgramCatalog,
    /// Emails of returning users with a submission currently running
    pub in_flight: DashSet<String>,
}

impl AppState {
    pub fn new(config: Config, db: FirestoreDb, catalog: ProgramCatalog) -> Self {
        Self {
            config,
            db,
            catalog,
            in_flight: DashSet::new(),
        }
    }
}
