// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Program-Signup API Server
//!
//! Prices program selections and hands out registration links for the
//! running/walking training program.

use program_signup::{config::Config, db::FirestoreDb, services::ProgramCatalog, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Program-Signup API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore")
        .with_write_timeout(config.persist_timeout);

    // Load program catalog
    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading program catalog");
            ProgramCatalog::load_from_file(path).expect("Failed to load program catalog")
        }
        None => ProgramCatalog::standard().expect("Built-in program catalog is invalid"),
    };
    let mismatched = catalog.mismatched_keys();
    if !mismatched.is_empty() {
        tracing::warn!(
            count = mismatched.len(),
            "Catalog has programs with training modes the form never offers"
        );
    }

    let state = Arc::new(AppState::new(config.clone(), db, catalog));

    // Build router
    let app = program_signup::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("program_signup=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
