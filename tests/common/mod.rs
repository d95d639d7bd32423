// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use program_signup::config::Config;
use program_signup::db::FirestoreDb;
use program_signup::models::{ReturningUserRecord, Selection};
use program_signup::routes::create_router;
use program_signup::services::{PersistError, ProgramCatalog, RegistrationStore};
use program_signup::AppState;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// The built-in catalog.
#[allow(dead_code)]
pub fn catalog() -> ProgramCatalog {
    ProgramCatalog::standard().expect("Built-in catalog should load")
}

/// Create a test app with an offline Firestore mock.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        Config::test_default(),
        FirestoreDb::new_mock(),
        catalog(),
    ));
    (create_router(state.clone()), state)
}

/// In-memory registration store that records every write.
#[allow(dead_code)]
#[derive(Default)]
pub struct StubStore {
    pub records: Mutex<Vec<ReturningUserRecord>>,
    pub fail_with: Option<String>,
}

#[allow(dead_code)]
impl StubStore {
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl RegistrationStore for StubStore {
    async fn persist(&self, record: &ReturningUserRecord) -> Result<(), PersistError> {
        self.records.lock().unwrap().push(record.clone());
        match &self.fail_with {
            Some(reason) => Err(PersistError::Store(reason.clone())),
            None => Ok(()),
        }
    }
}

/// A store whose writes never complete.
#[allow(dead_code)]
pub struct HangingStore;

impl RegistrationStore for HangingStore {
    async fn persist(&self, _record: &ReturningUserRecord) -> Result<(), PersistError> {
        std::future::pending().await
    }
}

/// Complete selection for a new user: spring, Coach Guided, Running, Std.
#[allow(dead_code)]
pub fn new_runner() -> Selection {
    serde_json::from_value(serde_json::json!({
        "track": "spring",
        "segment": "Coach Guided",
        "activityType": "Running",
        "userType": "new",
        "trainingMode": "Std",
    }))
    .unwrap()
}

/// Complete selection for a returning user with valid contact details.
#[allow(dead_code)]
pub fn returning_runner(email: &str) -> Selection {
    serde_json::from_value(serde_json::json!({
        "track": "fall",
        "segment": "Self Serve",
        "activityType": "Running",
        "userType": "return",
        "trainingMode": "Exp",
        "email": email,
        "coachPreference": "stay",
    }))
    .unwrap()
}
