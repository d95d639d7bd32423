// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set); they are skipped otherwise.

use program_signup::models::{CoachPreference, SubmissionOutcome, Track};
use program_signup::services::Submitter;
use std::time::{SystemTime, UNIX_EPOCH};

mod common;

/// Unique email per run so repeated runs against one emulator don't collide.
fn unique_email() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("runner{}@example.com", nanos)
}

#[tokio::test]
async fn test_insert_and_read_back_returning_user() {
    require_emulator!();

    let db = common::test_db().await;
    let email = unique_email();
    let record = common::returning_runner(&email)
        .complete()
        .unwrap()
        .returning_record(chrono::Utc::now())
        .unwrap();

    let doc_id = db.insert_returning_user(&record).await.unwrap();
    let stored = db
        .get_returning_user(&doc_id)
        .await
        .unwrap()
        .expect("record should exist after insert");

    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_submission_stores_returning_user() {
    require_emulator!();

    let db = common::test_db().await;
    let catalog = common::catalog();
    let email = unique_email();

    let submitter = Submitter::new(&catalog, &db);
    let outcome = submitter
        .submit(&common::returning_runner(&email), None)
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Success(_)));

    let stored = db.get_returning_users_by_email(&email).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].track, Track::Fall);
    assert_eq!(stored[0].coach_preference, CoachPreference::Stay);
}

#[tokio::test]
async fn test_resubmission_keeps_both_records() {
    require_emulator!();

    let db = common::test_db().await;
    let catalog = common::catalog();
    let email = unique_email();
    let submitter = Submitter::new(&catalog, &db);

    for _ in 0..2 {
        let outcome = submitter
            .submit(&common::returning_runner(&email), None)
            .await
            .unwrap();
        assert!(outcome.is_success());
        // Document IDs are millisecond-stamped
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let stored = db.get_returning_users_by_email(&email).await.unwrap();
    assert_eq!(stored.len(), 2);
}
