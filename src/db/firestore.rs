// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Stores the contact record captured from returning users at submission
//! time. Records are write-once; nothing here updates or deletes them.

use crate::db::collections;
use crate::error::AppError;
use crate::models::registration::ReturningUserRecord;
use crate::services::submitter::{PersistError, RegistrationStore};
use std::time::Duration;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    /// Upper bound on a single record write, if any
    write_timeout: Option<Duration>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            write_timeout: None,
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            write_timeout: None,
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            write_timeout: None,
        }
    }

    /// Bound each record write when used as a [`RegistrationStore`].
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Returning User Operations ───────────────────────────────

    /// Store a returning-user record. Returns the new document ID.
    pub async fn insert_returning_user(
        &self,
        record: &ReturningUserRecord,
    ) -> Result<String, AppError> {
        let client = self.get_client()?;

        // Document ID: submission time plus email keeps repeat submissions apart
        let doc_id = format!(
            "{}_{}",
            chrono::Utc::now().timestamp_millis(),
            urlencoding::encode(&record.email)
        );

        let _: () = client
            .fluent()
            .update()
            .in_col(collections::RETURNING_USERS)
            .document_id(&doc_id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(doc_id)
    }

    /// Get a returning-user record by document ID.
    pub async fn get_returning_user(
        &self,
        doc_id: &str,
    ) -> Result<Option<ReturningUserRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::RETURNING_USERS)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All records submitted with an email address, oldest first.
    pub async fn get_returning_users_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<ReturningUserRecord>, AppError> {
        let email = email.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::RETURNING_USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

impl RegistrationStore for FirestoreDb {
    async fn persist(&self, record: &ReturningUserRecord) -> Result<(), PersistError> {
        let write = self.insert_returning_user(record);
        let result = match self.write_timeout {
            Some(limit) => tokio::time::timeout(limit, write)
                .await
                .map_err(|_| PersistError::Timeout(limit))?,
            None => write.await,
        };

        result
            .map(|doc_id| tracing::debug!(doc_id = %doc_id, "Returning user stored"))
            .map_err(|e| PersistError::Store(e.to_string()))
    }
}
