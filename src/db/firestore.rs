// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore persistence backend.
//!
//! One document per user in the `user_states` collection. The remote store
//! is the eventual source of truth: listener payloads the shell receives
//! are fed back through `UserStore::apply_remote_snapshot`.

use crate::db::{collections, StateBackend};
use crate::error::{AppError, Result};
use crate::models::UserStateDoc;

/// Firestore-backed store for one user's state document.
#[derive(Clone)]
pub struct FirestoreBackend {
    client: Option<firestore::FirestoreDb>,
    user_id: String,
}

impl FirestoreBackend {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, user_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, user_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            user_id: user_id.to_string(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str, user_id: &str) -> Result<Self> {
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
            AppError::Persistence(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            user_id: user_id.to_string(),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All operations will return an error if called.
    pub fn new_mock(user_id: &str) -> Self {
        Self {
            client: None,
            user_id: user_id.to_string(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb> {
        self.client.as_ref().ok_or_else(|| {
            AppError::Persistence("Database not connected (offline mode)".to_string())
        })
    }
}

impl StateBackend for FirestoreBackend {
    async fn load(&self) -> Result<Option<UserStateDoc>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_STATES)
            .obj()
            .one(&self.user_id)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))
    }

    async fn save(&self, doc: &UserStateDoc) -> Result<()> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USER_STATES)
            .document_id(&self.user_id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        tracing::debug!(user_id = %self.user_id, "User state written");
        Ok(())
    }

    /// First-session creation via Firestore's create primitive, which fails
    /// on an existing document. Two devices racing the first session both
    /// observe a document afterwards; the loser's identical default is
    /// simply discarded.
    async fn create_if_absent(&self, doc: &UserStateDoc) -> Result<()> {
        let result: std::result::Result<UserStateDoc, _> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USER_STATES)
            .document_id(&self.user_id)
            .object(doc)
            .execute()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(user_id = %self.user_id, "Created user state document");
                Ok(())
            }
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                tracing::debug!(user_id = %self.user_id, "User state document already exists");
                Ok(())
            }
            Err(e) => Err(AppError::Persistence(e.to_string())),
        }
    }
}
