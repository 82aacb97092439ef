// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Credentials (OAuth tokens, one document per athlete)
//! - Settings (unit preference, one document per athlete)
//! - Events (append-only analytics rows)
//!
//! Writes are plain upserts: concurrent writers for the same athlete
//! resolve last-writer-wins at the storage layer.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{AnalyticsEvent, Credential, UnitSystem, UserSettings};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Database handle shared by all services.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
    Offline,
}

/// In-process storage used for local runs and tests.
#[derive(Default)]
struct MemoryStore {
    credentials: DashMap<u64, Credential>,
    settings: DashMap<u64, UserSettings>,
    events: DashMap<u64, AnalyticsEvent>,
    next_event_id: AtomicU64,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            AppError::PersistenceFailed(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
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
            AppError::PersistenceFailed(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-memory store (local runs and tests).
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
        }
    }

    /// Create an offline store for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_offline() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    fn offline() -> AppError {
        AppError::PersistenceFailed("Database not connected (offline mode)".to_string())
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Get stored credentials for an athlete.
    pub async fn get_credential(&self, athlete_id: u64) -> Result<Option<Credential>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::CREDENTIALS)
                .obj()
                .one(&athlete_id.to_string())
                .await
                .map_err(|e| AppError::PersistenceFailed(e.to_string())),
            Backend::Memory(store) => Ok(store
                .credentials
                .get(&athlete_id)
                .map(|c| c.value().clone())),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Create or replace an athlete's credentials.
    pub async fn set_credential(&self, credential: &Credential) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::CREDENTIALS)
                    .document_id(credential.athlete_id.to_string())
                    .object(credential)
                    .execute()
                    .await
                    .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store
                    .credentials
                    .insert(credential.athlete_id, credential.clone());
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Delete credentials (for deauthorization).
    pub async fn delete_credential(&self, athlete_id: u64) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                client
                    .fluent()
                    .delete()
                    .from(collections::CREDENTIALS)
                    .document_id(athlete_id.to_string())
                    .execute()
                    .await
                    .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.credentials.remove(&athlete_id);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    // ─── Settings Operations ─────────────────────────────────────

    /// Get an athlete's settings document, if any.
    pub async fn get_settings(&self, athlete_id: u64) -> Result<Option<UserSettings>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::SETTINGS)
                .obj()
                .one(&athlete_id.to_string())
                .await
                .map_err(|e| AppError::PersistenceFailed(e.to_string())),
            Backend::Memory(store) => {
                Ok(store.settings.get(&athlete_id).map(|s| s.value().clone()))
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Preferred unit system, `imperial` when unset or unreadable.
    pub async fn get_unit_system(&self, athlete_id: u64) -> UnitSystem {
        match self.get_settings(athlete_id).await {
            Ok(Some(settings)) => settings.units,
            Ok(None) => UnitSystem::default(),
            Err(e) => {
                tracing::warn!(
                    athlete_id,
                    error = %e,
                    "Failed to read settings, using default units"
                );
                UnitSystem::default()
            }
        }
    }

    /// Create or replace an athlete's unit preference.
    pub async fn set_unit_system(
        &self,
        athlete_id: u64,
        units: UnitSystem,
    ) -> Result<(), AppError> {
        let settings = UserSettings { athlete_id, units };
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::SETTINGS)
                    .document_id(athlete_id.to_string())
                    .object(&settings)
                    .execute()
                    .await
                    .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.settings.insert(athlete_id, settings);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn delete_settings(&self, athlete_id: u64) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                client
                    .fluent()
                    .delete()
                    .from(collections::SETTINGS)
                    .document_id(athlete_id.to_string())
                    .execute()
                    .await
                    .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.settings.remove(&athlete_id);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    // ─── Event Operations ────────────────────────────────────────

    /// Append an analytics event under a generated document ID.
    pub async fn append_event(&self, event: &AnalyticsEvent) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: AnalyticsEvent = client
                    .fluent()
                    .insert()
                    .into(collections::EVENTS)
                    .generate_document_id()
                    .object(event)
                    .execute()
                    .await
                    .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                let id = store.next_event_id.fetch_add(1, Ordering::Relaxed);
                store.events.insert(id, event.clone());
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// All events with the given anonymized ID, oldest first.
    pub async fn get_events_for(
        &self,
        anonymous_id: &str,
    ) -> Result<Vec<AnalyticsEvent>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let anonymous_id = anonymous_id.to_string();
                client
                    .fluent()
                    .select()
                    .from(collections::EVENTS)
                    .filter(move |q| q.field("anonymous_id").eq(anonymous_id.clone()))
                    .order_by([("event_time", firestore::FirestoreQueryDirection::Ascending)])
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::PersistenceFailed(e.to_string()))
            }
            Backend::Memory(store) => {
                let mut rows: Vec<(u64, AnalyticsEvent)> = store
                    .events
                    .iter()
                    .filter(|e| e.value().anonymous_id == anonymous_id)
                    .map(|e| (*e.key(), e.value().clone()))
                    .collect();
                rows.sort_by_key(|(id, _)| *id);
                Ok(rows.into_iter().map(|(_, e)| e).collect())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }
}
