// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`StateStore`] trait.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use postcraft_config::model::StorageConfig;
use postcraft_core::types::{ErasureReceipt, InboundEvent, PendingPost, SenderId};
use postcraft_core::{AdapterType, HealthStatus, PluginAdapter, PostcraftError, StateStore};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed state store.
///
/// The database is opened on first use and the handle is reused for the
/// life of the value. Opening is bounded by `storage.connect_timeout_secs`.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Creates a store. No connection is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// The database handle, opening it on first call.
    async fn db(&self) -> Result<&Database, PostcraftError> {
        self.db
            .get_or_try_init(|| async {
                let connect_timeout = Duration::from_secs(self.config.connect_timeout_secs);
                let busy_timeout = Duration::from_millis(self.config.busy_timeout_ms);
                let db = tokio::time::timeout(
                    connect_timeout,
                    Database::open(&self.config.database_path, busy_timeout),
                )
                .await
                .map_err(|e| PostcraftError::Storage {
                    source: Box::new(e),
                })??;
                info!(path = %self.config.database_path, "state store opened");
                Ok::<_, PostcraftError>(db)
            })
            .await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PostcraftError> {
        let db = match self.db().await {
            Ok(db) => db,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PostcraftError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn record_inbound(&self, event: &InboundEvent) -> Result<(), PostcraftError> {
        queries::events::insert_event(self.db().await?, event).await
    }

    async fn get_pending(&self, sender: &SenderId) -> Result<Option<PendingPost>, PostcraftError> {
        queries::pending::get_pending(self.db().await?, sender).await
    }

    async fn set_pending(&self, post: &PendingPost) -> Result<(), PostcraftError> {
        queries::pending::upsert_pending(self.db().await?, post).await
    }

    async fn clear_pending(&self, sender: &SenderId) -> Result<(), PostcraftError> {
        queries::pending::delete_pending(self.db().await?, sender).await
    }

    async fn delete_all_for_sender(&self, sender: &SenderId) -> Result<u64, PostcraftError> {
        let deleted = queries::events::delete_sender(self.db().await?, sender).await?;
        info!(sender_id = %sender, deleted, "erased sender records");
        Ok(deleted)
    }

    async fn record_erasure(&self, receipt: &ErasureReceipt) -> Result<(), PostcraftError> {
        queries::erasure::insert_receipt(self.db().await?, receipt).await
    }

    async fn get_erasure(&self, code: &str) -> Result<Option<ErasureReceipt>, PostcraftError> {
        queries::erasure::get_receipt(self.db().await?, code).await
    }
}
