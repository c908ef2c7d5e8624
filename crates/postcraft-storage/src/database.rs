// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection setup: PRAGMAs, migrations, and the single background connection.
//!
//! Every statement runs on `tokio-rusqlite`'s one worker thread, so writes
//! for any sender are serialized.

use std::path::Path;
use std::time::Duration;

use postcraft_core::PostcraftError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations::run_migrations;

/// Converts a `tokio-rusqlite` failure into a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> PostcraftError {
    PostcraftError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and runs migrations.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn open(path: &str, busy_timeout: Duration) -> Result<Self, PostcraftError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory().await
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| PostcraftError::Storage {
                        source: Box::new(e),
                    })?;
                }
            }
            Connection::open(path).await
        }
        .map_err(|e| PostcraftError::Storage {
            source: Box::new(e),
        })?;

        conn.call(move |conn| -> Result<(), PostcraftError> {
            conn.busy_timeout(busy_timeout)
                .and_then(|_| conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(())))
                .and_then(|_| conn.pragma_update(None, "foreign_keys", "ON"))
                .map_err(|e| PostcraftError::Storage {
                    source: Box::new(e),
                })?;
            run_migrations(conn)
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(inner) => inner,
            other => PostcraftError::Storage {
                source: other.to_string().into(),
            },
        })?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// The background connection all queries go through.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
