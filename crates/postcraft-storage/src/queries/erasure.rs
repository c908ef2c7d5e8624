// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Erasure receipts, looked up by confirmation code.

use postcraft_core::PostcraftError;
use postcraft_core::types::ErasureReceipt;
use rusqlite::OptionalExtension;

use crate::database::{Database, map_tr_err};

pub async fn insert_receipt(db: &Database, receipt: &ErasureReceipt) -> Result<(), PostcraftError> {
    let code = receipt.confirmation_code.clone();
    let deleted = receipt.records_deleted as i64;
    let erased_at = receipt.erased_at.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO erasure_requests (confirmation_code, records_deleted, erased_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![code, deleted, erased_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_receipt(db: &Database, code: &str) -> Result<Option<ErasureReceipt>, PostcraftError> {
    let code = code.to_string();
    db.connection()
        .call(move |conn| {
            let receipt = conn
                .query_row(
                    "SELECT confirmation_code, records_deleted, erased_at FROM erasure_requests WHERE confirmation_code = ?1",
                    rusqlite::params![code],
                    |row| {
                        Ok(ErasureReceipt {
                            confirmation_code: row.get(0)?,
                            records_deleted: row.get::<_, i64>(1)? as u64,
                            erased_at: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(receipt)
        })
        .await
        .map_err(map_tr_err)
}
