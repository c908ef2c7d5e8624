// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, compiled in with `embed_migrations!`.

use postcraft_core::PostcraftError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies pending migrations. Refinery records progress in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), PostcraftError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| PostcraftError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
