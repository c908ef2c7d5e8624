// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-sender pending post: one row per sender, last write wins.

use postcraft_core::PostcraftError;
use postcraft_core::types::{MediaPayload, PendingPost, SenderId};
use rusqlite::OptionalExtension;

use crate::database::{Database, map_tr_err};

fn encode_image(image: &Option<MediaPayload>) -> Result<Option<String>, PostcraftError> {
    image
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| PostcraftError::Storage {
            source: Box::new(e),
        })
}

/// Inserts or replaces the sender's draft.
pub async fn upsert_pending(db: &Database, post: &PendingPost) -> Result<(), PostcraftError> {
    let image = encode_image(&post.image)?;
    let sender_id = post.sender_id.0.clone();
    let text = post.text.clone();
    let created_at = post.created_at.clone();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO pending_posts (sender_id, text, image, created_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(sender_id) DO UPDATE SET text = excluded.text, image = excluded.image, created_at = excluded.created_at",
                rusqlite::params![sender_id, text, image, created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The sender's draft, if one exists.
pub async fn get_pending(
    db: &Database,
    sender: &SenderId,
) -> Result<Option<PendingPost>, PostcraftError> {
    let sender_id = sender.0.clone();
    let row: Option<(String, Option<String>, String)> = db
        .connection()
        .call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT text, image, created_at FROM pending_posts WHERE sender_id = ?1",
                    rusqlite::params![sender_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(map_tr_err)?;

    let Some((text, image, created_at)) = row else {
        return Ok(None);
    };
    let image = image
        .map(|raw| serde_json::from_str::<MediaPayload>(&raw))
        .transpose()
        .map_err(|e| PostcraftError::Storage {
            source: Box::new(e),
        })?;

    Ok(Some(PendingPost {
        sender_id: sender.clone(),
        text,
        image,
        created_at,
    }))
}

/// Removes the sender's draft. A missing draft is not an error.
pub async fn delete_pending(db: &Database, sender: &SenderId) -> Result<(), PostcraftError> {
    let sender_id = sender.0.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM pending_posts WHERE sender_id = ?1",
                rusqlite::params![sender_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn upsert_overwrites_previous_draft() {
        let db = Database::open(":memory:", Duration::from_millis(100))
            .await
            .unwrap();
        let sender: SenderId = "alice".into();

        upsert_pending(&db, &PendingPost::new(sender.clone(), "first".into(), None))
            .await
            .unwrap();
        let image = MediaPayload::inline("image/png", "iVBORw0KGgo=");
        upsert_pending(
            &db,
            &PendingPost::new(sender.clone(), "second".into(), Some(image.clone())),
        )
        .await
        .unwrap();

        let stored = get_pending(&db, &sender).await.unwrap().unwrap();
        assert_eq!(stored.text, "second");
        assert_eq!(stored.image, Some(image));

        delete_pending(&db, &sender).await.unwrap();
        assert!(get_pending(&db, &sender).await.unwrap().is_none());
        delete_pending(&db, &sender).await.unwrap();
    }
}
