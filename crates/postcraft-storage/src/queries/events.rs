// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event audit log.

use postcraft_core::PostcraftError;
use postcraft_core::types::{InboundEvent, SenderId};

use crate::database::{Database, map_tr_err};

/// Appends `event` to the audit log as JSON.
pub async fn insert_event(db: &Database, event: &InboundEvent) -> Result<(), PostcraftError> {
    let payload = serde_json::to_string(event).map_err(|e| PostcraftError::Storage {
        source: Box::new(e),
    })?;
    let event_id = event.id.clone();
    let sender_id = event.sender_id.0.clone();
    let channel = event.channel.clone();
    let received_at = event.received_at.clone();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO inbound_events (event_id, sender_id, channel, payload, received_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![event_id, sender_id, channel, payload, received_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Events recorded for `sender`, oldest first.
pub async fn events_for_sender(
    db: &Database,
    sender: &SenderId,
) -> Result<Vec<InboundEvent>, PostcraftError> {
    let sender_id = sender.0.clone();
    let rows: Vec<String> = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT payload FROM inbound_events WHERE sender_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![sender_id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;

    rows.iter()
        .map(|raw| {
            serde_json::from_str(raw).map_err(|e| PostcraftError::Storage {
                source: Box::new(e),
            })
        })
        .collect()
}

/// Deletes the sender's events and draft in one transaction.
///
/// Returns the number of events removed.
pub async fn delete_sender(db: &Database, sender: &SenderId) -> Result<u64, PostcraftError> {
    let sender_id = sender.0.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let events = tx.execute(
                "DELETE FROM inbound_events WHERE sender_id = ?1",
                rusqlite::params![sender_id],
            )?;
            tx.execute(
                "DELETE FROM pending_posts WHERE sender_id = ?1",
                rusqlite::params![sender_id],
            )?;
            tx.commit()?;
            Ok(events as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn test_db() -> Database {
        Database::open(":memory:", Duration::from_millis(100))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn events_are_kept_verbatim_per_sender() {
        let db = test_db().await;
        let first = InboundEvent::text("messenger", "alice".into(), "hello");
        let second = InboundEvent::text("messenger", "alice".into(), "Post funny story");
        let other = InboundEvent::text("messenger", "bob".into(), "hi");
        for ev in [&first, &second, &other] {
            insert_event(&db, ev).await.unwrap();
        }

        let stored = events_for_sender(&db, &"alice".into()).await.unwrap();
        assert_eq!(stored, vec![first, second]);
    }

    #[tokio::test]
    async fn delete_sender_counts_only_that_sender() {
        let db = test_db().await;
        for (sender, text) in [("alice", "a"), ("alice", "b"), ("bob", "c")] {
            insert_event(&db, &InboundEvent::text("web", sender.into(), text))
                .await
                .unwrap();
        }

        assert_eq!(delete_sender(&db, &"alice".into()).await.unwrap(), 2);
        assert!(events_for_sender(&db, &"alice".into()).await.unwrap().is_empty());
        assert_eq!(events_for_sender(&db, &"bob".into()).await.unwrap().len(), 1);
    }
}
