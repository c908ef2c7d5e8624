// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for `SqliteStore` against a file-backed database.

use postcraft_config::model::StorageConfig;
use postcraft_core::types::{ErasureReceipt, InboundEvent, PendingPost, SenderId};
use postcraft_core::{HealthStatus, PluginAdapter, StateStore};
use postcraft_storage::SqliteStore;

fn store_in(dir: &tempfile::TempDir) -> SqliteStore {
    SqliteStore::new(StorageConfig {
        database_path: dir.path().join("postcraft.db").display().to_string(),
        connect_timeout_secs: 5,
        busy_timeout_ms: 1000,
    })
}

#[tokio::test]
async fn opens_lazily_and_reports_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(!dir.path().join("postcraft.db").exists());

    assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    assert!(dir.path().join("postcraft.db").exists());
    store.shutdown().await.unwrap();
}

#[tokio::test]
async fn erasure_removes_events_and_draft() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let alice: SenderId = "alice".into();
    let bob: SenderId = "bob".into();

    store
        .record_inbound(&InboundEvent::text("messenger", alice.clone(), "hi"))
        .await
        .unwrap();
    store
        .record_inbound(&InboundEvent::text("messenger", alice.clone(), "Post funny story"))
        .await
        .unwrap();
    store
        .record_inbound(&InboundEvent::text("messenger", bob.clone(), "hello"))
        .await
        .unwrap();
    store
        .set_pending(&PendingPost::new(alice.clone(), "draft".into(), None))
        .await
        .unwrap();
    store
        .set_pending(&PendingPost::new(bob.clone(), "bob's draft".into(), None))
        .await
        .unwrap();

    assert_eq!(store.delete_all_for_sender(&alice).await.unwrap(), 2);
    assert!(store.get_pending(&alice).await.unwrap().is_none());
    assert_eq!(
        store.get_pending(&bob).await.unwrap().unwrap().text,
        "bob's draft"
    );
}

#[tokio::test]
async fn receipts_are_found_by_code() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let receipt = ErasureReceipt {
        confirmation_code: "abc123".into(),
        records_deleted: 3,
        erased_at: "2026-01-01T00:00:00Z".into(),
    };
    store.record_erasure(&receipt).await.unwrap();

    assert_eq!(store.get_erasure("abc123").await.unwrap(), Some(receipt));
    assert!(store.get_erasure("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let sender: SenderId = "carol".into();
    {
        let store = store_in(&dir);
        store
            .set_pending(&PendingPost::new(sender.clone(), "kept".into(), None))
            .await
            .unwrap();
        store.shutdown().await.unwrap();
    }
    let store = store_in(&dir);
    assert_eq!(store.get_pending(&sender).await.unwrap().unwrap().text, "kept");
}

#[tokio::test]
async fn creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("postcraft.db");
    let store = SqliteStore::new(StorageConfig {
        database_path: path.display().to_string(),
        connect_timeout_secs: 5,
        busy_timeout_ms: 1000,
    });

    assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    assert!(path.exists());
}

#[tokio::test]
async fn unopenable_path_is_unhealthy_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let store = SqliteStore::new(StorageConfig {
        database_path: blocker.join("postcraft.db").display().to_string(),
        connect_timeout_secs: 5,
        busy_timeout_ms: 1000,
    });

    assert!(matches!(
        store.health_check().await.unwrap(),
        HealthStatus::Unhealthy(_)
    ));
    let err = store.get_pending(&SenderId::from("u")).await.unwrap_err();
    assert!(matches!(err, postcraft_core::PostcraftError::Storage { .. }));
}
