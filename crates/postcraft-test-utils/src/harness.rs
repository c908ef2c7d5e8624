// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring the full pipeline to mock adapters.
//!
//! The default store is in memory; `with_sqlite()` swaps in a real
//! `SqliteStore` on a temp file.

use std::sync::Arc;

use postcraft_agent::{EventOutcome, Orchestrator, Pipeline};
use postcraft_config::model::StorageConfig;
use postcraft_core::types::{Attachment, AttachmentKind, InboundEvent, PendingPost, SenderId};
use postcraft_core::{PostcraftError, PublisherAdapter, StateStore};
use postcraft_storage::SqliteStore;

use crate::memory_store::MemoryStore;
use crate::mock_channel::MockChannel;
use crate::mock_fetcher::MockFetcher;
use crate::mock_generator::MockGenerator;
use crate::mock_publisher::MockPublisher;

pub struct TestHarnessBuilder {
    sqlite: bool,
    publisher: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            sqlite: false,
            publisher: true,
        }
    }

    /// Back the harness with SQLite in a temp directory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Leave page publishing unconfigured.
    pub fn without_publisher(mut self) -> Self {
        self.publisher = false;
        self
    }

    pub fn build(self) -> Result<TestHarness, PostcraftError> {
        let generator = Arc::new(MockGenerator::new());
        let channel = Arc::new(MockChannel::new());
        let publisher = Arc::new(MockPublisher::new());
        let fetcher = Arc::new(MockFetcher::new());

        let mut memory = None;
        let mut temp_dir = None;
        let store: Arc<dyn StateStore> = if self.sqlite {
            let dir =
                tempfile::TempDir::new().map_err(|e| PostcraftError::Storage { source: e.into() })?;
            let config = StorageConfig {
                database_path: dir.path().join("test.db").to_string_lossy().to_string(),
                ..StorageConfig::default()
            };
            temp_dir = Some(dir);
            Arc::new(SqliteStore::new(config))
        } else {
            let store = Arc::new(MemoryStore::new());
            memory = Some(store.clone());
            store
        };

        let orchestrator = Orchestrator::new(
            generator.clone(),
            store.clone(),
            fetcher.clone(),
            self.publisher
                .then(|| publisher.clone() as Arc<dyn PublisherAdapter>),
        );
        let pipeline = Arc::new(Pipeline::new(orchestrator, store.clone()));

        Ok(TestHarness {
            generator,
            channel,
            publisher,
            fetcher,
            store,
            memory,
            pipeline,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete pipeline over mock adapters.
pub struct TestHarness {
    pub generator: Arc<MockGenerator>,
    pub channel: Arc<MockChannel>,
    pub publisher: Arc<MockPublisher>,
    pub fetcher: Arc<MockFetcher>,
    pub store: Arc<dyn StateStore>,
    /// Set when the harness runs on the in-memory store.
    pub memory: Option<Arc<MemoryStore>>,
    pub pipeline: Arc<Pipeline>,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with the in-memory store and a publisher.
    pub fn new() -> Result<Self, PostcraftError> {
        Self::builder().build()
    }

    /// Runs one text message through the pipeline and the mock channel.
    pub async fn send_text(&self, sender: &str, text: &str) -> EventOutcome {
        self.send_event(InboundEvent::text("test", SenderId::from(sender), text))
            .await
    }

    /// Runs a text message with one image attachment.
    pub async fn send_image(&self, sender: &str, text: &str, url: &str) -> EventOutcome {
        let event = InboundEvent::text("test", SenderId::from(sender), text).with_attachment(
            Attachment {
                kind: AttachmentKind::Image,
                url: url.to_string(),
                mime_type: None,
            },
        );
        self.send_event(event).await
    }

    pub async fn send_event(&self, event: InboundEvent) -> EventOutcome {
        self.pipeline.deliver(&event, self.channel.as_ref()).await
    }

    pub async fn pending(&self, sender: &str) -> Option<PendingPost> {
        self.store
            .get_pending(&SenderId::from(sender))
            .await
            .ok()
            .flatten()
    }
}
