// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock page publisher.

use async_trait::async_trait;
use tokio::sync::Mutex;

use postcraft_core::types::{AdapterType, HealthStatus, MediaPayload, PostId};
use postcraft_core::{PluginAdapter, PostcraftError, PublisherAdapter};

/// A recorded publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCall {
    pub text: String,
    pub image: Option<MediaPayload>,
}

/// Records publish calls. Fails with the configured vendor message when set.
pub struct MockPublisher {
    calls: Mutex<Vec<PublishCall>>,
    failure: Mutex<Option<String>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Makes every following publish fail with `message`, or succeed again with `None`.
    pub async fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().await = message.map(str::to_string);
    }

    pub async fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockPublisher {
    fn name(&self) -> &str {
        "mock-publisher"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Publisher
    }

    async fn health_check(&self) -> Result<HealthStatus, PostcraftError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PostcraftError> {
        Ok(())
    }
}

#[async_trait]
impl PublisherAdapter for MockPublisher {
    async fn publish(
        &self,
        text: &str,
        image: Option<&MediaPayload>,
    ) -> Result<PostId, PostcraftError> {
        let mut calls = self.calls.lock().await;
        calls.push(PublishCall {
            text: text.to_string(),
            image: image.cloned(),
        });
        if let Some(message) = self.failure.lock().await.clone() {
            return Err(PostcraftError::Publish { message });
        }
        Ok(PostId(format!("page_{}", calls.len())))
    }
}
