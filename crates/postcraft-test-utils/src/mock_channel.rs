// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock delivery channel that captures outbound messages.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use postcraft_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, MessageId, OutboundMessage,
};
use postcraft_core::{ChannelAdapter, PluginAdapter, PostcraftError};

/// Captures sent messages. Defaults to Messenger-like capabilities.
pub struct MockChannel {
    capabilities: ChannelCapabilities,
    sent: Mutex<Vec<OutboundMessage>>,
    fail_sends: AtomicBool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::with_capabilities(ChannelCapabilities {
            supports_inline_media: false,
            supports_quick_replies: true,
            max_message_length: Some(2000),
        })
    }

    pub fn with_capabilities(capabilities: ChannelCapabilities) -> Self {
        Self {
            capabilities,
            sent: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
        }
    }

    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Text of every sent text message, in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|m| m.text().map(str::to_string))
            .collect()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PostcraftError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PostcraftError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        self.capabilities.clone()
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PostcraftError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(PostcraftError::Channel {
                message: "simulated delivery failure".into(),
                source: None,
            });
        }
        self.sent.lock().await.push(msg);
        Ok(MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4())))
    }
}
