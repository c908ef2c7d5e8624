// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for reply delivery (Messenger, CLI, web).

use async_trait::async_trait;

use crate::error::PostcraftError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelCapabilities, MessageId, OutboundMessage};

/// Adapter that delivers assembled replies to a sender.
///
/// Inbound traffic arrives through HTTP handlers, so channels here only send.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Returns what this channel can render.
    fn capabilities(&self) -> ChannelCapabilities;

    /// Sends one message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PostcraftError>;
}
