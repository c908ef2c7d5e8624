// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State store trait for inbound records, pending drafts, and erasure receipts.

use async_trait::async_trait;

use crate::error::PostcraftError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ErasureReceipt, InboundEvent, PendingPost, SenderId};

/// Adapter for persistent per-sender state.
///
/// Writes for a single sender must be atomic; concurrent senders do not
/// interfere with each other.
#[async_trait]
pub trait StateStore: PluginAdapter {
    /// Records an inbound event for the sender.
    async fn record_inbound(&self, event: &InboundEvent) -> Result<(), PostcraftError>;

    /// Returns the sender's pending post, if any.
    async fn get_pending(&self, sender: &SenderId) -> Result<Option<PendingPost>, PostcraftError>;

    /// Stores a pending post, replacing any existing one for the same sender.
    async fn set_pending(&self, post: &PendingPost) -> Result<(), PostcraftError>;

    /// Removes the sender's pending post. Missing drafts are not an error.
    async fn clear_pending(&self, sender: &SenderId) -> Result<(), PostcraftError>;

    /// Deletes every record tied to the sender, returning the number removed.
    async fn delete_all_for_sender(&self, sender: &SenderId) -> Result<u64, PostcraftError>;

    /// Persists an erasure receipt.
    async fn record_erasure(&self, receipt: &ErasureReceipt) -> Result<(), PostcraftError>;

    /// Looks up an erasure receipt by confirmation code.
    async fn get_erasure(&self, code: &str) -> Result<Option<ErasureReceipt>, PostcraftError>;
}
