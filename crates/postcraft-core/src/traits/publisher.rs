// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page publisher trait.

use async_trait::async_trait;

use crate::error::PostcraftError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MediaPayload, PostId};

/// Adapter that creates posts on the configured page.
#[async_trait]
pub trait PublisherAdapter: PluginAdapter {
    /// Publishes `text`, as a photo caption when `image` is present.
    ///
    /// Vendor rejections surface as [`PostcraftError::Publish`] carrying
    /// the vendor's message unchanged.
    async fn publish(
        &self,
        text: &str,
        image: Option<&MediaPayload>,
    ) -> Result<PostId, PostcraftError>;
}
