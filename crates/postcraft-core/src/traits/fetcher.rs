// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attachment download trait.

use async_trait::async_trait;

use crate::error::PostcraftError;
use crate::traits::adapter::PluginAdapter;
use crate::types::FetchedMedia;

/// Downloads attachment bytes referenced by an inbound event.
#[async_trait]
pub trait MediaFetcher: PluginAdapter {
    /// Fetches `url`, which may be an `http(s)` URL or a `data:` URI.
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, PostcraftError>;
}
