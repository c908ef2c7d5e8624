// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock attachment fetcher returning fixed bytes.

use async_trait::async_trait;
use tokio::sync::Mutex;

use postcraft_core::types::{AdapterType, FetchedMedia, HealthStatus};
use postcraft_core::{MediaFetcher, PluginAdapter, PostcraftError};

pub struct MockFetcher {
    media: FetchedMedia,
    urls: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Serves `b"image-bytes"` as `image/jpeg` for every URL.
    pub fn new() -> Self {
        Self::with_media(FetchedMedia {
            mime_type: "image/jpeg".to_string(),
            bytes: b"image-bytes".to_vec(),
        })
    }

    pub fn with_media(media: FetchedMedia) -> Self {
        Self {
            media,
            urls: Mutex::new(Vec::new()),
        }
    }

    /// URLs requested so far.
    pub async fn fetched(&self) -> Vec<String> {
        self.urls.lock().await.clone()
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockFetcher {
    fn name(&self) -> &str {
        "mock-fetcher"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Fetcher
    }

    async fn health_check(&self) -> Result<HealthStatus, PostcraftError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PostcraftError> {
        Ok(())
    }
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, PostcraftError> {
        self.urls.lock().await.push(url.to_string());
        Ok(self.media.clone())
    }
}
