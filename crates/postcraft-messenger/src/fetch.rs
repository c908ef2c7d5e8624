// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attachment download over HTTP, with `data:` URI support for web uploads.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use postcraft_core::types::{AdapterType, FetchedMedia, HealthStatus, MediaPayload};
use postcraft_core::{MediaFetcher, PluginAdapter, PostcraftError};
use tracing::debug;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

fn fetch_error(message: String) -> PostcraftError {
    PostcraftError::Channel {
        message,
        source: None,
    }
}

/// Downloads attachments referenced by inbound events.
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
}

impl HttpMediaFetcher {
    pub fn new() -> Result<Self, PostcraftError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| PostcraftError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }

    fn decode_data_uri(uri: &str) -> Result<FetchedMedia, PostcraftError> {
        let payload = MediaPayload::from_data_uri(uri)
            .ok_or_else(|| PostcraftError::Validation("malformed data URI".into()))?;
        let bytes = STANDARD
            .decode(payload.inline_data().unwrap_or_default())
            .map_err(|e| PostcraftError::Validation(format!("data URI is not valid base64: {e}")))?;
        Ok(FetchedMedia {
            mime_type: payload.mime_type,
            bytes,
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpMediaFetcher {
    fn name(&self) -> &str {
        "http-fetcher"
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
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, PostcraftError> {
        if url.trim_start().starts_with("data:") {
            return Self::decode_data_uri(url);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PostcraftError::Channel {
                message: format!("attachment download failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("attachment download returned {status}")));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "image/jpeg".to_string());

        let bytes = response.bytes().await.map_err(|e| PostcraftError::Channel {
            message: format!("failed to read attachment body: {e}"),
            source: Some(Box::new(e)),
        })?;

        debug!(mime_type = %mime_type, size = bytes.len(), "attachment downloaded");
        Ok(FetchedMedia {
            mime_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn data_uri_is_decoded_locally() {
        let fetcher = HttpMediaFetcher::new().unwrap();
        let media = fetcher.fetch("data:image/png;base64,aGVsbG8=").await.unwrap();
        assert_eq!(media.mime_type, "image/png");
        assert_eq!(media.bytes, b"hello");
    }

    #[tokio::test]
    async fn bad_data_uri_is_validation_error() {
        let fetcher = HttpMediaFetcher::new().unwrap();
        let err = fetcher.fetch("data:image/png;base64,@@@").await.unwrap_err();
        assert!(matches!(err, PostcraftError::Validation(_)));
    }

    #[tokio::test]
    async fn http_download_keeps_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/webp; charset=binary")
                    .set_body_bytes(vec![1u8, 2, 3]),
            )
            .mount(&server)
            .await;

        let fetcher = HttpMediaFetcher::new().unwrap();
        let media = fetcher
            .fetch(&format!("{}/img.jpg", server.uri()))
            .await
            .unwrap();
        assert_eq!(media.mime_type, "image/webp");
        assert_eq!(media.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn not_found_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpMediaFetcher::new().unwrap();
        assert!(fetcher.fetch(&format!("{}/gone", server.uri())).await.is_err());
    }
}
