// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page publishing through the Graph API.
//!
//! A post with an image goes to `/{page_id}/photos` as a multipart upload
//! with the text as caption; a text-only post goes to `/{page_id}/feed`.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use postcraft_config::PostcraftConfig;
use postcraft_core::types::{AdapterType, HealthStatus, MediaData, MediaPayload, PostId};
use postcraft_core::{PluginAdapter, PostcraftError, PublisherAdapter};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, instrument};

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct GraphResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    post_id: Option<String>,
    #[serde(default)]
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

fn publish_error(message: impl Into<String>) -> PostcraftError {
    PostcraftError::Publish {
        message: message.into(),
    }
}

fn file_name(mime_type: &str) -> String {
    let ext = match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    };
    format!("post.{ext}")
}

/// Publishes posts to one page.
pub struct GraphPagePublisher {
    client: reqwest::Client,
    graph_root: String,
    page_id: String,
    access_token: String,
}

impl std::fmt::Debug for GraphPagePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphPagePublisher")
            .field("graph_root", &self.graph_root)
            .field("page_id", &self.page_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl GraphPagePublisher {
    pub fn new(
        graph_root: impl Into<String>,
        page_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, PostcraftError> {
        let client = reqwest::Client::builder()
            .timeout(PUBLISH_TIMEOUT)
            .build()
            .map_err(|e| PostcraftError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            graph_root: graph_root.into().trim_end_matches('/').to_string(),
            page_id: page_id.into(),
            access_token: access_token.into(),
        })
    }

    /// Builds the publisher from `[publisher]`, falling back to the
    /// Messenger page token when no publishing token is set.
    pub fn from_config(config: &PostcraftConfig) -> Result<Self, PostcraftError> {
        let page_id = config
            .publisher
            .page_id
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PostcraftError::Config("publisher.page_id is not set".into()))?;
        let token = config
            .publisher
            .page_access_token
            .clone()
            .or_else(|| config.messenger.page_access_token.clone())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PostcraftError::Config("no page access token configured".into()))?;
        Self::new(config.messenger.graph_root(), page_id, token)
    }

    fn photo_form(&self, text: &str, image: &MediaPayload) -> Result<Form, PostcraftError> {
        let form = Form::new().text("caption", text.to_string());
        match &image.data {
            MediaData::Inline(b64) => {
                let bytes = STANDARD
                    .decode(b64.trim())
                    .map_err(|e| PostcraftError::Validation(format!("image is not valid base64: {e}")))?;
                let part = Part::bytes(bytes)
                    .file_name(file_name(&image.mime_type))
                    .mime_str(&image.mime_type)
                    .map_err(|e| PostcraftError::Validation(format!("invalid image type: {e}")))?;
                Ok(form.part("source", part))
            }
            MediaData::Url(url) => Ok(form.text("url", url.clone())),
        }
    }

    async fn read_response(response: reqwest::Response) -> Result<PostId, PostcraftError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| publish_error(format!("failed to read publish response: {e}")))?;
        let parsed = serde_json::from_str::<GraphResponse>(&body).ok();

        if let Some(err) = parsed.as_ref().and_then(|p| p.error.as_ref()) {
            return Err(publish_error(err.message.clone()));
        }
        if !status.is_success() {
            return Err(publish_error(format!("page API returned {status}: {body}")));
        }

        parsed
            .and_then(|p| p.post_id.or(p.id))
            .map(PostId)
            .ok_or_else(|| publish_error("page API response carried no post id"))
    }
}

#[async_trait]
impl PluginAdapter for GraphPagePublisher {
    fn name(&self) -> &str {
        "graph-page"
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
        debug!("page publisher shutting down");
        Ok(())
    }
}

#[async_trait]
impl PublisherAdapter for GraphPagePublisher {
    #[instrument(skip_all, fields(page_id = %self.page_id, has_image = image.is_some()))]
    async fn publish(
        &self,
        text: &str,
        image: Option<&MediaPayload>,
    ) -> Result<PostId, PostcraftError> {
        let request = match image {
            Some(image) => self
                .client
                .post(format!("{}/{}/photos", self.graph_root, self.page_id))
                .query(&[("access_token", self.access_token.as_str())])
                .multipart(self.photo_form(text, image)?),
            None => self
                .client
                .post(format!("{}/{}/feed", self.graph_root, self.page_id))
                .query(&[("access_token", self.access_token.as_str())])
                .json(&serde_json::json!({ "message": text })),
        };

        let response = request
            .send()
            .await
            .map_err(|e| publish_error(format!("publish request failed: {e}")))?;
        let post_id = Self::read_response(response).await?;
        info!(post_id = %post_id.0, "post published");
        Ok(post_id)
    }
}
