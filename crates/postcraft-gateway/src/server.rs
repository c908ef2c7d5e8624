// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::{get, post};
use postcraft_agent::Pipeline;
use postcraft_config::PostcraftConfig;
use postcraft_core::types::ChannelCapabilities;
use postcraft_core::{ChannelAdapter, PostcraftError, PublisherAdapter, StateStore};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{api, handlers, webhook};

/// Shared state for axum request handlers.
///
/// Adapters whose secrets are missing are `None`; endpoints that need them
/// answer 500.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<PostcraftConfig>,
    /// Present when the generation backend is configured.
    pub pipeline: Option<Arc<Pipeline>>,
    /// Messenger delivery, present when a page access token is configured.
    pub channel: Option<Arc<dyn ChannelAdapter>>,
    pub publisher: Option<Arc<dyn PublisherAdapter>>,
    pub store: Arc<dyn StateStore>,
    pub start_time: Instant,
}

impl GatewayState {
    pub fn pipeline(&self) -> Result<&Arc<Pipeline>, PostcraftError> {
        self.pipeline
            .as_ref()
            .ok_or_else(|| PostcraftError::Config("gemini.api_key is not set".into()))
    }

    pub fn channel(&self) -> Result<&Arc<dyn ChannelAdapter>, PostcraftError> {
        self.channel
            .as_ref()
            .ok_or_else(|| PostcraftError::Config("messenger.page_access_token is not set".into()))
    }

    pub fn publisher(&self) -> Result<&Arc<dyn PublisherAdapter>, PostcraftError> {
        self.publisher
            .as_ref()
            .ok_or_else(|| PostcraftError::Config("page publishing is not configured".into()))
    }
}

/// What the web app can render: inline media, no shortcut buttons, no length cap.
pub fn web_capabilities() -> ChannelCapabilities {
    ChannelCapabilities {
        supports_inline_media: true,
        supports_quick_replies: false,
        max_message_length: None,
    }
}

/// Builds the application router.
///
/// - GET/POST /webhook
/// - POST /publish
/// - POST /data-deletion, GET /deletion-status
/// - POST /v1/chat, /v1/story, /v1/image, /v1/speech
/// - GET /health
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/webhook",
            get(webhook::verify).post(webhook::receive),
        )
        .route("/publish", post(handlers::publish))
        .route("/data-deletion", post(handlers::data_deletion))
        .route("/deletion-status", get(handlers::deletion_status))
        .route("/health", get(handlers::health))
        .route("/v1/chat", post(api::chat))
        .route("/v1/story", post(api::story))
        .route("/v1/image", post(api::image))
        .route("/v1/speech", post(api::speech))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the gateway until `shutdown` is cancelled.
pub async fn start_server(
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), PostcraftError> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PostcraftError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| PostcraftError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
