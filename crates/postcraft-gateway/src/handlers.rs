// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publishing, data deletion, and health endpoints.

use axum::extract::{FromRequest, Query, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use postcraft_config::missing_secrets;
use postcraft_core::types::{ErasureReceipt, MediaPayload, SenderId};
use postcraft_core::PostcraftError;
use postcraft_messenger::parse_signed_request;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /publish.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// `data:` URI, or a public image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishResponse {
    fn failed(status: StatusCode, error: String) -> Response {
        (
            status,
            Json(Self {
                success: false,
                post_id: None,
                error: Some(error),
            }),
        )
            .into_response()
    }
}

fn image_from_url(url: &str) -> Result<MediaPayload, PostcraftError> {
    let url = url.trim();
    if url.starts_with("data:") {
        return MediaPayload::from_data_uri(url)
            .ok_or_else(|| PostcraftError::Validation("imageUrl is not a base64 data URI".into()));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(MediaPayload::url("image/jpeg", url));
    }
    Err(PostcraftError::Validation(
        "imageUrl must be a data URI or an http(s) URL".into(),
    ))
}

/// POST /publish: publish text and/or an image straight from the web app.
#[instrument(skip_all)]
pub async fn publish(State(state): State<GatewayState>, Json(body): Json<PublishRequest>) -> Response {
    let text = body.text.unwrap_or_default();
    let image_url = body.image_url.filter(|u| !u.trim().is_empty());
    if text.trim().is_empty() && image_url.is_none() {
        return PublishResponse::failed(
            StatusCode::BAD_REQUEST,
            "nothing to publish: provide text or imageUrl".into(),
        );
    }

    let image = match image_url.as_deref().map(image_from_url).transpose() {
        Ok(image) => image,
        Err(e) => return PublishResponse::failed(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let publisher = match state.publisher() {
        Ok(p) => p,
        Err(e) => return PublishResponse::failed(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    match publisher.publish(text.trim(), image.as_ref()).await {
        Ok(post_id) => {
            info!(post_id = %post_id.0, "published from web app");
            Json(PublishResponse {
                success: true,
                post_id: Some(post_id.0),
                error: None,
            })
            .into_response()
        }
        Err(PostcraftError::Publish { message }) => {
            warn!(error = %message, "page publish rejected");
            PublishResponse::failed(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
        Err(e) => PublishResponse::failed(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Body of POST /data-deletion, as JSON or form data.
#[derive(Debug, Deserialize)]
pub struct DeletionRequest {
    pub signed_request: String,
}

#[derive(Debug, Serialize)]
pub struct DeletionResponse {
    pub url: String,
    pub confirmation_code: String,
}

async fn deletion_body(req: Request) -> Result<DeletionRequest, PostcraftError> {
    let is_json = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if is_json {
        let Json(body) = Json::<DeletionRequest>::from_request(req, &())
            .await
            .map_err(|e| PostcraftError::Validation(e.body_text()))?;
        Ok(body)
    } else {
        let Form(body) = Form::<DeletionRequest>::from_request(req, &())
            .await
            .map_err(|e| PostcraftError::Validation(e.body_text()))?;
        Ok(body)
    }
}

/// POST /data-deletion: verified erasure of everything stored for a user.
///
/// Nothing is deleted unless the signed request verifies.
#[instrument(skip_all)]
pub async fn data_deletion(
    State(state): State<GatewayState>,
    req: Request,
) -> Result<Json<DeletionResponse>, ApiError> {
    let secret = state
        .config
        .messenger
        .app_secret
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PostcraftError::Config("messenger.app_secret is not set".into()))?;

    let body = deletion_body(req).await?;
    let signed = parse_signed_request(&body.signed_request, &secret)?;

    let records_deleted = state
        .store
        .delete_all_for_sender(&SenderId(signed.user_id))
        .await?;

    let receipt = ErasureReceipt {
        confirmation_code: uuid::Uuid::new_v4().simple().to_string(),
        records_deleted,
        erased_at: chrono::Utc::now().to_rfc3339(),
    };
    state.store.record_erasure(&receipt).await?;
    info!(
        confirmation_code = %receipt.confirmation_code,
        records_deleted,
        "user data erased"
    );

    Ok(Json(DeletionResponse {
        url: format!(
            "{}/deletion-status?code={}",
            state.config.server.base_url(),
            receipt.confirmation_code
        ),
        confirmation_code: receipt.confirmation_code,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletionStatus {
    pub status: &'static str,
    #[serde(flatten)]
    pub receipt: ErasureReceipt,
}

/// GET /deletion-status?code=
pub async fn deletion_status(
    State(state): State<GatewayState>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, ApiError> {
    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| PostcraftError::Validation("missing `code` parameter".into()))?;

    match state.store.get_erasure(code.trim()).await? {
        Some(receipt) => Ok(Json(DeletionStatus {
            status: "deleted",
            receipt,
        })
        .into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(crate::error::ErrorResponse {
                error: "unknown confirmation code".into(),
            }),
        )
            .into_response()),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    /// Settings whose absence disables endpoints.
    pub missing: Vec<&'static str>,
}

/// GET /health
pub async fn health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let missing = missing_secrets(&state.config);
    Json(HealthResponse {
        status: if missing.is_empty() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
        missing,
    })
}
