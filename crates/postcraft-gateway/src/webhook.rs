// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messenger webhook endpoints.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use postcraft_core::PostcraftError;
use postcraft_messenger::{SIGNATURE_HEADER, VerifyQuery, parse_payload, verify_payload, verify_subscription};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Acknowledgement body for deliveries.
pub const EVENT_RECEIVED: &str = "EVENT_RECEIVED";

/// GET /webhook: subscription handshake. Echoes the challenge on success.
#[instrument(skip_all)]
pub async fn verify(State(state): State<GatewayState>, Query(query): Query<VerifyQuery>) -> Response {
    let Some(expected) = state.config.messenger.verify_token.as_deref() else {
        return ApiError(PostcraftError::Config("messenger.verify_token is not set".into()))
            .into_response();
    };
    match verify_subscription(&query, expected) {
        Ok(challenge) => {
            info!("webhook subscription verified");
            (StatusCode::OK, challenge).into_response()
        }
        Err(e) => {
            warn!(error = %e, "webhook verification rejected");
            (StatusCode::FORBIDDEN, "Forbidden").into_response()
        }
    }
}

/// POST /webhook: a batch of messaging events.
///
/// Every event is attempted in order before the batch is acknowledged.
#[instrument(skip_all)]
pub async fn receive(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let messenger = &state.config.messenger;
    if let Some(secret) = messenger.app_secret.as_deref().filter(|s| !s.is_empty()) {
        if messenger.verify_payload_signature {
            let header = headers
                .get(SIGNATURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if !verify_payload(secret, &body, header) {
                return Err(PostcraftError::Verification("invalid payload signature".into()).into());
            }
        }
    }

    let payload = parse_payload(&body)?;
    let pipeline = state.pipeline()?;
    let channel = state.channel()?;

    let events = payload.into_events();
    let outcomes = pipeline.handle_batch(events, channel.as_ref()).await;
    let failed = outcomes.iter().filter(|o| o.failure.is_some()).count();
    info!(events = outcomes.len(), failed, "webhook batch handled");

    Ok(EVENT_RECEIVED)
}
