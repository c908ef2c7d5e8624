// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP mapping of [`PostcraftError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use postcraft_core::PostcraftError;
use serde::Serialize;
use tracing::{error, warn};

/// Error body returned by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A handler error. Converts to a status code and JSON body.
#[derive(Debug)]
pub struct ApiError(pub PostcraftError);

impl From<PostcraftError> for ApiError {
    fn from(err: PostcraftError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            PostcraftError::Validation(_) => StatusCode::BAD_REQUEST,
            PostcraftError::Verification(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing text. Server-side failures use the sender-safe message.
    pub fn message(&self) -> String {
        match &self.0 {
            PostcraftError::Validation(_) | PostcraftError::Verification(_) => self.0.to_string(),
            PostcraftError::Config(msg) => format!("server is not configured: {msg}"),
            other => other.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self.0, "request failed");
        } else {
            warn!(status = %status, error = %self.0, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
