// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed requests sent by the platform's data-deletion callback.
//!
//! Format: `base64url(signature).base64url(json payload)`, where the
//! signature is HMAC-SHA256 over the encoded payload segment.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::Mac;
use postcraft_core::PostcraftError;
use serde::{Deserialize, Serialize};

use crate::signature::HmacSha256;

const EXPECTED_ALGORITHM: &str = "HMAC-SHA256";

/// Decoded payload of a verified signed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRequest {
    pub algorithm: String,
    pub user_id: String,
    #[serde(default)]
    pub issued_at: Option<i64>,
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, PostcraftError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| PostcraftError::Verification(format!("signed request is not base64url: {e}")))
}

/// Verifies `signed_request` with `app_secret` and decodes its payload.
///
/// Any malformed part, a bad signature, or an unexpected algorithm is a
/// verification error.
pub fn parse_signed_request(
    signed_request: &str,
    app_secret: &str,
) -> Result<SignedRequest, PostcraftError> {
    let (sig_segment, payload_segment) = signed_request
        .trim()
        .split_once('.')
        .ok_or_else(|| PostcraftError::Verification("signed request has no payload".into()))?;

    let signature = decode_segment(sig_segment)?;
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .map_err(|e| PostcraftError::Internal(format!("invalid HMAC key: {e}")))?;
    mac.update(payload_segment.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| PostcraftError::Verification("signed request signature mismatch".into()))?;

    let payload = decode_segment(payload_segment)?;
    let request: SignedRequest = serde_json::from_slice(&payload).map_err(|e| {
        PostcraftError::Verification(format!("signed request payload is invalid: {e}"))
    })?;

    if !request.algorithm.eq_ignore_ascii_case(EXPECTED_ALGORITHM) {
        return Err(PostcraftError::Verification(format!(
            "unsupported signed request algorithm `{}`",
            request.algorithm
        )));
    }
    if request.user_id.trim().is_empty() {
        return Err(PostcraftError::Verification(
            "signed request has no user_id".into(),
        ));
    }
    Ok(request)
}

/// Builds a signed request for `payload`. Used by tests and local tooling.
pub fn sign_request(payload: &serde_json::Value, app_secret: &str) -> String {
    let payload_segment = URL_SAFE_NO_PAD.encode(payload.to_string());
    let signature = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(payload_segment.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        Err(_) => Vec::new(),
    };
    format!("{}.{payload_segment}", URL_SAFE_NO_PAD.encode(signature))
}
