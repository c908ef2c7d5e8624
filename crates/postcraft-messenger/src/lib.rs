// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messenger platform integration for postcraft.
//!
//! Covers both directions: parsing and authenticating webhook deliveries,
//! and sending replies through the Send API. Data-erasure signed requests
//! and attachment download live here as well since they share the app
//! secret and the platform's URL conventions.

pub mod channel;
pub mod fetch;
pub mod signature;
pub mod signed_request;
pub mod webhook;

pub use channel::{MAX_MESSAGE_LENGTH, MessengerChannel};
pub use fetch::HttpMediaFetcher;
pub use signature::{SIGNATURE_HEADER, sign_payload, verify_payload};
pub use signed_request::{SignedRequest, parse_signed_request, sign_request};
pub use webhook::{CHANNEL_NAME, VerifyQuery, WebhookPayload, parse_payload, verify_subscription};
