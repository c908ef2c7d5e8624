// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for postcraft.
//!
//! Hosts the Messenger webhook, page publishing, the data-deletion callback
//! and its status page, and the JSON API used by the web app.

pub mod api;
pub mod error;
pub mod handlers;
pub mod server;
pub mod webhook;

pub use error::ApiError;
pub use server::{GatewayState, router, start_server, web_capabilities};
pub use webhook::EVENT_RECEIVED;
