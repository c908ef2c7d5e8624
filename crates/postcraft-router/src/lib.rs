// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification for postcraft.
//!
//! Maps an inbound message to exactly one [`Intent`] by walking a fixed,
//! prioritized rule table. No model call, no network, no scoring.
//!
//! [`Intent`]: postcraft_core::types::Intent

pub mod classifier;
pub mod payloads;

pub use classifier::{
    ClassifyError, EDIT_PREFIX, classify, classify_event, extract_theme, rule_names,
};
