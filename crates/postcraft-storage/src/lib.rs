// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite state store for postcraft.
//!
//! Keeps the inbound event audit log, one pending post per sender, and
//! erasure receipts. Schema changes ship as embedded refinery migrations.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
