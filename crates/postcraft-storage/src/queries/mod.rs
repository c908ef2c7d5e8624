// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries. Each function takes a [`Database`](crate::Database) and
//! runs through its single background connection.

pub mod erasure;
pub mod events;
pub mod pending;
