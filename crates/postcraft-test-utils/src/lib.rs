// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for postcraft integration tests.
//!
//! Mock adapters for every trait seam plus a [`TestHarness`] that wires
//! them into a real [`postcraft_agent::Pipeline`].

pub mod harness;
pub mod memory_store;
pub mod mock_channel;
pub mod mock_fetcher;
pub mod mock_generator;
pub mod mock_publisher;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::MemoryStore;
pub use mock_channel::MockChannel;
pub use mock_fetcher::MockFetcher;
pub use mock_generator::{GenerationCall, MockGenerator};
pub use mock_publisher::{MockPublisher, PublishCall};
