// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The request pipeline of postcraft.
//!
//! [`Pipeline`] ties the intent classifier to the [`Orchestrator`], which
//! runs generation workflows, and to the response [`assembler`], which
//! shapes results for the delivery channel.

pub mod assembler;
pub mod orchestrator;
pub mod pipeline;
pub mod prompts;
pub mod shutdown;

pub use assembler::{AssembledReply, AttachedMedia, assemble};
pub use orchestrator::{Orchestrator, PendingStatus, Reply, extract_song_suggestion};
pub use pipeline::{EventOutcome, Handled, Pipeline};
pub use shutdown::install_signal_handler;
