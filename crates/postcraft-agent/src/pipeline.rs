// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event pipeline: record, classify, generate, assemble, deliver.
//!
//! Events in a batch are handled strictly in order. A failure in one event
//! becomes an error reply to its sender and never stops the batch.

use std::sync::Arc;

use postcraft_core::types::{ChannelCapabilities, GeneratedContent, InboundEvent, Intent, SenderId};
use postcraft_core::{ChannelAdapter, PostcraftError, StateStore};
use postcraft_router::classify_event;
use tracing::{debug, info, instrument, warn};

use crate::assembler::{AssembledReply, assemble};
use crate::orchestrator::{Orchestrator, PendingStatus};

/// Reply produced for one event, before delivery.
#[derive(Debug, Clone)]
pub struct Handled {
    /// Intent tag, or `clarification` when classification asked for more input.
    pub intent: &'static str,
    pub reply: AssembledReply,
    /// Internal description of the failure that replaced the normal reply.
    pub failure: Option<String>,
}

/// Result of handling and delivering one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    pub sender_id: SenderId,
    pub intent: &'static str,
    pub failure: Option<String>,
    /// Messages accepted by the channel.
    pub sent: usize,
    pub delivery_error: Option<String>,
}

pub struct Pipeline {
    orchestrator: Orchestrator,
    store: Arc<dyn StateStore>,
}

impl Pipeline {
    pub fn new(orchestrator: Orchestrator, store: Arc<dyn StateStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Runs one known intent and assembles the reply. Errors propagate.
    pub async fn run_intent(
        &self,
        intent: &Intent,
        event: &InboundEvent,
        capabilities: &ChannelCapabilities,
    ) -> Result<AssembledReply, PostcraftError> {
        let reply = self.orchestrator.run(intent, event).await?;
        Ok(assemble(&reply.content, capabilities, reply.pending))
    }

    /// Records, classifies, and answers one event. Always yields a reply.
    ///
    /// Audit write failures are logged and ignored.
    #[instrument(skip_all, fields(sender_id = %event.sender_id, channel = %event.channel))]
    pub async fn respond(&self, event: &InboundEvent, capabilities: &ChannelCapabilities) -> Handled {
        if let Err(e) = self.store.record_inbound(event).await {
            warn!(error = %e, "failed to record inbound event");
        }

        let intent = match classify_event(event) {
            Ok(intent) => intent,
            Err(e) => {
                debug!(reason = %e, "asking sender for clarification");
                return Handled {
                    intent: "clarification",
                    reply: assemble(
                        &GeneratedContent::text(e.clarification()),
                        capabilities,
                        PendingStatus::Unchanged,
                    ),
                    failure: None,
                };
            }
        };

        let kind = intent.kind();
        info!(intent = kind, "intent classified");
        match self.run_intent(&intent, event, capabilities).await {
            Ok(reply) => Handled {
                intent: kind,
                reply,
                failure: None,
            },
            Err(e) => {
                warn!(intent = kind, error = %e, "workflow failed");
                Handled {
                    intent: kind,
                    reply: assemble(
                        &GeneratedContent::text(e.user_message()),
                        capabilities,
                        PendingStatus::Unchanged,
                    ),
                    failure: Some(e.to_string()),
                }
            }
        }
    }

    /// Answers one event and sends the reply through `channel`.
    pub async fn deliver(&self, event: &InboundEvent, channel: &dyn ChannelAdapter) -> EventOutcome {
        let handled = self.respond(event, &channel.capabilities()).await;
        let mut outcome = EventOutcome {
            sender_id: event.sender_id.clone(),
            intent: handled.intent,
            failure: handled.failure,
            sent: 0,
            delivery_error: None,
        };

        for message in handled.reply.to_messages(&event.sender_id) {
            match channel.send(message).await {
                Ok(_) => outcome.sent += 1,
                Err(e) => {
                    warn!(sender_id = %event.sender_id, error = %e, "reply delivery failed");
                    outcome.delivery_error = Some(e.to_string());
                    break;
                }
            }
        }
        outcome
    }

    /// Handles a delivery batch in order, one event at a time.
    pub async fn handle_batch(
        &self,
        events: Vec<InboundEvent>,
        channel: &dyn ChannelAdapter,
    ) -> Vec<EventOutcome> {
        let mut outcomes = Vec::with_capacity(events.len());
        for event in &events {
            outcomes.push(self.deliver(event, channel).await);
        }
        debug!(count = outcomes.len(), "batch handled");
        outcomes
    }
}
