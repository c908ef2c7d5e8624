// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory state store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use postcraft_core::types::{
    AdapterType, ErasureReceipt, HealthStatus, InboundEvent, PendingPost, SenderId,
};
use postcraft_core::{PluginAdapter, PostcraftError, StateStore};

#[derive(Default)]
struct State {
    events: Vec<InboundEvent>,
    pending: HashMap<SenderId, PendingPost>,
    receipts: HashMap<String, ErasureReceipt>,
}

/// `StateStore` backed by maps. Writes can be made to fail.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_inbound: AtomicBool,
    fail_pending_writes: AtomicBool,
    fail_pending_clears: AtomicBool,
}

fn simulated(what: &str) -> PostcraftError {
    PostcraftError::Storage {
        source: format!("simulated {what} failure").into(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_inbound(&self, fail: bool) {
        self.fail_inbound.store(fail, Ordering::SeqCst);
    }

    pub fn fail_pending_writes(&self, fail: bool) {
        self.fail_pending_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_pending_clears(&self, fail: bool) {
        self.fail_pending_clears.store(fail, Ordering::SeqCst);
    }

    pub async fn events_for(&self, sender: &SenderId) -> Vec<InboundEvent> {
        self.state
            .lock()
            .await
            .events
            .iter()
            .filter(|e| &e.sender_id == sender)
            .cloned()
            .collect()
    }

    pub async fn event_count(&self) -> usize {
        self.state.lock().await.events.len()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PostcraftError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PostcraftError> {
        Ok(())
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn record_inbound(&self, event: &InboundEvent) -> Result<(), PostcraftError> {
        if self.fail_inbound.load(Ordering::SeqCst) {
            return Err(simulated("inbound write"));
        }
        self.state.lock().await.events.push(event.clone());
        Ok(())
    }

    async fn get_pending(&self, sender: &SenderId) -> Result<Option<PendingPost>, PostcraftError> {
        Ok(self.state.lock().await.pending.get(sender).cloned())
    }

    async fn set_pending(&self, post: &PendingPost) -> Result<(), PostcraftError> {
        if self.fail_pending_writes.load(Ordering::SeqCst) {
            return Err(simulated("pending write"));
        }
        self.state
            .lock()
            .await
            .pending
            .insert(post.sender_id.clone(), post.clone());
        Ok(())
    }

    async fn clear_pending(&self, sender: &SenderId) -> Result<(), PostcraftError> {
        if self.fail_pending_clears.load(Ordering::SeqCst) {
            return Err(simulated("pending clear"));
        }
        self.state.lock().await.pending.remove(sender);
        Ok(())
    }

    async fn delete_all_for_sender(&self, sender: &SenderId) -> Result<u64, PostcraftError> {
        let mut state = self.state.lock().await;
        let before = state.events.len();
        state.events.retain(|e| &e.sender_id != sender);
        state.pending.remove(sender);
        Ok((before - state.events.len()) as u64)
    }

    async fn record_erasure(&self, receipt: &ErasureReceipt) -> Result<(), PostcraftError> {
        self.state
            .lock()
            .await
            .receipts
            .insert(receipt.confirmation_code.clone(), receipt.clone());
        Ok(())
    }

    async fn get_erasure(&self, code: &str) -> Result<Option<ErasureReceipt>, PostcraftError> {
        Ok(self.state.lock().await.receipts.get(code).cloned())
    }
}
