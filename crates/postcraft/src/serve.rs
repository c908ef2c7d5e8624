// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postcraft serve` command implementation.
//!
//! Wires the state store, generation backend, Messenger delivery, media
//! fetcher, and page publisher into the pipeline, then serves the gateway
//! until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Instant;

use postcraft_agent::{Orchestrator, Pipeline, install_signal_handler};
use postcraft_config::PostcraftConfig;
use postcraft_core::{
    ChannelAdapter, HealthStatus, PluginAdapter, PostcraftError, PublisherAdapter, StateStore,
};
use postcraft_gateway::{GatewayState, start_server};
use postcraft_gemini::GeminiGenerator;
use postcraft_messenger::{HttpMediaFetcher, MessengerChannel};
use postcraft_publisher::GraphPagePublisher;
use postcraft_storage::SqliteStore;
use tracing::{info, warn};

/// Adapters shared by `serve` and `shell`.
pub(crate) struct Components {
    pub store: Arc<dyn StateStore>,
    pub pipeline: Option<Arc<Pipeline>>,
    pub channel: Option<Arc<dyn ChannelAdapter>>,
    pub publisher: Option<Arc<dyn PublisherAdapter>>,
}

/// Builds every adapter the configuration allows.
///
/// Missing secrets leave the matching adapter out instead of failing, so
/// the endpoints that do not need it keep working.
pub(crate) fn build_components(config: &PostcraftConfig) -> Result<Components, PostcraftError> {
    let store: Arc<dyn StateStore> = Arc::new(SqliteStore::new(config.storage.clone()));

    let publisher: Option<Arc<dyn PublisherAdapter>> =
        match GraphPagePublisher::from_config(config) {
            Ok(publisher) => Some(Arc::new(publisher)),
            Err(e) => {
                warn!(error = %e, "page publishing disabled");
                None
            }
        };

    let channel: Option<Arc<dyn ChannelAdapter>> = match MessengerChannel::new(&config.messenger) {
        Ok(channel) => Some(Arc::new(channel)),
        Err(e) => {
            warn!(error = %e, "Messenger delivery disabled");
            None
        }
    };

    let pipeline = match GeminiGenerator::new(&config.gemini) {
        Ok(generator) => {
            let fetcher = Arc::new(HttpMediaFetcher::new()?);
            let orchestrator = Orchestrator::new(
                Arc::new(generator),
                store.clone(),
                fetcher,
                publisher.clone(),
            );
            Some(Arc::new(Pipeline::new(orchestrator, store.clone())))
        }
        Err(e) => {
            warn!(error = %e, "generation backend disabled");
            None
        }
    };

    Ok(Components {
        store,
        pipeline,
        channel,
        publisher,
    })
}

/// Runs the `postcraft serve` command.
pub async fn run_serve(config: PostcraftConfig) -> Result<(), PostcraftError> {
    let missing = postcraft_config::missing_secrets(&config);
    if !missing.is_empty() {
        warn!(missing = ?missing, "starting with secrets missing");
    }

    let components = build_components(&config)?;
    // Open the database now so a bad path fails at startup.
    if let HealthStatus::Unhealthy(reason) = components.store.health_check().await? {
        return Err(PostcraftError::Config(format!("state store unavailable: {reason}")));
    }

    let state = GatewayState {
        config: Arc::new(config),
        pipeline: components.pipeline,
        channel: components.channel,
        publisher: components.publisher,
        store: components.store,
        start_time: Instant::now(),
    };

    let cancel = install_signal_handler();
    info!("postcraft serving");
    start_server(state, cancel).await?;
    info!("postcraft stopped");
    Ok(())
}
