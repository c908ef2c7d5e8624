// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON API used by the web app.
//!
//! Replies carry media inline. Anything the web app generates goes through
//! the same orchestrator as Messenger traffic.

use axum::Json;
use axum::extract::State;
use postcraft_agent::AssembledReply;
use postcraft_core::PostcraftError;
use postcraft_core::types::{Attachment, AttachmentKind, InboundEvent, Intent, SenderId, Theme};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ApiError;
use crate::server::{GatewayState, web_capabilities};

/// Channel name stamped on events from the web app.
pub const WEB_CHANNEL: &str = "web";

/// The caller's sender id, or a fresh one so anonymous clients never share
/// a draft.
fn sender(id: Option<String>) -> SenderId {
    match id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(id) => SenderId(id),
        None => SenderId(format!("web-{}", uuid::Uuid::new_v4().simple())),
    }
}

#[derive(Debug, Serialize)]
pub struct ApiReply {
    /// Id the draft (if any) is stored under; send it back to confirm.
    pub sender_id: SenderId,
    pub intent: &'static str,
    #[serde(flatten)]
    pub reply: AssembledReply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Image to edit, as a `data:` URI or URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Shortcut payload, when a quick reply was tapped.
    #[serde(default)]
    pub payload: Option<String>,
}

/// POST /v1/chat: a free-form message, classified like a Messenger message.
#[instrument(skip_all)]
pub async fn chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiReply>, ApiError> {
    let pipeline = state.pipeline()?;
    let mut event = InboundEvent::text(WEB_CHANNEL, sender(body.sender_id), body.text);
    event.quick_reply_payload = body.payload;
    if let Some(url) = body.image_url.filter(|u| !u.trim().is_empty()) {
        event = event.with_attachment(Attachment {
            kind: AttachmentKind::Image,
            url,
            mime_type: None,
        });
    }

    let handled = pipeline.respond(&event, &web_capabilities()).await;
    Ok(Json(ApiReply {
        sender_id: event.sender_id,
        intent: handled.intent,
        reply: handled.reply,
        error: handled.failure.map(|_| "generation failed".to_string()),
    }))
}

async fn run_direct(
    state: &GatewayState,
    sender_id: Option<String>,
    intent: Intent,
) -> Result<Json<ApiReply>, ApiError> {
    let pipeline = state.pipeline()?;
    let event = InboundEvent::text(WEB_CHANNEL, sender(sender_id), "");
    let reply = pipeline
        .run_intent(&intent, &event, &web_capabilities())
        .await?;
    Ok(Json(ApiReply {
        sender_id: event.sender_id,
        intent: intent.kind(),
        reply,
        error: None,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StoryRequest {
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub song_suggestion: bool,
}

/// POST /v1/story
#[instrument(skip_all)]
pub async fn story(
    State(state): State<GatewayState>,
    Json(body): Json<StoryRequest>,
) -> Result<Json<ApiReply>, ApiError> {
    let intent = Intent::CreateStory {
        theme: body.theme,
        tts: body.tts,
        song_suggestion: body.song_suggestion,
    };
    run_direct(&state, body.sender_id, intent).await
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub sender_id: Option<String>,
    pub prompt: String,
}

/// POST /v1/image
#[instrument(skip_all)]
pub async fn image(
    State(state): State<GatewayState>,
    Json(body): Json<ImageRequest>,
) -> Result<Json<ApiReply>, ApiError> {
    let prompt = body.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(PostcraftError::Validation("prompt must not be empty".into()).into());
    }
    run_direct(&state, body.sender_id, Intent::GenerateImage { prompt }).await
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub sender_id: Option<String>,
    pub text: String,
}

/// POST /v1/speech
#[instrument(skip_all)]
pub async fn speech(
    State(state): State<GatewayState>,
    Json(body): Json<SpeechRequest>,
) -> Result<Json<ApiReply>, ApiError> {
    let text = body.text.trim().to_string();
    if text.is_empty() {
        return Err(PostcraftError::Validation("text must not be empty".into()).into());
    }
    run_direct(&state, body.sender_id, Intent::Speak { text }).await
}
