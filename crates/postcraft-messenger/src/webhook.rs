// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook subscription handshake and delivery parsing.
//!
//! A delivery is a batch: `{object: "page", entry: [{messaging: [...]}]}`.
//! Each messaging item becomes one [`InboundEvent`] in delivery order.

use postcraft_core::PostcraftError;
use postcraft_core::types::{Attachment, AttachmentKind, InboundEvent, SenderId};
use serde::Deserialize;
use tracing::debug;

/// Channel name stamped on events from this webhook.
pub const CHANNEL_NAME: &str = "messenger";

/// Query of the subscription handshake. Accepts plain and `hub.`-prefixed names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(default, alias = "hub.mode")]
    pub mode: Option<String>,
    #[serde(default, alias = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(default, alias = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Returns the challenge to echo when the handshake is valid.
pub fn verify_subscription(query: &VerifyQuery, expected_token: &str) -> Result<String, PostcraftError> {
    if query.mode.as_deref() != Some("subscribe") {
        return Err(PostcraftError::Verification("mode is not `subscribe`".into()));
    }
    if query.verify_token.as_deref() != Some(expected_token) {
        return Err(PostcraftError::Verification("verify token mismatch".into()));
    }
    Ok(query.challenge.clone().unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub messaging: Vec<MessagingItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagingItem {
    pub sender: Party,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub postback: Option<Postback>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Party {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<IncomingAttachment>,
    #[serde(default)]
    pub quick_reply: Option<QuickReplyPayload>,
    /// Set on copies of messages the page itself sent.
    #[serde(default)]
    pub is_echo: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<AttachmentPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentPayload {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickReplyPayload {
    pub payload: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postback {
    pub payload: String,
}

/// Parses a raw delivery body.
///
/// Unparseable JSON and any `object` other than `page` are validation errors.
pub fn parse_payload(body: &[u8]) -> Result<WebhookPayload, PostcraftError> {
    let payload: WebhookPayload = serde_json::from_slice(body)
        .map_err(|e| PostcraftError::Validation(format!("webhook body is not valid JSON: {e}")))?;
    if payload.object != "page" {
        return Err(PostcraftError::Validation(format!(
            "unsupported webhook object `{}`",
            payload.object
        )));
    }
    Ok(payload)
}

fn attachment_kind(kind: &str) -> AttachmentKind {
    match kind {
        "image" => AttachmentKind::Image,
        "audio" => AttachmentKind::Audio,
        "video" => AttachmentKind::Video,
        _ => AttachmentKind::File,
    }
}

fn received_at(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(chrono::DateTime::from_timestamp_millis)
        .unwrap_or_else(chrono::Utc::now)
        .to_rfc3339()
}

impl WebhookPayload {
    /// Flattens the batch into events, preserving delivery order.
    ///
    /// Echoes and items with neither a message nor a postback (delivery and
    /// read receipts) are skipped. A postback payload is treated like a
    /// quick-reply payload.
    pub fn into_events(self) -> Vec<InboundEvent> {
        let mut events = Vec::new();
        for item in self.entry.into_iter().flat_map(|e| e.messaging) {
            let sender_id = SenderId(item.sender.id);
            let received_at = received_at(item.timestamp);

            let event = match (item.message, item.postback) {
                (Some(message), _) if message.is_echo => None,
                (Some(message), _) => Some(InboundEvent {
                    id: message
                        .mid
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    sender_id,
                    channel: CHANNEL_NAME.to_string(),
                    text: message.text,
                    quick_reply_payload: message.quick_reply.map(|q| q.payload),
                    attachments: message
                        .attachments
                        .into_iter()
                        .filter_map(|a| {
                            let url = a.payload.and_then(|p| p.url)?;
                            Some(Attachment {
                                kind: attachment_kind(&a.kind),
                                url,
                                mime_type: None,
                            })
                        })
                        .collect(),
                    received_at,
                }),
                (None, Some(postback)) => Some(InboundEvent {
                    id: uuid::Uuid::new_v4().to_string(),
                    sender_id,
                    channel: CHANNEL_NAME.to_string(),
                    text: None,
                    quick_reply_payload: Some(postback.payload),
                    attachments: Vec::new(),
                    received_at,
                }),
                (None, None) => None,
            };

            match event {
                Some(event) => events.push(event),
                None => debug!("skipping non-message webhook item"),
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_echoes_challenge() {
        let query: VerifyQuery = serde_json::from_value(serde_json::json!({
            "hub.mode": "subscribe",
            "hub.verify_token": "tok",
            "hub.challenge": "123",
        }))
        .unwrap();
        assert_eq!(verify_subscription(&query, "tok").unwrap(), "123");
    }

    #[test]
    fn handshake_rejects_bad_token_or_mode() {
        let bad_token = VerifyQuery {
            mode: Some("subscribe".into()),
            verify_token: Some("nope".into()),
            challenge: Some("1".into()),
        };
        assert!(verify_subscription(&bad_token, "tok").is_err());

        let bad_mode = VerifyQuery {
            mode: Some("unsubscribe".into()),
            verify_token: Some("tok".into()),
            challenge: Some("1".into()),
        };
        assert!(verify_subscription(&bad_mode, "tok").is_err());
    }

    #[test]
    fn non_page_object_is_rejected() {
        let err = parse_payload(br#"{"object":"instagram","entry":[]}"#).unwrap_err();
        assert!(matches!(err, PostcraftError::Validation(_)));
        assert!(parse_payload(b"not json").is_err());
    }

    #[test]
    fn batch_flattens_in_order_and_skips_receipts() {
        let body = serde_json::json!({
            "object": "page",
            "entry": [
                {"messaging": [
                    {"sender": {"id": "u1"}, "timestamp": 1700000000000i64,
                     "message": {"mid": "m1", "text": "Post funny story"}},
                    {"sender": {"id": "u1"}, "delivery": {"mids": ["x"]}}
                ]},
                {"messaging": [
                    {"sender": {"id": "u2"}, "message": {"mid": "m2", "text": "hi",
                     "quick_reply": {"payload": "FEATURE_CHAT"}}},
                    {"sender": {"id": "page"}, "message": {"mid": "m3", "text": "echo", "is_echo": true}},
                    {"sender": {"id": "u3"}, "postback": {"title": "Confirm", "payload": "CONFIRM_POST"}}
                ]}
            ]
        });
        let events = parse_payload(body.to_string().as_bytes())
            .unwrap()
            .into_events();

        let ids: Vec<&str> = events.iter().map(|e| e.sender_id.as_str()).collect();
        assert_eq!(ids, ["u1", "u2", "u3"]);
        assert_eq!(events[0].id, "m1");
        assert!(events[0].received_at.starts_with("2023-11-14"));
        assert_eq!(events[1].quick_reply_payload.as_deref(), Some("FEATURE_CHAT"));
        assert_eq!(events[2].quick_reply_payload.as_deref(), Some("CONFIRM_POST"));
    }

    #[test]
    fn image_attachments_are_extracted() {
        let body = br#"{"object":"page","entry":[{"messaging":[{"sender":{"id":"u1"},
            "message":{"text":"edit this image: add a hat","attachments":[
              {"type":"image","payload":{"url":"http://x/img.jpg"}},
              {"type":"fallback","payload":{}}]}}]}]}"#;
        let events = parse_payload(body).unwrap().into_events();
        assert_eq!(events[0].attachments.len(), 1);
        assert_eq!(events[0].first_image().unwrap().url, "http://x/img.jpg");
    }
}
