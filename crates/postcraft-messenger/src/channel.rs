// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Send API delivery channel.

use std::time::Duration;

use async_trait::async_trait;
use postcraft_config::model::MessengerConfig;
use postcraft_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, MediaData, MessageId, OutboundBody,
    OutboundMessage, QuickReply,
};
use postcraft_core::{ChannelAdapter, PluginAdapter, PostcraftError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Longest text the Send API accepts in one message.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    recipient: Recipient<'a>,
    message: SendMessage<'a>,
    messaging_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<SendAttachment<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    quick_replies: Vec<SendQuickReply<'a>>,
}

#[derive(Debug, Serialize)]
struct SendAttachment<'a> {
    #[serde(rename = "type")]
    kind: String,
    payload: AttachmentSource<'a>,
}

#[derive(Debug, Serialize)]
struct AttachmentSource<'a> {
    url: &'a str,
    is_reusable: bool,
}

#[derive(Debug, Serialize)]
struct SendQuickReply<'a> {
    content_type: &'static str,
    title: &'a str,
    payload: &'a str,
}

impl<'a> From<&'a QuickReply> for SendQuickReply<'a> {
    fn from(q: &'a QuickReply) -> Self {
        Self {
            content_type: "text",
            title: &q.title,
            payload: &q.payload,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorResponse {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

fn channel_error(message: String) -> PostcraftError {
    PostcraftError::Channel {
        message,
        source: None,
    }
}

/// Delivers replies through `POST {graph}/me/messages`.
pub struct MessengerChannel {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl MessengerChannel {
    /// Creates the channel. A missing page access token is a configuration error.
    pub fn new(config: &MessengerConfig) -> Result<Self, PostcraftError> {
        let access_token = config
            .page_access_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PostcraftError::Config("messenger.page_access_token is not set".into()))?;

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| PostcraftError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/me/messages", config.graph_root()),
            access_token,
        })
    }

    fn request_body<'a>(msg: &'a OutboundMessage) -> Result<SendRequest<'a>, PostcraftError> {
        let message = match &msg.body {
            OutboundBody::Text { text } => SendMessage {
                text: Some(text),
                attachment: None,
                quick_replies: msg.quick_replies.iter().map(Into::into).collect(),
            },
            OutboundBody::Attachment { kind, media } => {
                let url = match &media.data {
                    MediaData::Url(url) => url,
                    MediaData::Inline(_) => {
                        return Err(channel_error(format!(
                            "inline {kind} cannot be sent through Messenger"
                        )));
                    }
                };
                SendMessage {
                    text: None,
                    attachment: Some(SendAttachment {
                        kind: kind.to_string(),
                        payload: AttachmentSource {
                            url,
                            is_reusable: true,
                        },
                    }),
                    quick_replies: msg.quick_replies.iter().map(Into::into).collect(),
                }
            }
        };

        Ok(SendRequest {
            recipient: Recipient {
                id: msg.recipient.as_str(),
            },
            message,
            messaging_type: "RESPONSE",
        })
    }
}

#[async_trait]
impl PluginAdapter for MessengerChannel {
    fn name(&self) -> &str {
        "messenger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PostcraftError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PostcraftError> {
        debug!("Messenger channel shutting down");
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MessengerChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_inline_media: false,
            supports_quick_replies: true,
            max_message_length: Some(MAX_MESSAGE_LENGTH),
        }
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, PostcraftError> {
        let body = Self::request_body(&msg)?;
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("access_token", self.access_token.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| PostcraftError::Channel {
                message: format!("Send API request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| PostcraftError::Channel {
            message: format!("failed to read Send API response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<GraphErrorResponse>(&text) {
                Ok(err) => err.error.message,
                Err(_) => format!("Send API returned {status}: {text}"),
            };
            warn!(recipient = %msg.recipient, status = %status, "message delivery failed");
            return Err(channel_error(message));
        }

        let parsed: SendResponse = serde_json::from_str(&text).unwrap_or(SendResponse {
            message_id: None,
        });
        debug!(recipient = %msg.recipient, "message delivered");
        Ok(MessageId(parsed.message_id.unwrap_or_default()))
    }
}
