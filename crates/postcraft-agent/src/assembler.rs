// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns generated content into channel-appropriate messages.

use postcraft_core::types::{
    ChannelCapabilities, Citation, GeneratedContent, MediaData, MediaKind, MediaPayload,
    OutboundBody, OutboundMessage, QuickReply, SenderId,
};
use postcraft_router::payloads;
use serde::Serialize;

use crate::orchestrator::PendingStatus;
use crate::prompts;

/// A media item the channel can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedMedia {
    pub kind: MediaKind,
    pub media: MediaPayload,
}

/// A reply ready for delivery: text chunks, media, and shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AssembledReply {
    /// Text split to fit the channel's message limit.
    pub text: Vec<String>,
    pub attachments: Vec<AttachedMedia>,
    pub quick_replies: Vec<QuickReply>,
    pub citations: Vec<Citation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_suggestion: Option<String>,
}

impl AssembledReply {
    /// Joined text, as shown on a surface without a length limit.
    pub fn full_text(&self) -> String {
        self.text.join("\n")
    }

    /// Messages in send order: media first, then text. Quick replies ride
    /// on the last message.
    pub fn to_messages(&self, recipient: &SenderId) -> Vec<OutboundMessage> {
        let mut messages: Vec<OutboundMessage> = self
            .attachments
            .iter()
            .map(|a| OutboundMessage {
                recipient: recipient.clone(),
                body: OutboundBody::Attachment {
                    kind: a.kind,
                    media: a.media.clone(),
                },
                quick_replies: Vec::new(),
            })
            .chain(self.text.iter().map(|t| OutboundMessage {
                recipient: recipient.clone(),
                body: OutboundBody::Text { text: t.clone() },
                quick_replies: Vec::new(),
            }))
            .collect();

        if let Some(last) = messages.last_mut() {
            last.quick_replies = self.quick_replies.clone();
        }
        messages
    }
}

fn quick_reply(title: &str, payload: &str) -> QuickReply {
    QuickReply {
        title: title.to_string(),
        payload: payload.to_string(),
    }
}

/// Shortcut set offered under replies. The confirm shortcut leads when a
/// draft was just stored and is left out when storing it failed.
pub fn quick_replies(pending: PendingStatus) -> Vec<QuickReply> {
    let confirm = quick_reply("Confirm & Publish", payloads::CONFIRM_POST);
    let mut replies = vec![
        quick_reply("Chat", payloads::FEATURE_CHAT),
        quick_reply("Edit Image", payloads::FEATURE_EDIT_IMAGE),
        quick_reply("Daily Post", payloads::FEATURE_DAILY_POST),
        quick_reply("Schedule", payloads::FEATURE_SCHEDULE),
    ];
    match pending {
        PendingStatus::Created => replies.insert(0, confirm),
        PendingStatus::Unchanged => replies.push(confirm),
        PendingStatus::WriteFailed => {}
    }
    replies
}

fn render_sources(citations: &[Citation]) -> Option<String> {
    if citations.is_empty() {
        return None;
    }
    let mut out = String::from("Sources:");
    for (i, c) in citations.iter().enumerate() {
        out.push_str(&format!("\n{}. {} - {}", i + 1, c.title, c.uri));
    }
    Some(out)
}

/// Splits `text` into pieces of at most `max` characters, preferring
/// newline then space boundaries.
pub fn split_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text.trim();
    if max == 0 {
        return vec![rest.to_string()];
    }

    while rest.chars().count() > max {
        let hard = rest
            .char_indices()
            .nth(max)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..hard];
        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0)
            .unwrap_or(hard);
        chunks.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }
    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

/// Builds a reply for a channel with the given capabilities.
///
/// Media the channel cannot carry is replaced by a note naming its kind;
/// it is never dropped silently.
pub fn assemble(
    content: &GeneratedContent,
    capabilities: &ChannelCapabilities,
    pending: PendingStatus,
) -> AssembledReply {
    let mut text = content.text.trim().to_string();
    let mut attachments = Vec::new();

    for (kind, media) in content.media() {
        let deliverable = match media.data {
            MediaData::Url(_) => true,
            MediaData::Inline(_) => capabilities.supports_inline_media,
        };
        if deliverable {
            attachments.push(AttachedMedia {
                kind,
                media: media.clone(),
            });
        } else {
            append_paragraph(&mut text, &prompts::media_unavailable_note(&kind.to_string()));
        }
    }

    if let Some(sources) = render_sources(&content.citations) {
        append_paragraph(&mut text, &sources);
    }

    let quick_replies = if capabilities.supports_quick_replies {
        quick_replies(pending)
    } else {
        if pending == PendingStatus::Created {
            append_paragraph(&mut text, prompts::CONFIRM_HINT);
        }
        Vec::new()
    };

    let text = match capabilities.max_message_length {
        Some(max) => split_text(&text, max),
        None if text.is_empty() => Vec::new(),
        None => vec![text],
    };

    AssembledReply {
        text,
        attachments,
        quick_replies,
        citations: content.citations.clone(),
        song_suggestion: content.song_suggestion.clone(),
    }
}

fn append_paragraph(text: &mut String, paragraph: &str) {
    if !text.is_empty() {
        text.push_str("\n\n");
    }
    text.push_str(paragraph);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messenger() -> ChannelCapabilities {
        ChannelCapabilities {
            supports_inline_media: false,
            supports_quick_replies: true,
            max_message_length: Some(2000),
        }
    }

    fn web() -> ChannelCapabilities {
        ChannelCapabilities {
            supports_inline_media: true,
            supports_quick_replies: false,
            max_message_length: None,
        }
    }

    fn with_media() -> GeneratedContent {
        GeneratedContent {
            image: Some(MediaPayload::inline("image/png", "AAAA")),
            audio: Some(MediaPayload::inline("audio/wav", "BBBB")),
            ..GeneratedContent::text("A funny reel")
        }
    }

    #[test]
    fn inline_media_on_url_only_channel_becomes_notes() {
        let reply = assemble(&with_media(), &messenger(), PendingStatus::Unchanged);
        assert!(reply.attachments.is_empty());
        let text = reply.full_text();
        assert!(text.contains("generated image"));
        assert!(text.contains("generated audio"));
        assert!(text.contains("web app"));
    }

    #[test]
    fn url_media_is_attached_on_url_only_channel() {
        let content = GeneratedContent {
            image: Some(MediaPayload::url("image/png", "https://cdn.example/x.png")),
            ..GeneratedContent::text("hi")
        };
        let reply = assemble(&content, &messenger(), PendingStatus::Unchanged);
        assert_eq!(reply.attachments.len(), 1);
        assert_eq!(reply.attachments[0].kind, MediaKind::Image);
    }

    #[test]
    fn inline_media_passes_through_on_web() {
        let reply = assemble(&with_media(), &web(), PendingStatus::Unchanged);
        assert_eq!(reply.attachments.len(), 2);
        assert_eq!(reply.full_text(), "A funny reel");
        assert!(reply.quick_replies.is_empty());
    }

    #[test]
    fn confirm_leads_when_pending_created() {
        let replies = quick_replies(PendingStatus::Created);
        assert_eq!(replies[0].payload, payloads::CONFIRM_POST);
        assert_eq!(replies.len(), 5);

        let replies = quick_replies(PendingStatus::Unchanged);
        assert_eq!(replies[0].payload, payloads::FEATURE_CHAT);
        assert_eq!(replies[4].payload, payloads::CONFIRM_POST);

        let replies = quick_replies(PendingStatus::WriteFailed);
        assert!(replies.iter().all(|r| r.payload != payloads::CONFIRM_POST));
    }

    #[test]
    fn citations_render_as_sources() {
        let content = GeneratedContent {
            citations: vec![Citation {
                uri: "https://news.example/a".into(),
                title: "News".into(),
            }],
            ..GeneratedContent::text("Answer")
        };
        let reply = assemble(&content, &web(), PendingStatus::Unchanged);
        assert!(reply.full_text().contains("Sources:\n1. News - https://news.example/a"));
    }

    #[test]
    fn long_text_is_split_and_quick_replies_ride_last() {
        let long = "word ".repeat(1000);
        let reply = assemble(&GeneratedContent::text(long), &messenger(), PendingStatus::Created);
        assert!(reply.text.len() >= 3);
        assert!(reply.text.iter().all(|c| c.chars().count() <= 2000));

        let messages = reply.to_messages(&SenderId::from("u1"));
        let (last, rest) = messages.split_last().unwrap();
        assert_eq!(last.quick_replies[0].payload, payloads::CONFIRM_POST);
        assert!(rest.iter().all(|m| m.quick_replies.is_empty()));
    }

    #[test]
    fn split_prefers_whitespace_and_falls_back_to_hard_cut() {
        assert_eq!(split_text("aaa bbb", 5), ["aaa", "bbb"]);
        assert_eq!(split_text("abcdefgh", 3), ["abc", "def", "gh"]);
        assert!(split_text("   ", 10).is_empty());
    }

    #[test]
    fn pending_hint_replaces_shortcuts_without_quick_replies() {
        let reply = assemble(&GeneratedContent::text("Draft"), &web(), PendingStatus::Created);
        assert!(reply.full_text().contains("yes, post it"));
    }
}
