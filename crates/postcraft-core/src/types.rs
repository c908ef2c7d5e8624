// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the postcraft pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque identifier of the person who sent an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenderId(pub String);

impl SenderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SenderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SenderId {
    fn from(value: &str) -> Self {
        SenderId(value.to_string())
    }
}

/// Identifier returned by the messaging platform for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Identifier of a post created on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Generation,
    Storage,
    Publisher,
    Fetcher,
}

// --- Inbound ---

/// Kind tag of an inbound attachment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Audio,
    Video,
    File,
}

/// A file attached to an inbound message, referenced by URL.
///
/// The URL may be a `data:` URI when the web app uploads a file directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// A single message received from a surface, immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Platform message id, or a generated UUID when the surface has none.
    pub id: String,
    pub sender_id: SenderId,
    /// Surface the event arrived on (`messenger`, `web`, `cli`).
    pub channel: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Payload of a tapped quick reply, if any.
    #[serde(default)]
    pub quick_reply_payload: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// RFC 3339 receipt timestamp.
    pub received_at: String,
}

impl InboundEvent {
    /// Builds a text-only event stamped with the current time.
    pub fn text(channel: &str, sender_id: SenderId, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id,
            channel: channel.to_string(),
            text: Some(text.into()),
            quick_reply_payload: None,
            attachments: Vec::new(),
            received_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Adds an attachment, returning the event.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn has_image(&self) -> bool {
        self.first_image().is_some()
    }

    pub fn first_image(&self) -> Option<&Attachment> {
        self.attachments
            .iter()
            .find(|a| a.kind == AttachmentKind::Image)
    }
}

// --- Intent ---

/// Theme vocabulary for generated posts and stories.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Inspirational,
    Sad,
    Storytelling,
    Funny,
}

impl Theme {
    /// Fixed scan order used when extracting a theme from free text.
    pub const SCAN_ORDER: [Theme; 4] = [
        Theme::Inspirational,
        Theme::Sad,
        Theme::Storytelling,
        Theme::Funny,
    ];

    /// Keyword matched against message text.
    pub fn keyword(self) -> &'static str {
        match self {
            Theme::Inspirational => "inspirational",
            Theme::Sad => "sad",
            Theme::Storytelling => "storytelling",
            Theme::Funny => "funny",
        }
    }
}

/// Shape of a generated daily post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PostType {
    /// Longer text post; no image step.
    RegularPost,
    /// Short story/reel text with a vertical image.
    StoryReel,
}

/// Features reachable from quick-reply shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    Chat,
    EditImage,
    DailyPost,
    Schedule,
}

/// The classified purpose of an inbound message. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Free-form grounded chat.
    Chat { text: String },
    /// Themed post generation.
    DailyPost {
        theme: Theme,
        post_type: PostType,
        tts: bool,
    },
    /// Story creation, optionally narrated and with a song suggestion.
    CreateStory {
        theme: Theme,
        tts: bool,
        song_suggestion: bool,
    },
    /// Edit the attached image according to `prompt`.
    EditImage { prompt: String },
    /// Image from a text prompt.
    GenerateImage { prompt: String },
    /// Speech synthesis of `text`.
    Speak { text: String },
    /// Publish the sender's pending post.
    ConfirmPost,
    /// "Post now" phrasing: explain what can and cannot be published from chat.
    PostingLimits,
    /// Explain that scheduling lives in the web app.
    ScheduleHelp,
    /// Canned prompt for a quick-reply feature shortcut.
    FeaturePrompt(Feature),
    /// Empty message.
    Greeting,
}

impl Intent {
    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Chat { .. } => "chat",
            Intent::DailyPost { .. } => "daily_post",
            Intent::CreateStory { .. } => "create_story",
            Intent::EditImage { .. } => "edit_image",
            Intent::GenerateImage { .. } => "generate_image",
            Intent::Speak { .. } => "speak",
            Intent::ConfirmPost => "confirm_post",
            Intent::PostingLimits => "posting_limits",
            Intent::ScheduleHelp => "schedule_help",
            Intent::FeaturePrompt(_) => "feature_prompt",
            Intent::Greeting => "greeting",
        }
    }
}

// --- Generated content ---

/// Media category, used for attachment types and degradation notes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

/// Where the bytes of a media payload live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum MediaData {
    /// Base64-encoded bytes.
    Inline(String),
    /// A URL the recipient can fetch.
    Url(String),
}

/// A media item with its media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    pub mime_type: String,
    pub data: MediaData,
}

impl MediaPayload {
    pub fn inline(mime_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: MediaData::Inline(base64.into()),
        }
    }

    pub fn url(mime_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: MediaData::Url(url.into()),
        }
    }

    /// Base64 body when the payload is inline.
    pub fn inline_data(&self) -> Option<&str> {
        match &self.data {
            MediaData::Inline(b64) => Some(b64),
            MediaData::Url(_) => None,
        }
    }

    /// Parses a base64 `data:<mime>;base64,<data>` URI into an inline payload.
    ///
    /// Returns `None` for other URI forms. The base64 body is not decoded.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.trim().strip_prefix("data:")?;
        let (meta, data) = rest.split_once(',')?;
        let mime_type = meta.strip_suffix(";base64")?;
        if data.is_empty() {
            return None;
        }
        let mime_type = if mime_type.is_empty() {
            "application/octet-stream"
        } else {
            mime_type
        };
        Some(Self::inline(mime_type, data))
    }

    /// `data:` URI form of an inline payload.
    pub fn to_data_uri(&self) -> Option<String> {
        self.inline_data()
            .map(|b64| format!("data:{};base64,{b64}", self.mime_type))
    }
}

/// A source returned alongside web-grounded text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

/// The result of one generation workflow. Request-scoped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub text: String,
    #[serde(default)]
    pub image: Option<MediaPayload>,
    /// WAV audio.
    #[serde(default)]
    pub audio: Option<MediaPayload>,
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// `"Title by Artist"` extracted from a story, if any.
    #[serde(default)]
    pub song_suggestion: Option<String>,
}

impl GeneratedContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Appends an explanatory note as its own paragraph.
    pub fn push_note(&mut self, note: &str) {
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(note);
    }

    /// Media items in display order.
    pub fn media(&self) -> Vec<(MediaKind, &MediaPayload)> {
        let mut items = Vec::new();
        if let Some(image) = &self.image {
            items.push((MediaKind::Image, image));
        }
        if let Some(audio) = &self.audio {
            items.push((MediaKind::Audio, audio));
        }
        items
    }
}

/// Server-held draft awaiting explicit confirmation before publishing.
///
/// At most one exists per sender; a newer generation overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPost {
    pub sender_id: SenderId,
    pub text: String,
    #[serde(default)]
    pub image: Option<MediaPayload>,
    pub created_at: String,
}

impl PendingPost {
    pub fn new(sender_id: SenderId, text: String, image: Option<MediaPayload>) -> Self {
        Self {
            sender_id,
            text,
            image,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Receipt kept after a data-erasure request. Does not reference the erased sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErasureReceipt {
    pub confirmation_code: String,
    pub records_deleted: u64,
    pub erased_at: String,
}

// --- Generation backend requests ---

/// A text-generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    /// Enable web-search grounding.
    pub grounded: bool,
}

/// Text returned by the backend, with citations when grounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOutput {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// An image-from-text request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    /// e.g. `"9:16"`.
    pub aspect_ratio: Option<String>,
}

/// An image-edit request carrying the source image inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEditRequest {
    pub prompt: String,
    pub mime_type: String,
    /// Base64 source image.
    pub image_base64: String,
}

/// One part of a multi-part backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

/// Raw bytes downloaded for an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMedia {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

// --- Outbound ---

/// What a delivery channel can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCapabilities {
    /// Channel accepts base64 media inline; otherwise only fetchable URLs.
    pub supports_inline_media: bool,
    /// Channel renders quick-reply shortcut buttons.
    pub supports_quick_replies: bool,
    /// Maximum characters per text message.
    pub max_message_length: Option<usize>,
}

/// A follow-up shortcut offered under a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub title: String,
    pub payload: String,
}

/// Body of one outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundBody {
    Text { text: String },
    Attachment { kind: MediaKind, media: MediaPayload },
}

/// One message to deliver to a sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: SenderId,
    pub body: OutboundBody,
    #[serde(default)]
    pub quick_replies: Vec<QuickReply>,
}

impl OutboundMessage {
    /// Text of a text message, `None` for attachments.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            OutboundBody::Text { text } => Some(text),
            OutboundBody::Attachment { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn theme_scan_order_is_pinned() {
        let keywords: Vec<&str> = Theme::SCAN_ORDER.iter().map(|t| t.keyword()).collect();
        assert_eq!(keywords, ["inspirational", "sad", "storytelling", "funny"]);
    }

    #[test]
    fn theme_and_post_type_parse_from_wire_names() {
        assert_eq!(Theme::from_str("funny").unwrap(), Theme::Funny);
        assert_eq!(PostType::from_str("story_reel").unwrap(), PostType::StoryReel);
        assert_eq!(PostType::RegularPost.to_string(), "regular_post");
    }

    #[test]
    fn first_image_skips_other_attachments() {
        let ev = InboundEvent::text("web", "u1".into(), "hi")
            .with_attachment(Attachment {
                kind: AttachmentKind::Audio,
                url: "http://x/a.mp3".into(),
                mime_type: None,
            })
            .with_attachment(Attachment {
                kind: AttachmentKind::Image,
                url: "http://x/i.jpg".into(),
                mime_type: None,
            });
        assert_eq!(ev.first_image().unwrap().url, "http://x/i.jpg");
    }

    #[test]
    fn push_note_separates_paragraphs() {
        let mut content = GeneratedContent::text("Story");
        content.push_note("(note)");
        assert_eq!(content.text, "Story\n\n(note)");

        let mut empty = GeneratedContent::default();
        empty.push_note("(note)");
        assert_eq!(empty.text, "(note)");
    }

    #[test]
    fn data_uri_only_for_inline_media() {
        let inline = MediaPayload::inline("image/png", "AAAA");
        assert_eq!(
            inline.to_data_uri().as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        let hosted = MediaPayload::url("image/png", "https://cdn/x.png");
        assert!(hosted.to_data_uri().is_none());
    }

    #[test]
    fn parses_base64_data_uri() {
        assert_eq!(
            MediaPayload::from_data_uri("data:image/jpeg;base64,/9j/4AAQ"),
            Some(MediaPayload::inline("image/jpeg", "/9j/4AAQ"))
        );
        assert!(MediaPayload::from_data_uri("data:text/plain,hello").is_none());
        assert!(MediaPayload::from_data_uri("https://x/img.jpg").is_none());
        assert!(MediaPayload::from_data_uri("data:image/png;base64,").is_none());
    }

    #[test]
    fn intent_serializes_with_tag() {
        let json = serde_json::to_value(Intent::DailyPost {
            theme: Theme::Sad,
            post_type: PostType::StoryReel,
            tts: true,
        })
        .unwrap();
        assert_eq!(json["intent"], "daily_post");
        assert_eq!(json["theme"], "sad");
        assert_eq!(json["post_type"], "story_reel");
    }
}
