// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prioritized rule table mapping message text to an [`Intent`].
//!
//! Matching is case-insensitive substring containment over the trimmed,
//! lower-cased text. Rules are evaluated in table order and the first rule
//! that matches decides the intent. Anything unmatched is chat.

use postcraft_core::types::{InboundEvent, Intent, PostType, Theme};

use crate::payloads::{CONFIRM_POST, feature_from_payload};

/// Prefix that turns a message with an image attachment into an edit request.
pub const EDIT_PREFIX: &str = "edit this image";

/// Phrases asking to publish immediately. These only explain posting limits.
const POST_NOW_PHRASES: &[&str] = &["post now", "publish this", "share this", "make it live"];

/// Words that, together with `post`, request a daily post.
const DAILY_POST_MARKERS: &[&str] = &["story", "reel", "daily post", "generate post"];

/// Markers selecting the longer regular post over a story reel.
const REGULAR_POST_MARKERS: &[&str] = &["regular", "detailed", "long post"];

/// Markers requesting narration.
const VOICE_MARKERS: &[&str] = &["with voice", "read aloud"];

const CONFIRM_PHRASES: &[&str] = &["yes, post it", "yes post it"];

const SCHEDULE_PHRASE: &str = "schedule post";

/// Classification failures that need the user to rephrase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// The edit prefix was present with an image but no instruction followed.
    #[error("edit request has no instruction")]
    EmptyEditPrompt,
}

impl ClassifyError {
    /// Clarification sent back instead of running a workflow.
    pub fn clarification(&self) -> &'static str {
        match self {
            ClassifyError::EmptyEditPrompt => {
                "What should I change in the image? Send it again with an instruction, \
                 for example: \"edit this image: add a hat\"."
            }
        }
    }
}

/// What a rule looks at.
struct Message<'a> {
    /// Trimmed, lower-cased text.
    normalized: &'a str,
    /// Trimmed text with original casing, used for prompts.
    original: &'a str,
    has_image: bool,
}

type RuleOutcome = Option<Result<Intent, ClassifyError>>;

type Rule = (&'static str, fn(&Message<'_>) -> RuleOutcome);

/// Rules in priority order.
const RULES: &[Rule] = &[
    ("posting_limits", posting_limits),
    ("daily_post", daily_post),
    ("edit_image", edit_image),
    ("confirm_post", confirm_post),
    ("schedule_help", schedule_help),
    ("feature_prompt", feature_prompt),
];

/// Names of the rules in evaluation order.
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|(name, _)| *name).collect()
}

/// Classifies message text.
///
/// Empty text without an image is a greeting. Empty text with an image falls
/// through to chat so the orchestrator can explain how to edit images.
pub fn classify(text: &str, has_image: bool) -> Result<Intent, ClassifyError> {
    let original = text.trim();
    let normalized = original.to_lowercase();

    if normalized.is_empty() && !has_image {
        return Ok(Intent::Greeting);
    }

    let message = Message {
        normalized: &normalized,
        original,
        has_image,
    };

    for (name, rule) in RULES {
        if let Some(outcome) = rule(&message) {
            tracing::debug!(rule = *name, "intent rule matched");
            return outcome;
        }
    }

    Ok(Intent::Chat {
        text: original.to_string(),
    })
}

/// Classifies an inbound event, preferring a quick-reply payload over text.
pub fn classify_event(event: &InboundEvent) -> Result<Intent, ClassifyError> {
    let has_image = event.has_image();
    match event.quick_reply_payload.as_deref() {
        Some(payload) if !payload.trim().is_empty() => classify(payload, has_image),
        _ => classify(event.text.as_deref().unwrap_or_default(), has_image),
    }
}

/// First theme keyword found in scan order, or the default theme.
pub fn extract_theme(normalized: &str) -> Theme {
    Theme::SCAN_ORDER
        .into_iter()
        .find(|theme| normalized.contains(theme.keyword()))
        .unwrap_or_default()
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn posting_limits(msg: &Message<'_>) -> RuleOutcome {
    contains_any(msg.normalized, POST_NOW_PHRASES).then_some(Ok(Intent::PostingLimits))
}

fn daily_post(msg: &Message<'_>) -> RuleOutcome {
    if !(msg.normalized.contains("post") && contains_any(msg.normalized, DAILY_POST_MARKERS)) {
        return None;
    }
    let post_type = if contains_any(msg.normalized, REGULAR_POST_MARKERS) {
        PostType::RegularPost
    } else {
        PostType::StoryReel
    };
    Some(Ok(Intent::DailyPost {
        theme: extract_theme(msg.normalized),
        post_type,
        tts: contains_any(msg.normalized, VOICE_MARKERS),
    }))
}

fn edit_image(msg: &Message<'_>) -> RuleOutcome {
    if !msg.has_image {
        return None;
    }
    let head = msg.original.get(..EDIT_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(EDIT_PREFIX) {
        return None;
    }
    let rest = &msg.original[EDIT_PREFIX.len()..];
    let prompt = rest.trim_start().strip_prefix(':').unwrap_or(rest).trim();
    if prompt.is_empty() {
        return Some(Err(ClassifyError::EmptyEditPrompt));
    }
    Some(Ok(Intent::EditImage {
        prompt: prompt.to_string(),
    }))
}

fn confirm_post(msg: &Message<'_>) -> RuleOutcome {
    let confirmed = contains_any(msg.normalized, CONFIRM_PHRASES)
        || msg.normalized.eq_ignore_ascii_case(CONFIRM_POST);
    confirmed.then_some(Ok(Intent::ConfirmPost))
}

fn schedule_help(msg: &Message<'_>) -> RuleOutcome {
    msg.normalized
        .contains(SCHEDULE_PHRASE)
        .then_some(Ok(Intent::ScheduleHelp))
}

fn feature_prompt(msg: &Message<'_>) -> RuleOutcome {
    feature_from_payload(msg.normalized).map(|f| Ok(Intent::FeaturePrompt(f)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use postcraft_core::types::{Attachment, AttachmentKind, Feature};

    fn chat(text: &str) -> Intent {
        Intent::Chat {
            text: text.to_string(),
        }
    }

    #[test]
    fn unmatched_text_is_chat() {
        for text in [
            "what's the weather in Lisbon?",
            "tell me a joke",
            "How do I grow my page?",
            "posting tips please",
        ] {
            assert_eq!(classify(text, false).unwrap(), chat(text), "input: {text}");
        }
    }

    #[test]
    fn empty_text_is_greeting() {
        assert_eq!(classify("   ", false).unwrap(), Intent::Greeting);
    }

    #[test]
    fn empty_text_with_image_is_chat() {
        assert_eq!(classify("", true).unwrap(), chat(""));
    }

    #[test]
    fn funny_story_is_story_reel_daily_post() {
        assert_eq!(
            classify("Post funny story", false).unwrap(),
            Intent::DailyPost {
                theme: Theme::Funny,
                post_type: PostType::StoryReel,
                tts: false,
            }
        );
    }

    #[test]
    fn theme_scan_order_resolves_conflicts() {
        match classify("post a sad inspirational story", false).unwrap() {
            Intent::DailyPost { theme, .. } => assert_eq!(theme, Theme::Inspirational),
            other => panic!("unexpected intent: {other:?}"),
        }
        match classify("post a funny sad story", false).unwrap() {
            Intent::DailyPost { theme, .. } => assert_eq!(theme, Theme::Sad),
            other => panic!("unexpected intent: {other:?}"),
        }
    }

    #[test]
    fn theme_defaults_to_inspirational() {
        match classify("generate post", false).unwrap() {
            Intent::DailyPost { theme, .. } => assert_eq!(theme, Theme::Inspirational),
            other => panic!("unexpected intent: {other:?}"),
        }
    }

    #[test]
    fn regular_post_and_voice_markers() {
        assert_eq!(
            classify("Daily post, detailed, with voice", false).unwrap(),
            Intent::DailyPost {
                theme: Theme::Inspirational,
                post_type: PostType::RegularPost,
                tts: true,
            }
        );
    }

    #[test]
    fn edit_prefix_with_image_extracts_prompt() {
        assert_eq!(
            classify("edit this image: add a hat", true).unwrap(),
            Intent::EditImage {
                prompt: "add a hat".into()
            }
        );
        assert_eq!(
            classify("Edit This Image make it Blue ", true).unwrap(),
            Intent::EditImage {
                prompt: "make it Blue".into()
            }
        );
    }

    #[test]
    fn edit_prefix_with_empty_remainder_needs_clarification() {
        assert_eq!(
            classify("edit this image:", true),
            Err(ClassifyError::EmptyEditPrompt)
        );
        assert_eq!(
            classify("edit this image   ", true),
            Err(ClassifyError::EmptyEditPrompt)
        );
    }

    #[test]
    fn edit_prefix_without_image_is_chat() {
        let text = "edit this image: add a hat";
        assert_eq!(classify(text, false).unwrap(), chat(text));
    }

    #[test]
    fn post_now_phrases_explain_limits() {
        for text in ["post now", "Please publish this", "share this!", "make it live"] {
            assert_eq!(classify(text, false).unwrap(), Intent::PostingLimits);
        }
    }

    #[test]
    fn confirm_phrases_and_payload() {
        assert_eq!(classify("Yes, post it", false).unwrap(), Intent::ConfirmPost);
        assert_eq!(classify("yes post it", false).unwrap(), Intent::ConfirmPost);
        assert_eq!(classify("CONFIRM_POST", false).unwrap(), Intent::ConfirmPost);
    }

    #[test]
    fn schedule_and_feature_payloads() {
        assert_eq!(classify("schedule post", false).unwrap(), Intent::ScheduleHelp);
        assert_eq!(
            classify("FEATURE_EDIT_IMAGE", false).unwrap(),
            Intent::FeaturePrompt(Feature::EditImage)
        );
        assert_eq!(
            classify("FEATURE_DAILY_POST", false).unwrap(),
            Intent::FeaturePrompt(Feature::DailyPost)
        );
    }

    #[test]
    fn rule_order_is_fixed() {
        assert_eq!(
            rule_names(),
            [
                "posting_limits",
                "daily_post",
                "edit_image",
                "confirm_post",
                "schedule_help",
                "feature_prompt",
            ]
        );
    }

    #[test]
    fn event_payload_wins_over_text() {
        let mut event = InboundEvent::text("messenger", "u1".into(), "Confirm & publish");
        event.quick_reply_payload = Some("CONFIRM_POST".into());
        assert_eq!(classify_event(&event).unwrap(), Intent::ConfirmPost);
    }

    #[test]
    fn event_attachment_drives_edit() {
        let event = InboundEvent::text("messenger", "u1".into(), "edit this image: add a hat")
            .with_attachment(Attachment {
                kind: AttachmentKind::Image,
                url: "http://x/img.jpg".into(),
                mime_type: None,
            });
        assert_eq!(
            classify_event(&event).unwrap(),
            Intent::EditImage {
                prompt: "add a hat".into()
            }
        );
    }
}
