// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-intent generation workflows.
//!
//! Sub-steps run one after another; later steps consume earlier output
//! (the image prompt embeds generated text). Required steps fail the
//! workflow. Optional steps (speech, images attached to text posts) turn
//! into a note on the reply.

use std::sync::{Arc, LazyLock};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use postcraft_core::types::{
    ContentPart, GeneratedContent, ImageEditRequest, ImageRequest, InboundEvent, Intent,
    MediaPayload, PendingPost, PostType, SenderId, TextRequest, Theme,
};
use postcraft_core::{GenerationAdapter, MediaFetcher, PostcraftError, PublisherAdapter, StateStore};
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::prompts;

static SONG_SUGGESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Song Suggestion:\s*(.+)").unwrap());

const EXCERPT_CHARS: usize = 200;
const REEL_ASPECT_RATIO: &str = "9:16";

/// What happened to the sender's pending post while producing a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingStatus {
    /// The workflow does not produce publishable content.
    #[default]
    Unchanged,
    /// The result was stored as the sender's pending post.
    Created,
    /// The result was publishable but could not be stored.
    WriteFailed,
}

/// Output of one workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: GeneratedContent,
    pub pending: PendingStatus,
}

impl Reply {
    fn plain(content: GeneratedContent) -> Self {
        Self {
            content,
            pending: PendingStatus::Unchanged,
        }
    }

    fn canned(text: &str) -> Self {
        Self::plain(GeneratedContent::text(text))
    }

    pub fn pending_created(&self) -> bool {
        self.pending == PendingStatus::Created
    }
}

/// Splits a trailing `Song Suggestion: ...` line off a story.
///
/// Returns the story without the directive and the suggestion, if any.
pub fn extract_song_suggestion(story: &str) -> (String, Option<String>) {
    let Some(caps) = SONG_SUGGESTION.captures(story) else {
        return (story.trim().to_string(), None);
    };
    let suggestion = caps
        .get(1)
        .map(|m| m.as_str().trim().trim_matches('*').trim().to_string())
        .filter(|s| !s.is_empty());
    let stripped = SONG_SUGGESTION.replace(story, "");
    (stripped.trim().to_string(), suggestion)
}

fn optional_step<T>(step: &'static str, result: Result<T, PostcraftError>) -> Result<T, PostcraftError> {
    result.map_err(|e| {
        warn!(step, error = %e, "optional step failed");
        PostcraftError::OptionalStep {
            step,
            message: e.to_string(),
        }
    })
}

/// Runs generation workflows against the injected adapters.
pub struct Orchestrator {
    generator: Arc<dyn GenerationAdapter>,
    store: Arc<dyn StateStore>,
    fetcher: Arc<dyn MediaFetcher>,
    publisher: Option<Arc<dyn PublisherAdapter>>,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn GenerationAdapter>,
        store: Arc<dyn StateStore>,
        fetcher: Arc<dyn MediaFetcher>,
        publisher: Option<Arc<dyn PublisherAdapter>>,
    ) -> Self {
        Self {
            generator,
            store,
            fetcher,
            publisher,
        }
    }

    #[instrument(skip_all, fields(sender_id = %event.sender_id, intent = intent.kind()))]
    pub async fn run(&self, intent: &Intent, event: &InboundEvent) -> Result<Reply, PostcraftError> {
        let sender = &event.sender_id;
        match intent {
            Intent::Chat { text } => self.chat(text, event.has_image()).await.map(Reply::plain),
            Intent::DailyPost {
                theme,
                post_type,
                tts,
            } => {
                let (content, body) = self.daily_post(*theme, *post_type, *tts).await?;
                Ok(self.keep_pending(sender, content, body).await)
            }
            Intent::CreateStory {
                theme,
                tts,
                song_suggestion,
            } => {
                let (content, body) = self.story(*theme, *tts, *song_suggestion).await?;
                Ok(self.keep_pending(sender, content, body).await)
            }
            Intent::EditImage { prompt } => {
                let content = self.edit_image(prompt, event).await?;
                let body = content.text.clone();
                Ok(self.keep_pending(sender, content, body).await)
            }
            Intent::GenerateImage { prompt } => {
                let image = self
                    .generator
                    .generate_image(ImageRequest {
                        prompt: prompt.clone(),
                        aspect_ratio: None,
                    })
                    .await?;
                let content = GeneratedContent {
                    image: Some(image),
                    ..GeneratedContent::text("Here's your image.")
                };
                Ok(self.keep_pending(sender, content, prompt.clone()).await)
            }
            Intent::Speak { text } => {
                let audio = self.generator.synthesize_speech(text).await?;
                Ok(Reply::plain(GeneratedContent {
                    audio: Some(audio),
                    ..GeneratedContent::text("Here's the audio.")
                }))
            }
            Intent::ConfirmPost => self.confirm_post(sender).await,
            Intent::PostingLimits => Ok(Reply::canned(prompts::POSTING_LIMITS)),
            Intent::ScheduleHelp => Ok(Reply::canned(prompts::SCHEDULE_HELP)),
            Intent::FeaturePrompt(feature) => Ok(Reply::canned(prompts::feature_prompt(*feature))),
            Intent::Greeting => Ok(Reply::canned(prompts::GREETING)),
        }
    }

    async fn chat(&self, text: &str, has_image: bool) -> Result<GeneratedContent, PostcraftError> {
        if text.trim().is_empty() {
            let canned = if has_image {
                prompts::EDIT_IMAGE_HINT
            } else {
                prompts::GREETING
            };
            return Ok(GeneratedContent::text(canned));
        }

        let output = self
            .generator
            .generate_text(TextRequest {
                prompt: text.to_string(),
                system_instruction: Some(prompts::CHAT_SYSTEM_INSTRUCTION.to_string()),
                grounded: true,
            })
            .await?;
        Ok(GeneratedContent {
            citations: output.citations,
            ..GeneratedContent::text(output.text)
        })
    }

    /// Returns the display content and the publishable body.
    async fn daily_post(
        &self,
        theme: Theme,
        post_type: PostType,
        tts: bool,
    ) -> Result<(GeneratedContent, String), PostcraftError> {
        let output = self
            .generator
            .generate_text(TextRequest {
                prompt: prompts::daily_post_prompt(theme, post_type),
                system_instruction: None,
                grounded: false,
            })
            .await?;
        let body = output.text.trim().to_string();
        let mut content = GeneratedContent::text(format!(
            "{}\n\n{body}",
            prompts::daily_post_heading(theme, post_type)
        ));

        if tts {
            self.attach_speech(&mut content, &body).await;
        }
        if post_type == PostType::StoryReel {
            self.attach_image(&mut content, theme, &body, Some(REEL_ASPECT_RATIO))
                .await;
        }
        Ok((content, body))
    }

    /// Returns the display content and the publishable body. Failure notes
    /// go on the display content only.
    async fn story(
        &self,
        theme: Theme,
        tts: bool,
        song_suggestion: bool,
    ) -> Result<(GeneratedContent, String), PostcraftError> {
        let output = self
            .generator
            .generate_text(TextRequest {
                prompt: prompts::story_prompt(theme, tts, song_suggestion),
                system_instruction: None,
                grounded: false,
            })
            .await?;

        let (story, suggestion) = extract_song_suggestion(&output.text);
        if song_suggestion && suggestion.is_none() {
            debug!("story output carried no song suggestion");
        }

        let mut body = GeneratedContent::text(story.clone());
        if let Some(song) = &suggestion {
            body.push_note(&format!("Suggested song: {song}"));
        }
        let body = body.text;

        let mut content = GeneratedContent::text(body.clone());
        content.song_suggestion = suggestion;
        if tts {
            self.attach_speech(&mut content, &story).await;
        }
        self.attach_image(&mut content, theme, &story, None).await;
        Ok((content, body))
    }

    async fn edit_image(
        &self,
        prompt: &str,
        event: &InboundEvent,
    ) -> Result<GeneratedContent, PostcraftError> {
        let attachment = event
            .first_image()
            .ok_or_else(|| PostcraftError::Validation("no image attached".into()))?;

        let media = self.fetcher.fetch(&attachment.url).await.map_err(|e| match e {
            PostcraftError::Validation(_) => e,
            other => PostcraftError::Generation {
                message: "could not download the attached image".into(),
                source: Some(Box::new(other)),
            },
        })?;
        let mime_type = attachment
            .mime_type
            .clone()
            .unwrap_or(media.mime_type);

        let parts = self
            .generator
            .edit_image(ImageEditRequest {
                prompt: prompt.to_string(),
                mime_type,
                image_base64: STANDARD.encode(&media.bytes),
            })
            .await?;

        let mut text = Vec::new();
        let mut image = None;
        for part in parts {
            match part {
                ContentPart::Text(t) if !t.trim().is_empty() => text.push(t.trim().to_string()),
                ContentPart::InlineData { mime_type, data } if image.is_none() => {
                    image = Some(MediaPayload::inline(mime_type, data));
                }
                _ => {}
            }
        }
        let image = image.ok_or(PostcraftError::NoEditedImage)?;

        let text = if text.is_empty() {
            "Here's your edited image.".to_string()
        } else {
            text.join("\n\n")
        };
        Ok(GeneratedContent {
            image: Some(image),
            ..GeneratedContent::text(text)
        })
    }

    async fn confirm_post(&self, sender: &SenderId) -> Result<Reply, PostcraftError> {
        let Some(pending) = self.store.get_pending(sender).await? else {
            return Ok(Reply::canned(prompts::NOTHING_PENDING));
        };
        let publisher = self
            .publisher
            .as_ref()
            .ok_or_else(|| PostcraftError::Config("page publishing is not configured".into()))?;

        let post_id = publisher
            .publish(&pending.text, pending.image.as_ref())
            .await?;
        info!(sender_id = %sender, post_id = %post_id.0, "pending post published");

        let mut content = GeneratedContent::text(prompts::published(&post_id.0));
        if let Err(e) = self.store.clear_pending(sender).await {
            warn!(sender_id = %sender, error = %e, "failed to clear published pending post");
            content.push_note(prompts::DRAFT_NOT_CLEARED_NOTE);
        }
        Ok(Reply::plain(content))
    }

    async fn attach_speech(&self, content: &mut GeneratedContent, text: &str) {
        match optional_step("speech", self.generator.synthesize_speech(text).await) {
            Ok(audio) => content.audio = Some(audio),
            Err(_) => content.push_note(prompts::SPEECH_FAILED_NOTE),
        }
    }

    async fn attach_image(
        &self,
        content: &mut GeneratedContent,
        theme: Theme,
        text: &str,
        aspect_ratio: Option<&str>,
    ) {
        let request = ImageRequest {
            prompt: prompts::image_prompt(theme, prompts::excerpt(text, EXCERPT_CHARS)),
            aspect_ratio: aspect_ratio.map(str::to_string),
        };
        match optional_step("image", self.generator.generate_image(request).await) {
            Ok(image) => content.image = Some(image),
            Err(_) => content.push_note(prompts::IMAGE_FAILED_NOTE),
        }
    }

    /// Stores publishable content as the sender's draft. Failure becomes a note.
    async fn keep_pending(&self, sender: &SenderId, mut content: GeneratedContent, body: String) -> Reply {
        let pending = PendingPost::new(sender.clone(), body, content.image.clone());
        match self.store.set_pending(&pending).await {
            Ok(()) => Reply {
                content,
                pending: PendingStatus::Created,
            },
            Err(e) => {
                warn!(sender_id = %sender, error = %e, "failed to store pending post");
                content.push_note(prompts::PENDING_FAILED_NOTE);
                Reply {
                    content,
                    pending: PendingStatus::WriteFailed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_suggestion_is_extracted_and_stripped() {
        let (story, song) = extract_song_suggestion(
            "Once upon a time.\n\nThe end.\n\nSong Suggestion: Here Comes the Sun by The Beatles",
        );
        assert_eq!(story, "Once upon a time.\n\nThe end.");
        assert_eq!(song.as_deref(), Some("Here Comes the Sun by The Beatles"));
    }

    #[test]
    fn song_suggestion_match_is_case_insensitive() {
        let (_, song) = extract_song_suggestion("story\nsong suggestion: **Yellow by Coldplay**");
        assert_eq!(song.as_deref(), Some("Yellow by Coldplay"));
    }

    #[test]
    fn missing_song_suggestion_leaves_story() {
        let (story, song) = extract_song_suggestion("  just a story  ");
        assert_eq!(story, "just a story");
        assert!(song.is_none());
    }
}
