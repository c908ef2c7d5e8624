// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates and fixed reply texts.

use postcraft_core::types::{Feature, PostType, Theme};

pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are Postcraft, a friendly assistant that helps \
small creators write social media content. Answer concisely. When you use web results, keep \
facts accurate and current.";

pub const GREETING: &str = "Hi! I'm Postcraft. I can chat, edit your images, write a daily post \
or reel, and help you plan posts. Pick a shortcut below or just tell me what you need.";

pub const POSTING_LIMITS: &str = "I can't post straight from this chat on a whim. When I generate \
a post for you I keep it as a draft; reply \"yes, post it\" (or tap Confirm & Publish) to publish \
that draft to the page.";

pub const SCHEDULE_HELP: &str = "Scheduling lives in the web app: open a generated message there \
and pick a date and time. Scheduled posts are reminders kept on your device; nothing is published \
automatically.";

pub const NOTHING_PENDING: &str = "There's nothing waiting to be posted. Ask me for a daily post, \
a story, or an image first, then confirm it.";

pub const EDIT_IMAGE_HINT: &str = "Nice picture! To edit it, send it again with a caption like \
\"edit this image: add a sunset sky\".";

pub const SPEECH_FAILED_NOTE: &str = "(Voice narration couldn't be generated this time.)";

pub const IMAGE_FAILED_NOTE: &str = "(The accompanying image couldn't be generated this time.)";

pub const PENDING_FAILED_NOTE: &str = "(I couldn't save this as a draft, so it can't be published \
from chat right now.)";

pub const DRAFT_NOT_CLEARED_NOTE: &str = "(The post is live, but I couldn't clear your draft. \
Please don't confirm it again or it will be posted twice.)";

pub const CONFIRM_HINT: &str = "Reply \"yes, post it\" to publish this to the page.";

/// Canned reply for a feature shortcut.
pub fn feature_prompt(feature: Feature) -> &'static str {
    match feature {
        Feature::Chat => "Sure, what would you like to talk about?",
        Feature::EditImage => {
            "Send me a photo with a caption starting with \"edit this image:\" followed by what to change."
        }
        Feature::DailyPost => {
            "Tell me the mood: for example \"post a funny story\", \"daily post sad regular\", or add \"with voice\" for narration."
        }
        Feature::Schedule => SCHEDULE_HELP,
    }
}

/// Reply after a successful publish.
pub fn published(post_id: &str) -> String {
    format!("Published to the page! Post id: {post_id}")
}

/// Heading shown above a generated daily post.
pub fn daily_post_heading(theme: Theme, post_type: PostType) -> String {
    let label = match post_type {
        PostType::StoryReel => "Reel",
        PostType::RegularPost => "Regular Post",
    };
    format!("Daily Post ({theme}, {label})")
}

pub fn daily_post_prompt(theme: Theme, post_type: PostType) -> String {
    match post_type {
        PostType::StoryReel => format!(
            "Write a short {theme} story for a vertical reel, under 120 words, in a warm \
             conversational voice. End with one line of 3 to 5 relevant hashtags."
        ),
        PostType::RegularPost => format!(
            "Write a detailed {theme} social media post of 200 to 300 words with a strong opening \
             line, two or three short paragraphs, and a closing question for readers. End with \
             3 to 5 relevant hashtags."
        ),
    }
}

/// Story prompt. Narrated stories are kept short enough to read aloud.
pub fn story_prompt(theme: Theme, narrated: bool, song_suggestion: bool) -> String {
    let length = if narrated {
        "about 150 words, so it takes roughly one minute to read aloud"
    } else {
        "between 300 and 500 words"
    };
    let mut prompt = format!("Write an original {theme} short story of {length}. Give it a title.");
    if song_suggestion {
        prompt.push_str(
            " After the story, on its own line, add exactly: \
             \"Song Suggestion: <song title> by <artist>\" naming a real song that fits the mood.",
        );
    }
    prompt
}

/// Image prompt derived from a theme and the start of the generated text.
pub fn image_prompt(theme: Theme, excerpt: &str) -> String {
    format!(
        "A {theme}, eye-catching illustration for a social media post. No text in the image. \
         Scene inspired by: {excerpt}"
    )
}

/// The first `max` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Note appended when a channel cannot carry inline media of this kind.
pub fn media_unavailable_note(kind: &str) -> String {
    format!(
        "(The generated {kind} can't be attached in this chat. Open the Postcraft web app to view it.)"
    )
}
