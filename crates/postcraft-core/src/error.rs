// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for postcraft.

use thiserror::Error;

/// The primary error type used across all postcraft adapter traits and the pipeline.
#[derive(Debug, Error)]
pub enum PostcraftError {
    /// A required secret or setting is missing or invalid. Never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed inbound payload.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Bad verify token, payload signature, or signed request.
    #[error("verification failed: {0}")]
    Verification(String),

    /// A required call to the generation backend failed.
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The image-edit response carried no inline image part.
    #[error("image edit returned no image")]
    NoEditedImage,

    /// An optional generation step (speech, image) failed.
    ///
    /// The orchestrator converts this into a note on the reply.
    #[error("optional step `{step}` failed: {message}")]
    OptionalStep { step: &'static str, message: String },

    /// The page-publishing API rejected the post. `message` is the vendor's text.
    #[error("publish error: {message}")]
    Publish { message: String },

    /// State store errors (connection, query, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Delivery to the messaging platform failed.
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PostcraftError {
    /// Shorthand for a generation failure without an underlying source.
    pub fn generation(message: impl Into<String>) -> Self {
        PostcraftError::Generation {
            message: message.into(),
            source: None,
        }
    }

    /// Text sent back to the user whose request caused this error.
    pub fn user_message(&self) -> String {
        match self {
            PostcraftError::Generation { .. } => {
                "Sorry, I couldn't generate a response right now. Please try again in a moment."
                    .to_string()
            }
            PostcraftError::NoEditedImage => {
                "Sorry, the image editor didn't return an edited image. Try rephrasing your edit."
                    .to_string()
            }
            PostcraftError::OptionalStep { step, .. } => {
                format!("Part of your request ({step}) could not be completed.")
            }
            PostcraftError::Publish { message } => {
                format!("Publishing to the page failed: {message}")
            }
            PostcraftError::Storage { .. } => {
                "Sorry, I couldn't access your saved draft right now. Please try again.".to_string()
            }
            PostcraftError::Validation(msg) => format!("I couldn't understand that request: {msg}"),
            PostcraftError::Config(_)
            | PostcraftError::Verification(_)
            | PostcraftError::Channel { .. }
            | PostcraftError::Internal(_) => {
                "Sorry, something went wrong on our side. Please try again later.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_user_message_keeps_vendor_text() {
        let err = PostcraftError::Publish {
            message: "(#200) Requires pages_manage_posts permission".into(),
        };
        assert!(
            err.user_message()
                .contains("(#200) Requires pages_manage_posts permission")
        );
    }

    #[test]
    fn internal_details_are_not_shown_to_users() {
        let err = PostcraftError::Config("GEMINI_API_KEY missing".into());
        assert!(!err.user_message().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn generation_helper_has_no_source() {
        match PostcraftError::generation("boom") {
            PostcraftError::Generation { message, source } => {
                assert_eq!(message, "boom");
                assert!(source.is_none());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
