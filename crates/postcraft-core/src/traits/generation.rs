// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation backend trait: text, image, speech, and image editing.

use async_trait::async_trait;

use crate::error::PostcraftError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    ContentPart, ImageEditRequest, ImageRequest, MediaPayload, TextOutput, TextRequest,
};

/// Adapter for the external multimodal generation service.
#[async_trait]
pub trait GenerationAdapter: PluginAdapter {
    /// Generates text, optionally grounded with web search.
    async fn generate_text(&self, request: TextRequest) -> Result<TextOutput, PostcraftError>;

    /// Generates one image from a text prompt.
    async fn generate_image(&self, request: ImageRequest) -> Result<MediaPayload, PostcraftError>;

    /// Synthesizes speech for `text`, returning playable audio.
    async fn synthesize_speech(&self, text: &str) -> Result<MediaPayload, PostcraftError>;

    /// Sends an image plus instruction and returns all response parts.
    async fn edit_image(
        &self,
        request: ImageEditRequest,
    ) -> Result<Vec<ContentPart>, PostcraftError>;
}
