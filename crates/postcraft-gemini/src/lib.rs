// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini generation backend for postcraft.
//!
//! Implements [`GenerationAdapter`] over the Gemini REST API: grounded text,
//! image generation, speech synthesis, and image editing all go through
//! `generateContent` with different models and response modalities.

pub mod client;
pub mod types;
pub mod wav;

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use postcraft_config::model::GeminiConfig;
use postcraft_core::error::PostcraftError;
use postcraft_core::traits::{GenerationAdapter, PluginAdapter};
use postcraft_core::types::{
    AdapterType, Citation, ContentPart, HealthStatus, ImageEditRequest, ImageRequest,
    MediaPayload, TextOutput, TextRequest,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, GoogleSearch,
    ImageConfig, Part, SpeechConfig, Tool,
};

/// Generation backend backed by Gemini models.
///
/// API key resolution order: `gemini.api_key` -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiGenerator {
    client: GeminiClient,
    text_model: String,
    image_model: String,
    tts_model: String,
    voice: String,
}

impl GeminiGenerator {
    pub fn new(config: &GeminiConfig) -> Result<Self, PostcraftError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        info!(text_model = %config.text_model, "Gemini backend initialized");
        Ok(Self {
            client,
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            tts_model: config.tts_model.clone(),
            voice: config.voice.clone(),
        })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, PostcraftError> {
    if let Some(key) = config_key.as_ref().filter(|k| !k.is_empty()) {
        return Ok(key.clone());
    }
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            PostcraftError::Config(
                "Gemini API key not found. Set gemini.api_key in config or GEMINI_API_KEY environment variable.".into(),
            )
        })
}

/// Web sources from the first candidate, without duplicates.
fn citations(response: &GenerateContentResponse) -> Vec<Citation> {
    let mut out: Vec<Citation> = Vec::new();
    let chunks = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|m| m.grounding_chunks.as_slice())
        .unwrap_or_default();
    for web in chunks.iter().filter_map(|c| c.web.as_ref()) {
        if web.uri.is_empty() || out.iter().any(|c| c.uri == web.uri) {
            continue;
        }
        let title = if web.title.is_empty() {
            web.uri.clone()
        } else {
            web.title.clone()
        };
        out.push(Citation {
            uri: web.uri.clone(),
            title,
        });
    }
    out
}

/// Converts raw PCM speech to WAV; other audio types pass through.
fn playable_audio(mime_type: &str, data: &str) -> Result<MediaPayload, PostcraftError> {
    if !wav::is_raw_pcm(mime_type) {
        return Ok(MediaPayload::inline(mime_type, data));
    }
    let pcm = STANDARD.decode(data).map_err(|e| PostcraftError::Generation {
        message: format!("speech payload is not valid base64: {e}"),
        source: Some(Box::new(e)),
    })?;
    let wav = wav::pcm_to_wav(&pcm, wav::sample_rate(mime_type));
    Ok(MediaPayload::inline("audio/wav", STANDARD.encode(wav)))
}

#[async_trait]
impl PluginAdapter for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, PostcraftError> {
        // No test request: every call is billed.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PostcraftError> {
        debug!("Gemini backend shutting down");
        Ok(())
    }
}

#[async_trait]
impl GenerationAdapter for GeminiGenerator {
    async fn generate_text(&self, request: TextRequest) -> Result<TextOutput, PostcraftError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(&request.prompt)])],
            system_instruction: request.system_instruction.as_deref().map(Content::system),
            tools: if request.grounded {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            } else {
                Vec::new()
            },
            generation_config: None,
        };
        let response = self.client.generate_content(&self.text_model, &body).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(PostcraftError::generation("model returned no text"));
        }
        Ok(TextOutput {
            citations: citations(&response),
            text,
        })
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<MediaPayload, PostcraftError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(&request.prompt)])],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE".into()],
                speech_config: None,
                image_config: request
                    .aspect_ratio
                    .map(|aspect_ratio| ImageConfig { aspect_ratio }),
            }),
            ..Default::default()
        };
        let response = self
            .client
            .generate_content(&self.image_model, &body)
            .await?;

        response
            .first_inline()
            .map(|blob| MediaPayload::inline(blob.mime_type.as_str(), blob.data.as_str()))
            .ok_or_else(|| PostcraftError::generation("model returned no image"))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<MediaPayload, PostcraftError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(text)])],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".into()],
                speech_config: Some(SpeechConfig::prebuilt(&self.voice)),
                image_config: None,
            }),
            ..Default::default()
        };
        let response = self.client.generate_content(&self.tts_model, &body).await?;

        let blob = response
            .first_inline()
            .ok_or_else(|| PostcraftError::generation("model returned no audio"))?;
        playable_audio(&blob.mime_type, &blob.data)
    }

    async fn edit_image(
        &self,
        request: ImageEditRequest,
    ) -> Result<Vec<ContentPart>, PostcraftError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline(&request.mime_type, &request.image_base64),
                Part::text(&request.prompt),
            ])],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["TEXT".into(), "IMAGE".into()],
                speech_config: None,
                image_config: None,
            }),
            ..Default::default()
        };
        let response = self
            .client
            .generate_content(&self.image_model, &body)
            .await?;

        Ok(response
            .parts()
            .iter()
            .filter_map(|part| match (&part.inline_data, &part.text) {
                (Some(blob), _) => Some(ContentPart::InlineData {
                    mime_type: blob.mime_type.clone(),
                    data: blob.data.clone(),
                }),
                (None, Some(text)) => Some(ContentPart::Text(text.clone())),
                (None, None) => None,
            })
            .collect())
    }
}
