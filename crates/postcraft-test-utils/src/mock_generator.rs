// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend.
//!
//! Text responses are popped from a FIFO queue; when it is empty a default
//! text is returned. Every call is recorded for assertions, and each step
//! can be made to fail.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use postcraft_core::types::{
    AdapterType, ContentPart, HealthStatus, ImageEditRequest, ImageRequest, MediaPayload,
    TextOutput, TextRequest,
};
use postcraft_core::{GenerationAdapter, PluginAdapter, PostcraftError};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationCall {
    Text(TextRequest),
    Image(ImageRequest),
    Speech(String),
    Edit(ImageEditRequest),
}

pub struct MockGenerator {
    texts: Mutex<VecDeque<TextOutput>>,
    edit_parts: Mutex<Option<Vec<ContentPart>>>,
    calls: Mutex<Vec<GenerationCall>>,
    fail_text: AtomicBool,
    fail_image: AtomicBool,
    fail_speech: AtomicBool,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            texts: Mutex::new(VecDeque::new()),
            edit_parts: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            fail_text: AtomicBool::new(false),
            fail_image: AtomicBool::new(false),
            fail_speech: AtomicBool::new(false),
        }
    }

    /// Queues a plain text response.
    pub async fn push_text(&self, text: impl Into<String>) {
        self.push_output(TextOutput {
            text: text.into(),
            citations: Vec::new(),
        })
        .await;
    }

    pub async fn push_output(&self, output: TextOutput) {
        self.texts.lock().await.push_back(output);
    }

    /// Overrides the parts returned by `edit_image`.
    pub async fn set_edit_parts(&self, parts: Vec<ContentPart>) {
        *self.edit_parts.lock().await = Some(parts);
    }

    pub fn fail_text(&self, fail: bool) {
        self.fail_text.store(fail, Ordering::SeqCst);
    }

    pub fn fail_image(&self, fail: bool) {
        self.fail_image.store(fail, Ordering::SeqCst);
    }

    pub fn fail_speech(&self, fail: bool) {
        self.fail_speech.store(fail, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().await.clone()
    }

    /// Recorded edit requests, in call order.
    pub async fn edit_calls(&self) -> Vec<ImageEditRequest> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                GenerationCall::Edit(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn record(&self, call: GenerationCall) {
        self.calls.lock().await.push(call);
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn simulated(step: &str) -> PostcraftError {
    PostcraftError::generation(format!("simulated {step} failure"))
}

#[async_trait]
impl PluginAdapter for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, PostcraftError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PostcraftError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationAdapter for MockGenerator {
    async fn generate_text(&self, request: TextRequest) -> Result<TextOutput, PostcraftError> {
        self.record(GenerationCall::Text(request)).await;
        if self.fail_text.load(Ordering::SeqCst) {
            return Err(simulated("text"));
        }
        Ok(self
            .texts
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| TextOutput {
                text: "mock text".to_string(),
                citations: Vec::new(),
            }))
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<MediaPayload, PostcraftError> {
        self.record(GenerationCall::Image(request)).await;
        if self.fail_image.load(Ordering::SeqCst) {
            return Err(simulated("image"));
        }
        Ok(MediaPayload::inline("image/png", "aW1hZ2U="))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<MediaPayload, PostcraftError> {
        self.record(GenerationCall::Speech(text.to_string())).await;
        if self.fail_speech.load(Ordering::SeqCst) {
            return Err(simulated("speech"));
        }
        Ok(MediaPayload::inline("audio/wav", "UklGRg=="))
    }

    async fn edit_image(
        &self,
        request: ImageEditRequest,
    ) -> Result<Vec<ContentPart>, PostcraftError> {
        self.record(GenerationCall::Edit(request)).await;
        if self.fail_image.load(Ordering::SeqCst) {
            return Err(simulated("image edit"));
        }
        Ok(self.edit_parts.lock().await.clone().unwrap_or_else(|| {
            vec![
                ContentPart::Text("Done!".to_string()),
                ContentPart::InlineData {
                    mime_type: "image/png".to_string(),
                    data: "ZWRpdGVk".to_string(),
                },
            ]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_texts_then_default() {
        let generator = MockGenerator::new();
        generator.push_text("first").await;
        let request = TextRequest {
            prompt: "p".into(),
            system_instruction: None,
            grounded: false,
        };
        assert_eq!(generator.generate_text(request.clone()).await.unwrap().text, "first");
        assert_eq!(generator.generate_text(request).await.unwrap().text, "mock text");
        assert_eq!(generator.call_count().await, 2);
    }

    #[tokio::test]
    async fn speech_failure_is_simulated() {
        let generator = MockGenerator::new();
        generator.fail_speech(true);
        assert!(generator.synthesize_speech("hi").await.is_err());
        assert_eq!(generator.calls().await, [GenerationCall::Speech("hi".into())]);
    }
}
