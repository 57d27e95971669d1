// Gemini generateContent client shared by the OCR, translation and
// summarization collaborators.
//
// Single key, single attempt: the pipeline's failure policy is
// fail-fast with no retry, so there is no key rotation or backoff here.

use base64::{engine::general_purpose, Engine};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::Config;
use crate::core::errors::ApiError;
use crate::core::types::ImagePayload;

pub struct GeminiClient {
    config: Arc<Config>,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: Arc<Config>) -> Result<Self, ApiError> {
        let timeout = Duration::from_secs(config.timeout_seconds());

        // HTTP client with timeout and connection pooling
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Send a generateContent request and return the first candidate's
    /// text part.
    async fn generate(&self, parts: Vec<serde_json::Value>) -> Result<String, ApiError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.config.model(),
            self.config.api_key()
        );

        let request_body = json!({
            "contents": [{
                "parts": parts
            }]
        });

        let response = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response: serde_json::Value = response.json().await?;

        response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ApiError::InvalidResponse("missing text in API response".to_string()))
    }

    /// Transcribe all visible text from an image.
    #[instrument(skip(self, image), fields(bytes = image.bytes.len(), mime = %image.mime_type))]
    pub async fn extract_text(&self, image: &ImagePayload) -> Result<String, ApiError> {
        debug!("OCR request");

        let base64_image = general_purpose::STANDARD.encode(&image.bytes);
        let parts = vec![
            json!({
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": base64_image
                }
            }),
            json!({
                "text": "Extract all text visible in this image, preserving the \
                         original language, line breaks and reading order. Return \
                         only the extracted text with no commentary. If the image \
                         contains no text, return an empty response."
            }),
        ];

        self.generate(parts).await
    }

    /// Translate text into English from the named source language.
    #[instrument(skip(self, text), fields(source_language = %source_language, chars = text.len()))]
    pub async fn translate(&self, text: &str, source_language: &str) -> Result<String, ApiError> {
        debug!("translation request");

        let prompt = format!(
            "Translate the following text from {} to English. \
             Maintain the original meaning, tone, and style as much as possible.\n\n\
             TEXT TO TRANSLATE:\n{}",
            source_language, text
        );

        self.generate(vec![json!({ "text": prompt })]).await
    }

    /// Produce a condensed version of the text.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn summarize(&self, text: &str) -> Result<String, ApiError> {
        debug!("summarization request");

        let prompt = format!(
            "Summarize the following text concisely and clearly. \
             Focus on the most important points and key information:\n\n\
             TEXT TO SUMMARIZE:\n{}",
            text
        );

        self.generate(vec![json!({ "text": prompt })]).await
    }
}
