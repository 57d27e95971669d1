// Text extraction (OCR) collaborator

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::errors::{ExtractionError, ExtractionResult};
use crate::core::types::ImagePayload;
use crate::services::gemini::GeminiClient;

/// Converts image pixels to raw text. The returned string may be
/// empty when the image contains no recognizable text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, image: &ImagePayload) -> ExtractionResult<String>;
}

/// Gemini-backed extractor: sends the image inline and asks for a
/// verbatim transcription.
pub struct GeminiExtractor {
    client: Arc<GeminiClient>,
}

impl GeminiExtractor {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextExtractor for GeminiExtractor {
    async fn extract(&self, image: &ImagePayload) -> ExtractionResult<String> {
        if image.bytes.is_empty() {
            return Err(ExtractionError::InvalidImage(
                "empty image payload".to_string(),
            ));
        }

        Ok(self.client.extract_text(image).await?)
    }
}
