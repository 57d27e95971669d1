// Translation collaborator

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::errors::TranslationResult;
use crate::services::gemini::GeminiClient;

/// Translates text to English. `Ok(None)` means "no translation
/// performed" (the source is already English) and is distinct from an
/// empty translated string.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
    ) -> TranslationResult<Option<String>>;
}

/// Gemini-backed translator. `source_language` is the display name
/// resolved by the language directory (e.g. "French").
pub struct GeminiTranslator {
    client: Arc<GeminiClient>,
}

impl GeminiTranslator {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
    ) -> TranslationResult<Option<String>> {
        if source_language == "English" {
            return Ok(None);
        }

        let translated = self.client.translate(text, source_language).await?;
        Ok(Some(translated))
    }
}
