// Summarization collaborator

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::errors::SummarizationResult;
use crate::services::gemini::GeminiClient;

/// Produces a condensed version of the input. Must tolerate empty
/// input without failing.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> SummarizationResult<String>;
}

/// Gemini-backed summarizer. Texts of three sentences or fewer are
/// returned unchanged without an API call; there is nothing to
/// condense, and this keeps empty OCR output from failing the run.
pub struct GeminiSummarizer {
    client: Arc<GeminiClient>,
}

impl GeminiSummarizer {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, text: &str) -> SummarizationResult<String> {
        if sentence_count(text) <= 3 {
            return Ok(text.to_string());
        }

        Ok(self.client.summarize(text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count(""), 0);
        assert_eq!(sentence_count("   "), 0);
        assert_eq!(sentence_count("One."), 1);
        assert_eq!(sentence_count("One. Two! Three?"), 3);
        assert_eq!(sentence_count("One. Two. Three. Four."), 4);
    }
}
