// Pipeline orchestrator: sequences the four processing stages
//
// Extract -> Detect -> Translate (non-English sources only) -> Summarize.
// Strictly sequential; each suspension point is exactly one collaborator
// call. Fail-fast with no retry: the first unrecoverable stage error
// aborts the run and nothing reaches the store. Detection never fails,
// it degrades to English.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::core::config::Config;
use crate::core::errors::{ApiError, PipelineError, PipelineResult};
use crate::core::types::{ImagePayload, PipelineOutput, PipelineStage, Translation};
use crate::services::extraction::{GeminiExtractor, TextExtractor};
use crate::services::gemini::GeminiClient;
use crate::services::language::LanguageDetector;
use crate::services::summarization::{GeminiSummarizer, Summarizer};
use crate::services::translation::{GeminiTranslator, Translator};

/// Advisory progress notifications; sends are best-effort and a
/// dropped receiver never affects the run.
pub type ProgressSender = mpsc::UnboundedSender<PipelineStage>;

pub struct Pipeline {
    extractor: Arc<dyn TextExtractor>,
    detector: LanguageDetector,
    translator: Arc<dyn Translator>,
    summarizer: Arc<dyn Summarizer>,
}

impl Pipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        detector: LanguageDetector,
        translator: Arc<dyn Translator>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            extractor,
            detector,
            translator,
            summarizer,
        }
    }

    /// Wire up the production collaborators around one shared Gemini
    /// client.
    pub fn from_config(config: Arc<Config>) -> Result<Self, ApiError> {
        let client = Arc::new(GeminiClient::new(config.clone())?);

        Ok(Self::new(
            Arc::new(GeminiExtractor::new(client.clone())),
            LanguageDetector::new(config.min_text_length()),
            Arc::new(GeminiTranslator::new(client.clone())),
            Arc::new(GeminiSummarizer::new(client)),
        ))
    }

    fn notify(progress: Option<&ProgressSender>, stage: PipelineStage) {
        if let Some(tx) = progress {
            let _ = tx.send(stage);
        }
    }

    /// Run one image through the full workflow.
    ///
    /// Concurrent invocations are not supported; the caller must guard
    /// re-entry (the HTTP layer uses a busy flag). The returned output
    /// is not persisted here: saving is a separate, explicit action.
    #[instrument(skip(self, image, progress), fields(bytes = image.bytes.len()))]
    pub async fn process(
        &self,
        image: &ImagePayload,
        progress: Option<&ProgressSender>,
    ) -> PipelineResult<PipelineOutput> {
        let start = Instant::now();

        // Stage 1: extract
        Self::notify(progress, PipelineStage::Extracting);
        let original_text = self
            .extractor
            .extract(image)
            .await
            .map_err(|source| PipelineError::ExtractionFailed { source })?;
        debug!(chars = original_text.len(), "extraction complete");

        // Stage 2: detect (synchronous, never fails the run)
        Self::notify(progress, PipelineStage::Detecting);
        let language = self.detector.detect(&original_text);
        debug!(code = %language.code, name = %language.name, "language detected");

        // Stage 3: translate, only for non-English sources
        let translation = if language.is_english() {
            Translation::NotNeeded
        } else {
            Self::notify(progress, PipelineStage::Translating);
            match self
                .translator
                .translate(&original_text, &language.name)
                .await
                .map_err(|source| PipelineError::TranslationFailed {
                    language: language.name.clone(),
                    source,
                })? {
                Some(text) => Translation::Translated(text),
                // Collaborator declined: treat as "no translation
                // performed", same as an English source
                None => Translation::NotNeeded,
            }
        };

        // Stage 4: summarize. The input is chosen here, from the
        // translation bound above, so "prefer translated text" is an
        // explicit sequential dependency.
        Self::notify(progress, PipelineStage::Summarizing);
        let summary_input = translation.as_option().unwrap_or(&original_text);
        let summary = self
            .summarizer
            .summarize(summary_input)
            .await
            .map_err(|source| PipelineError::SummarizationFailed { source })?;

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            language = %language.name,
            translated = translation.as_option().is_some(),
            "pipeline run complete"
        );

        Ok(PipelineOutput {
            original_text,
            language,
            translation,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{
        ApiError, ExtractionError, ExtractionResult, SummarizationResult, TranslationResult,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct FixedExtractor(Result<String, ()>);

    #[async_trait]
    impl TextExtractor for FixedExtractor {
        async fn extract(&self, _image: &ImagePayload) -> ExtractionResult<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(ExtractionError::Api(ApiError::InvalidResponse(
                    "missing text in API response".to_string(),
                ))),
            }
        }
    }

    /// Records translate calls; refuses English sources like the real
    /// collaborator.
    #[derive(Default)]
    struct RecordingTranslator {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Translator for RecordingTranslator {
        async fn translate(
            &self,
            text: &str,
            source_language: &str,
        ) -> TranslationResult<Option<String>> {
            self.calls
                .lock()
                .push((text.to_string(), source_language.to_string()));
            if source_language == "English" {
                return Ok(None);
            }
            Ok(Some(format!("[{} -> English] {}", source_language, text)))
        }
    }

    /// Echoes its input prefixed, so tests can see what it was fed.
    #[derive(Default)]
    struct RecordingSummarizer {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Summarizer for RecordingSummarizer {
        async fn summarize(&self, text: &str) -> SummarizationResult<String> {
            self.inputs.lock().push(text.to_string());
            Ok(format!("summary: {}", text))
        }
    }

    fn image() -> ImagePayload {
        ImagePayload::new(vec![1, 2, 3], "image/png")
    }

    fn pipeline_with(
        extracted: Result<String, ()>,
    ) -> (Pipeline, Arc<RecordingTranslator>, Arc<RecordingSummarizer>) {
        let translator = Arc::new(RecordingTranslator::default());
        let summarizer = Arc::new(RecordingSummarizer::default());
        let pipeline = Pipeline::new(
            Arc::new(FixedExtractor(extracted)),
            LanguageDetector::default(),
            translator.clone(),
            summarizer.clone(),
        );
        (pipeline, translator, summarizer)
    }

    #[tokio::test]
    async fn test_french_image_is_translated_and_summarized_from_translation() {
        let text = "Bonjour le monde. Comment ça va? Au revoir.";
        let (pipeline, translator, summarizer) = pipeline_with(Ok(text.to_string()));

        let output = pipeline.process(&image(), None).await.unwrap();

        assert_eq!(output.language.code, "fr");
        assert_eq!(output.language.name, "French");
        assert_eq!(translator.calls.lock().len(), 1);
        assert_eq!(translator.calls.lock()[0].1, "French");

        let translated = output.translation.as_option().unwrap().to_string();
        assert!(!translated.is_empty());

        // Summary derived from the translated text, not the original
        assert_eq!(summarizer.inputs.lock()[0], translated);
        assert!(output.summary.starts_with("summary:"));

        let record = output.into_record(None);
        assert!(record.translated_text.is_some());
        assert_eq!(record.source_language, "French");
    }

    #[tokio::test]
    async fn test_empty_extraction_short_circuits_to_english() {
        let (pipeline, translator, summarizer) = pipeline_with(Ok(String::new()));

        let output = pipeline.process(&image(), None).await.unwrap();

        assert!(output.language.is_english());
        assert!(translator.calls.lock().is_empty());
        // Summarizer still invoked, on the empty original
        assert_eq!(summarizer.inputs.lock().as_slice(), &[String::new()]);
        assert_eq!(output.translation, Translation::NotNeeded);

        let record = output.into_record(None);
        assert_eq!(record.source_language, "English");
        assert!(record.translated_text.is_none());
    }

    #[tokio::test]
    async fn test_english_text_skips_translation() {
        let text = "The quick brown fox jumps over the lazy dog near the river bank.";
        let (pipeline, translator, summarizer) = pipeline_with(Ok(text.to_string()));

        let output = pipeline.process(&image(), None).await.unwrap();

        assert!(output.language.is_english());
        assert!(translator.calls.lock().is_empty());
        assert_eq!(summarizer.inputs.lock()[0], text);
        assert!(output.translation.as_option().is_none());
    }

    #[tokio::test]
    async fn test_extraction_failure_aborts_run() {
        let (pipeline, translator, summarizer) = pipeline_with(Err(()));

        let err = pipeline.process(&image(), None).await.unwrap_err();

        assert!(matches!(err, PipelineError::ExtractionFailed { .. }));
        // Nothing downstream ran
        assert!(translator.calls.lock().is_empty());
        assert!(summarizer.inputs.lock().is_empty());
    }

    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _: &str, _: &str) -> TranslationResult<Option<String>> {
            Err(ApiError::BadStatus {
                status: 503,
                body: "overloaded".to_string(),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_translation_failure_aborts_run() {
        let summarizer = Arc::new(RecordingSummarizer::default());
        let pipeline = Pipeline::new(
            Arc::new(FixedExtractor(Ok(
                "Bonjour le monde. Comment ça va? Au revoir.".to_string()
            ))),
            LanguageDetector::default(),
            Arc::new(FailingTranslator),
            summarizer.clone(),
        );

        let err = pipeline.process(&image(), None).await.unwrap_err();

        match err {
            PipelineError::TranslationFailed { language, .. } => assert_eq!(language, "French"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(summarizer.inputs.lock().is_empty());
    }

    #[tokio::test]
    async fn test_progress_events_in_stage_order() {
        let text = "Bonjour le monde. Comment ça va? Au revoir.";
        let (pipeline, _, _) = pipeline_with(Ok(text.to_string()));

        let (tx, mut rx) = mpsc::unbounded_channel();
        pipeline.process(&image(), Some(&tx)).await.unwrap();
        drop(tx);

        let mut stages = Vec::new();
        while let Some(stage) = rx.recv().await {
            stages.push(stage);
        }
        assert_eq!(
            stages,
            vec![
                PipelineStage::Extracting,
                PipelineStage::Detecting,
                PipelineStage::Translating,
                PipelineStage::Summarizing,
            ]
        );
    }

    #[tokio::test]
    async fn test_no_translating_event_for_english_source() {
        let text = "The quick brown fox jumps over the lazy dog near the river bank.";
        let (pipeline, _, _) = pipeline_with(Ok(text.to_string()));

        let (tx, mut rx) = mpsc::unbounded_channel();
        pipeline.process(&image(), Some(&tx)).await.unwrap();
        drop(tx);

        let mut stages = Vec::new();
        while let Some(stage) = rx.recv().await {
            stages.push(stage);
        }
        assert!(!stages.contains(&PipelineStage::Translating));
    }

    #[tokio::test]
    async fn test_dropped_progress_receiver_does_not_fail_run() {
        let (pipeline, _, _) = pipeline_with(Ok("hello".to_string()));

        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        assert!(pipeline.process(&image(), Some(&tx)).await.is_ok());
    }
}
