// Library exports for the text-scribe processing workflow

// Core modules
pub mod core;
pub mod orchestration;
pub mod services;
pub mod storage;

// Re-export commonly used types and functions
pub use core::{
    config::Config,
    errors::{
        ApiError, ConfigError, ExtractionError, PipelineError, StoreError, SummarizationError,
        TranslationError,
    },
    types::{ImagePayload, LanguageGuess, PipelineOutput, PipelineStage, ResultRecord, Translation},
};

pub use orchestration::{Pipeline, ProgressSender};

pub use services::{
    GeminiClient, GeminiExtractor, GeminiSummarizer, GeminiTranslator, LanguageDetector,
    Summarizer, TextExtractor, Translator,
};

pub use storage::ResultStore;
