// Custom error types for better error handling and debugging
//
// Using thiserror for ergonomic error definitions with:
// - Context preservation
// - Type-safe error matching
// - Automatic Display/Error trait implementations
// - Source error chaining

use thiserror::Error;

/// Errors from the Gemini generateContent endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Text extraction (OCR) errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("OCR request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Unsupported image payload: {0}")]
    InvalidImage(String),
}

/// Translation errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Translation request failed: {0}")]
    Api(#[from] ApiError),
}

/// Summarization errors
#[derive(Debug, Error)]
pub enum SummarizationError {
    #[error("Summarization request failed: {0}")]
    Api(#[from] ApiError),
}

/// Result store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write store file {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to create data directory {path}: {source}")]
    DirectoryCreationFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Record serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Pipeline orchestration errors
///
/// Every variant is fatal to the current run: fail-fast, no retry,
/// no partial record reaches the store. Language detection has no
/// variant here because it degrades to English instead of failing.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Text extraction failed: {source}")]
    ExtractionFailed {
        #[source]
        source: ExtractionError,
    },

    #[error("Translation from {language} failed: {source}")]
    TranslationFailed {
        language: String,
        #[source]
        source: TranslationError,
    },

    #[error("Summarization failed: {source}")]
    SummarizationFailed {
        #[source]
        source: SummarizationError,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API key configured (set GEMINI_API_KEY environment variable)")]
    NoApiKey,

    #[error("API timeout must be > 0 seconds")]
    InvalidApiTimeout,

    #[error("Minimum detection length must be > 0, got {0}")]
    InvalidMinTextLength(usize),

    #[error("Invalid data directory: {0}")]
    InvalidDataDir(String),
}

// Convenience type aliases for Results
pub type ExtractionResult<T> = Result<T, ExtractionError>;
pub type TranslationResult<T> = Result<T, TranslationError>;
pub type SummarizationResult<T> = Result<T, SummarizationError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type PipelineResult<T> = Result<T, PipelineError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
