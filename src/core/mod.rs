pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items for convenience
pub use config::Config;
pub use errors::{
    ApiError, ConfigError, ExtractionError, PipelineError, StoreError, SummarizationError,
    TranslationError,
};
pub use types::{
    ImagePayload, LanguageGuess, PipelineOutput, PipelineStage, ResultRecord, Translation,
};
