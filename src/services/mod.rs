pub mod extraction;
pub mod gemini;
pub mod language;
pub mod summarization;
pub mod translation;

// Re-export commonly used services
pub use extraction::{GeminiExtractor, TextExtractor};
pub use gemini::GeminiClient;
pub use language::LanguageDetector;
pub use summarization::{GeminiSummarizer, Summarizer};
pub use translation::{GeminiTranslator, Translator};
