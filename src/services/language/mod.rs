// Language identification for extracted text
//
// Delegates to whatlang's trigram classifier, then maps its ISO 639-3
// codes into the directory's 639-1 space. Detection is best-effort and
// never fails the pipeline: short, undetermined or unclassifiable input
// all degrade to English.

pub mod directory;

use tracing::debug;

use crate::core::types::LanguageGuess;

pub use directory::{code_for_name, name_for_code};

/// Default minimum trimmed length before detection is attempted.
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 10;

/// Map an ISO 639-3 code from the classifier to this system's 639-1
/// space. Only codes the directory actually supports are listed;
/// unmapped codes pass through unchanged (and resolve to "Unknown"
/// downstream).
fn map_lang_code(code: &str) -> &str {
    match code {
        "eng" => "en",
        "fra" => "fr",
        "spa" => "es",
        "deu" => "de",
        "ita" => "it",
        "por" => "pt",
        "nld" => "nl",
        "rus" => "ru",
        // whatlang reports Mandarin as cmn, franc-era data used zho
        "zho" | "cmn" => "zh",
        "jpn" => "ja",
        "kor" => "ko",
        "ara" => "ar",
        "hin" => "hi",
        "ben" => "bn",
        "pan" => "pa",
        "tel" => "te",
        "mar" => "mr",
        "tam" => "ta",
        "urd" => "ur",
        "guj" => "gu",
        "kan" => "kn",
        "mal" => "ml",
        "tha" => "th",
        "vie" => "vi",
        other => other,
    }
}

/// Statistical language detector with a minimum-signal threshold.
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    min_text_length: usize,
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TEXT_LENGTH)
    }
}

impl LanguageDetector {
    pub fn new(min_text_length: usize) -> Self {
        Self { min_text_length }
    }

    /// Guess the language of `text`.
    ///
    /// Returns English unconditionally when the trimmed input is below
    /// the minimum length (too little signal to classify reliably) or
    /// when the classifier cannot determine a language.
    pub fn detect(&self, text: &str) -> LanguageGuess {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_text_length {
            return LanguageGuess::english();
        }

        let info = match whatlang::detect(trimmed) {
            Some(info) => info,
            None => {
                debug!("language undetermined, defaulting to English");
                return LanguageGuess::english();
            }
        };

        let code = map_lang_code(info.lang().code()).to_string();
        let name = directory::name_for_code(&code).to_string();
        debug!(code = %code, name = %name, confidence = info.confidence(), "detected language");

        LanguageGuess { code, name }
    }
}
