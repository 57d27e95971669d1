// Core data types for the text processing workflow

use base64::{engine::general_purpose, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A language guessed from raw text. Transient: produced by the
/// detector, consumed by the orchestrator, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageGuess {
    /// ISO 639-1 code, e.g. "fr"
    pub code: String,
    /// Human-readable name, e.g. "French"
    pub name: String,
}

impl LanguageGuess {
    pub fn english() -> Self {
        Self {
            code: "en".to_string(),
            name: "English".to_string(),
        }
    }

    pub fn is_english(&self) -> bool {
        self.code == "en"
    }
}

/// Outcome of the translation stage.
///
/// A sum type rather than `Option<String>` so that "a translation
/// exists if and only if the source was non-English" holds by
/// construction; `Option` only appears at the serialization boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Source text was already English
    NotNeeded,
    /// English rendition of a non-English source
    Translated(String),
}

impl Translation {
    pub fn as_option(&self) -> Option<&str> {
        match self {
            Translation::NotNeeded => None,
            Translation::Translated(text) => Some(text),
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Translation::NotNeeded => None,
            Translation::Translated(text) => Some(text),
        }
    }
}

/// Image handed to the pipeline: raw bytes plus MIME type.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Encode as a data URI for the persisted `imageUrl` field.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Everything a completed pipeline run produced. Held by the caller
/// until the user explicitly saves it; only then does it become a
/// ResultRecord.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub original_text: String,
    pub language: LanguageGuess,
    pub translation: Translation,
    pub summary: String,
}

impl PipelineOutput {
    /// Turn a completed run into a persistable record. The id and
    /// timestamp are generated here, at save time.
    pub fn into_record(self, image_url: Option<String>) -> ResultRecord {
        ResultRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            original_text: self.original_text,
            translated_text: self.translation.into_option(),
            summary: self.summary,
            source_language: self.language.name,
            image_url,
        }
    }
}

/// The persisted unit of work product. Immutable after creation;
/// created only by an explicit save, destroyed only by delete/clear.
///
/// Field names match the browser-era on-disk layout, so existing
/// stored collections parse unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: String,
    /// RFC 3339 creation time, set at save time
    pub timestamp: String,
    pub original_text: String,
    /// Present iff the source language was detected as non-English
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    pub summary: String,
    /// Human-readable name, e.g. "French"
    pub source_language: String,
    /// Data URI of the source image, if kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Pipeline stage markers emitted as advisory progress notifications.
/// Carry no control-flow meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Extracting,
    Detecting,
    Translating,
    Summarizing,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Extracting => "extracting",
            PipelineStage::Detecting => "detecting",
            PipelineStage::Translating => "translating",
            PipelineStage::Summarizing => "summarizing",
        }
    }
}
