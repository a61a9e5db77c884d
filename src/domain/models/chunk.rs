//! Chunk and source-metadata models.
//!
//! A chunk is a contiguous slice of a source document, carried together with
//! the metadata describing where it came from. Chunks are immutable once built
//! and are handed to the vector store for persistence.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::provider::ProviderKind;
use crate::domain::errors::DomainError;

/// Free-form record metadata. Persisted verbatim as a JSON object.
pub type Metadata = serde_json::Map<String, Value>;

/// Metadata key holding the tag list used by tag search and deletion.
pub const TAGS_KEY: &str = "tags";

/// A bounded text segment ready for embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Number of characters (not bytes) in the chunk.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Where ingested text originally came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Url,
    Pdf,
    Text,
    Json,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Url => "url",
            SourceType::Pdf => "pdf",
            SourceType::Text => "text",
            SourceType::Json => "json",
        }
    }

    /// Value stored in the `source` metadata field for this source type.
    ///
    /// Crawled pages keep their URL; uploads are labelled by kind.
    pub fn source_label(&self, label: &str) -> String {
        match self {
            SourceType::Url => label.to_string(),
            SourceType::Pdf => "pdf-upload".to_string(),
            SourceType::Text | SourceType::Json => "text-input".to_string(),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "url" => Ok(SourceType::Url),
            "pdf" => Ok(SourceType::Pdf),
            "text" => Ok(SourceType::Text),
            "json" => Ok(SourceType::Json),
            other => Err(DomainError::Validation(format!(
                "Unknown source type: {other}. Expected one of: url, pdf, text, json"
            ))),
        }
    }
}

/// The minimum metadata every ingested chunk carries.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMetadata {
    pub source: String,
    pub date_added: DateTime<Utc>,
    pub tags: BTreeSet<String>,
    pub provider: ProviderKind,
}

impl SourceMetadata {
    pub fn new(source_type: SourceType, label: &str, tag: Option<&str>, provider: ProviderKind) -> Self {
        let tags = tag
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| BTreeSet::from([t.to_string()]))
            .unwrap_or_default();

        Self {
            source: source_type.source_label(label),
            date_added: Utc::now(),
            tags,
            provider,
        }
    }

    pub fn into_metadata(self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), Value::String(self.source));
        metadata.insert(
            "dateAdded".to_string(),
            Value::String(self.date_added.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        metadata.insert(
            TAGS_KEY.to_string(),
            Value::Array(self.tags.into_iter().map(Value::String).collect()),
        );
        metadata.insert(
            "provider".to_string(),
            Value::String(self.provider.as_str().to_string()),
        );
        metadata
    }
}

/// Tags attached to a metadata object, ignoring non-string entries.
pub fn tags_of(metadata: &Metadata) -> BTreeSet<String> {
    metadata
        .get(TAGS_KEY)
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_label_per_type() {
        assert_eq!(SourceType::Url.source_label("https://example.com/a"), "https://example.com/a");
        assert_eq!(SourceType::Pdf.source_label("report.pdf"), "pdf-upload");
        assert_eq!(SourceType::Text.source_label("anything"), "text-input");
        assert_eq!(SourceType::Json.source_label("data.json"), "text-input");
    }

    #[test]
    fn test_source_type_parse() {
        assert_eq!("PDF".parse::<SourceType>().unwrap(), SourceType::Pdf);
        assert!("docx".parse::<SourceType>().is_err());
    }

    #[test]
    fn test_source_metadata_fields() {
        let metadata =
            SourceMetadata::new(SourceType::Url, "https://example.com", Some("housing"), ProviderKind::Ollama)
                .into_metadata();

        assert_eq!(metadata["source"], "https://example.com");
        assert_eq!(metadata["provider"], "ollama");
        assert_eq!(metadata["tags"], serde_json::json!(["housing"]));
        assert!(metadata["dateAdded"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_blank_tag_gives_empty_tag_set() {
        let metadata = SourceMetadata::new(SourceType::Text, "", Some("   "), ProviderKind::OpenAi);
        assert!(metadata.tags.is_empty());

        let metadata = SourceMetadata::new(SourceType::Text, "", None, ProviderKind::OpenAi);
        assert!(metadata.tags.is_empty());
    }

    #[test]
    fn test_tags_of_skips_non_strings() {
        let mut metadata = Metadata::new();
        metadata.insert(TAGS_KEY.to_string(), serde_json::json!(["a", 3, "b", null]));
        let tags = tags_of(&metadata);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(Chunk::new("åäö").char_len(), 3);
    }
}
