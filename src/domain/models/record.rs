//! Persisted embedding records and the shapes derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chunk::Metadata;

/// The persisted unit: one chunk plus its embedding and provenance.
///
/// Records are never mutated in place; they are created on ingestion and
/// removed individually, by tag, or by clearing the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub id: String,
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: Metadata,
    pub model: String,
    pub created: DateTime<Utc>,
}

impl EmbeddingRecord {
    pub fn new(
        content: impl Into<String>,
        embedding: Vec<f32>,
        metadata: Metadata,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            embedding,
            metadata,
            model: model.into(),
            created: Utc::now(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// A scored match. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub content: String,
    pub metadata: Metadata,
    pub similarity: f32,
}

/// What a retriever hands to prompt construction: scores and ids stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub content: String,
    pub metadata: Metadata,
}

impl From<SearchResult> for RetrievedDocument {
    fn from(result: SearchResult) -> Self {
        Self {
            content: result.content,
            metadata: result.metadata,
        }
    }
}

impl RetrievedDocument {
    /// The `source` metadata field, if it is a string.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(|v| v.as_str())
    }
}

/// A stored record as seen by administrative reads.
///
/// Unlike [`EmbeddingRecord`] the content is optional and the embedding is
/// omitted, so rows that would be skipped by a similarity scan can still be
/// listed, migrated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredDocument {
    pub id: String,
    pub content: Option<String>,
    pub metadata: Metadata,
    pub model: Option<String>,
    pub created: Option<String>,
}

/// Pagination for tag searches. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPage {
    pub limit: u32,
    pub page: u32,
}

impl TagPage {
    pub const DEFAULT_LIMIT: u32 = 100;

    pub fn new(limit: u32, page: u32) -> Self {
        Self {
            limit: limit.max(1),
            page: page.max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

impl Default for TagPage {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 1)
    }
}
