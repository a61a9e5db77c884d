use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmbeddingRecord, StoredDocument, TagPage};

/// Persistence for embedding records, partitioned into named collections.
///
/// Writes are per record; a batch that fails midway leaves the records written
/// before the failure in place.
#[async_trait]
pub trait VectorRecordRepository: Send + Sync {
    async fn insert(&self, collection: &str, record: &EmbeddingRecord) -> DomainResult<()>;

    /// Every well-formed record in insertion order.
    ///
    /// Rows whose embedding is missing or not a numeric array, or whose
    /// content is missing, are skipped with a warning.
    async fn scan_all(&self, collection: &str) -> DomainResult<Vec<EmbeddingRecord>>;

    /// Every row in insertion order, without decoding embeddings.
    async fn scan_documents(&self, collection: &str) -> DomainResult<Vec<StoredDocument>>;

    async fn delete(&self, collection: &str, id: &str) -> DomainResult<bool>;

    async fn delete_all(&self, collection: &str) -> DomainResult<u64>;

    async fn delete_by_tag(&self, collection: &str, tag: &str) -> DomainResult<u64>;

    /// Rows whose `metadata.tags` contains `tag`, ordered by id.
    async fn find_by_tag(
        &self,
        collection: &str,
        tag: &str,
        page: TagPage,
    ) -> DomainResult<Vec<StoredDocument>>;

    async fn count(&self, collection: &str) -> DomainResult<u64>;
}
