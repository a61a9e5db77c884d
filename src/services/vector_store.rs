//! Vector store bound to one embedding provider and one collection.

use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Chunk, EmbeddingRecord, ProviderKind, RetrievedDocument, SearchResult, StoredDocument, TagPage,
};
use crate::domain::ports::{EmbeddingProvider, VectorRecordRepository};

use super::retriever::Retriever;
use super::similarity;

/// Stores chunks with their embeddings and answers similarity queries.
///
/// Every search scans the whole collection and scores each record; see
/// [`similarity::rank`].
pub struct VectorStore {
    repository: Arc<dyn VectorRecordRepository>,
    provider: Arc<dyn EmbeddingProvider>,
    collection: String,
}

impl VectorStore {
    pub fn new(
        repository: Arc<dyn VectorRecordRepository>,
        provider: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            provider,
            collection: collection.into(),
        }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Embed `chunks` in one batch and persist them.
    #[instrument(skip(self, chunks), fields(collection = %self.collection, chunks = chunks.len()))]
    pub async fn add_documents(&self, chunks: Vec<Chunk>) -> DomainResult<Vec<String>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.provider.embed_batch(&texts).await?;
        self.add(chunks, embeddings).await
    }

    /// Persist pre-computed embeddings, one record per chunk.
    ///
    /// Records are written one at a time. When a write fails the error is
    /// returned and records written before it remain.
    pub async fn add(&self, chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> DomainResult<Vec<String>> {
        if chunks.len() != embeddings.len() {
            return Err(DomainError::Validation(format!(
                "got {} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }
        let dimension = self.dimension();
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimension) {
            return Err(DomainError::Validation(format!(
                "embedding has {} dimensions, provider {} produces {}",
                bad.len(),
                self.model_name(),
                dimension
            )));
        }

        let mut ids = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            let record = EmbeddingRecord::new(chunk.content, embedding, chunk.metadata, self.model_name());
            self.repository.insert(&self.collection, &record).await?;
            ids.push(record.id);
        }

        tracing::info!(collection = %self.collection, model = self.model_name(), count = ids.len(), "stored embeddings");
        Ok(ids)
    }

    /// Top-`k` records for a query vector, best first.
    pub async fn search_by_vector(&self, query: &[f32], k: usize) -> DomainResult<Vec<SearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let records = self.repository.scan_all(&self.collection).await?;
        let scanned = records.len();
        let results = similarity::rank(records, query, k);
        tracing::debug!(collection = %self.collection, scanned, returned = results.len(), "vector search");
        Ok(results)
    }

    #[instrument(skip(self, query), fields(collection = %self.collection))]
    pub async fn similarity_search_with_scores(&self, query: &str, k: usize) -> DomainResult<Vec<SearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let vector = self.provider.embed(query).await?;
        self.search_by_vector(&vector, k).await
    }

    pub async fn similarity_search(&self, query: &str, k: usize) -> DomainResult<Vec<RetrievedDocument>> {
        Ok(self
            .similarity_search_with_scores(query, k)
            .await?
            .into_iter()
            .map(RetrievedDocument::from)
            .collect())
    }

    /// A fixed-`k` retriever over this store.
    pub fn as_retriever(self: &Arc<Self>, k: usize) -> Retriever {
        Retriever::new(Arc::clone(self), k)
    }

    pub async fn scan_all(&self) -> DomainResult<Vec<EmbeddingRecord>> {
        self.repository.scan_all(&self.collection).await
    }

    /// Remove every record in the collection. Returns how many were removed.
    pub async fn clear_all(&self) -> DomainResult<u64> {
        let removed = self.repository.delete_all(&self.collection).await?;
        tracing::info!(collection = %self.collection, removed, "cleared vector store");
        Ok(removed)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<bool> {
        self.repository.delete(&self.collection, id).await
    }

    pub async fn delete_by_tag(&self, tag: &str) -> DomainResult<u64> {
        let tag = require_tag(tag)?;
        let removed = self.repository.delete_by_tag(&self.collection, tag).await?;
        tracing::info!(collection = %self.collection, tag, removed, "deleted documents by tag");
        Ok(removed)
    }

    pub async fn find_by_tag(&self, tag: &str, page: TagPage) -> DomainResult<Vec<StoredDocument>> {
        let tag = require_tag(tag)?;
        self.repository.find_by_tag(&self.collection, tag, page).await
    }

    pub async fn count(&self) -> DomainResult<u64> {
        self.repository.count(&self.collection).await
    }
}

fn require_tag(tag: &str) -> DomainResult<&str> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(DomainError::Validation("tag must not be empty".to_string()));
    }
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteVectorRecordRepository};
    use crate::domain::models::Metadata;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embeds text by looking it up in a fixed table.
    struct TableProvider {
        table: Vec<(&'static str, Vec<f32>)>,
    }

    #[async_trait]
    impl EmbeddingProvider for TableProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Ollama
        }

        fn model_name(&self) -> &str {
            "table"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
            self.table
                .iter()
                .find(|(t, _)| *t == text)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| DomainError::Provider(format!("no embedding for {text}")))
        }

        async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
            let mut out = Vec::new();
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }
    }

    /// Delegates to SQLite but fails the `fail_on`-th insert (1-based).
    struct FailingInsertRepository {
        inner: SqliteVectorRecordRepository,
        inserts: AtomicUsize,
        fail_on: usize,
    }

    #[async_trait]
    impl VectorRecordRepository for FailingInsertRepository {
        async fn insert(&self, collection: &str, record: &EmbeddingRecord) -> DomainResult<()> {
            let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.fail_on {
                return Err(DomainError::Database("disk I/O error".to_string()));
            }
            self.inner.insert(collection, record).await
        }

        async fn scan_all(&self, collection: &str) -> DomainResult<Vec<EmbeddingRecord>> {
            self.inner.scan_all(collection).await
        }

        async fn scan_documents(&self, collection: &str) -> DomainResult<Vec<StoredDocument>> {
            self.inner.scan_documents(collection).await
        }

        async fn delete(&self, collection: &str, id: &str) -> DomainResult<bool> {
            self.inner.delete(collection, id).await
        }

        async fn delete_all(&self, collection: &str) -> DomainResult<u64> {
            self.inner.delete_all(collection).await
        }

        async fn delete_by_tag(&self, collection: &str, tag: &str) -> DomainResult<u64> {
            self.inner.delete_by_tag(collection, tag).await
        }

        async fn find_by_tag(
            &self,
            collection: &str,
            tag: &str,
            page: TagPage,
        ) -> DomainResult<Vec<StoredDocument>> {
            self.inner.find_by_tag(collection, tag, page).await
        }

        async fn count(&self, collection: &str) -> DomainResult<u64> {
            self.inner.count(collection).await
        }
    }

    fn table_provider() -> TableProvider {
        TableProvider {
            table: vec![
                ("east", vec![1.0, 0.0]),
                ("north", vec![0.0, 1.0]),
                ("mostly east", vec![0.9, 0.1]),
            ],
        }
    }

    async fn store() -> Arc<VectorStore> {
        let pool = create_migrated_test_pool().await.unwrap();
        Arc::new(VectorStore::new(
            Arc::new(SqliteVectorRecordRepository::new(pool)),
            Arc::new(table_provider()),
            "test",
        ))
    }

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts.iter().map(|t| Chunk::new(*t)).collect()
    }

    #[tokio::test]
    async fn test_add_documents_then_search() {
        let store = store().await;
        let ids = store.add_documents(chunks(&["east", "north", "mostly east"])).await.unwrap();
        assert_eq!(ids.len(), 3);

        let results = store.similarity_search_with_scores("east", 2).await.unwrap();
        assert_eq!(results[0].id, ids[0]);
        assert_eq!(results[1].id, ids[2]);

        let records = store.scan_all().await.unwrap();
        assert!(records.iter().all(|r| r.model == "table"));
    }

    #[tokio::test]
    async fn test_add_rejects_length_mismatch() {
        let store = store().await;
        let err = store.add(chunks(&["a", "b"]), vec![vec![1.0, 0.0]]).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_rejects_wrong_dimension() {
        let store = store().await;
        let err = store.add(chunks(&["a"]), vec![vec![1.0, 0.0, 0.0]]).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_aborts_ingestion() {
        let store = store().await;
        let err = store.add_documents(chunks(&["east", "unknown"])).await.unwrap_err();
        assert!(err.is_provider());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_earlier_records() {
        let pool = create_migrated_test_pool().await.unwrap();
        let store = VectorStore::new(
            Arc::new(FailingInsertRepository {
                inner: SqliteVectorRecordRepository::new(pool),
                inserts: AtomicUsize::new(0),
                fail_on: 3,
            }),
            Arc::new(table_provider()),
            "test",
        );

        let err = store
            .add_documents(chunks(&["east", "north", "mostly east"]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Database(_)));

        // No transaction: the first two inserts stay committed
        assert_eq!(store.count().await.unwrap(), 2);
        let contents: Vec<String> = store.scan_all().await.unwrap().into_iter().map(|r| r.content).collect();
        assert_eq!(contents, vec!["east", "north"]);
    }

    #[tokio::test]
    async fn test_k_zero_skips_embedding() {
        let store = store().await;
        // "unknown" would fail to embed if the provider were called
        assert!(store.similarity_search("unknown", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_counts() {
        let store = store().await;
        assert_eq!(store.clear_all().await.unwrap(), 0);

        store.add_documents(chunks(&["east", "north"])).await.unwrap();
        assert_eq!(store.clear_all().await.unwrap(), 2);
        assert!(store.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_tag_rejected() {
        let store = store().await;
        assert!(matches!(store.delete_by_tag("  ").await, Err(DomainError::Validation(_))));
        assert!(matches!(
            store.find_by_tag("", TagPage::default()).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = store().await;
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), serde_json::json!("text-input"));
        let ids = store
            .add(vec![Chunk::new("east").with_metadata(metadata)], vec![vec![1.0, 0.0]])
            .await
            .unwrap();

        assert!(store.delete(&ids[0]).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
