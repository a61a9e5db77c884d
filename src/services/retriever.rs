//! Fixed-k retrieval facade consumed by prompt construction.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::RetrievedDocument;

use super::vector_store::VectorStore;

/// Returns the `k` documents most similar to a query, without scores.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<VectorStore>,
    k: usize,
}

impl Retriever {
    pub fn new(store: Arc<VectorStore>, k: usize) -> Self {
        Self { store, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub async fn get_relevant_documents(&self, query: &str) -> DomainResult<Vec<RetrievedDocument>> {
        self.store.similarity_search(query, self.k).await
    }
}
