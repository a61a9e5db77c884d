//! Active provider selection and the store bound to it.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::ProviderKind;
use crate::domain::ports::{ProviderFactory, VectorRecordRepository};

use super::vector_store::VectorStore;

/// Holds at most one live [`VectorStore`] and rebuilds it when a different
/// provider is requested.
///
/// Callers receive an `Arc` snapshot, so a search that started before a
/// switch finishes against the store it started with.
pub struct ProviderRegistry {
    factory: Arc<dyn ProviderFactory>,
    repository: Arc<dyn VectorRecordRepository>,
    collection: String,
    active: RwLock<Option<Arc<VectorStore>>>,
}

impl ProviderRegistry {
    pub fn new(
        factory: Arc<dyn ProviderFactory>,
        repository: Arc<dyn VectorRecordRepository>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            repository,
            collection: collection.into(),
            active: RwLock::new(None),
        }
    }

    pub fn factory(&self) -> &Arc<dyn ProviderFactory> {
        &self.factory
    }

    /// Store for `kind`, building one if none exists or the active store
    /// belongs to another provider.
    pub async fn get_store(&self, kind: ProviderKind) -> DomainResult<Arc<VectorStore>> {
        {
            let active = self.active.read().await;
            if let Some(store) = active.as_ref().filter(|s| s.provider_kind() == kind) {
                return Ok(Arc::clone(store));
            }
        }

        let mut active = self.active.write().await;
        // Another caller may have built it while we waited for the lock
        if let Some(store) = active.as_ref().filter(|s| s.provider_kind() == kind) {
            return Ok(Arc::clone(store));
        }

        let previous = active.as_ref().map(|s| s.provider_kind());
        let store = self.build(kind)?;
        *active = Some(Arc::clone(&store));
        tracing::info!(from = ?previous, to = %kind, model = store.model_name(), "vector store bound to provider");
        Ok(store)
    }

    /// Drop the current store and build a fresh one for `kind`, even when
    /// `kind` is already active.
    pub async fn switch_provider(&self, kind: ProviderKind) -> DomainResult<Arc<VectorStore>> {
        let mut active = self.active.write().await;
        let previous = active.take().map(|s| s.provider_kind());
        let store = self.build(kind)?;
        *active = Some(Arc::clone(&store));
        tracing::info!(from = ?previous, to = %kind, model = store.model_name(), "switched provider");
        Ok(store)
    }

    pub async fn current_provider(&self) -> Option<ProviderKind> {
        self.active.read().await.as_ref().map(|s| s.provider_kind())
    }

    fn build(&self, kind: ProviderKind) -> DomainResult<Arc<VectorStore>> {
        let provider = self.factory.embeddings(kind)?;
        Ok(Arc::new(VectorStore::new(
            Arc::clone(&self.repository),
            provider,
            self.collection.clone(),
        )))
    }
}
