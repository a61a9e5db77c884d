use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::ProviderKind;

use super::{EmbeddingProvider, LlmProvider};

/// Builds provider instances for a given provider kind.
///
/// The provider registry asks the factory for a fresh embedding provider each
/// time it rebuilds its store, so tests can swap in deterministic providers.
pub trait ProviderFactory: Send + Sync {
    fn embeddings(&self, kind: ProviderKind) -> DomainResult<Arc<dyn EmbeddingProvider>>;

    /// LLM for `kind`. `model` overrides the configured chat model.
    fn llm(&self, kind: ProviderKind, model: Option<&str>) -> DomainResult<Arc<dyn LlmProvider>>;
}
