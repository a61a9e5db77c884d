//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for similarity search.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::ProviderKind;

/// Trait for embedding providers (hosted and local).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Which backend this provider talks to.
    fn kind(&self) -> ProviderKind;

    /// Model name stamped on every record this provider embeds.
    fn model_name(&self) -> &str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    ///
    /// The output has the same length and order as `texts`. A failure for any
    /// input fails the whole batch.
    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>>;
}
