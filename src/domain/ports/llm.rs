use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{GenerationParams, ProviderKind};

/// Text generation backend used to answer chat questions.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Name of the generating model.
    fn model_name(&self) -> &str;

    /// Sampling parameters sent with every request.
    fn params(&self) -> &GenerationParams;

    /// Generate a completion for a single user prompt.
    async fn generate(&self, prompt: &str) -> DomainResult<String>;
}
