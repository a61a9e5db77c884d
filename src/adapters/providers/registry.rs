//! Provider factory backed by configuration.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{OllamaConfig, OpenAiConfig, ProviderKind, ProvidersConfig};
use crate::domain::ports::{EmbeddingProvider, LlmProvider, ProviderFactory};

use super::ollama::{OllamaEmbeddingProvider, OllamaLlmProvider};
use super::openai::{OpenAiEmbeddingProvider, OpenAiLlmProvider};

/// Builds OpenAI and Ollama providers from their config blocks.
#[derive(Debug, Clone, Default)]
pub struct DefaultProviderFactory {
    openai_config: OpenAiConfig,
    ollama_config: OllamaConfig,
}

impl DefaultProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self {
            openai_config: config.openai.clone(),
            ollama_config: config.ollama.clone(),
        }
    }

    pub fn with_openai_config(mut self, config: OpenAiConfig) -> Self {
        self.openai_config = config;
        self
    }

    pub fn with_ollama_config(mut self, config: OllamaConfig) -> Self {
        self.ollama_config = config;
        self
    }

    pub fn available_types(&self) -> Vec<&'static str> {
        ProviderKind::all().iter().map(ProviderKind::as_str).collect()
    }
}

impl ProviderFactory for DefaultProviderFactory {
    fn embeddings(&self, kind: ProviderKind) -> DomainResult<Arc<dyn EmbeddingProvider>> {
        Ok(match kind {
            ProviderKind::OpenAi => Arc::new(OpenAiEmbeddingProvider::new(self.openai_config.clone())?),
            ProviderKind::Ollama => Arc::new(OllamaEmbeddingProvider::new(self.ollama_config.clone())?),
        })
    }

    fn llm(&self, kind: ProviderKind, model: Option<&str>) -> DomainResult<Arc<dyn LlmProvider>> {
        Ok(match kind {
            ProviderKind::OpenAi => Arc::new(OpenAiLlmProvider::new(self.openai_config.clone(), model)?),
            ProviderKind::Ollama => Arc::new(OllamaLlmProvider::new(self.ollama_config.clone(), model)?),
        })
    }
}
