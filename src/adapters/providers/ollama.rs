//! Ollama provider adapter.
//!
//! The local model server has no batch embedding endpoint, so a batch is
//! embedded with repeated single-text calls. Calls run with bounded
//! concurrency and results keep input order.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::config::DEFAULT_OLLAMA_BASE_URL;
use crate::domain::models::{GenerationParams, OllamaConfig, ProviderKind};
use crate::domain::ports::{EmbeddingProvider, LlmProvider};

/// Configured address, then `OLLAMA_BASE_URL`, then the local default.
fn base_url(config: &OllamaConfig) -> String {
    config
        .base_url
        .clone()
        .or_else(|| std::env::var("OLLAMA_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn build_client(timeout_secs: u64) -> DomainResult<Arc<reqwest::Client>> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map(Arc::new)
        .map_err(|e| DomainError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Ollama embedding provider.
pub struct OllamaEmbeddingProvider {
    config: OllamaConfig,
    base_url: String,
    client: Arc<reqwest::Client>,
}

impl OllamaEmbeddingProvider {
    pub fn new(config: OllamaConfig) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self {
            base_url: base_url(&config),
            config,
            client,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&EmbeddingRequest {
                model: &self.config.embedding_model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| DomainError::Provider(format!("Ollama embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Provider(format!(
                "Ollama embedding endpoint returned {status}: {body}"
            )));
        }

        let result: EmbeddingResponse = response.json().await.map_err(|e| {
            DomainError::Provider(format!("Failed to parse Ollama embedding response: {e}"))
        })?;
        Ok(result.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        // `buffered` yields in submission order regardless of completion order
        let requests: Vec<_> = texts.iter().map(|text| self.embed(text)).collect();
        stream::iter(requests)
            .buffered(self.config.max_concurrency.max(1))
            .try_collect()
            .await
    }
}

/// Ollama text-generation provider.
pub struct OllamaLlmProvider {
    base_url: String,
    model: String,
    params: GenerationParams,
    client: Arc<reqwest::Client>,
}

impl OllamaLlmProvider {
    /// A `model` override naming a Mistral model gets near-greedy sampling.
    /// Without an override the configured chat model and parameters are used.
    pub fn new(config: OllamaConfig, model: Option<&str>) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)?;
        let params = match model {
            Some(name) if name.contains("mistral") => config.generation.tuned_for_mistral(),
            _ => config.generation.clone(),
        };
        Ok(Self {
            base_url: base_url(&config),
            model: model.map_or_else(|| config.chat_model.clone(), str::to_string),
            params,
            client,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaLlmProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn params(&self) -> &GenerationParams {
        &self.params
    }

    async fn generate(&self, prompt: &str) -> DomainResult<String> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature: self.params.temperature,
                    top_p: self.params.top_p,
                    num_predict: self.params.max_tokens,
                },
            })
            .send()
            .await
            .map_err(|e| DomainError::Provider(format!("Ollama generate request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Provider(format!(
                "Ollama generate endpoint returned {status}: {body}"
            )));
        }

        let result: GenerateResponse = response.json().await.map_err(|e| {
            DomainError::Provider(format!("Failed to parse Ollama generate response: {e}"))
        })?;
        Ok(result.response)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}
