//! OpenAI provider adapter.
//!
//! Embeddings go through the `/embeddings` endpoint, which accepts a batch of
//! inputs natively. Text generation goes through `/chat/completions` with a
//! single user message. Compatible with any OpenAI-compatible API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GenerationParams, OpenAiConfig, ProviderKind};
use crate::domain::ports::{EmbeddingProvider, LlmProvider};

fn api_key(config: &OpenAiConfig) -> DomainResult<String> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .ok_or_else(|| {
            DomainError::Configuration(
                "OpenAI API key not set. Set OPENAI_API_KEY env var or configure providers.openai.api_key."
                    .to_string(),
            )
        })
}

fn build_client(timeout_secs: u64) -> DomainResult<Arc<reqwest::Client>> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map(Arc::new)
        .map_err(|e| DomainError::Configuration(format!("Failed to build HTTP client: {e}")))
}

async fn error_for_status(response: reqwest::Response, what: &str) -> DomainResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
    Err(DomainError::Provider(format!("{what} API returned {status}: {body}")))
}

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    config: OpenAiConfig,
    client: Arc<reqwest::Client>,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiConfig) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    async fn call_embeddings_api(&self, texts: Vec<String>) -> DomainResult<Vec<Vec<f32>>> {
        let api_key = api_key(&self.config)?;
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let expected = texts.len();

        let request_body = EmbeddingsRequest {
            model: self.config.embedding_model.clone(),
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DomainError::Provider(format!("Embedding API request failed: {e}")))?;
        let response = error_for_status(response, "Embedding").await?;

        let result: EmbeddingsResponse = response.json().await.map_err(|e| {
            DomainError::Provider(format!("Failed to parse embedding response: {e}"))
        })?;

        if result.data.len() != expected {
            return Err(DomainError::Provider(format!(
                "Embedding API returned {} vectors for {} inputs",
                result.data.len(),
                expected
            )));
        }

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let results = self.call_embeddings_api(vec![text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Provider("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_vectors = Vec::with_capacity(texts.len());

        // Chunk by max_batch_size
        for chunk in texts.chunks(self.config.max_batch_size.max(1)) {
            let vectors = self.call_embeddings_api(chunk.to_vec()).await?;
            all_vectors.extend(vectors);
        }

        Ok(all_vectors)
    }
}

/// OpenAI chat-completions provider.
pub struct OpenAiLlmProvider {
    config: OpenAiConfig,
    model: String,
    params: GenerationParams,
    client: Arc<reqwest::Client>,
}

impl OpenAiLlmProvider {
    pub fn new(config: OpenAiConfig, model: Option<&str>) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self {
            model: model.map_or_else(|| config.chat_model.clone(), str::to_string),
            params: config.generation.clone(),
            config,
            client,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiLlmProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn params(&self) -> &GenerationParams {
        &self.params
    }

    async fn generate(&self, prompt: &str) -> DomainResult<String> {
        let api_key = api_key(&self.config)?;
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            max_tokens: self.params.max_tokens,
            presence_penalty: self.params.presence_penalty,
            frequency_penalty: self.params.frequency_penalty,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DomainError::Provider(format!("Chat API request failed: {e}")))?;
        let response = error_for_status(response, "Chat").await?;

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Provider(format!("Failed to parse chat response: {e}")))?;

        Ok(result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config_for(server: &Server) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.url(),
            dimension: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_api_key_from_config() {
        let config = OpenAiConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        assert_eq!(api_key(&config).unwrap(), "test-key");
    }

    #[test]
    fn test_api_key_missing() {
        temp_env::with_var_unset("OPENAI_API_KEY", || {
            let err = api_key(&OpenAiConfig::default()).unwrap_err();
            assert!(matches!(err, DomainError::Configuration(_)));
        });
    }

    #[tokio::test]
    async fn test_embed_batch_restores_input_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "text-embedding-3-small",
                "input": ["first", "second"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": [
                        {"embedding": [0.0, 1.0], "index": 1},
                        {"embedding": [1.0, 0.0], "index": 0}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(config_for(&server)).unwrap();
        let vectors = provider
            .embed_batch(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(provider.model_name(), "text-embedding-3-small");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_embed_batch_count_mismatch_is_provider_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(json!({"data": [{"embedding": [1.0, 0.0], "index": 0}]}).to_string())
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(config_for(&server)).unwrap();
        let err = provider
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();
        assert!(err.is_provider());
    }

    #[tokio::test]
    async fn test_http_error_is_provider_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(config_for(&server)).unwrap();
        let err = provider.embed("hello").await.unwrap_err();
        assert!(err.is_provider());
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_provider_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data": [{"embedding": "nope", "index": 0}]}"#)
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(config_for(&server)).unwrap();
        assert!(provider.embed("hello").await.unwrap_err().is_provider());
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let server = Server::new_async().await;
        let provider = OpenAiEmbeddingProvider::new(config_for(&server)).unwrap();
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_sends_sampling_params() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 2048
            })))
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"content": "hello"}}]}).to_string())
            .create_async()
            .await;

        let llm = OpenAiLlmProvider::new(config_for(&server), Some("gpt-4o-mini")).unwrap();
        assert_eq!(llm.generate("hi").await.unwrap(), "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_null_content_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"content": null}}]}).to_string())
            .create_async()
            .await;

        let llm = OpenAiLlmProvider::new(config_for(&server), None).unwrap();
        assert_eq!(llm.model_name(), "gpt-4o");
        assert_eq!(llm.generate("hi").await.unwrap(), "");
    }
}
