//! Common test utilities for integration tests
//!
//! Deterministic providers and a fully wired context over an in-memory
//! database. Nothing here talks to the network.

#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chatrag::adapters::sqlite::create_migrated_test_pool;
use chatrag::domain::models::{Config, GenerationParams, ProviderKind};
use chatrag::domain::ports::{EmbeddingProvider, LlmProvider, ProviderFactory};
use chatrag::{DomainError, DomainResult, RagContext};

pub const HOSTED_DIMENSION: usize = 16;
pub const LOCAL_DIMENSION: usize = 8;

/// Hashed bag-of-words embedder. Identical texts get identical vectors and
/// texts sharing words point in similar directions.
pub struct HashingEmbedder {
    kind: ProviderKind,
    model: String,
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(kind: ProviderKind) -> Self {
        let dimension = if kind.is_hosted() { HOSTED_DIMENSION } else { LOCAL_DIMENSION };
        Self {
            kind,
            model: format!("{}-hash-{}", kind, dimension),
            dimension,
        }
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if word.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let slot = (hasher.finish() % self.dimension as u64) as usize;
            vector[slot] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}

/// LLM that records prompts and answers with a fixed reply.
pub struct ScriptedLlm {
    kind: ProviderKind,
    model: String,
    params: GenerationParams,
    reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn params(&self) -> &GenerationParams {
        &self.params
    }

    async fn generate(&self, prompt: &str) -> DomainResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(self.reply.clone())
    }
}

/// Factory handing out [`HashingEmbedder`]s and [`ScriptedLlm`]s.
pub struct FakeFactory {
    reply: String,
    fail_embeddings: AtomicBool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeFactory {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail_embeddings: AtomicBool::new(false),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every subsequent embedding-provider request fail.
    pub fn break_embeddings(&self) {
        self.fail_embeddings.store(true, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl ProviderFactory for FakeFactory {
    fn embeddings(&self, kind: ProviderKind) -> DomainResult<Arc<dyn EmbeddingProvider>> {
        if self.fail_embeddings.load(Ordering::SeqCst) {
            return Err(DomainError::Provider(format!("{kind} embeddings unavailable")));
        }
        Ok(Arc::new(HashingEmbedder::new(kind)))
    }

    fn llm(&self, kind: ProviderKind, model: Option<&str>) -> DomainResult<Arc<dyn LlmProvider>> {
        Ok(Arc::new(ScriptedLlm {
            kind,
            model: model.unwrap_or("scripted").to_string(),
            params: GenerationParams::default(),
            reply: self.reply.clone(),
            prompts: Arc::clone(&self.prompts),
        }))
    }
}

/// A context wired to `factory` over a fresh in-memory database.
pub async fn setup_context(factory: Arc<FakeFactory>) -> (SqlitePool, RagContext) {
    setup_context_with(factory, Config::default()).await
}

pub async fn setup_context_with(factory: Arc<FakeFactory>, config: Config) -> (SqlitePool, RagContext) {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test database");
    let ctx = RagContext::new(config, pool.clone(), factory).expect("Failed to build context");
    (pool, ctx)
}

/// Insert a row bypassing the domain model, for legacy or malformed data.
pub async fn insert_raw(
    pool: &SqlitePool,
    collection: &str,
    id: &str,
    content: Option<&str>,
    metadata: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO vector_records (id, collection, content, embedding, metadata, model, created)
         VALUES (?, ?, ?, '[0.5, 0.5]', ?, 'legacy-model', NULL)",
    )
    .bind(id)
    .bind(collection)
    .bind(content)
    .bind(metadata)
    .execute(pool)
    .await
    .expect("Failed to insert raw row");
}
