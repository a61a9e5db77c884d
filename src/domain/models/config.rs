use serde::{Deserialize, Serialize};

use super::provider::{GenerationParams, ProviderKind};

/// Main configuration structure for chatrag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Embedding/LLM provider configuration
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Chunker settings used during ingestion
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Vector store collections
    #[serde(default)]
    pub store: StoreConfig,

    /// Retrieval settings used by chat
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".chatrag/chatrag.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files. Stdout only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Rotation for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProvidersConfig {
    /// Provider used when a caller does not name one
    #[serde(default)]
    pub default: ProviderKind,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Hosted (OpenAI) provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OpenAiConfig {
    /// API key (can also be set via OPENAI_API_KEY env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for API (for testing/proxies)
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_openai_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_openai_embedding_model")]
    pub embedding_model: String,

    /// Vector length produced by `embedding_model`
    #[serde(default = "default_openai_dimension")]
    pub dimension: usize,

    /// Maximum inputs per embeddings request
    #[serde(default = "default_openai_max_batch_size")]
    pub max_batch_size: usize,

    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "GenerationParams::hosted_default")]
    pub generation: GenerationParams,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_openai_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_openai_dimension() -> usize {
    1536
}

const fn default_openai_max_batch_size() -> usize {
    2048
}

const fn default_openai_timeout() -> u64 {
    30
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            chat_model: default_openai_chat_model(),
            embedding_model: default_openai_embedding_model(),
            dimension: default_openai_dimension(),
            max_batch_size: default_openai_max_batch_size(),
            timeout_secs: default_openai_timeout(),
            generation: GenerationParams::hosted_default(),
        }
    }
}

/// Local (Ollama) provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OllamaConfig {
    /// Model server address (can also be set via OLLAMA_BASE_URL env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_ollama_model")]
    pub chat_model: String,

    #[serde(default = "default_ollama_model")]
    pub embedding_model: String,

    /// Vector length produced by `embedding_model`
    #[serde(default = "default_ollama_dimension")]
    pub dimension: usize,

    /// In-flight single-text requests during batch embedding
    #[serde(default = "default_ollama_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default = "default_ollama_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "GenerationParams::local_default")]
    pub generation: GenerationParams,
}

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

fn default_ollama_model() -> String {
    "mistral:latest".to_string()
}

const fn default_ollama_dimension() -> usize {
    4096
}

const fn default_ollama_max_concurrency() -> usize {
    4
}

const fn default_ollama_timeout() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            chat_model: default_ollama_model(),
            embedding_model: default_ollama_model(),
            dimension: default_ollama_dimension(),
            max_concurrency: default_ollama_max_concurrency(),
            timeout_secs: default_ollama_timeout(),
            generation: GenerationParams::local_default(),
        }
    }
}

/// Chunker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Prefer cutting at paragraph, line, sentence or word boundaries
    #[serde(default = "default_true")]
    pub respect_boundaries: bool,
}

const fn default_chunk_size() -> usize {
    500
}

const fn default_chunk_overlap() -> usize {
    200
}

const fn default_true() -> bool {
    true
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            respect_boundaries: default_true(),
        }
    }
}

/// Vector store collections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// Collection the active store reads and writes
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Collection migrated from by `migrate`
    #[serde(default = "default_legacy_collection")]
    pub legacy_collection: String,
}

fn default_collection() -> String {
    "openai_document_embeddings".to_string()
}

fn default_legacy_collection() -> String {
    "document_embeddings".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            legacy_collection: default_legacy_collection(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// k used by plain similarity searches
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// k for narrow, factual questions
    #[serde(default = "default_focused_k")]
    pub focused_k: usize,

    /// k for questions asking for explanations or comparisons
    #[serde(default = "default_broad_k")]
    pub broad_k: usize,

    /// Lowercase phrases that mark a question as broad
    #[serde(default = "default_broad_keywords")]
    pub broad_keywords: Vec<String>,
}

const fn default_k() -> usize {
    4
}

const fn default_focused_k() -> usize {
    5
}

const fn default_broad_k() -> usize {
    8
}

fn default_broad_keywords() -> Vec<String> {
    ["explain", "describe", "compare", "how does", "what is"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            focused_k: default_focused_k(),
            broad_k: default_broad_k(),
            broad_keywords: default_broad_keywords(),
        }
    }
}
