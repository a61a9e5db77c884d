//! chatrag - retrieval core for a document chatbot
//!
//! Text is split into overlapping chunks, embedded by a pluggable provider
//! (hosted OpenAI or a local Ollama server), persisted as records in SQLite and
//! retrieved by brute-force cosine similarity.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the ports adapters implement
//! - **Adapters** (`adapters`): HTTP embedding/LLM providers and SQLite repositories
//! - **Service Layer** (`services`): chunking, similarity, vector store, provider
//!   switching, ingestion, migration and chat
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use chatrag::adapters::sqlite::initialize_database;
//! use chatrag::services::RagContext;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = chatrag::ConfigLoader::load()?;
//!     let pool = initialize_database(&config.database).await?;
//!     let ctx = RagContext::with_default_providers(config, pool)?;
//!     let store = ctx.store(None).await?;
//!     let hits = store.similarity_search("opening hours", 4).await?;
//!     println!("{} documents", hits.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Chunk, Config, EmbeddingRecord, Metadata, ProviderKind, RetrievedDocument, SearchResult,
    SourceType,
};
pub use domain::ports::{EmbeddingProvider, LlmProvider, ProviderFactory, VectorRecordRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Chunker, ProviderRegistry, RagContext, Retriever, VectorStore};
