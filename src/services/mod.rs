//! Retrieval-core services built on the domain ports.

pub mod chat;
pub mod chunker;
pub mod context;
pub mod ingestion;
pub mod migration;
pub mod provider_registry;
pub mod retriever;
pub mod similarity;
pub mod vector_store;

pub use chat::{ChatAnswer, ChatService};
pub use chunker::Chunker;
pub use context::RagContext;
pub use ingestion::{IngestReport, IngestRequest, IngestionService};
pub use migration::{MigrationReport, MigrationService};
pub use provider_registry::ProviderRegistry;
pub use retriever::Retriever;
pub use similarity::{checked_k, cosine_similarity, rank};
pub use vector_store::VectorStore;
