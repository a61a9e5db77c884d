//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - EmbeddingProvider: text to vector
//! - LlmProvider: prompt to completion
//! - ProviderFactory: builds both for a provider kind
//! - VectorRecordRepository: embedding record persistence
//! - ScrapedUrlRepository: crawled-URL deduplication

pub mod embedding;
pub mod llm;
pub mod provider_factory;
pub mod url_tracker;
pub mod vector_record_repository;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use provider_factory::ProviderFactory;
pub use url_tracker::ScrapedUrlRepository;
pub use vector_record_repository::VectorRecordRepository;
