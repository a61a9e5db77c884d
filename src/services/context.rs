//! Application context: every service wired from one configuration.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::adapters::providers::DefaultProviderFactory;
use crate::adapters::sqlite::{SqliteScrapedUrlRepository, SqliteVectorRecordRepository};
use crate::domain::errors::DomainResult;
use crate::domain::models::{Config, ProviderKind};
use crate::domain::ports::{ProviderFactory, ScrapedUrlRepository, VectorRecordRepository};

use super::chat::ChatService;
use super::chunker::Chunker;
use super::ingestion::IngestionService;
use super::migration::MigrationService;
use super::provider_registry::ProviderRegistry;
use super::vector_store::VectorStore;

/// Owns the shared provider selection and the services built on it.
///
/// Construct one per process and pass it by reference; there is no global
/// store.
pub struct RagContext {
    pub config: Config,
    pub repository: Arc<dyn VectorRecordRepository>,
    pub urls: Arc<dyn ScrapedUrlRepository>,
    pub registry: Arc<ProviderRegistry>,
    pub ingestion: IngestionService,
    pub migration: MigrationService,
    pub chat: ChatService,
}

impl RagContext {
    /// Wire services over `pool` using providers from `factory`.
    pub fn new(config: Config, pool: SqlitePool, factory: Arc<dyn ProviderFactory>) -> DomainResult<Self> {
        let chunker = Chunker::new(config.chunking)?;
        let repository: Arc<dyn VectorRecordRepository> =
            Arc::new(SqliteVectorRecordRepository::new(pool.clone()));
        let urls: Arc<dyn ScrapedUrlRepository> = Arc::new(SqliteScrapedUrlRepository::new(pool));

        let registry = Arc::new(ProviderRegistry::new(
            factory,
            Arc::clone(&repository),
            config.store.collection.clone(),
        ));

        Ok(Self {
            ingestion: IngestionService::new(Arc::clone(&registry), chunker),
            migration: MigrationService::new(
                Arc::clone(&registry),
                Arc::clone(&repository),
                config.store.legacy_collection.clone(),
            ),
            chat: ChatService::new(Arc::clone(&registry), config.retrieval.clone()),
            repository,
            urls,
            registry,
            config,
        })
    }

    /// Wire services with the HTTP providers described by `config.providers`.
    pub fn with_default_providers(config: Config, pool: SqlitePool) -> DomainResult<Self> {
        let factory = Arc::new(DefaultProviderFactory::from_config(&config.providers));
        Self::new(config, pool, factory)
    }

    pub fn default_provider(&self) -> ProviderKind {
        self.config.providers.default
    }

    /// Store for `provider`, or for the configured default.
    pub async fn store(&self, provider: Option<ProviderKind>) -> DomainResult<Arc<VectorStore>> {
        self.registry
            .get_store(provider.unwrap_or_else(|| self.default_provider()))
            .await
    }
}
