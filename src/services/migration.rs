//! Re-embedding of a legacy collection into the active provider's space.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Chunk, ProviderKind};
use crate::domain::ports::VectorRecordRepository;

use super::provider_registry::ProviderRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub migrated_count: usize,
    pub provider: ProviderKind,
}

pub struct MigrationService {
    registry: Arc<ProviderRegistry>,
    repository: Arc<dyn VectorRecordRepository>,
    legacy_collection: String,
}

impl MigrationService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        repository: Arc<dyn VectorRecordRepository>,
        legacy_collection: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            repository,
            legacy_collection: legacy_collection.into(),
        }
    }

    /// Re-embed every legacy record that has content with `provider` and
    /// write it to the active store. Stored legacy embeddings are ignored.
    ///
    /// Legacy records are left in place.
    #[instrument(skip(self), fields(legacy = %self.legacy_collection))]
    pub async fn migrate(&self, provider: ProviderKind) -> DomainResult<MigrationReport> {
        let documents = self.repository.scan_documents(&self.legacy_collection).await?;
        let total = documents.len();
        let migration_date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let chunks: Vec<Chunk> = documents
            .into_iter()
            .filter_map(|doc| {
                let content = doc.content.filter(|c| !c.is_empty())?;
                let mut metadata = doc.metadata;
                metadata.insert("migratedFrom".to_string(), Value::String(self.legacy_collection.clone()));
                metadata.insert("migrationDate".to_string(), Value::String(migration_date.clone()));
                metadata.insert("provider".to_string(), Value::String(provider.as_str().to_string()));
                Some(Chunk::new(content).with_metadata(metadata))
            })
            .collect();

        if chunks.is_empty() {
            tracing::info!(total, "no legacy records with content to migrate");
            return Ok(MigrationReport {
                migrated_count: 0,
                provider,
            });
        }

        let skipped = total - chunks.len();
        let store = self.registry.get_store(provider).await?;
        let ids = store.add_documents(chunks).await?;

        tracing::info!(migrated = ids.len(), skipped, target = store.collection(), "migration complete");
        Ok(MigrationReport {
            migrated_count: ids.len(),
            provider,
        })
    }
}
