//! Text ingestion: chunk, embed, store.

use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ProviderKind, SourceMetadata, SourceType};

use super::chunker::Chunker;
use super::provider_registry::ProviderRegistry;

/// Extracted text handed over by the upload, crawl or form front doors.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub text: String,
    pub source_type: SourceType,
    /// URL for crawled pages, file name for uploads.
    pub source_label: String,
    pub tag: Option<String>,
    pub provider: ProviderKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub ids: Vec<String>,
    pub provider: ProviderKind,
}

pub struct IngestionService {
    registry: Arc<ProviderRegistry>,
    chunker: Chunker,
}

impl IngestionService {
    pub fn new(registry: Arc<ProviderRegistry>, chunker: Chunker) -> Self {
        Self { registry, chunker }
    }

    #[instrument(skip(self, request), fields(source_type = %request.source_type, provider = %request.provider))]
    pub async fn ingest(&self, request: IngestRequest) -> DomainResult<IngestReport> {
        let metadata = SourceMetadata::new(
            request.source_type,
            &request.source_label,
            request.tag.as_deref(),
            request.provider,
        )
        .into_metadata();

        let chunks = self.chunker.split_with_metadata(&request.text, &metadata);
        if chunks.is_empty() {
            tracing::info!("nothing to ingest");
            return Ok(IngestReport {
                ids: Vec::new(),
                provider: request.provider,
            });
        }

        let store = self.registry.get_store(request.provider).await?;
        let ids = store.add_documents(chunks).await?;
        tracing::info!(chunks = ids.len(), source = %request.source_label, "ingested document");

        Ok(IngestReport {
            ids,
            provider: request.provider,
        })
    }
}
