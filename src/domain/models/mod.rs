pub mod chunk;
pub mod config;
pub mod provider;
pub mod record;
pub mod scraped_url;

pub use chunk::{Chunk, Metadata, SourceMetadata, SourceType, TAGS_KEY, tags_of};
pub use config::{
    ChunkingConfig, Config, DatabaseConfig, LoggingConfig, OllamaConfig, OpenAiConfig,
    ProvidersConfig, RetrievalConfig, StoreConfig,
};
pub use provider::{GenerationParams, ProviderKind};
pub use record::{EmbeddingRecord, RetrievedDocument, SearchResult, StoredDocument, TagPage};
pub use scraped_url::{ScrapedUrl, normalize_url};
