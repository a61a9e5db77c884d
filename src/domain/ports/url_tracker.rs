use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::ScrapedUrl;

/// Deduplication oracle for crawled URLs.
#[async_trait]
pub trait ScrapedUrlRepository: Send + Sync {
    /// True when a successful global scrape of the normalised URL exists.
    async fn has_been_scraped(&self, url: &str) -> DomainResult<bool>;

    async fn record(&self, entry: &ScrapedUrl) -> DomainResult<()>;

    /// Distinct URLs with at least one successful scrape, sorted.
    async fn list_scraped(&self) -> DomainResult<Vec<String>>;
}
