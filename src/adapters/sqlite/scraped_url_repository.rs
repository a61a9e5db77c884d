//! SQLite implementation of the ScrapedUrlRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ScrapedUrl, normalize_url};
use crate::domain::ports::ScrapedUrlRepository;

#[derive(Clone)]
pub struct SqliteScrapedUrlRepository {
    pool: SqlitePool,
}

impl SqliteScrapedUrlRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScrapedUrlRepository for SqliteScrapedUrlRepository {
    async fn has_been_scraped(&self, url: &str) -> DomainResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM scraped_urls WHERE url = ? AND success = 1 AND global_scrape = 1
            )",
        )
        .bind(normalize_url(url))
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn record(&self, entry: &ScrapedUrl) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO scraped_urls (url, scraped_at, success, content_length, user_id, global_scrape)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(normalize_url(&entry.url))
        .bind(entry.scraped_at.to_rfc3339())
        .bind(entry.success)
        .bind(i64::try_from(entry.content_length).unwrap_or(i64::MAX))
        .bind(&entry.user_id)
        .bind(entry.global_scrape)
        .execute(&self.pool)
        .await?;

        tracing::debug!(url = %entry.url, success = entry.success, "recorded scrape");
        Ok(())
    }

    async fn list_scraped(&self) -> DomainResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT url FROM scraped_urls
             WHERE success = 1 AND global_scrape = 1
             ORDER BY url",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(url,)| url).collect())
    }
}
