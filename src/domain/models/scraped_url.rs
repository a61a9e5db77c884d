use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One crawl attempt for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedUrl {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub success: bool,
    pub content_length: u64,
    pub user_id: Option<String>,
    /// Global scrapes are shared across users and drive deduplication.
    pub global_scrape: bool,
}

impl ScrapedUrl {
    pub fn new(url: &str, success: bool, content_length: Option<u64>, user_id: Option<String>) -> Self {
        Self {
            url: normalize_url(url),
            scraped_at: Utc::now(),
            success,
            content_length: content_length.unwrap_or(0),
            user_id,
            global_scrape: true,
        }
    }
}

/// Drop the fragment so `page#a` and `page#b` dedupe to the same entry.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    match trimmed.split_once('#') {
        Some((base, _)) => base.to_string(),
        None => trimmed.to_string(),
    }
}
