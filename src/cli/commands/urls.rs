//! Crawled-URL tracking commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::domain::models::{normalize_url, ScrapedUrl};
use crate::services::RagContext;

#[derive(Args, Debug)]
pub struct UrlsArgs {
    #[command(subcommand)]
    pub command: UrlsCommands,
}

#[derive(Subcommand, Debug)]
pub enum UrlsCommands {
    /// Check whether a URL has already been crawled
    Check {
        url: String,
    },
    /// Record a crawl attempt
    Record {
        url: String,
        /// Mark the attempt as failed
        #[arg(long)]
        failed: bool,
        /// Length of the extracted content in characters
        #[arg(long)]
        length: Option<u64>,
        /// User who requested the crawl
        #[arg(long)]
        user: Option<String>,
    },
    /// List every successfully crawled URL
    List,
}

pub async fn execute(args: UrlsArgs, ctx: &RagContext, json: bool) -> Result<()> {
    match args.command {
        UrlsCommands::Check { url } => {
            let scraped = ctx
                .urls
                .has_been_scraped(&url)
                .await
                .context("Failed to check URL")?;
            let url = normalize_url(&url);
            if json {
                let output = serde_json::json!({ "url": url, "scraped": scraped });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if scraped {
                println!("{} has already been crawled", url);
            } else {
                println!("{} has not been crawled", url);
            }
        }
        UrlsCommands::Record {
            url,
            failed,
            length,
            user,
        } => {
            let entry = ScrapedUrl::new(&url, !failed, length, user);
            ctx.urls.record(&entry).await.context("Failed to record URL")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("Recorded {} ({})", entry.url, if entry.success { "ok" } else { "failed" });
            }
        }
        UrlsCommands::List => {
            let urls = ctx.urls.list_scraped().await.context("Failed to list URLs")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&urls)?);
            } else if urls.is_empty() {
                println!("No crawled URLs.");
            } else {
                for url in urls {
                    println!("{}", url);
                }
            }
        }
    }
    Ok(())
}
