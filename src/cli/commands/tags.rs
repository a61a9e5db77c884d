//! Tag administration commands.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{list_table, render_list, truncate};
use crate::domain::models::{tags_of, TagPage};
use crate::services::RagContext;

#[derive(Args, Debug)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommands,
}

#[derive(Subcommand, Debug)]
pub enum TagsCommands {
    /// List records carrying a tag
    Search {
        /// Tag to match
        tag: String,
        /// Page size
        #[arg(short, long, default_value_t = TagPage::DEFAULT_LIMIT)]
        limit: u32,
        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Delete every record carrying a tag
    Delete {
        /// Tag to match
        tag: String,
    },
}

pub async fn execute(args: TagsArgs, ctx: &RagContext, json: bool) -> Result<()> {
    match args.command {
        TagsCommands::Search { tag, limit, page } => {
            handle_search(ctx, &tag, TagPage::new(limit, page), json).await
        }
        TagsCommands::Delete { tag } => handle_delete(ctx, &tag, json).await,
    }
}

fn require_tag(tag: &str) -> Result<&str> {
    let tag = tag.trim();
    if tag.is_empty() {
        bail!("Tag must not be empty");
    }
    Ok(tag)
}

/// Handle tags search command
async fn handle_search(ctx: &RagContext, tag: &str, page: TagPage, json: bool) -> Result<()> {
    let tag = require_tag(tag)?;
    let documents = ctx
        .repository
        .find_by_tag(&ctx.config.store.collection, tag, page)
        .await
        .context("Failed to search by tag")?;

    if json {
        let output = serde_json::json!({
            "tag": tag,
            "limit": page.limit,
            "page": page.page,
            "documents": documents,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut table = list_table(&["id", "tags", "content"]);
    for doc in &documents {
        let tags: Vec<String> = tags_of(&doc.metadata).into_iter().collect();
        table.add_row(vec![
            doc.id.clone(),
            tags.join(","),
            truncate(doc.content.as_deref().unwrap_or(""), 60),
        ]);
    }
    println!("{}", render_list("record", table, documents.len()));
    Ok(())
}

/// Handle tags delete command
async fn handle_delete(ctx: &RagContext, tag: &str, json: bool) -> Result<()> {
    let tag = require_tag(tag)?;
    let deleted = ctx
        .repository
        .delete_by_tag(&ctx.config.store.collection, tag)
        .await
        .context("Failed to delete by tag")?;

    if json {
        let output = serde_json::json!({
            "tag": tag,
            "deleted": deleted,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Deleted {} record(s) tagged '{}'", deleted, tag);
    }
    Ok(())
}
