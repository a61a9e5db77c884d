//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::chat::ChatArgs;
use super::commands::ingest::IngestArgs;
use super::commands::migrate::MigrateArgs;
use super::commands::provider::ProviderArgs;
use super::commands::search::SearchArgs;
use super::commands::store::{ClearArgs, CountArgs, DeleteArgs};
use super::commands::tags::TagsArgs;
use super::commands::urls::UrlsArgs;

#[derive(Parser, Debug)]
#[command(name = "chatrag")]
#[command(about = "chatrag - document chatbot retrieval core", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .chatrag/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk, embed and store a document
    Ingest(IngestArgs),

    /// Rank stored chunks against a query
    Search(SearchArgs),

    /// Answer a question from retrieved context
    Chat(ChatArgs),

    /// Delete every record in the active collection
    Clear(ClearArgs),

    /// Delete a single record by id
    Delete(DeleteArgs),

    /// Count records in the active collection
    Count(CountArgs),

    /// Search or delete records by tag
    Tags(TagsArgs),

    /// Re-embed the legacy collection with a provider
    Migrate(MigrateArgs),

    /// Track crawled URLs
    Urls(UrlsArgs),

    /// Inspect or switch the active provider
    Provider(ProviderArgs),
}
