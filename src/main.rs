//! chatrag CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use chatrag::cli::{commands, Cli, Commands};
use chatrag::adapters::sqlite::initialize_database;
use chatrag::infrastructure::config::ConfigLoader;
use chatrag::infrastructure::logging::{LogConfig, LoggerImpl};
use chatrag::services::RagContext;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        chatrag::cli::handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let log_config = LogConfig::try_from(&config.logging)?;
    // Keep the guard alive so the file writer flushes on exit.
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    let pool = initialize_database(&config.database)
        .await
        .context("Failed to initialize database")?;
    let ctx = RagContext::with_default_providers(config, pool).context("Failed to build services")?;

    let json = cli.json;
    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &ctx, json).await,
        Commands::Search(args) => commands::search::execute(args, &ctx, json).await,
        Commands::Chat(args) => commands::chat::execute(args, &ctx, json).await,
        Commands::Clear(args) => commands::store::clear(args, &ctx, json).await,
        Commands::Delete(args) => commands::store::delete(args, &ctx, json).await,
        Commands::Count(args) => commands::store::count(args, &ctx, json).await,
        Commands::Tags(args) => commands::tags::execute(args, &ctx, json).await,
        Commands::Migrate(args) => commands::migrate::execute(args, &ctx, json).await,
        Commands::Urls(args) => commands::urls::execute(args, &ctx, json).await,
        Commands::Provider(args) => commands::provider::execute(args, &ctx, json).await,
    }
}
