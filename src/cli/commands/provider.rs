//! Provider inspection and switching.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::ProviderKind;
use crate::services::RagContext;

#[derive(Args, Debug)]
pub struct ProviderArgs {
    #[command(subcommand)]
    pub command: ProviderCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProviderCommands {
    /// Show each provider's embedding model and dimension
    Status,
    /// Rebuild the active store for a provider
    Switch {
        provider: ProviderKind,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    pub default: bool,
    pub model: Option<String>,
    pub dimension: Option<usize>,
    pub error: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct StatusOutput {
    pub providers: Vec<ProviderStatus>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["provider", "default", "model", "dimension", "status"]);
        for status in &self.providers {
            table.add_row(vec![
                status.provider.to_string(),
                if status.default { "*".to_string() } else { String::new() },
                status.model.clone().unwrap_or_else(|| "-".to_string()),
                status.dimension.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                status.error.clone().unwrap_or_else(|| "ok".to_string()),
            ]);
        }
        table.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ProviderArgs, ctx: &RagContext, json_mode: bool) -> Result<()> {
    match args.command {
        ProviderCommands::Status => {
            let default = ctx.default_provider();
            let providers = ProviderKind::all()
                .into_iter()
                .map(|kind| match ctx.registry.factory().embeddings(kind) {
                    Ok(embedder) => ProviderStatus {
                        provider: kind,
                        default: kind == default,
                        model: Some(embedder.model_name().to_string()),
                        dimension: Some(embedder.dimension()),
                        error: None,
                    },
                    Err(err) => ProviderStatus {
                        provider: kind,
                        default: kind == default,
                        model: None,
                        dimension: None,
                        error: Some(err.to_string()),
                    },
                })
                .collect();
            output(&StatusOutput { providers }, json_mode);
        }
        ProviderCommands::Switch { provider } => {
            let store = ctx
                .registry
                .switch_provider(provider)
                .await
                .with_context(|| format!("Failed to switch to {}", provider))?;

            if json_mode {
                let output = serde_json::json!({
                    "provider": store.provider_kind(),
                    "model": store.model_name(),
                    "dimension": store.dimension(),
                    "collection": store.collection(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "Active provider: {} ({}, {} dimensions)",
                    store.provider_kind(),
                    store.model_name(),
                    store.dimension()
                );
            }
        }
    }
    Ok(())
}
