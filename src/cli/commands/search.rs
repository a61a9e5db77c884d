//! Implementation of the `chatrag search` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{ProviderKind, SearchResult};
use crate::services::{checked_k, RagContext};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query text
    pub query: String,

    /// Number of results (defaults to retrieval.default_k)
    #[arg(short, allow_negative_numbers = true)]
    pub k: Option<i64>,

    /// Provider whose store is searched
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,
}

#[derive(Debug, serde::Serialize)]
pub struct SearchOutput {
    pub provider: ProviderKind,
    pub model: String,
    pub results: Vec<SearchResult>,
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["score", "source", "id", "content"]);
        for result in &self.results {
            let source = result
                .metadata
                .get("source")
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            table.add_row(vec![
                format!("{:.4}", result.similarity),
                truncate(source, 32),
                truncate(&result.id, 8),
                truncate(&result.content, 60),
            ]);
        }
        render_list("result", table, self.results.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SearchArgs, ctx: &RagContext, json_mode: bool) -> Result<()> {
    let k = match args.k {
        Some(k) => checked_k(k)?,
        None => ctx.config.retrieval.default_k,
    };

    let store = ctx.store(args.provider).await.context("Failed to open vector store")?;
    let results = store
        .similarity_search_with_scores(&args.query, k)
        .await
        .context("Failed to search vector store")?;

    let out = SearchOutput {
        provider: store.provider_kind(),
        model: store.model_name().to_string(),
        results,
    };
    output(&out, json_mode);
    Ok(())
}
