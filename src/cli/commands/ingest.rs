//! Implementation of the `chatrag ingest` command.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{ProviderKind, SourceType};
use crate::services::{IngestRequest, RagContext};

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Text to ingest (omit when using --file)
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Source type: url, pdf, text, json
    #[arg(short = 't', long, default_value = "text")]
    pub source_type: SourceType,

    /// URL for crawled pages, file name for uploads
    #[arg(short, long)]
    pub label: Option<String>,

    /// Tag attached to every chunk
    #[arg(long)]
    pub tag: Option<String>,

    /// Provider used to embed (defaults to the configured provider)
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,
}

#[derive(Debug, serde::Serialize)]
pub struct IngestOutput {
    pub provider: ProviderKind,
    pub source: String,
    pub chunks: usize,
    pub ids: Vec<String>,
}

impl CommandOutput for IngestOutput {
    fn to_human(&self) -> String {
        if self.chunks == 0 {
            return "Nothing to ingest: input text is empty.".to_string();
        }
        format!(
            "Ingested {} chunk(s) from {} using {}",
            self.chunks, self.source, self.provider
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: IngestArgs, ctx: &RagContext, json_mode: bool) -> Result<()> {
    let (text, default_label) = match (args.text, &args.file) {
        (Some(text), _) => (text, String::new()),
        (None, Some(path)) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (text, name)
        }
        (None, None) => bail!("Provide the text to ingest or --file <PATH>"),
    };

    let source_label = args.label.unwrap_or(default_label);
    let provider = args.provider.unwrap_or_else(|| ctx.default_provider());

    let request = IngestRequest {
        text,
        source_type: args.source_type,
        source_label: source_label.clone(),
        tag: args.tag,
        provider,
    };

    let report = ctx
        .ingestion
        .ingest(request)
        .await
        .context("Failed to ingest document")?;

    let out = IngestOutput {
        provider: report.provider,
        source: args.source_type.source_label(&source_label),
        chunks: report.ids.len(),
        ids: report.ids,
    };
    output(&out, json_mode);
    Ok(())
}
