//! Implementation of the `chatrag chat` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::ProviderKind;
use crate::services::{ChatAnswer, RagContext};

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Question to answer
    pub question: String,

    /// Provider used for retrieval and generation
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,

    /// Override the provider's chat model
    #[arg(short, long)]
    pub model: Option<String>,

    /// List the sources of the retrieved context
    #[arg(long)]
    pub sources: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct ChatOutput {
    #[serde(flatten)]
    pub answer: ChatAnswer,
    #[serde(skip)]
    pub show_sources: bool,
}

impl CommandOutput for ChatOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.answer.answer.clone()];
        if self.show_sources {
            lines.push(String::new());
            lines.push(format!(
                "Sources ({} via {}):",
                self.answer.provider, self.answer.model
            ));
            for doc in &self.answer.documents {
                lines.push(format!("  - {}", doc.source().unwrap_or("unknown")));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ChatArgs, ctx: &RagContext, json_mode: bool) -> Result<()> {
    let provider = args.provider.unwrap_or_else(|| ctx.default_provider());
    let answer = ctx
        .chat
        .answer(&args.question, provider, args.model.as_deref())
        .await
        .context("Failed to answer question")?;

    output(
        &ChatOutput {
            answer,
            show_sources: args.sources,
        },
        json_mode,
    );
    Ok(())
}
