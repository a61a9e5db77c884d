//! Implementation of the `chatrag migrate` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::ProviderKind;
use crate::services::{MigrationReport, RagContext};

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Provider that re-embeds the legacy records
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,
}

#[derive(Debug, serde::Serialize)]
pub struct MigrateOutput {
    #[serde(flatten)]
    pub report: MigrationReport,
    #[serde(skip)]
    pub legacy_collection: String,
}

impl CommandOutput for MigrateOutput {
    fn to_human(&self) -> String {
        format!(
            "Migrated {} record(s) from {} using {}",
            self.report.migrated_count, self.legacy_collection, self.report.provider
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: MigrateArgs, ctx: &RagContext, json_mode: bool) -> Result<()> {
    let provider = args.provider.unwrap_or_else(|| ctx.default_provider());
    let report = ctx
        .migration
        .migrate(provider)
        .await
        .context("Failed to migrate legacy collection")?;

    output(
        &MigrateOutput {
            report,
            legacy_collection: ctx.config.store.legacy_collection.clone(),
        },
        json_mode,
    );
    Ok(())
}
