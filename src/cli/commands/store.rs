//! Record-level store commands: `clear`, `delete` and `count`.

use anyhow::{Context, Result};
use clap::Args;

use crate::domain::models::ProviderKind;
use crate::services::RagContext;

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Provider whose store is cleared
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CountArgs {
    /// Collection to count (defaults to store.collection)
    #[arg(short, long)]
    pub collection: Option<String>,
}

/// Handle clear command
pub async fn clear(args: ClearArgs, ctx: &RagContext, json: bool) -> Result<()> {
    let store = ctx.store(args.provider).await.context("Failed to open vector store")?;
    let deleted = store.clear_all().await.context("Failed to clear vector store")?;

    if json {
        let output = serde_json::json!({
            "collection": store.collection(),
            "deleted": deleted,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Deleted {} record(s) from {}", deleted, store.collection());
    }
    Ok(())
}

/// Handle delete command
pub async fn delete(args: DeleteArgs, ctx: &RagContext, json: bool) -> Result<()> {
    let collection = &ctx.config.store.collection;
    let deleted = ctx
        .repository
        .delete(collection, &args.id)
        .await
        .context("Failed to delete record")?;

    if json {
        let output = serde_json::json!({
            "id": args.id,
            "deleted": deleted,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if deleted {
        println!("Deleted record {}", args.id);
    } else {
        println!("No record with id {}", args.id);
    }
    Ok(())
}

/// Handle count command
pub async fn count(args: CountArgs, ctx: &RagContext, json: bool) -> Result<()> {
    let collection = args.collection.unwrap_or_else(|| ctx.config.store.collection.clone());
    let count = ctx
        .repository
        .count(&collection)
        .await
        .context("Failed to count records")?;

    if json {
        let output = serde_json::json!({
            "collection": collection,
            "count": count,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} record(s) in {}", count, collection);
    }
    Ok(())
}
