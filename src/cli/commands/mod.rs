//! CLI command implementations.

pub mod chat;
pub mod ingest;
pub mod migrate;
pub mod provider;
pub mod search;
pub mod store;
pub mod tags;
pub mod urls;
