//! Adapters implementing the domain ports.

pub mod providers;
pub mod sqlite;
