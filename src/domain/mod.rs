//! Domain layer for the chatrag retrieval core
//!
//! This module contains the record and provider models, the port traits the
//! adapters implement, and the shared error type.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
