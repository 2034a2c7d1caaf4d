//! Core type definitions for DealDesk.
//!
//! This crate defines the plain data shapes shared by the deal-details
//! loaders:
//! - Deal identifiers
//! - Per-source payloads (details, tasks, contacts, files, notes)
//! - The composite models handed to the view layer
//!
//! Decoding these shapes from a backend is the concern of the individual
//! source loaders; every type here derives serde with camelCase field names
//! so those loaders can do it directly.

mod deal;
mod files;
mod ids;

pub use deal::{BasicDealDetailsModel, Contact, DealDetails, DealDetailsModel, Note, Task};
pub use files::{File, Files, FilesMeta};
pub use ids::DealId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("deal id must not be empty")]
    EmptyId,
}
