//! Fan-out/join loader for the deal-details screen.
//!
//! The screen needs data from five independent sources: the deal's primary
//! details, its tasks, contacts, files and notes. This crate issues all five
//! loads concurrently and joins them into a single [`DealDetailsModel`], or
//! fails with the first error recorded.
//!
//! # Architecture
//!
//! - **Source**: one capability per role ([`Source`] for awaitable loaders,
//!   [`CallbackSource`] for completion-closure loaders)
//! - **Partial aggregate**: per-load accumulator with one slot per role and a
//!   first-error latch; decides after every write whether the load is done
//! - **Aggregators**: [`DealDetailsAggregator`] (tokio tasks, single owner)
//!   and [`CallbackAggregator`] (mutex-guarded, closure delivery), both
//!   resolving exactly once
//!
//! ## Completion policies
//!
//! 1. **Eager short-circuit** (default): resolve on the first recorded error
//! 2. **Wait for all**: resolve after every source reported
//! 3. **Sequential**: await sources one after another, stop at first error
//!
//! # Example
//!
//! ```
//! use dealdesk_loader::mock::StubSource;
//! use dealdesk_loader::{DealDetailsAggregator, DealDetailsViewLoader, Sources};
//! use dealdesk_types::{Contact, DealDetails, DealId, Files, FilesMeta, Note, Task};
//! use std::sync::Arc;
//!
//! let sources = Sources {
//!     details: Arc::new(StubSource::ok(DealDetails::new("1", "Deal 1"))),
//!     tasks: Arc::new(StubSource::ok(vec![Task::new("1", "Task 1")])),
//!     contacts: Arc::new(StubSource::<Vec<Contact>>::ok(Vec::new())),
//!     files: Arc::new(StubSource::ok(Files::new(Vec::new(), FilesMeta::new(10_000, 0)))),
//!     notes: Arc::new(StubSource::<Vec<Note>>::ok(Vec::new())),
//! };
//! let aggregator = DealDetailsAggregator::new(sources);
//!
//! let model = tokio_test::block_on(async {
//!     aggregator.load(&DealId::new("1").unwrap()).await
//! })
//! .unwrap();
//! assert_eq!(model.details.name, "Deal 1");
//! ```
//!
//! [`DealDetailsModel`]: dealdesk_types::DealDetailsModel

mod aggregator;
mod basic;
mod callback;
mod config;
mod error;
pub mod partial;
pub mod source;

pub use aggregator::{DealDetailsAggregator, DealDetailsViewLoader};
pub use basic::{BasicDealDetailsLoader, BasicDealDetailsViewLoader};
pub use callback::{CallbackAggregator, CallbackDealDetailsLoader, LoadCallback};
pub use config::{AggregatorConfig, CompletionPolicy};
pub use error::{AggregateResult, LoaderError, LoaderResult};
pub use partial::{Completion, PartialAggregate};
pub use source::{
    mock, CallbackSource, CallbackSources, Source, SourceCallback, SourceOutcome, SourceRole,
    Sources,
};
