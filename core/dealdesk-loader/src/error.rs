//! Error types for the loader layer.

use crate::source::SourceRole;
use dealdesk_types::DealDetailsModel;
use thiserror::Error;

/// Result type for a single source load.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// The value delivered to the caller of an aggregated load.
pub type AggregateResult = LoaderResult<DealDetailsModel>;

/// Errors surfaced by source loaders and the aggregators built on them.
///
/// Aggregators never inspect these; whichever error a source reports first is
/// forwarded to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// The source could not produce its data.
    #[error("source could not produce data")]
    Unloadable,

    /// A source reported a more specific failure.
    #[error("{role} source failed: {reason}")]
    Source { role: SourceRole, reason: String },

    /// The source task panicked or was aborted before it reported.
    #[error("{role} source stopped before reporting")]
    Interrupted { role: SourceRole },

    /// Every source dropped its completion without reporting.
    #[error("load abandoned before a result was produced")]
    Abandoned,
}

impl LoaderError {
    /// Builds a [`LoaderError::Source`] for the given role.
    pub fn failed(role: SourceRole, reason: impl Into<String>) -> Self {
        Self::Source {
            role,
            reason: reason.into(),
        }
    }
}
