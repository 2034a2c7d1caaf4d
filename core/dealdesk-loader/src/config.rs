//! Aggregator configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// When an aggregated load is allowed to resolve.
///
/// All policies deliver the same final value for a given set of outcomes;
/// they differ in latency and in how much work is wasted after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Fan out to every source and resolve the moment any of them fails.
    #[default]
    EagerShortCircuit,
    /// Fan out to every source and resolve only after all of them reported.
    WaitForAll,
    /// Await sources one at a time in [`crate::SourceRole::ALL`] order,
    /// stopping at the first failure.
    Sequential,
}

impl CompletionPolicy {
    /// Whether a recorded error resolves the load without waiting for the
    /// remaining sources.
    #[must_use]
    pub const fn short_circuits(self) -> bool {
        !matches!(self, CompletionPolicy::WaitForAll)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CompletionPolicy::EagerShortCircuit => "eager_short_circuit",
            CompletionPolicy::WaitForAll => "wait_for_all",
            CompletionPolicy::Sequential => "sequential",
        }
    }
}

impl fmt::Display for CompletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the deal-details aggregators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// When a load resolves.
    pub policy: CompletionPolicy,
    /// Abort still-running source tasks once the result is known. When off,
    /// they run to completion in the background and their outcomes are
    /// discarded.
    pub cancel_outstanding: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            policy: CompletionPolicy::default(),
            cancel_outstanding: true,
        }
    }
}

impl AggregatorConfig {
    #[must_use]
    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_cancel_outstanding(mut self, cancel: bool) -> Self {
        self.cancel_outstanding = cancel;
        self
    }
}
