//! Async fan-out/join aggregator.
//!
//! Each source load runs as its own tokio task inside a [`JoinSet`]. The
//! calling task is the single owner of the [`PartialAggregate`]: it takes
//! outcomes off the join set in completion order and records them one at a
//! time, so no lock is needed around the accumulator. The first terminal
//! state ends the load; what happens to sources still in flight is decided by
//! [`AggregatorConfig::cancel_outstanding`].

use crate::config::{AggregatorConfig, CompletionPolicy};
use crate::error::{AggregateResult, LoaderError, LoaderResult};
use crate::partial::{Completion, PartialAggregate};
use crate::source::{Source, SourceOutcome, SourceRole, Sources};
use async_trait::async_trait;
use dealdesk_types::DealId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

/// Loads the full deal-details model for the view layer.
#[async_trait]
pub trait DealDetailsViewLoader: Send + Sync {
    async fn load(&self, deal_id: &DealId) -> AggregateResult;
}

/// Fans a load out to the five [`Sources`] and joins their outcomes.
pub struct DealDetailsAggregator {
    sources: Sources,
    config: AggregatorConfig,
}

impl DealDetailsAggregator {
    /// Creates an aggregator with the default eager short-circuit policy.
    pub fn new(sources: Sources) -> Self {
        Self::with_config(sources, AggregatorConfig::default())
    }

    pub fn with_config(sources: Sources, config: AggregatorConfig) -> Self {
        Self { sources, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.config.policy
    }

    async fn load_concurrent(&self, deal_id: &DealId) -> AggregateResult {
        let mut partial = PartialAggregate::new(self.config.policy);
        let mut fan_out = FanOut::new(deal_id);

        let s = &self.sources;
        fan_out.spawn(SourceRole::Details, &s.details, SourceOutcome::Details);
        fan_out.spawn(SourceRole::Tasks, &s.tasks, SourceOutcome::Tasks);
        fan_out.spawn(SourceRole::Contacts, &s.contacts, SourceOutcome::Contacts);
        fan_out.spawn(SourceRole::Files, &s.files, SourceOutcome::Files);
        fan_out.spawn(SourceRole::Notes, &s.notes, SourceOutcome::Notes);

        while let Some(joined) = fan_out.tasks.join_next_with_id().await {
            let outcome = match joined {
                Ok((_, outcome)) => outcome,
                Err(err) => {
                    let Some(role) = fan_out.role_of(err.id()) else {
                        warn!(%deal_id, error = %err, "unknown source task failed");
                        continue;
                    };
                    warn!(%deal_id, %role, error = %err, "source task did not complete");
                    SourceOutcome::failed(role, LoaderError::Interrupted { role })
                }
            };

            let role = outcome.role();
            debug!(%deal_id, %role, failed = outcome.is_err(), "source reported");

            if let Completion::Resolved(result) = partial.record(outcome) {
                self.release_outstanding(deal_id, fan_out.tasks);
                return result;
            }
        }

        partial.into_result()
    }

    async fn load_sequential(&self, deal_id: &DealId) -> AggregateResult {
        let mut partial = PartialAggregate::new(CompletionPolicy::Sequential);
        let s = &self.sources;

        for role in SourceRole::ALL {
            let outcome = match role {
                SourceRole::Details => SourceOutcome::Details(s.details.load(deal_id).await),
                SourceRole::Tasks => SourceOutcome::Tasks(s.tasks.load(deal_id).await),
                SourceRole::Contacts => SourceOutcome::Contacts(s.contacts.load(deal_id).await),
                SourceRole::Files => SourceOutcome::Files(s.files.load(deal_id).await),
                SourceRole::Notes => SourceOutcome::Notes(s.notes.load(deal_id).await),
            };
            debug!(%deal_id, %role, failed = outcome.is_err(), "source reported");

            if let Completion::Resolved(result) = partial.record(outcome) {
                return result;
            }
        }

        partial.into_result()
    }

    fn release_outstanding(&self, deal_id: &DealId, mut tasks: JoinSet<SourceOutcome>) {
        if tasks.is_empty() {
            return;
        }
        let outstanding = tasks.len();
        if self.config.cancel_outstanding {
            debug!(%deal_id, outstanding, "aborting outstanding sources");
            tasks.abort_all();
        } else {
            debug!(%deal_id, outstanding, "detaching outstanding sources");
            tasks.detach_all();
        }
    }
}

#[async_trait]
impl DealDetailsViewLoader for DealDetailsAggregator {
    async fn load(&self, deal_id: &DealId) -> AggregateResult {
        let policy = self.config.policy;
        debug!(%deal_id, %policy, "loading deal details");

        let result = match policy {
            CompletionPolicy::Sequential => self.load_sequential(deal_id).await,
            CompletionPolicy::EagerShortCircuit | CompletionPolicy::WaitForAll => {
                self.load_concurrent(deal_id).await
            }
        };

        match &result {
            Ok(_) => info!(%deal_id, %policy, "deal details loaded"),
            Err(err) => warn!(%deal_id, %policy, error = %err, "deal details failed to load"),
        }
        result
    }
}

/// The source tasks of one concurrent load, keyed back to their roles so a
/// task that panics can still be reported against the right slot.
struct FanOut {
    deal_id: DealId,
    tasks: JoinSet<SourceOutcome>,
    roles: HashMap<Id, SourceRole>,
}

impl FanOut {
    fn new(deal_id: &DealId) -> Self {
        Self {
            deal_id: deal_id.clone(),
            tasks: JoinSet::new(),
            roles: HashMap::with_capacity(SourceRole::ALL.len()),
        }
    }

    fn spawn<T>(
        &mut self,
        role: SourceRole,
        source: &Arc<dyn Source<T>>,
        wrap: fn(LoaderResult<T>) -> SourceOutcome,
    ) where
        T: Send + 'static,
    {
        let source = Arc::clone(source);
        let deal_id = self.deal_id.clone();
        let handle = self
            .tasks
            .spawn(async move { wrap(source.load(&deal_id).await) });
        self.roles.insert(handle.id(), role);
    }

    fn role_of(&self, id: Id) -> Option<SourceRole> {
        self.roles.get(&id).copied()
    }
}
