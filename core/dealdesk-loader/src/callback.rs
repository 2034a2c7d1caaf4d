//! Callback binding of the deal-details aggregator.
//!
//! For source loaders that report through completion closures on threads of
//! their own. Every outcome is recorded under one mutex per in-flight load;
//! the closure that performs the resolving write takes the caller's
//! completion out of the guarded state and invokes it after the lock is
//! released, so the caller is called exactly once and never under the lock.

use crate::aggregator::DealDetailsViewLoader;
use crate::config::{AggregatorConfig, CompletionPolicy};
use crate::error::{AggregateResult, LoaderError};
use crate::partial::{Completion, PartialAggregate};
use crate::source::{CallbackSources, SourceOutcome, SourceRole};
use async_trait::async_trait;
use dealdesk_types::DealId;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Completion closure handed to a [`CallbackDealDetailsLoader`].
pub type LoadCallback = Box<dyn FnOnce(AggregateResult) + Send + 'static>;

/// Loads the full deal-details model and reports it through a closure.
pub trait CallbackDealDetailsLoader: Send + Sync {
    /// Starts a load. `completion` is invoked exactly once, possibly before
    /// this method returns and possibly on another thread.
    fn load(&self, deal_id: &DealId, completion: LoadCallback);
}

/// Fans a load out to five [`CallbackSources`].
///
/// Callback sources cannot be aborted, so `cancel_outstanding` has no effect
/// here: outcomes that arrive after resolution are recorded and dropped.
pub struct CallbackAggregator {
    sources: Arc<CallbackSources>,
    config: AggregatorConfig,
}

impl CallbackAggregator {
    pub fn new(sources: CallbackSources) -> Self {
        Self::with_config(sources, AggregatorConfig::default())
    }

    pub fn with_config(sources: CallbackSources, config: AggregatorConfig) -> Self {
        Self {
            sources: Arc::new(sources),
            config,
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }
}

impl CallbackDealDetailsLoader for CallbackAggregator {
    fn load(&self, deal_id: &DealId, completion: LoadCallback) {
        let policy = self.config.policy;
        debug!(%deal_id, %policy, "loading deal details");
        let shared = SharedAggregate::new(deal_id, policy, completion);

        match policy {
            CompletionPolicy::Sequential => {
                load_in_sequence(Arc::clone(&self.sources), deal_id.clone(), shared, 0);
            }
            CompletionPolicy::EagerShortCircuit | CompletionPolicy::WaitForAll => {
                for role in SourceRole::ALL {
                    let shared = shared.clone();
                    dispatch(&self.sources, role, deal_id, move |outcome| {
                        shared.record(outcome);
                    });
                }
            }
        }
    }
}

#[async_trait]
impl DealDetailsViewLoader for CallbackAggregator {
    async fn load(&self, deal_id: &DealId) -> AggregateResult {
        let (tx, rx) = oneshot::channel();
        CallbackDealDetailsLoader::load(
            self,
            deal_id,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        rx.await.unwrap_or(Err(LoaderError::Abandoned))
    }
}

struct CallbackState {
    partial: PartialAggregate,
    completion: Option<LoadCallback>,
}

/// The per-load accumulator, shared by the five source callbacks.
#[derive(Clone)]
struct SharedAggregate {
    deal_id: DealId,
    state: Arc<Mutex<CallbackState>>,
}

impl SharedAggregate {
    fn new(deal_id: &DealId, policy: CompletionPolicy, completion: LoadCallback) -> Self {
        Self {
            deal_id: deal_id.clone(),
            state: Arc::new(Mutex::new(CallbackState {
                partial: PartialAggregate::new(policy),
                completion: Some(completion),
            })),
        }
    }

    /// Records an outcome and delivers the result if this write resolved
    /// the load. Returns true while the load is still pending.
    fn record(&self, outcome: SourceOutcome) -> bool {
        let role = outcome.role();
        let (pending, delivery) = {
            // Every mutation is a single assignment, so the state is
            // consistent even if a caller's completion panicked elsewhere.
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match state.partial.record(outcome) {
                Completion::Pending => (true, None),
                Completion::Ignored => (false, None),
                Completion::Resolved(result) => {
                    (false, state.completion.take().map(|completion| (completion, result)))
                }
            }
        };

        debug!(deal_id = %self.deal_id, %role, pending, "source reported");
        if let Some((completion, result)) = delivery {
            if let Err(err) = &result {
                warn!(deal_id = %self.deal_id, error = %err, "deal details failed to load");
            }
            completion(result);
        }
        pending
    }
}

/// Starts the source for `role`, wiring its typed result into `on_outcome`.
fn dispatch<F>(sources: &CallbackSources, role: SourceRole, deal_id: &DealId, on_outcome: F)
where
    F: FnOnce(SourceOutcome) + Send + 'static,
{
    match role {
        SourceRole::Details => sources
            .details
            .load(deal_id, Box::new(move |r| on_outcome(SourceOutcome::Details(r)))),
        SourceRole::Tasks => sources
            .tasks
            .load(deal_id, Box::new(move |r| on_outcome(SourceOutcome::Tasks(r)))),
        SourceRole::Contacts => sources
            .contacts
            .load(deal_id, Box::new(move |r| on_outcome(SourceOutcome::Contacts(r)))),
        SourceRole::Files => sources
            .files
            .load(deal_id, Box::new(move |r| on_outcome(SourceOutcome::Files(r)))),
        SourceRole::Notes => sources
            .notes
            .load(deal_id, Box::new(move |r| on_outcome(SourceOutcome::Notes(r)))),
    }
}

/// Starts the source at `position` in [`SourceRole::ALL`]; its callback
/// starts the next one only if the load is still pending.
fn load_in_sequence(
    sources: Arc<CallbackSources>,
    deal_id: DealId,
    shared: SharedAggregate,
    position: usize,
) {
    let Some(&role) = SourceRole::ALL.get(position) else {
        return;
    };
    let next_sources = Arc::clone(&sources);
    let next_id = deal_id.clone();
    dispatch(&sources, role, &deal_id, move |outcome| {
        if shared.record(outcome) {
            load_in_sequence(next_sources, next_id, shared, position + 1);
        }
    });
}
