//! Accumulator for one aggregated load.
//!
//! A [`PartialAggregate`] absorbs at most one outcome per source role and,
//! after every write, evaluates whether the load has reached a terminal
//! state. It is plain data: callers that receive outcomes from several
//! threads must serialize access to it (the callback aggregator wraps it in a
//! mutex, the async aggregator records from a single owner task).

use crate::config::CompletionPolicy;
use crate::error::{AggregateResult, LoaderError};
use crate::source::{SourceOutcome, SourceRole};
use dealdesk_types::{Contact, DealDetails, DealDetailsModel, Files, Note, Task};
use tracing::debug;

/// What a single [`PartialAggregate::record`] call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Still waiting on more sources.
    Pending,
    /// This write reached the terminal state. Returned exactly once per
    /// aggregate.
    Resolved(AggregateResult),
    /// The write had no visible effect: the role was already recorded, or
    /// the aggregate had already resolved.
    Ignored,
}

impl Completion {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Completion::Resolved(_))
    }
}

/// Slots, first error and resolution flag for one in-flight load.
#[derive(Debug)]
pub struct PartialAggregate {
    policy: CompletionPolicy,
    details: Option<DealDetails>,
    tasks: Option<Vec<Task>>,
    contacts: Option<Vec<Contact>>,
    files: Option<Files>,
    notes: Option<Vec<Note>>,
    first_error: Option<LoaderError>,
    recorded: [bool; 5],
    resolved: bool,
}

impl PartialAggregate {
    pub fn new(policy: CompletionPolicy) -> Self {
        Self {
            policy,
            details: None,
            tasks: None,
            contacts: None,
            files: None,
            notes: None,
            first_error: None,
            recorded: [false; 5],
            resolved: false,
        }
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Whether an outcome for `role` has been recorded.
    pub fn is_recorded(&self, role: SourceRole) -> bool {
        self.recorded[role.index()]
    }

    pub fn recorded_count(&self) -> usize {
        self.recorded.iter().filter(|r| **r).count()
    }

    /// The error that won the race to be recorded, if any.
    pub fn first_error(&self) -> Option<&LoaderError> {
        self.first_error.as_ref()
    }

    /// Roles that have not reported yet.
    pub fn outstanding(&self) -> impl Iterator<Item = SourceRole> + '_ {
        SourceRole::ALL
            .into_iter()
            .filter(|role| !self.is_recorded(*role))
    }

    /// Records one source's outcome and evaluates the completion predicate.
    ///
    /// A second outcome for an already-recorded role is dropped. Only the
    /// first recorded error is kept. Outcomes arriving after resolution are
    /// stored but always return [`Completion::Ignored`].
    pub fn record(&mut self, outcome: SourceOutcome) -> Completion {
        let role = outcome.role();
        if self.is_recorded(role) {
            debug!(%role, "duplicate source outcome dropped");
            return Completion::Ignored;
        }
        self.recorded[role.index()] = true;

        match outcome {
            SourceOutcome::Details(result) => self.details = self.accept(result),
            SourceOutcome::Tasks(result) => self.tasks = self.accept(result),
            SourceOutcome::Contacts(result) => self.contacts = self.accept(result),
            SourceOutcome::Files(result) => self.files = self.accept(result),
            SourceOutcome::Notes(result) => self.notes = self.accept(result),
        }

        if self.resolved {
            return Completion::Ignored;
        }
        self.evaluate()
    }

    /// Consumes the aggregate, producing a terminal value even if no
    /// recorded outcome resolved it. A role that never reported is treated
    /// as interrupted.
    pub fn into_result(mut self) -> AggregateResult {
        if let Some(err) = self.first_error.take() {
            return Err(err);
        }
        if let Some(role) = self.outstanding().next() {
            return Err(LoaderError::Interrupted { role });
        }
        self.take_model().ok_or(LoaderError::Unloadable)
    }

    fn accept<T>(&mut self, result: Result<T, LoaderError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                if self.first_error.is_none() {
                    self.first_error = Some(err);
                }
                None
            }
        }
    }

    fn evaluate(&mut self) -> Completion {
        let all_recorded = self.recorded.iter().all(|r| *r);

        if let Some(err) = &self.first_error {
            if self.policy.short_circuits() || all_recorded {
                let err = err.clone();
                self.resolved = true;
                return Completion::Resolved(Err(err));
            }
            return Completion::Pending;
        }

        match self.take_model() {
            Some(model) => {
                self.resolved = true;
                Completion::Resolved(Ok(model))
            }
            None => Completion::Pending,
        }
    }

    /// Moves all five slots into a model, or leaves them untouched if any
    /// is still empty.
    fn take_model(&mut self) -> Option<DealDetailsModel> {
        if self.details.is_none()
            || self.tasks.is_none()
            || self.contacts.is_none()
            || self.files.is_none()
            || self.notes.is_none()
        {
            return None;
        }
        Some(DealDetailsModel {
            details: self.details.take()?,
            tasks: self.tasks.take()?,
            contacts: self.contacts.take()?,
            files: self.files.take()?,
            notes: self.notes.take()?,
        })
    }
}
