//! Source loader abstraction.
//!
//! Each of the five data sources behind the deal-details screen is an
//! independent capability: given a deal ID, eventually produce either its
//! payload or an error, exactly once. Two bindings exist:
//! - [`Source`] for loaders that can be awaited
//! - [`CallbackSource`] for loaders that report through a completion closure,
//!   typically from a thread of their own

use crate::error::LoaderResult;
use async_trait::async_trait;
use dealdesk_types::{Contact, DealDetails, DealId, Files, Note, Task};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The role a source plays in the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRole {
    Details,
    Tasks,
    Contacts,
    Files,
    Notes,
}

impl SourceRole {
    /// All roles, in the order the sequential policy awaits them.
    pub const ALL: [SourceRole; 5] = [
        SourceRole::Details,
        SourceRole::Tasks,
        SourceRole::Contacts,
        SourceRole::Files,
        SourceRole::Notes,
    ];

    /// Position of the role within [`SourceRole::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SourceRole::Details => "details",
            SourceRole::Tasks => "tasks",
            SourceRole::Contacts => "contacts",
            SourceRole::Files => "files",
            SourceRole::Notes => "notes",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An awaitable source loader producing `T` for a deal.
///
/// Implementations report failures through the returned result and never
/// panic to signal an error.
#[async_trait]
pub trait Source<T>: Send + Sync {
    /// Loads the payload for `deal_id`.
    async fn load(&self, deal_id: &DealId) -> LoaderResult<T>;
}

/// Completion closure handed to a [`CallbackSource`].
pub type SourceCallback<T> = Box<dyn FnOnce(LoaderResult<T>) + Send + 'static>;

/// A source loader that reports its result by invoking a completion closure.
///
/// The closure must be called at most once and may be called from any
/// thread, either before or after `load` returns.
pub trait CallbackSource<T>: Send + Sync {
    fn load(&self, deal_id: &DealId, completion: SourceCallback<T>);
}

/// The five awaitable sources an aggregator fans out to.
#[derive(Clone)]
pub struct Sources {
    pub details: Arc<dyn Source<DealDetails>>,
    pub tasks: Arc<dyn Source<Vec<Task>>>,
    pub contacts: Arc<dyn Source<Vec<Contact>>>,
    pub files: Arc<dyn Source<Files>>,
    pub notes: Arc<dyn Source<Vec<Note>>>,
}

impl Sources {
    /// Uses a single loader for every role.
    pub fn shared<S>(loader: Arc<S>) -> Self
    where
        S: Source<DealDetails>
            + Source<Vec<Task>>
            + Source<Vec<Contact>>
            + Source<Files>
            + Source<Vec<Note>>
            + 'static,
    {
        Self {
            details: loader.clone(),
            tasks: loader.clone(),
            contacts: loader.clone(),
            files: loader.clone(),
            notes: loader,
        }
    }
}

/// The five callback sources a [`crate::CallbackAggregator`] fans out to.
#[derive(Clone)]
pub struct CallbackSources {
    pub details: Arc<dyn CallbackSource<DealDetails>>,
    pub tasks: Arc<dyn CallbackSource<Vec<Task>>>,
    pub contacts: Arc<dyn CallbackSource<Vec<Contact>>>,
    pub files: Arc<dyn CallbackSource<Files>>,
    pub notes: Arc<dyn CallbackSource<Vec<Note>>>,
}

impl CallbackSources {
    /// Uses a single loader for every role.
    pub fn shared<S>(loader: Arc<S>) -> Self
    where
        S: CallbackSource<DealDetails>
            + CallbackSource<Vec<Task>>
            + CallbackSource<Vec<Contact>>
            + CallbackSource<Files>
            + CallbackSource<Vec<Note>>
            + 'static,
    {
        Self {
            details: loader.clone(),
            tasks: loader.clone(),
            contacts: loader.clone(),
            files: loader.clone(),
            notes: loader,
        }
    }
}

/// What one source reported, tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Details(LoaderResult<DealDetails>),
    Tasks(LoaderResult<Vec<Task>>),
    Contacts(LoaderResult<Vec<Contact>>),
    Files(LoaderResult<Files>),
    Notes(LoaderResult<Vec<Note>>),
}

impl SourceOutcome {
    /// Builds a failed outcome for `role`.
    pub fn failed(role: SourceRole, error: crate::LoaderError) -> Self {
        match role {
            SourceRole::Details => Self::Details(Err(error)),
            SourceRole::Tasks => Self::Tasks(Err(error)),
            SourceRole::Contacts => Self::Contacts(Err(error)),
            SourceRole::Files => Self::Files(Err(error)),
            SourceRole::Notes => Self::Notes(Err(error)),
        }
    }

    #[must_use]
    pub fn role(&self) -> SourceRole {
        match self {
            Self::Details(_) => SourceRole::Details,
            Self::Tasks(_) => SourceRole::Tasks,
            Self::Contacts(_) => SourceRole::Contacts,
            Self::Files(_) => SourceRole::Files,
            Self::Notes(_) => SourceRole::Notes,
        }
    }

    #[must_use]
    pub fn is_err(&self) -> bool {
        match self {
            Self::Details(r) => r.is_err(),
            Self::Tasks(r) => r.is_err(),
            Self::Contacts(r) => r.is_err(),
            Self::Files(r) => r.is_err(),
            Self::Notes(r) => r.is_err(),
        }
    }
}

/// Canned sources for tests and previews.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// A source that returns a fixed result, optionally after a delay.
    #[derive(Debug)]
    pub struct StubSource<T> {
        result: LoaderResult<T>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        completed: AtomicUsize,
    }

    impl<T> StubSource<T> {
        /// A source that succeeds with `value`.
        pub fn ok(value: T) -> Self {
            Self::with_result(Ok(value))
        }

        /// A source that fails with `error`.
        pub fn failing(error: crate::LoaderError) -> Self {
            Self::with_result(Err(error))
        }

        pub fn with_result(result: LoaderResult<T>) -> Self {
            Self {
                result,
                delay: None,
                calls: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
            }
        }

        /// Sleeps for `delay` on the tokio clock before reporting.
        #[must_use]
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// How many loads were started.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// How many loads ran to completion (aborted loads are not counted).
        pub fn completed(&self) -> usize {
            self.completed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<T> Source<T> for StubSource<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        async fn load(&self, _deal_id: &DealId) -> LoaderResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }
}
