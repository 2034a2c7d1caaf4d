//! Shared fixtures for loader tests.

#![allow(dead_code)]

use dealdesk_loader::mock::StubSource;
use dealdesk_loader::{
    CallbackSource, CallbackSources, LoaderError, LoaderResult, Source, SourceCallback,
    SourceRole, Sources,
};
use dealdesk_types::{
    Contact, DealDetails, DealDetailsModel, DealId, File, Files, FilesMeta, Note, Task,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ── Payload fixtures ─────────────────────────────────────────────

pub fn deal_id() -> DealId {
    DealId::new("1").unwrap()
}

pub fn details() -> DealDetails {
    DealDetails::new("1", "Deal 1")
}

pub fn tasks() -> Vec<Task> {
    vec![Task::new("1", "Task 1")]
}

pub fn contacts() -> Vec<Contact> {
    vec![Contact::new("1", "First Last", "any@email.com")]
}

pub fn files() -> Files {
    Files::new(vec![File::new("1", "File 1")], FilesMeta::new(10_000, 1024))
}

pub fn notes() -> Vec<Note> {
    vec![Note::new("1", "Note description")]
}

pub fn expected_model() -> DealDetailsModel {
    DealDetailsModel {
        details: details(),
        tasks: tasks(),
        contacts: contacts(),
        files: files(),
        notes: notes(),
    }
}

/// A distinguishable error for `role`.
pub fn role_error(role: SourceRole) -> LoaderError {
    LoaderError::failed(role, format!("{role} backend unavailable"))
}

/// Every ordering of the five roles.
pub fn all_orderings() -> Vec<Vec<SourceRole>> {
    fn permute(rest: Vec<SourceRole>, prefix: Vec<SourceRole>, out: &mut Vec<Vec<SourceRole>>) {
        if rest.is_empty() {
            out.push(prefix);
            return;
        }
        for i in 0..rest.len() {
            let mut rest = rest.clone();
            let mut prefix = prefix.clone();
            prefix.push(rest.remove(i));
            permute(rest, prefix, out);
        }
    }
    let mut out = Vec::with_capacity(120);
    permute(SourceRole::ALL.to_vec(), Vec::new(), &mut out);
    out
}

// ── Async stubs ──────────────────────────────────────────────────

/// Per-role outcome and delay, built into a set of [`StubSource`]s.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    errors: [Option<LoaderError>; 5],
    delays_ms: [u64; 5],
}

impl Scenario {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn fail(mut self, role: SourceRole, error: LoaderError) -> Self {
        self.errors[role.index()] = Some(error);
        self
    }

    pub fn delay(mut self, role: SourceRole, ms: u64) -> Self {
        self.delays_ms[role.index()] = ms;
        self
    }

    pub fn build(&self) -> Stubs {
        let stub_for = |role: SourceRole| {
            (self.errors[role.index()].clone(), self.delays_ms[role.index()])
        };
        Stubs {
            details: stub(details(), stub_for(SourceRole::Details)),
            tasks: stub(tasks(), stub_for(SourceRole::Tasks)),
            contacts: stub(contacts(), stub_for(SourceRole::Contacts)),
            files: stub(files(), stub_for(SourceRole::Files)),
            notes: stub(notes(), stub_for(SourceRole::Notes)),
        }
    }
}

fn stub<T>(value: T, (error, delay_ms): (Option<LoaderError>, u64)) -> Arc<StubSource<T>> {
    let source = match error {
        Some(err) => StubSource::failing(err),
        None => StubSource::ok(value),
    };
    if delay_ms == 0 {
        Arc::new(source)
    } else {
        Arc::new(source.with_delay(Duration::from_millis(delay_ms)))
    }
}

pub struct Stubs {
    pub details: Arc<StubSource<DealDetails>>,
    pub tasks: Arc<StubSource<Vec<Task>>>,
    pub contacts: Arc<StubSource<Vec<Contact>>>,
    pub files: Arc<StubSource<Files>>,
    pub notes: Arc<StubSource<Vec<Note>>>,
}

impl Stubs {
    pub fn sources(&self) -> Sources {
        Sources {
            details: self.details.clone(),
            tasks: self.tasks.clone(),
            contacts: self.contacts.clone(),
            files: self.files.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn calls(&self, role: SourceRole) -> usize {
        match role {
            SourceRole::Details => self.details.calls(),
            SourceRole::Tasks => self.tasks.calls(),
            SourceRole::Contacts => self.contacts.calls(),
            SourceRole::Files => self.files.calls(),
            SourceRole::Notes => self.notes.calls(),
        }
    }

    pub fn completed(&self, role: SourceRole) -> usize {
        match role {
            SourceRole::Details => self.details.completed(),
            SourceRole::Tasks => self.tasks.completed(),
            SourceRole::Contacts => self.contacts.completed(),
            SourceRole::Files => self.files.completed(),
            SourceRole::Notes => self.notes.completed(),
        }
    }
}

/// A source whose task panics instead of reporting.
pub struct PanickingSource;

#[async_trait::async_trait]
impl Source<Vec<Note>> for PanickingSource {
    async fn load(&self, _deal_id: &DealId) -> LoaderResult<Vec<Note>> {
        panic!("notes backend crashed");
    }
}

// ── Callback stubs ───────────────────────────────────────────────

/// How a [`CallbackStub`] delivers its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Invokes the completion before `load` returns.
    Inline,
    /// Invokes the completion from a new thread after the given delay.
    Thread(Duration),
    /// Drops the completion without invoking it.
    Never,
}

/// A callback source returning a fixed result.
pub struct CallbackStub<T> {
    result: LoaderResult<T>,
    delivery: Delivery,
    calls: AtomicUsize,
}

impl<T> CallbackStub<T> {
    pub fn new(result: LoaderResult<T>, delivery: Delivery) -> Self {
        Self {
            result,
            delivery,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T> CallbackSource<T> for CallbackStub<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn load(&self, _deal_id: &DealId, completion: SourceCallback<T>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self.result.clone();
        match self.delivery {
            Delivery::Inline => completion(result),
            Delivery::Thread(delay) => {
                std::thread::spawn(move || {
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    completion(result);
                });
            }
            Delivery::Never => drop(completion),
        }
    }
}

/// Per-role outcome and delivery, built into a set of [`CallbackStub`]s.
#[derive(Debug, Clone)]
pub struct CallbackScenario {
    errors: [Option<LoaderError>; 5],
    delivery: [Delivery; 5],
}

impl CallbackScenario {
    pub fn succeeding(delivery: Delivery) -> Self {
        Self {
            errors: Default::default(),
            delivery: [delivery; 5],
        }
    }

    pub fn fail(mut self, role: SourceRole, error: LoaderError) -> Self {
        self.errors[role.index()] = Some(error);
        self
    }

    pub fn deliver(mut self, role: SourceRole, delivery: Delivery) -> Self {
        self.delivery[role.index()] = delivery;
        self
    }

    pub fn build(&self) -> CallbackStubs {
        let stub_for = |role: SourceRole| {
            (self.errors[role.index()].clone(), self.delivery[role.index()])
        };
        CallbackStubs {
            details: callback_stub(details(), stub_for(SourceRole::Details)),
            tasks: callback_stub(tasks(), stub_for(SourceRole::Tasks)),
            contacts: callback_stub(contacts(), stub_for(SourceRole::Contacts)),
            files: callback_stub(files(), stub_for(SourceRole::Files)),
            notes: callback_stub(notes(), stub_for(SourceRole::Notes)),
        }
    }
}

fn callback_stub<T>(
    value: T,
    (error, delivery): (Option<LoaderError>, Delivery),
) -> Arc<CallbackStub<T>> {
    let result = match error {
        Some(err) => Err(err),
        None => Ok(value),
    };
    Arc::new(CallbackStub::new(result, delivery))
}

pub struct CallbackStubs {
    pub details: Arc<CallbackStub<DealDetails>>,
    pub tasks: Arc<CallbackStub<Vec<Task>>>,
    pub contacts: Arc<CallbackStub<Vec<Contact>>>,
    pub files: Arc<CallbackStub<Files>>,
    pub notes: Arc<CallbackStub<Vec<Note>>>,
}

impl CallbackStubs {
    pub fn sources(&self) -> CallbackSources {
        CallbackSources {
            details: self.details.clone(),
            tasks: self.tasks.clone(),
            contacts: self.contacts.clone(),
            files: self.files.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn calls(&self, role: SourceRole) -> usize {
        match role {
            SourceRole::Details => self.details.calls(),
            SourceRole::Tasks => self.tasks.calls(),
            SourceRole::Contacts => self.contacts.calls(),
            SourceRole::Files => self.files.calls(),
            SourceRole::Notes => self.notes.calls(),
        }
    }
}
