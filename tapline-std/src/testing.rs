//! Testing utilities for tapline.
//!
//! This module provides helpers to make asserting on hook behavior easier:
//!
//! - [`Recorder`]: a shared, ordered event log
//! - [`Counter`]: a shared invocation counter
//! - [`recording_interceptor`]: an interceptor that logs `call`/`tap`/`loop`
//!   observations into a [`Recorder`]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, PoisonError,
};
use tapline_core::{Interceptor, Payload};

/// A shared, ordered event log.
///
/// Clones share the same underlying log, so a test can hand clones to taps
/// and interceptors and assert on the interleaving afterwards.
///
/// ```rust,ignore
/// let recorder = Recorder::new();
/// let tap_recorder = recorder.clone();
/// hook.tap("emit", move |_| { tap_recorder.note("emit"); Ok(None) });
///
/// hook.call(&input)?;
/// assert_eq!(recorder.entries(), ["emit"]);
/// ```
#[derive(Default)]
pub struct Recorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn note(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// A snapshot of the recorded entries, in order.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all recorded entries.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Clone for Recorder {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

/// A shared invocation counter.
///
/// Clones share the same underlying count.
#[derive(Default)]
pub struct Counter {
    count: Arc<AtomicUsize>,
}

impl Counter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count.
    pub fn bump(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// The current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the count to zero.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Self {
            count: Arc::clone(&self.count),
        }
    }
}

/// An interceptor that logs its observations into a [`Recorder`].
///
/// Entries are `"<label>.call"`, `"<label>.tap:<tap name>"`, and
/// `"<label>.loop"`, letting a test assert the exact interleaving of
/// interceptor callbacks and taps.
pub fn recording_interceptor<T, R>(
    label: impl Into<String>,
    recorder: &Recorder,
) -> Interceptor<T, R>
where
    T: Payload,
    R: Payload,
{
    let label = label.into();
    let call_log = (recorder.clone(), label.clone());
    let tap_log = (recorder.clone(), label.clone());
    let loop_log = (recorder.clone(), label);
    Interceptor::builder()
        .on_call(move |_: &T| call_log.0.note(format!("{}.call", call_log.1)))
        .on_tap(move |tap| tap_log.0.note(format!("{}.tap:{}", tap_log.1, tap.name)))
        .on_loop(move |_: &T| loop_log.0.note(format!("{}.loop", loop_log.1)))
        .build()
}
