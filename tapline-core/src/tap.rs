//! Tap descriptors: the registration records binding user callbacks to a hook.

use crate::{context::Context, error::BoxError};
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    fmt,
    future::Future,
    pin::Pin,
    sync::{Arc, Once},
};
use tokio::sync::oneshot;

/// What a single tap produces: `Ok(None)` for "nothing", `Ok(Some(value))`
/// for a defined result, `Err` for a failure.
///
/// Defined results are what bail orchestrations stop on, what waterfall
/// orchestrations thread forward, and what looping orchestrations restart on.
pub type TapOutcome<R> = Result<Option<R>, BoxError>;

/// The boxed future returned by future-convention taps.
pub type BoxTapFuture<'a, R> = Pin<Box<dyn Future<Output = TapOutcome<R>> + Send + 'a>>;

/// The calling convention of a single tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapKind {
    /// A plain function, invoked and completed in place.
    Sync,
    /// A function handed a [`Done`] completion handle to finish through.
    Callback,
    /// A function returning a future that resolves to the outcome.
    Future,
}

impl fmt::Display for TapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapKind::Sync => f.write_str("sync"),
            TapKind::Callback => f.write_str("callback"),
            TapKind::Future => f.write_str("future"),
        }
    }
}

/// One-shot completion handle for callback taps.
///
/// Every completion method consumes the handle, so a callback tap can
/// complete at most once; exactness is a compile-time property rather than a
/// runtime check. Dropping the handle without completing surfaces as
/// [`HookError::DroppedCompletion`](crate::HookError::DroppedCompletion) on
/// the dispatch; a handle that is merely parked keeps the dispatch pending.
pub struct Done<R> {
    tx: oneshot::Sender<TapOutcome<R>>,
}

impl<R> Done<R> {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<TapOutcome<R>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Complete with an explicit outcome.
    pub fn complete(self, outcome: TapOutcome<R>) {
        // The receiver is gone when the orchestration already short-circuited;
        // the completion is swallowed in that case.
        let _ = self.tx.send(outcome);
    }

    /// Complete successfully with no result.
    pub fn ok(self) {
        self.complete(Ok(None));
    }

    /// Complete successfully with a defined result.
    pub fn result(self, value: R) {
        self.complete(Ok(Some(value)));
    }

    /// Complete with a failure.
    pub fn err(self, error: impl Into<BoxError>) {
        self.complete(Err(error.into()));
    }
}

impl<R> fmt::Debug for Done<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done").finish_non_exhaustive()
    }
}

/// The user callback of a tap, in one of six shapes: the three calling
/// conventions, each with a context-taking twin.
///
/// Callbacks are `Arc`ed, so cloning a [`Tap`] (and snapshotting the tap list
/// into a dispatcher) is cheap.
pub enum TapCallback<T, R> {
    /// Sync tap.
    Sync(Arc<dyn Fn(&T) -> TapOutcome<R> + Send + Sync>),
    /// Sync tap receiving the shared per-invocation [`Context`].
    SyncCtx(Arc<dyn Fn(&Context, &T) -> TapOutcome<R> + Send + Sync>),
    /// Callback tap; completes through the [`Done`] handle.
    Callback(Arc<dyn Fn(&T, Done<R>) + Send + Sync>),
    /// Callback tap receiving the shared per-invocation [`Context`].
    CallbackCtx(Arc<dyn Fn(&Context, &T, Done<R>) + Send + Sync>),
    /// Future tap; the returned future resolves to the outcome.
    Future(Arc<dyn for<'a> Fn(&'a T) -> BoxTapFuture<'a, R> + Send + Sync>),
    /// Future tap receiving the shared per-invocation [`Context`].
    FutureCtx(Arc<dyn for<'a> Fn(&'a Context, &'a T) -> BoxTapFuture<'a, R> + Send + Sync>),
}

impl<T, R> TapCallback<T, R> {
    /// Wrap a sync callback.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&T) -> TapOutcome<R> + Send + Sync + 'static,
    {
        TapCallback::Sync(Arc::new(f))
    }

    /// Wrap a sync callback that takes the shared context.
    pub fn sync_ctx<F>(f: F) -> Self
    where
        F: Fn(&Context, &T) -> TapOutcome<R> + Send + Sync + 'static,
    {
        TapCallback::SyncCtx(Arc::new(f))
    }

    /// Wrap a callback-convention callback.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&T, Done<R>) + Send + Sync + 'static,
    {
        TapCallback::Callback(Arc::new(f))
    }

    /// Wrap a callback-convention callback that takes the shared context.
    pub fn callback_ctx<F>(f: F) -> Self
    where
        F: Fn(&Context, &T, Done<R>) + Send + Sync + 'static,
    {
        TapCallback::CallbackCtx(Arc::new(f))
    }

    /// Wrap a future-convention callback.
    pub fn future<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxTapFuture<'a, R> + Send + Sync + 'static,
    {
        TapCallback::Future(Arc::new(f))
    }

    /// Wrap a future-convention callback that takes the shared context.
    pub fn future_ctx<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Context, &'a T) -> BoxTapFuture<'a, R> + Send + Sync + 'static,
    {
        TapCallback::FutureCtx(Arc::new(f))
    }

    /// The calling convention of this callback.
    pub fn kind(&self) -> TapKind {
        match self {
            TapCallback::Sync(_) | TapCallback::SyncCtx(_) => TapKind::Sync,
            TapCallback::Callback(_) | TapCallback::CallbackCtx(_) => TapKind::Callback,
            TapCallback::Future(_) | TapCallback::FutureCtx(_) => TapKind::Future,
        }
    }

    /// Whether this callback receives the shared per-invocation context.
    pub fn takes_context(&self) -> bool {
        matches!(
            self,
            TapCallback::SyncCtx(_) | TapCallback::CallbackCtx(_) | TapCallback::FutureCtx(_)
        )
    }
}

impl<T, R> Clone for TapCallback<T, R> {
    fn clone(&self) -> Self {
        match self {
            TapCallback::Sync(f) => TapCallback::Sync(Arc::clone(f)),
            TapCallback::SyncCtx(f) => TapCallback::SyncCtx(Arc::clone(f)),
            TapCallback::Callback(f) => TapCallback::Callback(Arc::clone(f)),
            TapCallback::CallbackCtx(f) => TapCallback::CallbackCtx(Arc::clone(f)),
            TapCallback::Future(f) => TapCallback::Future(Arc::clone(f)),
            TapCallback::FutureCtx(f) => TapCallback::FutureCtx(Arc::clone(f)),
        }
    }
}

impl<T, R> fmt::Debug for TapCallback<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TapCallback::{}", self.kind())
    }
}

/// Registration options for a tap.
///
/// A bare `&str` or `String` converts into options carrying just the name.
/// `stage` and `context` are tri-state so that [`Hook::with_options`]
/// defaults only fill fields the user left unset.
///
/// [`Hook::with_options`]: crate::Hook::with_options
#[derive(Debug, Clone, Default)]
pub struct TapOptions {
    /// Tap name. Required and non-empty at registration time.
    pub name: String,
    /// Names of taps this tap must precede.
    pub before: HashSet<String>,
    /// Secondary ordering key; lower stages run earlier. Defaults to 0.
    pub stage: Option<i32>,
    /// Deprecated: request the shared per-invocation context.
    pub context: Option<bool>,
}

impl TapOptions {
    /// Options carrying just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add one name this tap must precede.
    pub fn before(mut self, name: impl Into<String>) -> Self {
        self.before.insert(name.into());
        self
    }

    /// Add several names this tap must precede.
    pub fn before_all<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.before.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the stage ordering key.
    pub fn stage(mut self, stage: i32) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Deprecated: request the shared per-invocation context.
    pub fn context(mut self, context: bool) -> Self {
        self.context = Some(context);
        self
    }

    /// Shallow-merge: fields set on `self` win, unset fields fall back to
    /// `defaults`.
    pub(crate) fn merged_over(self, defaults: &TapOptions) -> TapOptions {
        TapOptions {
            name: if self.name.is_empty() {
                defaults.name.clone()
            } else {
                self.name
            },
            before: if self.before.is_empty() {
                defaults.before.clone()
            } else {
                self.before
            },
            stage: self.stage.or(defaults.stage),
            context: self.context.or(defaults.context),
        }
    }
}

impl From<&str> for TapOptions {
    fn from(name: &str) -> Self {
        TapOptions::new(name)
    }
}

impl From<String> for TapOptions {
    fn from(name: String) -> Self {
        TapOptions::new(name)
    }
}

impl From<&String> for TapOptions {
    fn from(name: &String) -> Self {
        TapOptions::new(name.clone())
    }
}

/// A registration record binding a user callback to a hook, together with
/// its ordering metadata.
///
/// Fields are public so `register` interceptors can rewrite descriptors
/// freely; anything they attach to [`extra`](Tap::extra) rides through the
/// registry untouched unless a later interceptor rewrites it.
pub struct Tap<T, R> {
    /// Tap name, unique per convention but not enforced.
    pub name: String,
    /// Names of taps this tap must precede.
    pub before: HashSet<String>,
    /// Secondary ordering key; lower stages run earlier.
    pub stage: i32,
    /// Deprecated context request carried from the options.
    pub context: bool,
    /// Open extension slot for interceptor-attached metadata.
    pub extra: HashMap<String, Value>,
    /// The user callback.
    pub callback: TapCallback<T, R>,
}

impl<T, R> Tap<T, R> {
    /// Build a descriptor from options and a callback.
    ///
    /// # Panics
    ///
    /// Panics with `"Missing name for tap"` when the options carry an empty
    /// name.
    pub fn new(options: TapOptions, callback: TapCallback<T, R>) -> Self {
        assert!(!options.name.is_empty(), "Missing name for tap");
        let context = options.context.unwrap_or(false);
        if context {
            deprecate_context();
        }
        Self {
            name: options.name,
            before: options.before,
            stage: options.stage.unwrap_or(0),
            context,
            extra: HashMap::new(),
            callback,
        }
    }

    /// The calling convention of this tap.
    pub fn kind(&self) -> TapKind {
        self.callback.kind()
    }
}

impl<T, R> Clone for Tap<T, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            before: self.before.clone(),
            stage: self.stage,
            context: self.context,
            extra: self.extra.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<T, R> fmt::Debug for Tap<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tap")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("stage", &self.stage)
            .field("before", &self.before)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Emit the one-shot context deprecation notice.
///
/// Fires at most once per process, on the first sighting of a context-opted
/// tap or interceptor.
pub(crate) fn deprecate_context() {
    static NOTICE: Once = Once::new();
    NOTICE.call_once(|| {
        #[cfg(feature = "tracing")]
        {
            tracing::warn!("hook context is deprecated and will be removed");
        }
        #[cfg(not(feature = "tracing"))]
        {
            eprintln!("warning: hook context is deprecated and will be removed");
        }
    });
}
