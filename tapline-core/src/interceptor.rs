//! Interceptors: cross-cutting observers of registration and invocation.

use crate::{context::Context, tap::Tap};
use std::{fmt, sync::Arc};

type RegisterFn<T, R> = Arc<dyn Fn(Tap<T, R>) -> Tap<T, R> + Send + Sync>;

/// An observer of the dispatched input, plain or context-taking.
pub(crate) enum InputObserver<T> {
    Plain(Arc<dyn Fn(&T) + Send + Sync>),
    Ctx(Arc<dyn Fn(&Context, &T) + Send + Sync>),
}

impl<T> InputObserver<T> {
    pub(crate) fn takes_context(&self) -> bool {
        matches!(self, InputObserver::Ctx(_))
    }
}

impl<T> Clone for InputObserver<T> {
    fn clone(&self) -> Self {
        match self {
            InputObserver::Plain(f) => InputObserver::Plain(Arc::clone(f)),
            InputObserver::Ctx(f) => InputObserver::Ctx(Arc::clone(f)),
        }
    }
}

/// An observer of a tap about to execute, plain or context-taking.
pub(crate) enum TapObserver<T, R> {
    Plain(Arc<dyn Fn(&Tap<T, R>) + Send + Sync>),
    Ctx(Arc<dyn Fn(&Context, &Tap<T, R>) + Send + Sync>),
}

impl<T, R> TapObserver<T, R> {
    pub(crate) fn takes_context(&self) -> bool {
        matches!(self, TapObserver::Ctx(_))
    }
}

impl<T, R> Clone for TapObserver<T, R> {
    fn clone(&self) -> Self {
        match self {
            TapObserver::Plain(f) => TapObserver::Plain(Arc::clone(f)),
            TapObserver::Ctx(f) => TapObserver::Ctx(Arc::clone(f)),
        }
    }
}

/// A cross-cutting observer attached to a hook.
///
/// An interceptor may rewrite descriptors as they register (`register`),
/// observe the start of every invocation (`call`), observe each tap right
/// before it executes (`tap`), and observe every looping iteration (`loop`).
/// All callbacks are optional; an interceptor with none of them still
/// invalidates the hook's compiled dispatcher when attached.
///
/// Build one through [`Interceptor::builder`]:
///
/// ```rust,ignore
/// let interceptor = Interceptor::builder()
///     .on_register(|mut tap| { tap.stage = tap.stage.min(0); tap })
///     .on_call(|input| println!("dispatching {input:?}"))
///     .on_tap(|tap| println!("running {}", tap.name))
///     .build();
/// hook.intercept(interceptor);
/// ```
pub struct Interceptor<T, R> {
    pub(crate) register: Option<RegisterFn<T, R>>,
    pub(crate) call: Option<InputObserver<T>>,
    pub(crate) tap: Option<TapObserver<T, R>>,
    pub(crate) loop_: Option<InputObserver<T>>,
    pub(crate) context: bool,
}

impl<T, R> Interceptor<T, R> {
    /// Start building an interceptor.
    pub fn builder() -> InterceptorBuilder<T, R> {
        InterceptorBuilder {
            inner: Interceptor {
                register: None,
                call: None,
                tap: None,
                loop_: None,
                context: false,
            },
        }
    }

    /// Whether this interceptor opted into the shared per-invocation context.
    pub fn takes_context(&self) -> bool {
        self.context
            || self.call.as_ref().is_some_and(InputObserver::takes_context)
            || self.tap.as_ref().is_some_and(TapObserver::takes_context)
            || self.loop_.as_ref().is_some_and(InputObserver::takes_context)
    }
}

impl<T, R> Clone for Interceptor<T, R> {
    fn clone(&self) -> Self {
        Self {
            register: self.register.clone(),
            call: self.call.clone(),
            tap: self.tap.clone(),
            loop_: self.loop_.clone(),
            context: self.context,
        }
    }
}

impl<T, R> fmt::Debug for Interceptor<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("register", &self.register.is_some())
            .field("call", &self.call.is_some())
            .field("tap", &self.tap.is_some())
            .field("loop", &self.loop_.is_some())
            .field("context", &self.context)
            .finish()
    }
}

/// Builder for [`Interceptor`].
///
/// The `*_with_context` setters implicitly opt the interceptor into the
/// shared per-invocation context (which is deprecated, and noted once per
/// process when such an interceptor is attached).
pub struct InterceptorBuilder<T, R> {
    inner: Interceptor<T, R>,
}

impl<T, R> InterceptorBuilder<T, R> {
    /// Rewrite each tap descriptor at registration time.
    ///
    /// The return value replaces the descriptor; return the argument
    /// unchanged to keep it.
    pub fn on_register<F>(mut self, f: F) -> Self
    where
        F: Fn(Tap<T, R>) -> Tap<T, R> + Send + Sync + 'static,
    {
        self.inner.register = Some(Arc::new(f));
        self
    }

    /// Observe the start of every invocation, before any tap runs.
    pub fn on_call<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.call = Some(InputObserver::Plain(Arc::new(f)));
        self
    }

    /// Context-taking variant of [`on_call`](Self::on_call).
    pub fn on_call_with_context<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &T) + Send + Sync + 'static,
    {
        self.inner.call = Some(InputObserver::Ctx(Arc::new(f)));
        self.inner.context = true;
        self
    }

    /// Observe each tap right before its callback executes.
    pub fn on_tap<F>(mut self, f: F) -> Self
    where
        F: Fn(&Tap<T, R>) + Send + Sync + 'static,
    {
        self.inner.tap = Some(TapObserver::Plain(Arc::new(f)));
        self
    }

    /// Context-taking variant of [`on_tap`](Self::on_tap).
    pub fn on_tap_with_context<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &Tap<T, R>) + Send + Sync + 'static,
    {
        self.inner.tap = Some(TapObserver::Ctx(Arc::new(f)));
        self.inner.context = true;
        self
    }

    /// Observe the top of every looping iteration.
    ///
    /// Only looping orchestrations fire this.
    pub fn on_loop<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.loop_ = Some(InputObserver::Plain(Arc::new(f)));
        self
    }

    /// Context-taking variant of [`on_loop`](Self::on_loop).
    pub fn on_loop_with_context<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &T) + Send + Sync + 'static,
    {
        self.inner.loop_ = Some(InputObserver::Ctx(Arc::new(f)));
        self.inner.context = true;
        self
    }

    /// Deprecated: opt into the shared per-invocation context without
    /// installing a context-taking callback.
    pub fn context(mut self, context: bool) -> Self {
        self.inner.context = context;
        self
    }

    /// Finish building.
    pub fn build(self) -> Interceptor<T, R> {
        self.inner
    }
}
