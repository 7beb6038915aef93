//! The hook registry: named extension points that accumulate taps.

use crate::{
    dispatcher::Dispatcher,
    error::HookError,
    interceptor::Interceptor,
    orchestration::{Abstract, Orchestration},
    payload::Payload,
    tap::{deprecate_context, BoxTapFuture, Done, Tap, TapCallback, TapOptions, TapOutcome},
};
use std::sync::{Arc, PoisonError, RwLock};

/// A named extension point that multiplexes an invocation across any number
/// of registered taps, under the orchestration chosen by `S`.
///
/// `T` is the input that flows to every tap, `R` the result type taps may
/// produce. The strategy defaults to [`Abstract`], which fails every
/// dispatch; concrete hooks are usually declared through the flavor aliases
/// (`SyncHook`, `AsyncParallelHook`, ...) that fix `S`.
///
/// ```rust,ignore
/// use tapline_core::{Hook, SeriesBail};
///
/// let mut resolve: Hook<Request, Response, SeriesBail> = Hook::new(&["request"]);
/// resolve.tap("cache", |request| Ok(cache.lookup(request)));
/// resolve.tap("origin", |request| Ok(Some(fetch(request)?)));
///
/// // First tap producing a response wins.
/// let response = resolve.call(&request)?;
/// ```
///
/// # Dispatch compilation
///
/// The hook compiles its `(taps, interceptors)` lists into an immutable
/// [`Dispatcher`] snapshot on the first invocation, and every registration
/// resets that snapshot, so repeated invocations of an unchanged hook pay no
/// per-call bookkeeping. An invocation holds the snapshot it started with;
/// taps registered while a dispatch is pending are observed by the next
/// invocation, never the current one.
///
/// # Ordering
///
/// Taps run in registration order, refined by two hints: `stage` (lower runs
/// earlier; equal stages keep registration order) and `before` (the new tap
/// is placed ahead of every named tap already present; with no named tap
/// present it lands first).
pub struct Hook<T, R = (), S = Abstract> {
    args: Box<[&'static str]>,
    name: Option<String>,
    strategy: S,
    taps: Vec<Tap<T, R>>,
    interceptors: Vec<Interceptor<T, R>>,
    compiled: RwLock<Option<Arc<Dispatcher<T, R>>>>,
}

impl<T, R, S> Hook<T, R, S>
where
    T: Payload,
    R: Payload,
    S: Orchestration<T, R> + Default,
{
    /// Create an anonymous hook with the given argument names.
    ///
    /// The names are diagnostic metadata describing what the input payload
    /// carries; they do not affect dispatch.
    pub fn new(args: &[&'static str]) -> Self {
        Self::with_strategy(args, S::default())
    }

    /// Create a named hook with the given argument names.
    pub fn named(args: &[&'static str], name: impl Into<String>) -> Self {
        let mut hook = Self::with_strategy(args, S::default());
        hook.name = Some(name.into());
        hook
    }
}

impl<T, R, S> Hook<T, R, S>
where
    T: Payload,
    R: Payload,
    S: Orchestration<T, R>,
{
    /// Create a hook driven by an explicit strategy value.
    pub fn with_strategy(args: &[&'static str], strategy: S) -> Self {
        Self {
            args: args.to_vec().into_boxed_slice(),
            name: None,
            strategy,
            taps: Vec::new(),
            interceptors: Vec::new(),
            compiled: RwLock::new(None),
        }
    }

    /// The declared argument names.
    pub fn args(&self) -> &[&'static str] {
        &self.args
    }

    /// The hook's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The registered taps, in execution order.
    pub fn taps(&self) -> &[Tap<T, R>] {
        &self.taps
    }

    /// The attached interceptors, in registration order.
    pub fn interceptors(&self) -> &[Interceptor<T, R>] {
        &self.interceptors
    }

    /// True iff any tap or interceptor is registered.
    pub fn is_used(&self) -> bool {
        !self.taps.is_empty() || !self.interceptors.is_empty()
    }

    /// Whether a compiled dispatcher exists for the current registrations.
    ///
    /// False until the first invocation after construction or after any
    /// `tap*` / `intercept` call.
    pub fn is_compiled(&self) -> bool {
        self.compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Register a sync tap.
    ///
    /// `options` is a bare name or a full [`TapOptions`].
    ///
    /// # Panics
    ///
    /// Panics with `"Missing name for tap"` when the options carry an empty
    /// name.
    pub fn tap<F>(&mut self, options: impl Into<TapOptions>, callback: F) -> &mut Self
    where
        F: Fn(&T) -> TapOutcome<R> + Send + Sync + 'static,
    {
        self.submit(options.into(), TapCallback::sync(callback))
    }

    /// Register a sync tap that receives the shared per-invocation context.
    ///
    /// Deprecated along with the context itself; prefer carrying state on
    /// the input payload.
    pub fn tap_with_context<F>(&mut self, options: impl Into<TapOptions>, callback: F) -> &mut Self
    where
        F: Fn(&crate::Context, &T) -> TapOutcome<R> + Send + Sync + 'static,
    {
        let options = options.into().context(true);
        self.submit(options, TapCallback::sync_ctx(callback))
    }

    /// Register a callback tap: the callback receives the input and a
    /// [`Done`] handle it must complete exactly once.
    pub fn tap_callback<F>(&mut self, options: impl Into<TapOptions>, callback: F) -> &mut Self
    where
        F: Fn(&T, Done<R>) + Send + Sync + 'static,
    {
        self.submit(options.into(), TapCallback::callback(callback))
    }

    /// Context-taking variant of [`tap_callback`](Self::tap_callback).
    pub fn tap_callback_with_context<F>(
        &mut self,
        options: impl Into<TapOptions>,
        callback: F,
    ) -> &mut Self
    where
        F: Fn(&crate::Context, &T, Done<R>) + Send + Sync + 'static,
    {
        let options = options.into().context(true);
        self.submit(options, TapCallback::callback_ctx(callback))
    }

    /// Register a future tap: the callback returns a boxed future resolving
    /// to the tap's outcome.
    ///
    /// ```rust,ignore
    /// hook.tap_async("persist", |event| Box::pin(async move {
    ///     store.write(event).await?;
    ///     Ok(None)
    /// }));
    /// ```
    pub fn tap_async<F>(&mut self, options: impl Into<TapOptions>, callback: F) -> &mut Self
    where
        F: for<'a> Fn(&'a T) -> BoxTapFuture<'a, R> + Send + Sync + 'static,
    {
        self.submit(options.into(), TapCallback::future(callback))
    }

    /// Context-taking variant of [`tap_async`](Self::tap_async).
    pub fn tap_async_with_context<F>(
        &mut self,
        options: impl Into<TapOptions>,
        callback: F,
    ) -> &mut Self
    where
        F: for<'a> Fn(&'a crate::Context, &'a T) -> BoxTapFuture<'a, R> + Send + Sync + 'static,
    {
        let options = options.into().context(true);
        self.submit(options, TapCallback::future_ctx(callback))
    }

    /// Attach an interceptor.
    ///
    /// Resets the compiled dispatcher, applies the interceptor's `register`
    /// callback to every already-registered tap in place (the return value
    /// replaces the descriptor), and appends the interceptor.
    pub fn intercept(&mut self, interceptor: Interceptor<T, R>) -> &mut Self {
        self.invalidate();
        if interceptor.takes_context() {
            deprecate_context();
        }
        if let Some(register) = interceptor.register.clone() {
            for tap in &mut self.taps {
                *tap = register(tap.clone());
            }
        }
        self.interceptors.push(interceptor);
        self
    }

    /// Derive a registration façade that merges `defaults` under every
    /// option set passed to its `tap*` methods (user-set fields win).
    ///
    /// ```rust,ignore
    /// let mut late = hook.with_options(TapOptions::default().stage(100));
    /// late.tap("metrics", |event| { ...; Ok(None) });
    /// ```
    pub fn with_options(&mut self, defaults: impl Into<TapOptions>) -> WithOptions<'_, T, R, S> {
        WithOptions {
            hook: self,
            defaults: defaults.into(),
        }
    }

    /// Invoke every tap synchronously.
    ///
    /// Only sync taps can be driven this way; reaching a callback or future
    /// tap fails with [`HookError::NotSync`].
    pub fn call(&self, input: &T) -> Result<S::Output, HookError> {
        let dispatcher = self.dispatcher();
        self.strategy.dispatch_sync(&dispatcher, input)
    }

    /// Invoke every tap, awaiting callback and future taps, and resolve
    /// with the orchestration's output.
    pub async fn call_async(&self, input: &T) -> Result<S::Output, HookError> {
        let dispatcher = self.dispatcher();
        self.strategy.dispatch(&dispatcher, input).await
    }

    /// Invoke every tap and hand the outcome to `done`.
    ///
    /// The completion callback is invoked exactly once per invocation,
    /// whatever the tap count (including zero) and whichever way the
    /// orchestration finishes.
    pub async fn call_with<F>(&self, input: &T, done: F)
    where
        F: FnOnce(Result<S::Output, HookError>) + Send,
    {
        done(self.call_async(input).await);
    }

    /// The compiled dispatcher for the current registrations, synthesizing
    /// it if no invocation has happened since the last mutation.
    pub fn dispatcher(&self) -> Arc<Dispatcher<T, R>> {
        if let Some(dispatcher) = self
            .compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Arc::clone(dispatcher);
        }
        let mut slot = self.compiled.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slot.get_or_insert_with(|| Arc::new(Dispatcher::new(&self.taps, &self.interceptors))),
        )
    }

    fn invalidate(&mut self) {
        *self.compiled.get_mut().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn submit(&mut self, options: TapOptions, callback: TapCallback<T, R>) -> &mut Self {
        self.invalidate();
        let tap = Tap::new(options, callback);
        let tap = self.run_register_interceptors(tap);
        self.insert(tap);
        self
    }

    /// Left-fold the descriptor through every interceptor's `register`
    /// callback, in registration order.
    fn run_register_interceptors(&self, mut tap: Tap<T, R>) -> Tap<T, R> {
        for interceptor in &self.interceptors {
            if let Some(register) = &interceptor.register {
                tap = register(tap);
            }
        }
        tap
    }

    /// Place a descriptor into the ordered tap list.
    ///
    /// Walks backward from the tail. Every neighbor named in the
    /// descriptor's `before` set is skipped over (and consumed from the
    /// set); while names remain unconsumed the walk continues regardless of
    /// stage; afterwards neighbors with a strictly greater stage are
    /// skipped. The strict comparison keeps equal-stage taps in
    /// registration order, and unconsumed `before` names leave the
    /// descriptor at the very front.
    fn insert(&mut self, tap: Tap<T, R>) {
        let mut before = tap.before.clone();
        let stage = tap.stage;
        let mut index = self.taps.len();
        while index > 0 {
            let neighbor = &self.taps[index - 1];
            if before.remove(neighbor.name.as_str()) {
                index -= 1;
                continue;
            }
            if !before.is_empty() {
                index -= 1;
                continue;
            }
            if neighbor.stage > stage {
                index -= 1;
                continue;
            }
            break;
        }
        self.taps.insert(index, tap);
    }
}

/// Registration façade created by [`Hook::with_options`].
///
/// Every `tap*` method merges the façade's defaults under the user-supplied
/// options before delegating to the underlying hook; `intercept`, `is_used`
/// and further `with_options` calls delegate directly.
pub struct WithOptions<'h, T, R, S> {
    hook: &'h mut Hook<T, R, S>,
    defaults: TapOptions,
}

impl<T, R, S> WithOptions<'_, T, R, S>
where
    T: Payload,
    R: Payload,
    S: Orchestration<T, R>,
{
    /// Register a sync tap with the façade defaults applied.
    pub fn tap<F>(&mut self, options: impl Into<TapOptions>, callback: F) -> &mut Self
    where
        F: Fn(&T) -> TapOutcome<R> + Send + Sync + 'static,
    {
        let merged = options.into().merged_over(&self.defaults);
        self.hook.tap(merged, callback);
        self
    }

    /// Register a context-taking sync tap with the façade defaults applied.
    pub fn tap_with_context<F>(&mut self, options: impl Into<TapOptions>, callback: F) -> &mut Self
    where
        F: Fn(&crate::Context, &T) -> TapOutcome<R> + Send + Sync + 'static,
    {
        let merged = options.into().merged_over(&self.defaults);
        self.hook.tap_with_context(merged, callback);
        self
    }

    /// Register a callback tap with the façade defaults applied.
    pub fn tap_callback<F>(&mut self, options: impl Into<TapOptions>, callback: F) -> &mut Self
    where
        F: Fn(&T, Done<R>) + Send + Sync + 'static,
    {
        let merged = options.into().merged_over(&self.defaults);
        self.hook.tap_callback(merged, callback);
        self
    }

    /// Register a context-taking callback tap with the façade defaults
    /// applied.
    pub fn tap_callback_with_context<F>(
        &mut self,
        options: impl Into<TapOptions>,
        callback: F,
    ) -> &mut Self
    where
        F: Fn(&crate::Context, &T, Done<R>) + Send + Sync + 'static,
    {
        let merged = options.into().merged_over(&self.defaults);
        self.hook.tap_callback_with_context(merged, callback);
        self
    }

    /// Register a future tap with the façade defaults applied.
    pub fn tap_async<F>(&mut self, options: impl Into<TapOptions>, callback: F) -> &mut Self
    where
        F: for<'a> Fn(&'a T) -> BoxTapFuture<'a, R> + Send + Sync + 'static,
    {
        let merged = options.into().merged_over(&self.defaults);
        self.hook.tap_async(merged, callback);
        self
    }

    /// Register a context-taking future tap with the façade defaults
    /// applied.
    pub fn tap_async_with_context<F>(
        &mut self,
        options: impl Into<TapOptions>,
        callback: F,
    ) -> &mut Self
    where
        F: for<'a> Fn(&'a crate::Context, &'a T) -> BoxTapFuture<'a, R> + Send + Sync + 'static,
    {
        let merged = options.into().merged_over(&self.defaults);
        self.hook.tap_async_with_context(merged, callback);
        self
    }

    /// Attach an interceptor to the underlying hook.
    pub fn intercept(&mut self, interceptor: Interceptor<T, R>) -> &mut Self {
        self.hook.intercept(interceptor);
        self
    }

    /// True iff any tap or interceptor is registered on the underlying hook.
    pub fn is_used(&self) -> bool {
        self.hook.is_used()
    }

    /// Stack further defaults on top of this façade's.
    ///
    /// The new defaults win over the existing ones where both are set.
    pub fn with_options(&mut self, defaults: impl Into<TapOptions>) -> WithOptions<'_, T, R, S> {
        let merged = defaults.into().merged_over(&self.defaults);
        WithOptions {
            hook: &mut *self.hook,
            defaults: merged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::{Series, SeriesBail};

    type TestHook = Hook<u32, u32, Series>;

    fn noop(hook: &mut TestHook, options: impl Into<TapOptions>) {
        hook.tap(options, |_| Ok(None));
    }

    fn names(hook: &TestHook) -> Vec<&str> {
        hook.taps().iter().map(|tap| tap.name.as_str()).collect()
    }

    #[test]
    fn test_before_ordering() {
        let mut hook = TestHook::new(&["x"]);
        noop(&mut hook, "A");
        noop(&mut hook, "B");
        noop(&mut hook, TapOptions::new("C").before("B"));
        noop(&mut hook, TapOptions::new("D").before_all(["A", "C"]));
        assert_eq!(names(&hook), ["D", "A", "C", "B"]);
    }

    #[test]
    fn test_stage_ordering() {
        let mut hook = TestHook::new(&["x"]);
        noop(&mut hook, TapOptions::new("a").stage(10));
        noop(&mut hook, TapOptions::new("b").stage(-5));
        noop(&mut hook, "c");
        noop(&mut hook, TapOptions::new("d").stage(0));
        assert_eq!(names(&hook), ["b", "c", "d", "a"]);
    }

    #[test]
    fn test_before_without_target_goes_first() {
        let mut hook = TestHook::new(&["x"]);
        noop(&mut hook, "A");
        noop(&mut hook, "B");
        noop(&mut hook, TapOptions::new("C").before("missing"));
        assert_eq!(names(&hook), ["C", "A", "B"]);
    }

    #[test]
    fn test_equal_stage_keeps_registration_order() {
        let mut hook = TestHook::new(&["x"]);
        noop(&mut hook, TapOptions::new("a").stage(1));
        noop(&mut hook, TapOptions::new("b").stage(1));
        noop(&mut hook, TapOptions::new("c").stage(1));
        assert_eq!(names(&hook), ["a", "b", "c"]);
    }

    #[test]
    #[should_panic(expected = "Missing name for tap")]
    fn test_missing_name_panics() {
        let mut hook = TestHook::new(&["x"]);
        noop(&mut hook, TapOptions::default().stage(3));
    }

    #[test]
    fn test_is_used() {
        let mut hook = TestHook::new(&["x"]);
        assert!(!hook.is_used());
        hook.intercept(Interceptor::builder().build());
        assert!(hook.is_used());
    }

    #[test]
    fn test_register_fold_applies_to_new_taps() {
        let mut hook = TestHook::new(&["x"]);
        hook.intercept(
            Interceptor::builder()
                .on_register(|mut tap| {
                    tap.stage += 1;
                    tap
                })
                .build(),
        );
        hook.intercept(
            Interceptor::builder()
                .on_register(|mut tap| {
                    tap.stage *= 10;
                    tap
                })
                .build(),
        );
        noop(&mut hook, TapOptions::new("a").stage(2));
        // Left fold: (2 + 1) * 10.
        assert_eq!(hook.taps()[0].stage, 30);
    }

    #[test]
    fn test_intercept_rewrites_existing_taps() {
        let mut hook = TestHook::new(&["x"]);
        noop(&mut hook, "a");
        noop(&mut hook, "b");
        hook.intercept(
            Interceptor::builder()
                .on_register(|mut tap| {
                    tap.extra.insert("seen".into(), true.into());
                    tap
                })
                .build(),
        );
        assert!(hook.taps().iter().all(|tap| tap.extra.contains_key("seen")));
    }

    #[test]
    fn test_compiled_slot_resets_on_mutation() {
        let mut hook = TestHook::new(&["x"]);
        noop(&mut hook, "a");
        assert!(!hook.is_compiled());
        hook.call(&1).unwrap();
        assert!(hook.is_compiled());
        noop(&mut hook, "b");
        assert!(!hook.is_compiled());
        hook.call(&1).unwrap();
        assert!(hook.is_compiled());
        hook.intercept(Interceptor::builder().build());
        assert!(!hook.is_compiled());
    }

    #[test]
    fn test_with_options_defaults_fill_unset_fields() {
        let mut hook: Hook<u32, u32, SeriesBail> = Hook::new(&["x"]);
        {
            let mut late = hook.with_options(TapOptions::default().stage(50));
            late.tap("deferred", |_| Ok(None));
            late.tap(TapOptions::new("eager").stage(-1), |_| Ok(None));
            assert!(late.is_used());
        }
        let stages: Vec<i32> = hook.taps().iter().map(|tap| tap.stage).collect();
        let order: Vec<&str> = hook.taps().iter().map(|tap| tap.name.as_str()).collect();
        assert_eq!(order, ["eager", "deferred"]);
        assert_eq!(stages, [-1, 50]);
    }

    #[test]
    fn test_abstract_hook_rejects_dispatch() {
        let hook: Hook<u32, u32> = Hook::new(&["x"]);
        let err = hook.call(&1).unwrap_err();
        assert_eq!(err.to_string(), "abstract: should be overridden");
    }
}
