//! The compiled dispatcher: a snapshot of a hook's taps and interceptors.

use crate::{
    context::Context,
    error::HookError,
    interceptor::{InputObserver, Interceptor, TapObserver},
    payload::Payload,
    tap::{Done, Tap, TapCallback},
};

/// An immutable snapshot of a hook's `(taps, interceptors)` lists, built
/// lazily on the first invocation after any mutation.
///
/// The snapshot is what an in-flight invocation reads: taps are resolved by
/// integer index from the captured array, so registrations happening after
/// synthesis are invisible until the hook rebuilds its dispatcher. The
/// snapshot also pre-computes whether any participant opted into the shared
/// per-invocation [`Context`].
///
/// Orchestration strategies drive a dispatcher through [`begin`](Self::begin),
/// [`loop_round`](Self::loop_round), and the per-tap
/// [`invoke`](Self::invoke) / [`invoke_sync`](Self::invoke_sync) entry
/// points.
pub struct Dispatcher<T, R> {
    taps: Box<[Tap<T, R>]>,
    interceptors: Box<[Interceptor<T, R>]>,
    needs_context: bool,
}

impl<T: Payload, R: Payload> Dispatcher<T, R> {
    pub(crate) fn new(taps: &[Tap<T, R>], interceptors: &[Interceptor<T, R>]) -> Self {
        let needs_context = taps
            .iter()
            .any(|tap| tap.context || tap.callback.takes_context())
            || interceptors.iter().any(Interceptor::takes_context);
        Self {
            taps: taps.to_vec().into_boxed_slice(),
            interceptors: interceptors.to_vec().into_boxed_slice(),
            needs_context,
        }
    }

    /// The tap snapshot, in execution order.
    pub fn taps(&self) -> &[Tap<T, R>] {
        &self.taps
    }

    /// Number of taps in the snapshot.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether the snapshot holds no taps.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Open an invocation: create the shared context if any participant
    /// opted in, then fire every interceptor's `call` observer in
    /// registration order.
    pub fn begin(&self, input: &T) -> Option<Context> {
        let context = self.needs_context.then(Context::new);
        for interceptor in self.interceptors.iter() {
            match (&interceptor.call, context.as_ref()) {
                (Some(InputObserver::Plain(observe)), _) => observe(input),
                (Some(InputObserver::Ctx(observe)), Some(cx)) => observe(cx, input),
                _ => {}
            }
        }
        context
    }

    /// Fire every interceptor's `loop` observer, in registration order.
    ///
    /// Looping orchestrations call this at the top of every iteration.
    pub fn loop_round(&self, context: Option<&Context>, input: &T) {
        for interceptor in self.interceptors.iter() {
            match (&interceptor.loop_, context) {
                (Some(InputObserver::Plain(observe)), _) => observe(input),
                (Some(InputObserver::Ctx(observe)), Some(cx)) => observe(cx, input),
                _ => {}
            }
        }
    }

    /// Fire every interceptor's `tap` observer for the tap at `index`.
    fn announce(&self, context: Option<&Context>, index: usize) {
        let tap = &self.taps[index];
        for interceptor in self.interceptors.iter() {
            match (&interceptor.tap, context) {
                (Some(TapObserver::Plain(observe)), _) => observe(tap),
                (Some(TapObserver::Ctx(observe)), Some(cx)) => observe(cx, tap),
                _ => {}
            }
        }
    }

    /// Run the tap at `index` synchronously.
    ///
    /// Interceptor `tap` observers fire first, then the tap's callback runs.
    /// Callback and future taps cannot be driven here and fail with
    /// [`HookError::NotSync`].
    pub fn invoke_sync(
        &self,
        context: Option<&Context>,
        index: usize,
        input: &T,
    ) -> Result<Option<R>, HookError> {
        self.announce(context, index);
        let tap = &self.taps[index];
        match &tap.callback {
            TapCallback::Sync(run) => run(input).map_err(|e| HookError::tap(&tap.name, e)),
            TapCallback::SyncCtx(run) => {
                let outcome = match context {
                    Some(cx) => run(cx, input),
                    None => run(&Context::new(), input),
                };
                outcome.map_err(|e| HookError::tap(&tap.name, e))
            }
            other => Err(HookError::NotSync {
                tap: tap.name.clone(),
                kind: other.kind(),
            }),
        }
    }

    /// Run the tap at `index`, awaiting callback and future taps.
    ///
    /// Interceptor `tap` observers fire first, then the tap's callback runs.
    /// Exactly one outcome is produced per invocation of a tap; a callback
    /// tap that drops its [`Done`] handle yields
    /// [`HookError::DroppedCompletion`].
    pub async fn invoke(
        &self,
        context: Option<&Context>,
        index: usize,
        input: &T,
    ) -> Result<Option<R>, HookError> {
        self.announce(context, index);
        let tap = &self.taps[index];
        match &tap.callback {
            TapCallback::Sync(run) => run(input).map_err(|e| HookError::tap(&tap.name, e)),
            TapCallback::SyncCtx(run) => {
                let outcome = match context {
                    Some(cx) => run(cx, input),
                    None => run(&Context::new(), input),
                };
                outcome.map_err(|e| HookError::tap(&tap.name, e))
            }
            TapCallback::Callback(run) => {
                let (done, completion) = Done::channel();
                run(input, done);
                match completion.await {
                    Ok(outcome) => outcome.map_err(|e| HookError::tap(&tap.name, e)),
                    Err(_) => Err(HookError::DroppedCompletion {
                        tap: tap.name.clone(),
                    }),
                }
            }
            TapCallback::CallbackCtx(run) => {
                let (done, completion) = Done::channel();
                match context {
                    Some(cx) => run(cx, input, done),
                    None => run(&Context::new(), input, done),
                }
                match completion.await {
                    Ok(outcome) => outcome.map_err(|e| HookError::tap(&tap.name, e)),
                    Err(_) => Err(HookError::DroppedCompletion {
                        tap: tap.name.clone(),
                    }),
                }
            }
            TapCallback::Future(run) => run(input)
                .await
                .map_err(|e| HookError::tap(&tap.name, e)),
            TapCallback::FutureCtx(run) => {
                let outcome = match context {
                    Some(cx) => run(cx, input).await,
                    None => run(&Context::new(), input).await,
                };
                outcome.map_err(|e| HookError::tap(&tap.name, e))
            }
        }
    }
}
