//! Orchestration strategies: how a dispatcher composes its taps.
//!
//! An [`Orchestration`] drives a compiled [`Dispatcher`] through one of two
//! engines: `dispatch_sync` runs sync taps in place with no future machinery
//! at all (the fast path for the synchronous calling convention), and
//! `dispatch` awaits callback and future taps. Strategies are plugged into
//! [`Hook`](crate::Hook) as its third type parameter; the shipped set is
//!
//! - [`Series`] - taps in order, results discarded
//! - [`SeriesBail`] - taps in order, first defined result wins
//! - [`Waterfall`] - taps in order, defined results thread forward
//! - [`Looping`] - rerun from the top while any tap produces a result
//! - [`Parallel`] - all taps at once, results discarded
//! - [`ParallelBail`] - all taps at once, first decided outcome in tap order
//! - [`Abstract`] - placeholder that fails every dispatch
//!
//! Custom strategies implement [`Orchestration`] against the public
//! [`Dispatcher`] surface.

use crate::{dispatcher::Dispatcher, error::HookError, payload::Payload};
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// A strategy for composing the taps of a compiled dispatcher.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an orchestration for `({T}, {R})` hooks",
    label = "missing `Orchestration` implementation",
    note = "Implement `Orchestration<{T}, {R}>` to drive a dispatcher with this strategy."
)]
pub trait Orchestration<T, R>: Send + Sync + 'static
where
    T: Payload,
    R: Payload,
{
    /// What a completed dispatch yields.
    type Output: Send + 'static;

    /// Drive the dispatcher synchronously.
    ///
    /// Only sync taps can be driven here; reaching any other tap kind fails
    /// with [`HookError::NotSync`].
    fn dispatch_sync(
        &self,
        dispatcher: &Dispatcher<T, R>,
        input: &T,
    ) -> Result<Self::Output, HookError>;

    /// Drive the dispatcher, awaiting callback and future taps.
    fn dispatch(
        &self,
        dispatcher: &Dispatcher<T, R>,
        input: &T,
    ) -> impl Future<Output = Result<Self::Output, HookError>> + Send;
}

/// Placeholder strategy for a hook whose orchestration was never chosen.
///
/// Every dispatch fails with [`HookError::Abstract`]. This is the default
/// strategy parameter of [`Hook`](crate::Hook), so a bare `Hook` behaves
/// like an abstract base until a concrete flavor is picked.
#[derive(Debug, Default, Clone, Copy)]
pub struct Abstract;

impl<T: Payload, R: Payload> Orchestration<T, R> for Abstract {
    type Output = ();

    fn dispatch_sync(&self, _dispatcher: &Dispatcher<T, R>, _input: &T) -> Result<(), HookError> {
        Err(HookError::Abstract)
    }

    async fn dispatch(&self, _dispatcher: &Dispatcher<T, R>, _input: &T) -> Result<(), HookError> {
        Err(HookError::Abstract)
    }
}

/// Run taps one after another; results are discarded.
///
/// The first failing tap short-circuits the remainder.
#[derive(Debug, Default, Clone, Copy)]
pub struct Series;

impl<T: Payload, R: Payload> Orchestration<T, R> for Series {
    type Output = ();

    fn dispatch_sync(&self, dispatcher: &Dispatcher<T, R>, input: &T) -> Result<(), HookError> {
        let context = dispatcher.begin(input);
        for index in 0..dispatcher.len() {
            dispatcher.invoke_sync(context.as_ref(), index, input)?;
        }
        Ok(())
    }

    async fn dispatch(&self, dispatcher: &Dispatcher<T, R>, input: &T) -> Result<(), HookError> {
        let context = dispatcher.begin(input);
        for index in 0..dispatcher.len() {
            dispatcher.invoke(context.as_ref(), index, input).await?;
        }
        Ok(())
    }
}

/// Run taps one after another until one produces a defined result.
///
/// The winning result is returned and the remaining taps never run;
/// `Ok(None)` means every tap passed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeriesBail;

impl<T: Payload, R: Payload> Orchestration<T, R> for SeriesBail {
    type Output = Option<R>;

    fn dispatch_sync(
        &self,
        dispatcher: &Dispatcher<T, R>,
        input: &T,
    ) -> Result<Option<R>, HookError> {
        let context = dispatcher.begin(input);
        for index in 0..dispatcher.len() {
            if let Some(value) = dispatcher.invoke_sync(context.as_ref(), index, input)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    async fn dispatch(
        &self,
        dispatcher: &Dispatcher<T, R>,
        input: &T,
    ) -> Result<Option<R>, HookError> {
        let context = dispatcher.begin(input);
        for index in 0..dispatcher.len() {
            if let Some(value) = dispatcher.invoke(context.as_ref(), index, input).await? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// Run taps one after another, threading each defined result into the next
/// tap as its input.
///
/// The dispatch yields the final threaded value, which is the original input
/// when no tap produced anything. Only usable on hooks whose result type
/// equals their input type.
#[derive(Debug, Default, Clone, Copy)]
pub struct Waterfall;

impl<T: Payload + Clone> Orchestration<T, T> for Waterfall {
    type Output = T;

    fn dispatch_sync(&self, dispatcher: &Dispatcher<T, T>, input: &T) -> Result<T, HookError> {
        let context = dispatcher.begin(input);
        let mut current = input.clone();
        for index in 0..dispatcher.len() {
            if let Some(next) = dispatcher.invoke_sync(context.as_ref(), index, &current)? {
                current = next;
            }
        }
        Ok(current)
    }

    async fn dispatch(&self, dispatcher: &Dispatcher<T, T>, input: &T) -> Result<T, HookError> {
        let context = dispatcher.begin(input);
        let mut current = input.clone();
        for index in 0..dispatcher.len() {
            if let Some(next) = dispatcher.invoke(context.as_ref(), index, &current).await? {
                current = next;
            }
        }
        Ok(current)
    }
}

/// Rerun the tap sequence from the top whenever any tap produces a defined
/// result; complete once a full pass produces none.
///
/// Interceptor `loop` observers fire at the top of every iteration,
/// including the first.
#[derive(Debug, Default, Clone, Copy)]
pub struct Looping;

impl<T: Payload, R: Payload> Orchestration<T, R> for Looping {
    type Output = ();

    fn dispatch_sync(&self, dispatcher: &Dispatcher<T, R>, input: &T) -> Result<(), HookError> {
        let context = dispatcher.begin(input);
        loop {
            dispatcher.loop_round(context.as_ref(), input);
            let mut restart = false;
            for index in 0..dispatcher.len() {
                if dispatcher
                    .invoke_sync(context.as_ref(), index, input)?
                    .is_some()
                {
                    restart = true;
                    break;
                }
            }
            if !restart {
                return Ok(());
            }
        }
    }

    async fn dispatch(&self, dispatcher: &Dispatcher<T, R>, input: &T) -> Result<(), HookError> {
        let context = dispatcher.begin(input);
        loop {
            dispatcher.loop_round(context.as_ref(), input);
            let mut restart = false;
            for index in 0..dispatcher.len() {
                if dispatcher
                    .invoke(context.as_ref(), index, input)
                    .await?
                    .is_some()
                {
                    restart = true;
                    break;
                }
            }
            if !restart {
                return Ok(());
            }
        }
    }
}

/// Launch every tap at once; complete when the last one does.
///
/// The first failure completes the dispatch immediately, exactly once, and
/// abandons the still-running siblings; their completions are never
/// observed. A single tap degrades to series. Under the synchronous engine
/// the launches collapse into sequential execution.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parallel;

impl<T: Payload, R: Payload> Orchestration<T, R> for Parallel {
    type Output = ();

    fn dispatch_sync(&self, dispatcher: &Dispatcher<T, R>, input: &T) -> Result<(), HookError> {
        let context = dispatcher.begin(input);
        for index in 0..dispatcher.len() {
            dispatcher.invoke_sync(context.as_ref(), index, input)?;
        }
        Ok(())
    }

    async fn dispatch(&self, dispatcher: &Dispatcher<T, R>, input: &T) -> Result<(), HookError> {
        let context = dispatcher.begin(input);
        let cx = context.as_ref();
        match dispatcher.len() {
            0 => Ok(()),
            1 => dispatcher.invoke(cx, 0, input).await.map(|_| ()),
            total => {
                let mut pending: FuturesUnordered<_> = (0..total)
                    .map(|index| dispatcher.invoke(cx, index, input))
                    .collect();
                while let Some(completion) = pending.next().await {
                    completion?;
                }
                Ok(())
            }
        }
    }
}

/// Launch every tap at once; resolve with the first decided outcome in tap
/// order.
///
/// Completions are slotted by tap index. The dispatch resolves as soon as
/// some slot holds a defined result or an error and every earlier slot has
/// resolved to "nothing" - not in completion order. Once it resolves, the
/// still-running siblings are abandoned.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelBail;

impl<T: Payload, R: Payload> Orchestration<T, R> for ParallelBail {
    type Output = Option<R>;

    fn dispatch_sync(
        &self,
        dispatcher: &Dispatcher<T, R>,
        input: &T,
    ) -> Result<Option<R>, HookError> {
        let context = dispatcher.begin(input);
        for index in 0..dispatcher.len() {
            if let Some(value) = dispatcher.invoke_sync(context.as_ref(), index, input)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    async fn dispatch(
        &self,
        dispatcher: &Dispatcher<T, R>,
        input: &T,
    ) -> Result<Option<R>, HookError> {
        let context = dispatcher.begin(input);
        let cx = context.as_ref();
        let total = dispatcher.len();
        match total {
            0 => Ok(None),
            1 => dispatcher.invoke(cx, 0, input).await,
            _ => {
                let mut pending: FuturesUnordered<_> = (0..total)
                    .map(|index| async move { (index, dispatcher.invoke(cx, index, input).await) })
                    .collect();
                let mut slots: Vec<Option<Result<Option<R>, HookError>>> =
                    (0..total).map(|_| None).collect();
                let mut decided = 0;
                while let Some((index, outcome)) = pending.next().await {
                    slots[index] = Some(outcome);
                    while decided < total {
                        match slots[decided].take() {
                            None => break,
                            Some(Ok(None)) => decided += 1,
                            Some(settled) => return settled,
                        }
                    }
                    if decided == total {
                        return Ok(None);
                    }
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tap::{Tap, TapCallback, TapOptions};
    use std::sync::{Arc, Mutex};

    fn recording_tap(
        name: &str,
        log: &Arc<Mutex<Vec<String>>>,
        result: Option<u32>,
    ) -> Tap<u32, u32> {
        let log = Arc::clone(log);
        let label = name.to_owned();
        Tap::new(
            TapOptions::new(name),
            TapCallback::sync(move |_: &u32| {
                log.lock().unwrap().push(label.clone());
                Ok(result)
            }),
        )
    }

    #[test]
    fn test_series_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::new(
            &[
                recording_tap("first", &log, None),
                recording_tap("second", &log, Some(1)),
                recording_tap("third", &log, None),
            ],
            &[],
        );
        Series.dispatch_sync(&dispatcher, &0).unwrap();
        assert_eq!(*log.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn test_bail_stops_on_defined_result() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::new(
            &[
                recording_tap("first", &log, None),
                recording_tap("second", &log, Some(42)),
                recording_tap("third", &log, None),
            ],
            &[],
        );
        let won = SeriesBail.dispatch_sync(&dispatcher, &0).unwrap();
        assert_eq!(won, Some(42));
        assert_eq!(*log.lock().unwrap(), ["first", "second"]);
    }

    #[test]
    fn test_waterfall_threads_values() {
        let double = Tap::new(
            TapOptions::new("double"),
            TapCallback::sync(|value: &u32| Ok(Some(value * 2))),
        );
        let pass = Tap::new(
            TapOptions::new("pass"),
            TapCallback::sync(|_: &u32| Ok(None)),
        );
        let add_one = Tap::new(
            TapOptions::new("add_one"),
            TapCallback::sync(|value: &u32| Ok(Some(value + 1))),
        );
        let dispatcher = Dispatcher::new(&[double, pass, add_one], &[]);
        assert_eq!(Waterfall.dispatch_sync(&dispatcher, &10).unwrap(), 21);
    }

    #[test]
    fn test_abstract_fails_dispatch() {
        let dispatcher = Dispatcher::<u32, u32>::new(&[], &[]);
        let err = Abstract.dispatch_sync(&dispatcher, &0).unwrap_err();
        assert!(matches!(err, HookError::Abstract));
        assert_eq!(err.to_string(), "abstract: should be overridden");
    }

    #[tokio::test]
    async fn test_parallel_bail_prefers_tap_order() {
        // The first tap resolves later than the second; the second tap's
        // defined result must still wait for the first slot to decide.
        let slow_none = Tap::new(
            TapOptions::new("slow_none"),
            TapCallback::future(|_: &u32| {
                Box::pin(async {
                    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                    Ok(None)
                })
            }),
        );
        let fast_some = Tap::new(
            TapOptions::new("fast_some"),
            TapCallback::future(|_: &u32| Box::pin(async { Ok(Some(7)) })),
        );
        let dispatcher = Dispatcher::new(&[slow_none, fast_some], &[]);
        assert_eq!(ParallelBail.dispatch(&dispatcher, &0).await.unwrap(), Some(7));
    }
}
