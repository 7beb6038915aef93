//! The conventional hook flavors.
//!
//! A flavor is nothing more than [`Hook`] with its orchestration strategy
//! fixed; these aliases give the common combinations their established
//! names. The `Sync*` and `Async*` pairs share a strategy - the names
//! document the intended tap mix: `Sync*` hooks are meant to carry only sync
//! taps so they can be driven with `call`, while `Async*` hooks mix in
//! callback and future taps and are driven with `call_async` / `call_with`.
//! A `Sync*` hook remains perfectly valid to drive asynchronously.

use tapline_core::{Hook, Looping, Parallel, ParallelBail, Series, SeriesBail, Waterfall};

/// Sync taps in order; results discarded.
///
/// ```rust,ignore
/// let mut environment: SyncHook<Env> = SyncHook::new(&["env"]);
/// environment.tap("defaults", |env| { env.apply_defaults(); Ok(None) });
/// environment.call(&env)?;
/// ```
pub type SyncHook<T, R = ()> = Hook<T, R, Series>;

/// Sync taps in order; the first defined result wins and the remaining taps
/// never run.
pub type SyncBailHook<T, R> = Hook<T, R, SeriesBail>;

/// Sync taps in order; each defined result becomes the next tap's input and
/// the final value is returned.
pub type SyncWaterfallHook<T> = Hook<T, T, Waterfall>;

/// Sync taps rerun from the top whenever any tap produces a defined result.
pub type SyncLoopHook<T, R = ()> = Hook<T, R, Looping>;

/// Taps of any kind in order; results discarded.
pub type AsyncSeriesHook<T, R = ()> = Hook<T, R, Series>;

/// Taps of any kind in order; the first defined result wins.
pub type AsyncSeriesBailHook<T, R> = Hook<T, R, SeriesBail>;

/// Taps of any kind in order; defined results thread forward.
pub type AsyncSeriesWaterfallHook<T> = Hook<T, T, Waterfall>;

/// Taps of any kind rerun from the top whenever any tap produces a defined
/// result.
pub type AsyncSeriesLoopHook<T, R = ()> = Hook<T, R, Looping>;

/// Taps of any kind launched together; completes when the last one does, or
/// immediately on the first failure.
pub type AsyncParallelHook<T, R = ()> = Hook<T, R, Parallel>;

/// Taps of any kind launched together; resolves with the first decided
/// outcome in tap order.
pub type AsyncParallelBailHook<T, R> = Hook<T, R, ParallelBail>;
