//! # tapline-core
//!
//! Core of the tapline hook system.
//!
//! This crate provides the two tightly coupled subsystems everything else is
//! built from:
//!
//! - The **hook registry** ([`Hook`]): an ordered collection of tap
//!   descriptors with deterministic insertion driven by `before`/`stage`
//!   hints, plus an interceptor pipeline that may rewrite descriptors at
//!   registration and observe invocation.
//! - The **dispatcher factory** ([`Dispatcher`] + [`Orchestration`]): on the
//!   first invocation after any mutation, the hook snapshots its taps and
//!   interceptors into an immutable dispatcher, which the orchestration
//!   strategy then drives under one of three calling conventions (`call`,
//!   `call_with`, `call_async`).
//!
//! This crate has a minimal dependency surface and is designed to be
//! imported by plugins that don't need the full `tapline-std` flavor set.

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod dispatcher;
mod error;
mod hook;
mod interceptor;
mod orchestration;
mod payload;
mod tap;

// Re-exports
pub use context::Context;
pub use dispatcher::Dispatcher;
pub use error::{BoxError, HookError};
pub use hook::{Hook, WithOptions};
pub use interceptor::{Interceptor, InterceptorBuilder};
pub use orchestration::{
    Abstract, Looping, Orchestration, Parallel, ParallelBail, Series, SeriesBail, Waterfall,
};
pub use payload::Payload;
pub use tap::{BoxTapFuture, Done, Tap, TapCallback, TapKind, TapOptions, TapOutcome};
