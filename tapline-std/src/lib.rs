//! # tapline-std
//!
//! Standard derivations for the tapline hook system.
//!
//! This crate provides:
//!
//! ## Flavors
//!
//! The conventional hook aliases over [`tapline_core::Hook`]: series, bail,
//! waterfall, loop, and parallel orchestrations in their sync and async
//! spellings. See [`flavors`].
//!
//! ## Helpers
//!
//! - [`hook_map::HookMap`] - lazily-populating keyed hook collections
//! - [`logging::logging_interceptor`] - trace hook invocations and taps
//! - [`testing`] - recorders and counters for asserting hook behavior
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tapline_std::flavors::{AsyncParallelHook, SyncBailHook};
//!
//! let mut resolve: SyncBailHook<Request, Response> = SyncBailHook::new(&["request"]);
//! resolve.tap("cache", |request| Ok(cache.lookup(request)));
//!
//! let mut flush: AsyncParallelHook<Batch> = AsyncParallelHook::new(&["batch"]);
//! flush.tap_async("s3", |batch| Box::pin(async move { upload(batch).await }));
//! ```

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core
pub use tapline_core;

// Modules
pub mod flavors;
pub mod hook_map;
pub mod logging;
pub mod testing;
