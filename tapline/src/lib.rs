//! # tapline - Pluggable Hook System
//!
//! `tapline` lets a host expose named extension points ("hooks") that third
//! parties attach callbacks ("taps") to, and invokes all attached taps under
//! a chosen orchestration: series, looping, or parallel, with bail and
//! waterfall variants, through sync, callback, or future calling
//! conventions.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tapline::{SyncBailHook, TapOptions};
//!
//! struct Request { path: String }
//!
//! let mut resolve: SyncBailHook<Request, String> = SyncBailHook::new(&["request"]);
//!
//! // Plugins tap in, with ordering hints when they care.
//! resolve.tap("alias", |req| Ok(aliases.get(&req.path).cloned()));
//! resolve.tap(TapOptions::new("fs").stage(10), |req| Ok(Some(read(&req.path)?)));
//!
//! // The host invokes; the first tap producing a value wins.
//! let resolved = resolve.call(&request)?;
//! ```
//!
//! Hooks compile their tap list into an immutable dispatcher on first
//! invocation and recompile lazily after every registration, so steady-state
//! dispatch pays no bookkeeping. See [`Hook`] for the full model.

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

// ============================================================================
// Core Types & Traits (from tapline-core)
// ============================================================================
pub use tapline_core::{
    // Strategies
    Abstract,
    // Error
    BoxError,
    BoxTapFuture,
    // Context
    Context,
    // Dispatch
    Dispatcher,
    Done,
    // Hook
    Hook,
    HookError,
    // Interceptors
    Interceptor,
    InterceptorBuilder,
    Looping,
    Orchestration,
    Parallel,
    ParallelBail,
    Payload,
    Series,
    SeriesBail,
    // Taps
    Tap,
    TapCallback,
    TapKind,
    TapOptions,
    TapOutcome,
    Waterfall,
    WithOptions,
};

// ============================================================================
// Standard Flavors (from tapline-std)
// ============================================================================
pub use tapline_std::flavors::{
    AsyncParallelBailHook, AsyncParallelHook, AsyncSeriesBailHook, AsyncSeriesHook,
    AsyncSeriesLoopHook, AsyncSeriesWaterfallHook, SyncBailHook, SyncHook, SyncLoopHook,
    SyncWaterfallHook,
};

// ============================================================================
// Helpers
// ============================================================================
pub use tapline_std::hook_map::HookMap;
pub use tapline_std::logging::logging_interceptor;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports, clippy::pub_use)]
    pub use tapline_std::testing::*;
}
