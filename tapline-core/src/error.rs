//! Error types for tapline.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`HookError`] - Everything that can go wrong while dispatching a hook
//! - [`BoxError`] - The boxed error type tap callbacks report failures with

use crate::tap::TapKind;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by hook dispatch.
///
/// Registration-time usage errors (an empty tap name) are programmer
/// mistakes and panic instead; see [`Hook::tap`](crate::Hook::tap).
#[derive(Error, Debug)]
pub enum HookError {
    /// The hook was dispatched without an orchestration strategy.
    ///
    /// Produced by the [`Abstract`](crate::Abstract) placeholder strategy,
    /// which every hook starts from until a concrete strategy is chosen.
    #[error("abstract: should be overridden")]
    Abstract,

    /// A tap reported a failure.
    #[error("tap {tap:?} failed")]
    Tap {
        /// Name of the failing tap.
        tap: String,
        /// The error the tap reported.
        #[source]
        source: BoxError,
    },

    /// Synchronous dispatch reached a tap that needs to be awaited.
    ///
    /// `call` can only drive sync taps; callback and future taps require
    /// `call_async` or `call_with`.
    #[error("tap {tap:?} is a {kind} tap and cannot be driven synchronously")]
    NotSync {
        /// Name of the offending tap.
        tap: String,
        /// The tap's kind.
        kind: TapKind,
    },

    /// A callback tap dropped its completion handle without completing.
    #[error("callback tap {tap:?} dropped its completion handle without completing")]
    DroppedCompletion {
        /// Name of the offending tap.
        tap: String,
    },
}

impl HookError {
    /// Wrap a tap-reported error with the tap's name.
    pub(crate) fn tap(name: &str, source: BoxError) -> Self {
        HookError::Tap {
            tap: name.to_owned(),
            source,
        }
    }
}
