//! Logging interceptor for hook observation.

use std::fmt::Debug;
use tapline_core::{Interceptor, Payload};

/// An interceptor that logs every invocation of a hook and each tap as it
/// runs.
///
/// `hook` names the hook in the emitted events. Emits through `tracing` when
/// the `tracing` feature is enabled and is silent otherwise.
pub fn logging_interceptor<T, R>(hook: &'static str) -> Interceptor<T, R>
where
    T: Payload + Debug,
    R: Payload,
{
    #[cfg(not(feature = "tracing"))]
    let _ = hook;

    Interceptor::builder()
        .on_call(move |input: &T| {
            #[cfg(feature = "tracing")]
            {
                tracing::debug!(hook, ?input, "dispatching hook");
            }
            #[cfg(not(feature = "tracing"))]
            {
                let _ = input; // Suppress unused warning
            }
        })
        .on_tap(move |tap| {
            #[cfg(feature = "tracing")]
            {
                tracing::trace!(hook, tap = %tap.name, kind = %tap.kind(), "running tap");
            }
            #[cfg(not(feature = "tracing"))]
            {
                let _ = tap;
            }
        })
        .build()
}
