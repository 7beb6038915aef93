//! Payload marker for hook inputs and results.

/// A marker trait for values that flow through hooks.
///
/// Both the input type `T` and the result type `R` of a hook must be
/// `Send + Sync + 'static` so dispatch is safe across async boundaries.
/// The trait is blanket-implemented; there is nothing to implement by hand.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot flow through a hook",
    label = "must be `Send + Sync + 'static`",
    note = "Hook inputs and results must be thread-safe and static."
)]
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}
