use thiserror::Error;

/// Errors surfaced by the input-injection primitives.
///
/// Everything else on the public surface fails with `bool`/`Option`; the
/// queues get a typed error so ISR shims can count dropped samples.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The bounded event queue is saturated; the event was dropped.
    #[error("input queue full, event dropped")]
    QueueFull,
}
