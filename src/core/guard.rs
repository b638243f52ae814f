//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions of the current context and the event
//! payload. A guarded transition is taken only when its guard returns `true`.

use std::fmt;
use std::sync::Arc;

/// Pure predicate that determines if a transition can execute.
///
/// The payload is `None` when the event was sent without one.
///
/// # Example
///
/// ```rust
/// use machina::core::Guard;
///
/// #[derive(Clone, Debug, Default)]
/// struct Form {
///     attempts: u32,
/// }
///
/// let can_retry = Guard::new(|ctx: &Form, _payload: Option<&()>| ctx.attempts < 3);
///
/// assert!(can_retry.check(&Form { attempts: 0 }, None));
/// assert!(!can_retry.check(&Form { attempts: 3 }, None));
/// ```
pub struct Guard<C, P> {
    predicate: Arc<dyn Fn(&C, Option<&P>) -> bool + Send + Sync>,
}

impl<C, P> Guard<C, P> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no side effects) and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, Option<&P>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the guard against a context and optional payload.
    pub fn check(&self, context: &C, payload: Option<&P>) -> bool {
        (self.predicate)(context, payload)
    }
}

impl<C, P> Clone for Guard<C, P> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C, P> fmt::Debug for Guard<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
