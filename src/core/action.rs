//! Context-updating actions.

use crate::core::context::Context;
use std::fmt;
use std::sync::Arc;

/// Function run on a transition, or on entering or leaving a state.
///
/// An action receives the running context snapshot and the event payload and
/// returns an optional patch. `None` leaves the snapshot untouched.
///
/// # Example
///
/// ```rust
/// use machina::core::Action;
/// use std::collections::HashMap;
///
/// let mark = Action::new(|_ctx: &HashMap<String, i32>, _payload: Option<&()>| {
///     Some(HashMap::from([("marked".to_string(), 1)]))
/// });
///
/// let mut ctx = HashMap::new();
/// mark.apply(&mut ctx, None);
/// assert_eq!(ctx.get("marked"), Some(&1));
/// ```
pub struct Action<C: Context, P> {
    run: Arc<dyn Fn(&C, Option<&P>) -> Option<C::Patch> + Send + Sync>,
}

impl<C: Context, P> Action<C, P> {
    /// Wrap a function as an action.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(&C, Option<&P>) -> Option<C::Patch> + Send + Sync + 'static,
    {
        Self { run: Arc::new(run) }
    }

    /// Compute this action's patch without applying it.
    pub fn evaluate(&self, context: &C, payload: Option<&P>) -> Option<C::Patch> {
        (self.run)(context, payload)
    }

    /// Run the action and merge its patch into `context`.
    pub fn apply(&self, context: &mut C, payload: Option<&P>) {
        if let Some(patch) = self.evaluate(context, payload) {
            context.merge(patch);
        }
    }
}

impl<C: Context, P> Clone for Action<C, P> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<C: Context, P> fmt::Debug for Action<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Apply `actions` in order against the same running snapshot.
pub(crate) fn apply_all<'a, C, P>(
    actions: impl IntoIterator<Item = &'a Action<C, P>>,
    context: &mut C,
    payload: Option<&P>,
) where
    C: Context + 'a,
    P: 'a,
{
    for action in actions {
        action.apply(context, payload);
    }
}
