//! Transition descriptors.

use crate::core::{Action, Context, Guard};
use std::fmt;

/// Where an event leads, and what happens on the way.
///
/// `Target` is the shorthand form: move to a state with no guard and no
/// actions. `Full` carries an ordered action list and an optional guard.
///
/// # Example
///
/// ```rust
/// use machina::config::Transition;
/// use std::collections::HashMap;
///
/// type Ctx = HashMap<String, i64>;
///
/// let shorthand = Transition::<String, Ctx>::to("running");
/// assert!(shorthand.is_shorthand());
///
/// let guarded = Transition::<String, Ctx>::to("running")
///     .when(|ctx, _| ctx.get("fuel").copied().unwrap_or(0) > 0)
///     .action(|_, _| Some(HashMap::from([("started".to_string(), 1)])));
/// assert!(!guarded.is_shorthand());
/// assert_eq!(guarded.actions().len(), 1);
/// ```
pub enum Transition<S, C: Context, P = ()> {
    /// Move to the target state with no guard and no actions.
    Target(S),
    /// Guarded transition with actions.
    Full {
        target: S,
        actions: Vec<Action<C, P>>,
        cond: Option<Guard<C, P>>,
    },
}

impl<S, C: Context, P> Transition<S, C, P> {
    /// Shorthand transition to `target`.
    pub fn to(target: impl Into<S>) -> Self {
        Transition::Target(target.into())
    }

    /// Append an action run when this transition is taken.
    pub fn action<F>(self, action: F) -> Self
    where
        F: Fn(&C, Option<&P>) -> Option<C::Patch> + Send + Sync + 'static,
    {
        self.with_action(Action::new(action))
    }

    /// Append a pre-built action.
    pub fn with_action(self, action: Action<C, P>) -> Self {
        let (target, mut actions, cond) = self.into_parts();
        actions.push(action);
        Transition::Full {
            target,
            actions,
            cond,
        }
    }

    /// Guard this transition with a predicate.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&C, Option<&P>) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Guard this transition, replacing any previous guard.
    pub fn guard(self, guard: Guard<C, P>) -> Self {
        let (target, actions, _) = self.into_parts();
        Transition::Full {
            target,
            actions,
            cond: Some(guard),
        }
    }

    /// The state this transition leads to.
    pub fn target(&self) -> &S {
        match self {
            Transition::Target(target) => target,
            Transition::Full { target, .. } => target,
        }
    }

    /// Actions run when the transition is taken; empty for shorthand.
    pub fn actions(&self) -> &[Action<C, P>] {
        match self {
            Transition::Target(_) => &[],
            Transition::Full { actions, .. } => actions,
        }
    }

    /// The guard, if any.
    pub fn cond(&self) -> Option<&Guard<C, P>> {
        match self {
            Transition::Target(_) => None,
            Transition::Full { cond, .. } => cond.as_ref(),
        }
    }

    /// Whether this is the bare target form.
    pub fn is_shorthand(&self) -> bool {
        matches!(self, Transition::Target(_))
    }

    /// Whether the guard (if any) admits this context and payload.
    pub fn admits(&self, context: &C, payload: Option<&P>) -> bool {
        self.cond().is_none_or(|cond| cond.check(context, payload))
    }

    fn into_parts(self) -> (S, Vec<Action<C, P>>, Option<Guard<C, P>>) {
        match self {
            Transition::Target(target) => (target, Vec::new(), None),
            Transition::Full {
                target,
                actions,
                cond,
            } => (target, actions, cond),
        }
    }
}

impl<S, C: Context, P> From<S> for Transition<S, C, P> {
    fn from(target: S) -> Self {
        Transition::Target(target)
    }
}

impl<C: Context, P> From<&str> for Transition<String, C, P> {
    fn from(target: &str) -> Self {
        Transition::Target(target.to_string())
    }
}

impl<S: Clone, C: Context, P> Clone for Transition<S, C, P> {
    fn clone(&self) -> Self {
        match self {
            Transition::Target(target) => Transition::Target(target.clone()),
            Transition::Full {
                target,
                actions,
                cond,
            } => Transition::Full {
                target: target.clone(),
                actions: actions.clone(),
                cond: cond.clone(),
            },
        }
    }
}

impl<S: fmt::Debug, C: Context, P> fmt::Debug for Transition<S, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Target(target) => f.debug_tuple("Target").field(target).finish(),
            Transition::Full {
                target,
                actions,
                cond,
            } => f
                .debug_struct("Full")
                .field("target", target)
                .field("actions", &actions.len())
                .field("guarded", &cond.is_some())
                .finish(),
        }
    }
}
