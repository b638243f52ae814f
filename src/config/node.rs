//! Per-state definitions.

use crate::config::transition::Transition;
use crate::core::{Action, Context, Event};
use std::collections::HashMap;
use std::fmt;

/// Definition of a single state: its outgoing transitions and the actions
/// run when the state is entered or left.
///
/// # Example
///
/// ```rust
/// use machina::config::StateNode;
/// use std::collections::HashMap;
///
/// type Ctx = HashMap<String, u64>;
///
/// let running = StateNode::<String, String, Ctx>::new()
///     .on("STOP", "idle")
///     .on("PAUSE", "paused")
///     .exit(|_, _| Some(HashMap::from([("stopped_at".to_string(), 42)])));
///
/// assert!(running.transition(&"STOP".to_string()).is_some());
/// assert_eq!(running.exit_actions().len(), 1);
/// ```
pub struct StateNode<S, E, C: Context, P = ()> {
    on: HashMap<E, Transition<S, C, P>>,
    entry: Vec<Action<C, P>>,
    exit: Vec<Action<C, P>>,
    duplicate_events: Vec<E>,
}

impl<S, E: Event, C: Context, P> StateNode<S, E, C, P> {
    /// A state with no transitions and no entry/exit actions.
    pub fn new() -> Self {
        Self {
            on: HashMap::new(),
            entry: Vec::new(),
            exit: Vec::new(),
            duplicate_events: Vec::new(),
        }
    }

    /// Handle `event` with `transition`.
    ///
    /// Declaring the same event twice is reported when the machine is built.
    pub fn on(mut self, event: impl Into<E>, transition: impl Into<Transition<S, C, P>>) -> Self {
        let event = event.into();
        if self.on.contains_key(&event) {
            self.duplicate_events.push(event.clone());
        }
        self.on.insert(event, transition.into());
        self
    }

    /// Append an action run whenever this state is entered.
    pub fn entry<F>(self, action: F) -> Self
    where
        F: Fn(&C, Option<&P>) -> Option<C::Patch> + Send + Sync + 'static,
    {
        self.entry_action(Action::new(action))
    }

    /// Append a pre-built entry action.
    pub fn entry_action(mut self, action: Action<C, P>) -> Self {
        self.entry.push(action);
        self
    }

    /// Append an action run whenever this state is left.
    pub fn exit<F>(self, action: F) -> Self
    where
        F: Fn(&C, Option<&P>) -> Option<C::Patch> + Send + Sync + 'static,
    {
        self.exit_action(Action::new(action))
    }

    /// Append a pre-built exit action.
    pub fn exit_action(mut self, action: Action<C, P>) -> Self {
        self.exit.push(action);
        self
    }

    /// The transition registered for `event`, if any.
    pub fn transition(&self, event: &E) -> Option<&Transition<S, C, P>> {
        self.on.get(event)
    }

    /// All `(event, transition)` pairs, sorted by event name.
    pub fn transitions(&self) -> Vec<(&E, &Transition<S, C, P>)> {
        let mut pairs: Vec<_> = self.on.iter().collect();
        pairs.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));
        pairs
    }

    /// Entry actions in declaration order.
    pub fn entry_actions(&self) -> &[Action<C, P>] {
        &self.entry
    }

    /// Exit actions in declaration order.
    pub fn exit_actions(&self) -> &[Action<C, P>] {
        &self.exit
    }

    pub(crate) fn duplicate_events(&self) -> &[E] {
        &self.duplicate_events
    }
}

impl<S, E: Event, C: Context, P> Default for StateNode<S, E, C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone, E: Clone, C: Context, P> Clone for StateNode<S, E, C, P> {
    fn clone(&self) -> Self {
        Self {
            on: self.on.clone(),
            entry: self.entry.clone(),
            exit: self.exit.clone(),
            duplicate_events: self.duplicate_events.clone(),
        }
    }
}

impl<S: fmt::Debug, E: fmt::Debug, C: Context, P> fmt::Debug for StateNode<S, E, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("on", &self.on)
            .field("entry", &self.entry.len())
            .field("exit", &self.exit.len())
            .finish()
    }
}
