//! Machine configuration.
//!
//! A [`MachineConfig`] is the immutable description a [`Machine`] runs
//! against: the initial state and context, and a table of [`StateNode`]s
//! whose [`Transition`]s are keyed by event. Configurations can only be
//! obtained through [`MachineBuilder`] or [`MachineDefinition`], both of which
//! validate the structure first, so a `MachineConfig` always has a defined
//! initial state and only targets defined states.
//!
//! [`Machine`]: crate::runtime::Machine
//! [`MachineBuilder`]: crate::builder::MachineBuilder

mod definition;
mod node;
mod transition;
pub(crate) mod validate;

pub use definition::{Implementations, MachineDefinition, StateDefinition, TransitionDefinition};
pub use node::StateNode;
pub use transition::Transition;

use crate::builder::MachineBuilder;
use crate::core::{Context, Event, State};
use std::collections::HashMap;
use std::fmt;

/// Validated, immutable machine configuration.
pub struct MachineConfig<S, E, C: Context, P = ()> {
    pub(crate) initial: S,
    pub(crate) context: C,
    pub(crate) states: HashMap<S, StateNode<S, E, C, P>>,
    pub(crate) history_limit: Option<usize>,
}

impl<S: State, E: Event, C: Context, P> MachineConfig<S, E, C, P> {
    /// Start building a configuration.
    pub fn builder() -> MachineBuilder<S, E, C, P> {
        MachineBuilder::new()
    }

    /// The state a new machine starts in.
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// The context a new machine starts with.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Definition of `state`, if it exists.
    pub fn state(&self, state: &S) -> Option<&StateNode<S, E, C, P>> {
        self.states.get(state)
    }

    /// Whether `state` is defined.
    pub fn contains_state(&self, state: &S) -> bool {
        self.states.contains_key(state)
    }

    /// All defined states, sorted by name.
    pub fn state_ids(&self) -> Vec<&S> {
        let mut ids: Vec<&S> = self.states.keys().collect();
        ids.sort_by(|a, b| a.name().cmp(b.name()));
        ids
    }

    /// How many transitions a machine keeps in its history; `None` when
    /// history is not recorded.
    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }
}

impl<S: State, E: Event, C: Context, P> fmt::Debug for MachineConfig<S, E, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineConfig")
            .field("initial", &self.initial)
            .field("context", &self.context)
            .field("states", &self.state_ids())
            .field("history_limit", &self.history_limit)
            .finish()
    }
}
