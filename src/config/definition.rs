//! Declarative, serde-loadable machine definitions.
//!
//! A [`MachineDefinition`] describes states and transitions as data (JSON or
//! any serde format). Actions and guards are referenced by name and bound to
//! functions through an [`Implementations`] registry when the definition is
//! turned into a [`MachineConfig`].
//!
//! ```rust
//! use machina::config::{Implementations, MachineDefinition};
//! use serde_json::{json, Map, Value};
//!
//! let definition = MachineDefinition::from_json(r#"{
//!     "initial": "idle",
//!     "context": { "runs": 0 },
//!     "states": {
//!         "idle": { "on": { "START": { "target": "running", "actions": ["count"] } } },
//!         "running": { "on": { "STOP": "idle" } }
//!     }
//! }"#).unwrap();
//!
//! let implementations = Implementations::<Map<String, Value>>::new().action("count", |ctx, _| {
//!     let runs = ctx.get("runs").and_then(Value::as_u64).unwrap_or(0);
//!     let mut patch = Map::new();
//!     patch.insert("runs".to_string(), json!(runs + 1));
//!     Some(patch)
//! });
//!
//! let config = definition.into_config(&implementations).unwrap();
//! assert_eq!(config.initial(), "idle");
//! assert_eq!(config.context().get("runs"), Some(&json!(0)));
//! ```

use crate::builder::{BuildError, ConfigViolation, MachineBuilder};
use crate::config::{MachineConfig, StateNode, Transition};
use crate::core::{Action, Context, Guard};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;

/// Declarative description of a machine keyed by string identifiers.
///
/// A state name repeated in the source document is kept once (last
/// declaration wins) and reported as [`ConfigViolation::DuplicateState`] by
/// [`into_config`](Self::into_config). Repeated event names within a state
/// are reported as [`ConfigViolation::DuplicateEvent`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMachineDefinition")]
pub struct MachineDefinition {
    /// Name of the starting state.
    pub initial: String,
    /// Initial context, decoded into the machine's context type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    /// State definitions by name.
    pub states: BTreeMap<String, StateDefinition>,
    /// Keep this many transitions in each machine's history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<usize>,
    #[serde(skip)]
    repeated_states: Vec<String>,
}

/// Declarative description of one state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStateDefinition")]
pub struct StateDefinition {
    /// Transitions by event name.
    #[serde(default)]
    pub on: BTreeMap<String, TransitionDefinition>,
    /// Names of actions run on entry.
    #[serde(default)]
    pub entry: Vec<String>,
    /// Names of actions run on exit.
    #[serde(default)]
    pub exit: Vec<String>,
    #[serde(skip)]
    repeated_events: Vec<String>,
}

#[derive(Deserialize)]
struct RawMachineDefinition {
    initial: String,
    #[serde(default)]
    context: Option<serde_json::Value>,
    states: Declared<StateDefinition>,
    #[serde(default)]
    history: Option<usize>,
}

impl From<RawMachineDefinition> for MachineDefinition {
    fn from(raw: RawMachineDefinition) -> Self {
        Self {
            initial: raw.initial,
            context: raw.context,
            states: raw.states.entries,
            history: raw.history,
            repeated_states: raw.states.repeated,
        }
    }
}

#[derive(Deserialize)]
struct RawStateDefinition {
    #[serde(default)]
    on: Declared<TransitionDefinition>,
    #[serde(default)]
    entry: Vec<String>,
    #[serde(default)]
    exit: Vec<String>,
}

impl From<RawStateDefinition> for StateDefinition {
    fn from(raw: RawStateDefinition) -> Self {
        Self {
            on: raw.on.entries,
            entry: raw.entry,
            exit: raw.exit,
            repeated_events: raw.on.repeated,
        }
    }
}

/// A string-keyed map that remembers which keys appeared more than once.
struct Declared<V> {
    entries: BTreeMap<String, V>,
    repeated: Vec<String>,
}

impl<V> Default for Declared<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            repeated: Vec::new(),
        }
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Declared<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DeclaredVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for DeclaredVisitor<V> {
            type Value = Declared<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut declared = Declared::default();
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    if declared.entries.insert(key.clone(), value).is_some() {
                        declared.repeated.push(key);
                    }
                }
                Ok(declared)
            }
        }

        deserializer.deserialize_map(DeclaredVisitor(PhantomData))
    }
}

/// Either a bare target state name or a full descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionDefinition {
    Target(String),
    Full {
        target: String,
        #[serde(default)]
        actions: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cond: Option<String>,
    },
}

/// Named actions and guards a [`MachineDefinition`] can refer to.
pub struct Implementations<C: Context, P = ()> {
    actions: HashMap<String, Action<C, P>>,
    guards: HashMap<String, Guard<C, P>>,
}

impl<C: Context, P> Implementations<C, P> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            guards: HashMap::new(),
        }
    }

    /// Register an action under `name`.
    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&C, Option<&P>) -> Option<C::Patch> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Action::new(action));
        self
    }

    /// Register a guard under `name`.
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, Option<&P>) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    fn resolve_actions(
        &self,
        state: &str,
        names: &[String],
        violations: &mut Vec<ConfigViolation>,
    ) -> Vec<Action<C, P>> {
        names
            .iter()
            .filter_map(|name| {
                let action = self.actions.get(name).cloned();
                if action.is_none() {
                    violations.push(ConfigViolation::UnknownAction {
                        state: state.to_string(),
                        name: name.clone(),
                    });
                }
                action
            })
            .collect()
    }
}

impl<C: Context, P> Default for Implementations<C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Context, P> fmt::Debug for Implementations<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions.keys().collect();
        actions.sort();
        let mut guards: Vec<_> = self.guards.keys().collect();
        guards.sort();
        f.debug_struct("Implementations")
            .field("actions", &actions)
            .field("guards", &guards)
            .finish()
    }
}

impl MachineDefinition {
    /// Parse a definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        serde_json::from_str(json).map_err(BuildError::Definition)
    }

    /// Bind named actions and guards and validate the result.
    ///
    /// Unknown names are reported alongside structural problems in a single
    /// [`BuildError::Invalid`].
    pub fn into_config<C, P>(
        self,
        implementations: &Implementations<C, P>,
    ) -> Result<MachineConfig<String, String, C, P>, BuildError>
    where
        C: Context + DeserializeOwned,
    {
        let mut violations: Vec<ConfigViolation> = self
            .repeated_states
            .into_iter()
            .map(|state| ConfigViolation::DuplicateState { state })
            .collect();
        let mut builder = MachineBuilder::new().initial(self.initial);

        if let Some(context) = self.context {
            let context: C = serde_json::from_value(context).map_err(BuildError::Context)?;
            builder = builder.context(context);
        }
        if let Some(limit) = self.history {
            builder = builder.record_history(limit);
        }

        for (name, definition) in self.states {
            let node = definition.into_node(&name, implementations, &mut violations);
            builder = builder.state(name, node);
        }

        builder.build_with(violations)
    }
}

impl StateDefinition {
    fn into_node<C: Context, P>(
        self,
        state: &str,
        implementations: &Implementations<C, P>,
        violations: &mut Vec<ConfigViolation>,
    ) -> StateNode<String, String, C, P> {
        violations.extend(self.repeated_events.into_iter().map(|event| {
            ConfigViolation::DuplicateEvent {
                state: state.to_string(),
                event,
            }
        }));

        let mut node = StateNode::new();

        for action in implementations.resolve_actions(state, &self.entry, violations) {
            node = node.entry_action(action);
        }
        for action in implementations.resolve_actions(state, &self.exit, violations) {
            node = node.exit_action(action);
        }

        for (event, definition) in self.on {
            let transition = match definition {
                TransitionDefinition::Target(target) => Transition::Target(target),
                TransitionDefinition::Full {
                    target,
                    actions,
                    cond,
                } => {
                    let actions = implementations.resolve_actions(state, &actions, violations);
                    let cond = cond.and_then(|name| {
                        let guard = implementations.guards.get(&name).cloned();
                        if guard.is_none() {
                            violations.push(ConfigViolation::UnknownGuard {
                                state: state.to_string(),
                                event: event.clone(),
                                name,
                            });
                        }
                        guard
                    });
                    Transition::Full {
                        target,
                        actions,
                        cond,
                    }
                }
            };
            node = node.on(event, transition);
        }

        node
    }
}
