//! Builder for constructing machine configurations.

use crate::builder::error::{BuildError, ConfigViolation};
use crate::config::validate::{collect_violations, validate_structure};
use crate::config::{MachineConfig, StateNode};
use crate::core::{Context, Event, State};
use std::collections::HashMap;

/// Builder for machine configurations with a fluent API.
///
/// # Example
///
/// ```rust
/// use machina::builder::MachineBuilder;
/// use machina::config::StateNode;
///
/// let config = MachineBuilder::<String, String, ()>::new()
///     .initial("idle")
///     .state("idle", StateNode::new().on("START", "running"))
///     .state("running", StateNode::new().on("STOP", "idle"))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.initial(), "idle");
/// ```
pub struct MachineBuilder<S, E, C: Context, P = ()> {
    initial: Option<S>,
    context: Option<C>,
    states: HashMap<S, StateNode<S, E, C, P>>,
    duplicate_states: Vec<S>,
    history_limit: Option<usize>,
}

impl<S: State, E: Event, C: Context, P> MachineBuilder<S, E, C, P> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            context: None,
            states: HashMap::new(),
            duplicate_states: Vec::new(),
            history_limit: None,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<S>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Set the initial context. Defaults to `C::default()`.
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Define a state.
    pub fn state(mut self, id: impl Into<S>, node: StateNode<S, E, C, P>) -> Self {
        let id = id.into();
        if self.states.contains_key(&id) {
            self.duplicate_states.push(id.clone());
        }
        self.states.insert(id, node);
        self
    }

    /// Define several states at once.
    pub fn states<I, K>(self, states: I) -> Self
    where
        I: IntoIterator<Item = (K, StateNode<S, E, C, P>)>,
        K: Into<S>,
    {
        states
            .into_iter()
            .fold(self, |builder, (id, node)| builder.state(id, node))
    }

    /// Keep the most recent `limit` transitions in each machine's history.
    pub fn record_history(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Validate and build the configuration.
    ///
    /// All structural problems are reported together in
    /// [`BuildError::Invalid`].
    pub fn build(self) -> Result<MachineConfig<S, E, C, P>, BuildError> {
        self.build_with(Vec::new())
    }

    /// Build, failing if `prior` (problems found before structural checks)
    /// is non-empty.
    pub(crate) fn build_with(
        self,
        prior: Vec<ConfigViolation>,
    ) -> Result<MachineConfig<S, E, C, P>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let checked = validate_structure(&initial, &self.states, &self.duplicate_states);
        if !prior.is_empty() || checked.is_failure() {
            return Err(BuildError::Invalid {
                violations: collect_violations(prior, checked),
            });
        }

        Ok(MachineConfig {
            initial,
            context: self.context.unwrap_or_default(),
            states: self.states,
            history_limit: self.history_limit,
        })
    }
}

impl<S: State, E: Event, C: Context, P> Default for MachineBuilder<S, E, C, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    type Ctx = BTreeMap<String, i32>;
    type Builder = MachineBuilder<String, String, Ctx>;
    type Node = StateNode<String, String, Ctx>;

    #[test]
    fn builder_requires_initial_state() {
        let result = Builder::new().state("idle", Node::new()).build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_states() {
        let result = Builder::new().initial("idle").build();

        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn context_defaults_to_empty() {
        let config = Builder::new()
            .initial("idle")
            .state("idle", Node::new())
            .build()
            .unwrap();

        assert!(config.context().is_empty());
        assert_eq!(config.history_limit(), None);
    }

    #[test]
    fn fluent_api_builds_config() {
        let config = Builder::new()
            .initial("idle")
            .context(Ctx::from([("count".to_string(), 3)]))
            .states([
                ("idle", Node::new().on("START", "running")),
                ("running", Node::new().on("STOP", "idle")),
            ])
            .record_history(10)
            .build()
            .unwrap();

        assert_eq!(config.initial(), "idle");
        assert_eq!(config.context()["count"], 3);
        assert_eq!(config.state_ids(), vec!["idle", "running"]);
        assert!(config.contains_state(&"running".to_string()));
        assert_eq!(config.history_limit(), Some(10));
    }

    #[test]
    fn unknown_initial_state_fails_fast() {
        let result = Builder::new()
            .initial("nowhere")
            .state("idle", Node::new())
            .build();

        let error = result.unwrap_err();
        assert_eq!(
            error.violations(),
            [ConfigViolation::UnknownInitialState {
                initial: "nowhere".to_string()
            }]
        );
    }

    #[test]
    fn unknown_targets_are_all_reported() {
        let result = Builder::new()
            .initial("a")
            .state("a", Node::new().on("X", "missing1"))
            .state("b", Node::new().on("Y", "missing2"))
            .build();

        let error = result.unwrap_err();
        assert_eq!(error.violations().len(), 2);
        assert!(error
            .violations()
            .iter()
            .all(|v| matches!(v, ConfigViolation::UnknownTarget { .. })));
    }

    #[test]
    fn redefining_a_state_is_reported() {
        let result = Builder::new()
            .initial("a")
            .state("a", Node::new())
            .state("a", Node::new())
            .build();

        assert!(matches!(
            result.unwrap_err().violations(),
            [ConfigViolation::DuplicateState { .. }]
        ));
    }
}
