//! The machine handle: current state, context and event evaluation.

use crate::checkpoint::MachineMetadata;
use crate::config::MachineConfig;
use crate::core::{apply_all, Context, Event, State, StateHistory, StateTransition};
use crate::runtime::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::runtime::event::{EventInput, SendResult, TransitionError};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// Result of evaluating an event without committing it.
enum Evaluation<S, C> {
    Taken { target: S, context: C },
    Skipped(Diagnostic),
}

/// A running state machine.
///
/// `send` evaluates an event against the configuration and, when a
/// transition is taken, replaces state and context together. Evaluation
/// works on a copy of the context, so nothing is visible to the caller until
/// every action has run.
///
/// # Example
///
/// ```rust
/// use machina::config::StateNode;
/// use machina::runtime::Machine;
/// use machina::MachineConfig;
/// use std::collections::HashMap;
///
/// type Ctx = HashMap<String, u64>;
///
/// let config = MachineConfig::<String, String, Ctx>::builder()
///     .initial("idle")
///     .state("idle", StateNode::new().on("START", "running"))
///     .state(
///         "running",
///         StateNode::<String, String, Ctx>::new()
///             .on("STOP", "idle")
///             .exit(|_, _| Some(HashMap::from([("stopped_at".to_string(), 42)]))),
///     )
///     .build()
///     .unwrap();
///
/// let mut machine = Machine::new(config);
/// machine.send("START");
/// assert!(machine.matches("running"));
///
/// machine.send("STOP");
/// assert!(machine.matches("idle"));
/// assert_eq!(machine.context().get("stopped_at"), Some(&42));
/// ```
pub struct Machine<S: State, E: Event, C: Context, P = ()> {
    pub(crate) config: Arc<MachineConfig<S, E, C, P>>,
    pub(crate) current: S,
    pub(crate) context: C,
    pub(crate) history: StateHistory<S, E>,
    pub(crate) metadata: MachineMetadata,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<S: State, E: Event, C: Context, P> Machine<S, E, C, P> {
    /// Create a machine in the configuration's initial state and context.
    ///
    /// Entry actions of the initial state are not run.
    pub fn new(config: impl Into<Arc<MachineConfig<S, E, C, P>>>) -> Self {
        let config = config.into();
        let current = config.initial.clone();
        let context = config.context.clone();
        Self::from_parts(config, current, context, None, MachineMetadata::default())
    }

    pub(crate) fn from_parts(
        config: Arc<MachineConfig<S, E, C, P>>,
        current: S,
        context: C,
        history: Option<StateHistory<S, E>>,
        metadata: MachineMetadata,
    ) -> Self {
        let limit = config.history_limit.unwrap_or(0);
        let mut bounded = StateHistory::with_limit(limit);
        if let Some(history) = history {
            for transition in history.transitions() {
                bounded.push(transition.clone());
            }
        }
        Self {
            config,
            current,
            context,
            history: bounded,
            metadata,
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Replace the diagnostics sink (the default logs through `tracing`).
    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Arc::new(sink);
        self
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// Get current context (pure)
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Whether the current state equals `state` (pure).
    pub fn matches<Q>(&self, state: &Q) -> bool
    where
        Q: ?Sized,
        S: PartialEq<Q>,
    {
        self.current == *state
    }

    /// Check if machine is in a final state (pure)
    pub fn is_final(&self) -> bool {
        self.current.is_final()
    }

    /// The configuration this machine runs against.
    pub fn config(&self) -> &Arc<MachineConfig<S, E, C, P>> {
        &self.config
    }

    /// Recorded transitions; empty unless the configuration enables history.
    pub fn history(&self) -> &StateHistory<S, E> {
        &self.history
    }

    /// Creation time and transition count.
    pub fn metadata(&self) -> &MachineMetadata {
        &self.metadata
    }

    /// Whether sending `event` with `payload` would take a transition.
    ///
    /// Evaluates the guard only; no actions run.
    pub fn can(&self, event: &E, payload: Option<&P>) -> bool {
        self.config
            .state(&self.current)
            .and_then(|node| node.transition(event))
            .is_some_and(|transition| transition.admits(&self.context, payload))
    }

    /// Send an event.
    ///
    /// Unhandled events and guard rejections leave the machine unchanged and
    /// are reported to the diagnostics sink.
    pub fn send(&mut self, input: impl Into<EventInput<E, P>>) -> SendResult<S> {
        let EventInput { event, payload } = input.into();
        match self.evaluate(&event, payload.as_ref()) {
            Evaluation::Taken { target, context } => {
                let from = self.commit(event, target.clone(), context);
                SendResult::Transitioned { from, to: target }
            }
            Evaluation::Skipped(diagnostic) => {
                self.diagnostics.report(&diagnostic);
                match diagnostic {
                    Diagnostic::UnhandledEvent { .. } => SendResult::Unhandled,
                    Diagnostic::GuardRejected { .. } => SendResult::GuardRejected,
                }
            }
        }
    }

    /// Send an event, treating unhandled events and guard rejections as
    /// errors.
    ///
    /// Errors leave the machine unchanged and are not reported to the
    /// diagnostics sink.
    pub fn try_send(&mut self, input: impl Into<EventInput<E, P>>) -> Result<(), TransitionError> {
        let EventInput { event, payload } = input.into();
        match self.evaluate(&event, payload.as_ref()) {
            Evaluation::Taken { target, context } => {
                self.commit(event, target, context);
                Ok(())
            }
            Evaluation::Skipped(diagnostic) => Err(diagnostic.into_error()),
        }
    }

    /// Compute the outcome of `event` without touching `self`.
    fn evaluate(&self, event: &E, payload: Option<&P>) -> Evaluation<S, C> {
        let source = self.config.state(&self.current);
        let Some(transition) = source.and_then(|node| node.transition(event)) else {
            return Evaluation::Skipped(Diagnostic::UnhandledEvent {
                state: self.current.name().to_string(),
                event: event.name().to_string(),
            });
        };

        let target = transition.target();
        if !transition.admits(&self.context, payload) {
            return Evaluation::Skipped(Diagnostic::GuardRejected {
                state: self.current.name().to_string(),
                event: event.name().to_string(),
                target: target.name().to_string(),
            });
        }

        let mut context = self.context.clone();
        apply_all(transition.actions(), &mut context, payload);
        if let Some(source) = source {
            apply_all(source.exit_actions(), &mut context, payload);
        }
        if let Some(destination) = self.config.state(target) {
            apply_all(destination.entry_actions(), &mut context, payload);
        }

        Evaluation::Taken {
            target: target.clone(),
            context,
        }
    }

    /// Install the new state and context together, returning the old state.
    fn commit(&mut self, event: E, target: S, context: C) -> S {
        let timestamp = Utc::now();
        tracing::trace!(
            from = self.current.name(),
            to = target.name(),
            event = event.name(),
            "transition"
        );

        let from = std::mem::replace(&mut self.current, target);
        self.context = context;

        self.metadata.updated_at = timestamp;
        self.metadata.transition_count += 1;
        self.history.push(StateTransition {
            from: from.clone(),
            to: self.current.clone(),
            event,
            timestamp,
        });

        from
    }
}

impl<S: State, E: Event, C: Context, P> fmt::Debug for Machine<S, E, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current)
            .field("context", &self.context)
            .field("transitions", &self.metadata.transition_count)
            .finish()
    }
}
