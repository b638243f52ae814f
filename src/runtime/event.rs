//! Event inputs and send outcomes.

/// An event together with its optional payload.
///
/// Anything convertible into an `EventInput` can be passed to
/// [`Machine::send`](crate::runtime::Machine::send): a bare event, a `&str`
/// for string-keyed machines, or an explicit `EventInput` carrying a payload.
///
/// # Example
///
/// ```rust
/// use machina::runtime::EventInput;
///
/// let bare: EventInput<String, u32> = "TICK".into();
/// assert!(bare.payload.is_none());
///
/// let loaded = EventInput::with_payload("TICK".to_string(), 5u32);
/// assert_eq!(loaded.payload, Some(5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EventInput<E, P = ()> {
    pub event: E,
    pub payload: Option<P>,
}

impl<E, P> EventInput<E, P> {
    /// An event without payload.
    pub fn new(event: E) -> Self {
        Self {
            event,
            payload: None,
        }
    }

    /// An event carrying `payload`.
    pub fn with_payload(event: E, payload: P) -> Self {
        Self {
            event,
            payload: Some(payload),
        }
    }
}

impl<E, P> From<E> for EventInput<E, P> {
    fn from(event: E) -> Self {
        Self::new(event)
    }
}

impl<P> From<&str> for EventInput<String, P> {
    fn from(event: &str) -> Self {
        Self::new(event.to_string())
    }
}

/// Outcome of [`Machine::send`](crate::runtime::Machine::send).
///
/// Only `Transitioned` changes the machine; the other outcomes are no-ops.
#[derive(Clone, Debug, PartialEq)]
pub enum SendResult<S> {
    /// The transition was taken.
    Transitioned { from: S, to: S },

    /// The current state does not handle the event.
    Unhandled,

    /// The transition's guard returned `false`.
    GuardRejected,
}

impl<S> SendResult<S> {
    /// Whether the machine changed.
    pub fn is_transitioned(&self) -> bool {
        matches!(self, SendResult::Transitioned { .. })
    }

    /// The state entered, if the transition was taken.
    pub fn target(&self) -> Option<&S> {
        match self {
            SendResult::Transitioned { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// Errors returned by [`Machine::try_send`](crate::runtime::Machine::try_send).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("No transition for event '{event}' from state '{from}'")]
    NoTransition { from: String, event: String },

    #[error("Guard blocked transition from '{from}' to '{to}' on event '{event}'")]
    GuardBlocked {
        from: String,
        to: String,
        event: String,
    },
}
