//! Reporting of events that did not cause a transition.
//!
//! [`Machine::send`](crate::runtime::Machine::send) never fails. When an
//! event is unhandled or a guard rejects it, a [`Diagnostic`] is handed to the
//! machine's [`DiagnosticSink`] instead. The default sink logs through
//! `tracing`; tests can collect diagnostics with [`RecordingSink`] or use
//! `try_send` to get them back as errors.

use crate::runtime::event::TransitionError;
use std::sync::{Arc, Mutex, PoisonError};

/// Why a sent event was a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The current state has no transition for the event.
    UnhandledEvent { state: String, event: String },

    /// A transition exists but its guard returned `false`.
    GuardRejected {
        state: String,
        event: String,
        target: String,
    },
}

impl Diagnostic {
    /// The same condition expressed as a [`TransitionError`].
    pub fn into_error(self) -> TransitionError {
        match self {
            Diagnostic::UnhandledEvent { state, event } => {
                TransitionError::NoTransition { from: state, event }
            }
            Diagnostic::GuardRejected {
                state,
                event,
                target,
            } => TransitionError::GuardBlocked {
                from: state,
                to: target,
                event,
            },
        }
    }
}

/// Receiver for [`Diagnostic`]s.
pub trait DiagnosticSink: Send + Sync {
    /// Called once for every `send` that left the machine unchanged.
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Logs unhandled events at `warn` and guard rejections at `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::UnhandledEvent { state, event } => {
                tracing::warn!(%state, %event, "event not handled in current state");
            }
            Diagnostic::GuardRejected {
                state,
                event,
                target,
            } => {
                tracing::debug!(%state, %event, %target, "guard rejected transition");
            }
        }
    }
}

/// Discards every diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Keeps every diagnostic for later inspection.
///
/// Clones share the same buffer, so one clone can be handed to a machine
/// while another is kept to read from.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    recorded: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingSink {
    /// A sink with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop everything reported so far.
    pub fn clear(&self) {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}
