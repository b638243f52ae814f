//! Running machines.
//!
//! A [`Machine`] owns the current state and context of one consumer and
//! evaluates events against a shared [`MachineConfig`](crate::MachineConfig).
//! Events that do not cause a transition are reported as [`Diagnostic`]s.

mod diagnostics;
mod event;
mod machine;

pub use diagnostics::{Diagnostic, DiagnosticSink, NullSink, RecordingSink, TracingSink};
pub use event::{EventInput, SendResult, TransitionError};
pub use machine::Machine;
