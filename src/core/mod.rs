//! Core state machine types.
//!
//! This module contains the building blocks shared by configuration and
//! runtime:
//! - State and event identifiers via the `State` and `Event` traits
//! - Context data and its shallow-merge contract via `Context`
//! - Guard predicates and context-updating actions
//! - Bounded transition history
//!
//! Nothing in this module holds mutable machine state.

mod action;
mod context;
mod guard;
mod history;
mod state;

pub(crate) use action::apply_all;
pub use action::Action;
pub use context::Context;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{Event, State};
