//! Builder API for ergonomic machine construction.
//!
//! This module provides the fluent [`MachineBuilder`] and macros for
//! declaring states, events and contexts with minimal boilerplate while
//! keeping every identifier strongly typed.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, ConfigViolation};
pub use machine::MachineBuilder;
