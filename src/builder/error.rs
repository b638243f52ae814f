//! Build errors for machine configurations.

use thiserror::Error;

/// Errors that can occur when building a machine configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error(
        "Invalid machine configuration ({} problem(s)): {}",
        .violations.len(),
        join_violations(.violations)
    )]
    Invalid { violations: Vec<ConfigViolation> },

    #[error("Machine definition could not be parsed: {0}")]
    Definition(#[source] serde_json::Error),

    #[error("Initial context could not be decoded: {0}")]
    Context(#[source] serde_json::Error),
}

impl BuildError {
    /// Every structural problem found, empty for the other variants.
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            BuildError::Invalid { violations } => violations,
            _ => &[],
        }
    }
}

/// A single structural problem in a machine configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("initial state '{initial}' is not defined")]
    UnknownInitialState { initial: String },

    #[error("state '{state}' handles '{event}' with undefined target '{target}'")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },

    #[error("state '{state}' is defined more than once")]
    DuplicateState { state: String },

    #[error("state '{state}' handles '{event}' more than once")]
    DuplicateEvent { state: String, event: String },

    #[error("state '{state}' references unknown action '{name}'")]
    UnknownAction { state: String, name: String },

    #[error("state '{state}' guards '{event}' with unknown condition '{name}'")]
    UnknownGuard {
        state: String,
        event: String,
        name: String,
    },
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
