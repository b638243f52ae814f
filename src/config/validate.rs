//! Structural validation of machine configurations.
//!
//! Every check runs and all violations are accumulated, so a broken
//! configuration is reported in one pass rather than one error at a time.

use crate::builder::ConfigViolation;
use crate::config::node::StateNode;
use crate::core::{Context, Event, State};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(crate) type Checked = Validation<(), NonEmptyVec<ConfigViolation>>;

/// Check that `initial` and every transition target name a defined state,
/// and that nothing was declared twice.
pub(crate) fn validate_structure<S, E, C, P>(
    initial: &S,
    states: &HashMap<S, StateNode<S, E, C, P>>,
    duplicate_states: &[S],
) -> Checked
where
    S: State,
    E: Event,
    C: Context,
{
    let mut checks: Vec<Checked> = Vec::new();

    if !states.contains_key(initial) {
        checks.push(Validation::fail(ConfigViolation::UnknownInitialState {
            initial: initial.name().to_string(),
        }));
    }

    for state in duplicate_states {
        checks.push(Validation::fail(ConfigViolation::DuplicateState {
            state: state.name().to_string(),
        }));
    }

    let mut ordered: Vec<_> = states.iter().collect();
    ordered.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));

    for (state, node) in ordered {
        for event in node.duplicate_events() {
            checks.push(Validation::fail(ConfigViolation::DuplicateEvent {
                state: state.name().to_string(),
                event: event.name().to_string(),
            }));
        }

        for (event, transition) in node.transitions() {
            let target = transition.target();
            if !states.contains_key(target) {
                checks.push(Validation::fail(ConfigViolation::UnknownTarget {
                    state: state.name().to_string(),
                    event: event.name().to_string(),
                    target: target.name().to_string(),
                }));
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten a failed check into a plain list, keeping `prior` violations first.
pub(crate) fn collect_violations(
    prior: Vec<ConfigViolation>,
    checked: Checked,
) -> Vec<ConfigViolation> {
    let mut violations = prior;
    if let Validation::Failure(errors) = checked {
        violations.extend(errors.iter().cloned());
    }
    violations
}
