//! Compilation of a [`RawTable`] into a [`StateTable`].
//!
//! Compilation expands OR-groups into one transition per branch, builds the
//! per-state event maps and ordered condition lists, and checks that every
//! target state exists and every named action is registered. Actions are
//! only looked up, never called.

use crate::builder::error::BuildError;
use crate::builder::table::RawTable;
use crate::builder::transition::{Selector, TransitionBuilder};
use crate::core::Trigger;
use crate::effects::{
    ActionRegistry, ActionSpec, ActionStep, CompiledState, StateTable, Transition,
};
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// A declaration that passed every check.
struct Checked<'a, C> {
    selector: &'a Selector,
    target: &'a str,
    target_index: usize,
    steps: Vec<ActionStep<C>>,
}

/// Compile `raw`, failing on the first problem in declaration order.
pub fn compile<C>(raw: &RawTable<C>, actions: &ActionRegistry<C>) -> Result<StateTable<C>, BuildError> {
    let index = state_index(raw);
    let initial = check_initial(raw, &index)?;

    let mut states = Vec::with_capacity(raw.states.len());
    for (name, declarations) in &raw.states {
        let mut state = CompiledState::new(name.as_str());
        for (position, declaration) in declarations.iter().enumerate() {
            let checked = check_declaration(name, position, declaration, &index, actions)?;
            expand(&mut state, checked);
        }
        states.push(state);
    }

    Ok(StateTable {
        states,
        index,
        initial,
    })
}

/// Check `raw` without compiling it, accumulating every problem.
pub fn validate<C>(
    raw: &RawTable<C>,
    actions: &ActionRegistry<C>,
) -> Validation<(), NonEmptyVec<BuildError>> {
    let index = state_index(raw);
    let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();

    checks.push(to_validation(check_initial(raw, &index).map(|_| ())));
    for (name, declarations) in &raw.states {
        for (position, declaration) in declarations.iter().enumerate() {
            let result = check_declaration(name, position, declaration, &index, actions);
            checks.push(to_validation(result.map(|_| ())));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

fn to_validation(result: Result<(), BuildError>) -> Validation<(), NonEmptyVec<BuildError>> {
    match result {
        Ok(()) => Validation::success(()),
        Err(err) => Validation::fail(err),
    }
}

fn state_index<C>(raw: &RawTable<C>) -> HashMap<String, usize> {
    raw.states
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (name.clone(), i))
        .collect()
}

fn check_initial<C>(raw: &RawTable<C>, index: &HashMap<String, usize>) -> Result<usize, BuildError> {
    let initial = raw.initial.as_deref().unwrap_or_default();
    index
        .get(initial)
        .copied()
        .filter(|_| !initial.is_empty())
        .ok_or_else(|| BuildError::MissingInitialState {
            initial: initial.to_string(),
        })
}

fn check_declaration<'a, C>(
    state: &str,
    position: usize,
    declaration: &'a TransitionBuilder<C>,
    index: &HashMap<String, usize>,
    actions: &ActionRegistry<C>,
) -> Result<Checked<'a, C>, BuildError> {
    let selector = declaration
        .selector
        .as_ref()
        .ok_or_else(|| BuildError::MissingTrigger {
            state: state.to_string(),
            index: position,
        })?;

    let target = declaration.to.as_deref().unwrap_or_default();
    let target_index = index
        .get(target)
        .copied()
        .filter(|_| !target.is_empty())
        .ok_or_else(|| BuildError::MissingTransitionTarget {
            state: state.to_string(),
            index: position,
            target: target.to_string(),
        })?;

    let steps = declaration
        .action
        .as_ref()
        .map(ActionSpec::resolve)
        .unwrap_or_default();
    actions
        .dry_run(&steps)
        .map_err(|name| BuildError::UnresolvableAction {
            state: state.to_string(),
            index: position,
            name: name.to_string(),
        })?;

    Ok(Checked {
        selector,
        target,
        target_index,
        steps,
    })
}

/// Add one transition per branch of the declaration to `state`.
fn expand<C>(state: &mut CompiledState<C>, checked: Checked<'_, C>) {
    let action: Arc<[ActionStep<C>]> = checked.steps.into();
    let transition = |trigger: Trigger| Transition {
        target: checked.target.to_string(),
        trigger,
        action: Arc::clone(&action),
        target_index: checked.target_index,
    };

    match checked.selector {
        Selector::Events(names) => {
            for name in names {
                state
                    .events
                    .insert(name.clone(), transition(Trigger::Event(name.clone())));
            }
        }
        Selector::Conditions(specs) => {
            state.conditions.extend(
                specs
                    .iter()
                    .map(|spec| transition(Trigger::Condition(spec.clone()))),
            );
        }
    }
}
