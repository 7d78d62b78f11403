//! Errors raised while compiling a state table.

use thiserror::Error;

/// Errors that can occur when compiling a raw table into a machine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state ({initial}) not defined. Call .initial(state) with a declared state")]
    MissingInitialState { initial: String },

    #[error("Transition #{index} of state '{state}' targets undefined state '{target}'")]
    MissingTransitionTarget {
        state: String,
        index: usize,
        target: String,
    },

    #[error("Transition #{index} of state '{state}' has no event or condition")]
    MissingTrigger { state: String, index: usize },

    #[error("Transition #{index} of state '{state}' uses action '{name}', which is not registered")]
    UnresolvableAction {
        state: String,
        index: usize,
        name: String,
    },
}
