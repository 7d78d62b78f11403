//! The imperative shell: compiled tables, actions and dispatch.
//!
//! # Key Concepts
//!
//! - **Machine**: owns the compiled [`StateTable`] and the current state
//! - **Actions**: callbacks or registered names run after a transition
//! - **Hosts**: any type embedding a [`Machine`] over itself gets dispatch
//!   through [`MachineHost`]
//!
//! Dispatch is synchronous. The current state is updated before a
//! transition's actions run, and is not rolled back if an action fails.

mod action;
mod host;
mod logger;
mod machine;
mod table;
mod transition;

pub use action::{run_steps, ActionFn, ActionRegistry, ActionSpec, ActionStep, Callable};
pub use host::{MachineHost, StateMachine};
pub use logger::Logger;
pub use machine::{Machine, DEFAULT_HISTORY_LIMIT, VERSION};
pub use table::{CompiledState, StateTable};
pub use transition::{Dispatch, Transition, TransitionError};
