//! Pure building blocks of the state machine.
//!
//! This module contains the side-effect free parts:
//! - Condition specs and the wildcard sentinel
//! - Selection of the winning condition for a data object
//! - Transition triggers and history records
//!
//! Nothing here runs actions or mutates a machine.

mod condition;
mod history;
mod matcher;
mod trigger;

pub use condition::{ConditionSpec, MatchKind, Pattern, Wildcard, WILDCARD};
pub use history::{StateHistory, StateTransition};
pub use matcher::select;
pub use trigger::Trigger;
