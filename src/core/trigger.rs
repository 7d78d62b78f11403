//! What caused a transition to fire.

use super::condition::ConditionSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single stimulus a compiled transition answers to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Trigger {
    /// A named event.
    Event(String),
    /// A condition tested against dispatched data.
    Condition(ConditionSpec),
}

impl Trigger {
    /// The event name, if this is an event trigger.
    pub fn event(&self) -> Option<&str> {
        match self {
            Trigger::Event(name) => Some(name),
            Trigger::Condition(_) => None,
        }
    }

    /// The condition, if this is a condition trigger.
    pub fn condition(&self) -> Option<&ConditionSpec> {
        match self {
            Trigger::Event(_) => None,
            Trigger::Condition(spec) => Some(spec),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Event(name) => write!(f, "event '{name}'"),
            Trigger::Condition(spec) => write!(f, "cond {spec}"),
        }
    }
}
