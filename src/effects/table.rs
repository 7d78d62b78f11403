//! The compiled, immutable state table.

use crate::core::select;
use crate::effects::transition::Transition;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A state with its event map and ordered condition list.
pub struct CompiledState<C> {
    pub(crate) name: String,
    pub(crate) events: HashMap<String, Transition<C>>,
    pub(crate) conditions: Vec<Transition<C>>,
}

impl<C> CompiledState<C> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: HashMap::new(),
            conditions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transition bound to `event`, if any.
    pub fn event(&self, event: &str) -> Option<&Transition<C>> {
        self.events.get(event)
    }

    /// All event transitions, in no particular order.
    pub fn events(&self) -> impl Iterator<Item = (&str, &Transition<C>)> {
        self.events.iter().map(|(name, t)| (name.as_str(), t))
    }

    /// Condition transitions in declaration order.
    pub fn conditions(&self) -> &[Transition<C>] {
        &self.conditions
    }

    /// Condition transition that wins for `data`, if any.
    pub fn match_condition(&self, data: &Value) -> Option<&Transition<C>> {
        select(&self.conditions, data, Transition::condition)
    }
}

impl<C> fmt::Debug for CompiledState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledState")
            .field("name", &self.name)
            .field("events", &self.events)
            .field("conditions", &self.conditions)
            .finish()
    }
}

/// Every compiled state of a machine plus the initial state.
///
/// Only the compiler builds tables, so every transition target and the
/// initial state are guaranteed to exist.
pub struct StateTable<C> {
    pub(crate) states: Vec<CompiledState<C>>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) initial: usize,
}

impl<C> StateTable<C> {
    /// Name of the initial state.
    pub fn initial(&self) -> &str {
        self.states[self.initial].name()
    }

    pub fn state(&self, name: &str) -> Option<&CompiledState<C>> {
        self.index.get(name).map(|&i| &self.states[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(CompiledState::name)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub(crate) fn at(&self, index: usize) -> &CompiledState<C> {
        &self.states[index]
    }
}

impl<C> fmt::Debug for StateTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateTable")
            .field("initial", &self.initial())
            .field("states", &self.states)
            .finish()
    }
}
