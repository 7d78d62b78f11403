//! The raw, declarative state table.

use crate::builder::transition::TransitionBuilder;
use std::fmt;

/// Initial state plus, per state, its ordered transition declarations.
///
/// # Example
///
/// ```rust
/// use statetable::builder::{RawTable, TransitionBuilder};
/// use statetable::cond;
///
/// struct Host;
///
/// let table: RawTable<Host> = RawTable::new()
///     .initial("init")
///     .state("init", vec![
///         TransitionBuilder::cond(cond! { "status" => 1 }).to("upda"),
///         TransitionBuilder::event("john").to("upda"),
///     ])
///     .state("upda", vec![TransitionBuilder::cond(cond! { "status" => _ }).to("init")]);
///
/// assert_eq!(table.initial_state(), Some("init"));
/// assert_eq!(table.len(), 2);
/// ```
pub struct RawTable<C> {
    pub(crate) initial: Option<String>,
    pub(crate) states: Vec<(String, Vec<TransitionBuilder<C>>)>,
}

impl<C> RawTable<C> {
    pub fn new() -> Self {
        Self {
            initial: None,
            states: Vec::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Declare a state and its transitions.
    ///
    /// Declaring the same state twice replaces the earlier declarations.
    pub fn state(
        mut self,
        name: impl Into<String>,
        transitions: impl IntoIterator<Item = TransitionBuilder<C>>,
    ) -> Self {
        self.insert(name, transitions);
        self
    }

    /// Non-consuming form of [`state`](Self::state).
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        transitions: impl IntoIterator<Item = TransitionBuilder<C>>,
    ) {
        let name = name.into();
        let transitions = transitions.into_iter().collect();
        match self.states.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = transitions,
            None => self.states.push((name, transitions)),
        }
    }

    /// Append one declaration to an existing or new state.
    pub fn push(&mut self, state: &str, transition: TransitionBuilder<C>) {
        match self.states.iter_mut().find(|(n, _)| n == state) {
            Some(entry) => entry.1.push(transition),
            None => self.states.push((state.to_string(), vec![transition])),
        }
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    pub fn transitions(&self, state: &str) -> Option<&[TransitionBuilder<C>]> {
        self.states
            .iter()
            .find(|(n, _)| n == state)
            .map(|(_, t)| t.as_slice())
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.iter().any(|(n, _)| n == state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<C> Default for RawTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for RawTable<C> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            states: self.states.clone(),
        }
    }
}

impl<C> fmt::Debug for RawTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawTable")
            .field("initial", &self.initial)
            .field("states", &self.states)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx;

    #[test]
    fn redeclaring_state_replaces_transitions() {
        let table: RawTable<Ctx> = RawTable::new()
            .state("a", vec![TransitionBuilder::event("x").to("a")])
            .state("a", vec![]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.transitions("a").map(<[_]>::len), Some(0));
    }

    #[test]
    fn push_extends_a_copy_without_touching_the_original() {
        let base: RawTable<Ctx> = RawTable::new()
            .initial("a")
            .state("a", vec![TransitionBuilder::event("x").to("a")]);
        let mut extended = base.clone();

        extended.push("a", TransitionBuilder::event("y").to("a"));

        assert_eq!(base.transitions("a").map(<[_]>::len), Some(1));
        assert_eq!(extended.transitions("a").map(<[_]>::len), Some(2));
    }

    #[test]
    fn push_creates_missing_state() {
        let mut table: RawTable<Ctx> = RawTable::new();
        table.push("b", TransitionBuilder::event("x").to("b"));

        assert!(table.contains("b"));
        assert!(table.initial_state().is_none());
    }
}
