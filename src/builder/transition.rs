//! Builder for a single raw transition declaration.

use crate::core::ConditionSpec;
use crate::effects::ActionSpec;
use std::fmt;

/// What a declaration listens to.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector {
    /// One or more event names, ORed.
    Events(Vec<String>),
    /// One or more conditions, ORed, in order.
    Conditions(Vec<ConditionSpec>),
}

/// A raw transition declaration, as written in a table.
///
/// Nothing is validated here; the compiler checks the target, the selector
/// and the action names when the machine is built.
///
/// # Example
///
/// ```rust
/// use statetable::builder::TransitionBuilder;
/// use statetable::core::ConditionSpec;
///
/// struct Host;
///
/// let by_event: TransitionBuilder<Host> = TransitionBuilder::events(["land", "lond"]).to("upda");
/// let by_cond: TransitionBuilder<Host> = TransitionBuilder::any_of([
///     ConditionSpec::new().eq("status", 1),
///     ConditionSpec::new().eq("status", 2),
/// ])
/// .to("upda")
/// .action("show");
/// ```
pub struct TransitionBuilder<C> {
    pub(crate) selector: Option<Selector>,
    pub(crate) to: Option<String>,
    pub(crate) action: Option<ActionSpec<C>>,
}

impl<C> TransitionBuilder<C> {
    /// A declaration with no selector yet.
    pub fn new() -> Self {
        Self {
            selector: None,
            to: None,
            action: None,
        }
    }

    /// Fire on a single event.
    pub fn event(name: impl Into<String>) -> Self {
        Self::new().on(name)
    }

    /// Fire on any of several events.
    pub fn events<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().on_any(names)
    }

    /// Fire when `spec` matches.
    pub fn cond(spec: ConditionSpec) -> Self {
        Self::new().when(spec)
    }

    /// Fire when any of `specs` matches.
    pub fn any_of(specs: impl IntoIterator<Item = ConditionSpec>) -> Self {
        Self::new().when_any(specs)
    }

    /// Set (or replace) the selector with a single event.
    pub fn on(mut self, name: impl Into<String>) -> Self {
        self.selector = Some(Selector::Events(vec![name.into()]));
        self
    }

    pub fn on_any<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selector = Some(Selector::Events(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Set (or replace) the selector with a single condition.
    pub fn when(mut self, spec: ConditionSpec) -> Self {
        self.selector = Some(Selector::Conditions(vec![spec]));
        self
    }

    pub fn when_any(mut self, specs: impl IntoIterator<Item = ConditionSpec>) -> Self {
        self.selector = Some(Selector::Conditions(specs.into_iter().collect()));
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Set the action run after the transition is taken (optional).
    pub fn action(mut self, action: impl Into<ActionSpec<C>>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn selector(&self) -> Option<&Selector> {
        self.selector.as_ref()
    }

    pub fn target(&self) -> Option<&str> {
        self.to.as_deref()
    }
}

impl<C> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for TransitionBuilder<C> {
    fn clone(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            to: self.to.clone(),
            action: self.action.clone(),
        }
    }
}

impl<C> fmt::Debug for TransitionBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionBuilder")
            .field("selector", &self.selector)
            .field("to", &self.to)
            .field("action", &self.action)
            .finish()
    }
}
