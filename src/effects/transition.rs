//! Compiled transitions and dispatch outcomes.

use crate::core::{ConditionSpec, Trigger};
use crate::effects::action::ActionStep;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Errors that can occur while running a transition's actions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransitionError {
    #[error("Action '{name}' not defined in the machine's action registry")]
    ActionNotDefined { name: String },

    #[error("Transition action failed: {0}")]
    ActionFailed(String),

    /// An action failed because of an underlying error, kept as the source.
    #[error("Transition action failed: {message}")]
    ActionError {
        message: String,
        #[source]
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl TransitionError {
    /// Wrap an action's underlying error, keeping its cause chain.
    pub fn caused_by<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        TransitionError::ActionError {
            message: message.into(),
            source: Arc::new(source),
        }
    }
}

// Sources compare by their rendered message.
impl PartialEq for TransitionError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                TransitionError::ActionNotDefined { name: a },
                TransitionError::ActionNotDefined { name: b },
            ) => a == b,
            (TransitionError::ActionFailed(a), TransitionError::ActionFailed(b)) => a == b,
            (
                TransitionError::ActionError {
                    message: a,
                    source: sa,
                },
                TransitionError::ActionError {
                    message: b,
                    source: sb,
                },
            ) => a == b && sa.to_string() == sb.to_string(),
            _ => false,
        }
    }
}

/// Result of a dispatch that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The machine moved from one state to another (possibly the same one).
    Transitioned { from: String, to: String },

    /// Nothing matched; the state is unchanged.
    Unmatched,
}

impl Dispatch {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Dispatch::Transitioned { .. })
    }
}

/// A single compiled edge.
///
/// Expanding an OR-group yields one `Transition` per branch. Branches share
/// the target and the action sequence, each with its own trigger.
pub struct Transition<C> {
    pub target: String,
    pub trigger: Trigger,
    pub action: Arc<[ActionStep<C>]>,
    pub(crate) target_index: usize,
}

impl<C> Transition<C> {
    pub fn has_action(&self) -> bool {
        !self.action.is_empty()
    }

    pub fn condition(&self) -> Option<&ConditionSpec> {
        self.trigger.condition()
    }
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            trigger: self.trigger.clone(),
            action: Arc::clone(&self.action),
            target_index: self.target_index,
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .field("trigger", &self.trigger)
            .field("action", &self.action)
            .finish()
    }
}
