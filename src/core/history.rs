//! State transition history tracking.
//!
//! Every successful dispatch is recorded here, in memory only. The history
//! is serializable so it can be exported for diagnostics.

use super::trigger::Trigger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use statetable::core::{StateTransition, Trigger};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: "init".to_string(),
///     to: "upda".to_string(),
///     trigger: Trigger::Event("john".to_string()),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, "upda");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being transitioned from
    pub from: String,
    /// The state being transitioned to
    pub to: String,
    /// The event or condition that fired
    pub trigger: Trigger,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of state transitions.
///
/// # Example
///
/// ```rust
/// use statetable::core::{StateHistory, StateTransition, Trigger};
/// use chrono::Utc;
///
/// let mut history = StateHistory::new();
/// history.record(StateTransition {
///     from: "start".to_string(),
///     to: "middle".to_string(),
///     trigger: Trigger::Event("go".to_string()),
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: "middle".to_string(),
///     to: "end".to_string(),
///     trigger: Trigger::Event("go".to_string()),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec!["start", "middle", "end"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<StateTransition>,
    /// Most transitions kept; the oldest are dropped first. `None` keeps all.
    #[serde(default)]
    limit: Option<usize>,
}

impl StateHistory {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `limit` transitions.
    ///
    /// A limit of zero records nothing.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(64)),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Change the bound, dropping the oldest transitions if needed.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.trim();
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push_back(transition);
        self.trim();
    }

    /// Forget every recorded transition. The limit is kept.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
            }
        }
    }

    /// Get the path of state names traversed.
    ///
    /// The first entry is the `from` of the oldest kept transition, followed
    /// by the `to` of each transition. Empty when nothing was recorded.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the oldest and the newest kept transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Kept transitions, oldest first.
    pub fn transitions(&self) -> &VecDeque<StateTransition> {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
