//! Table-driven state machine.

use crate::builder::{compile, BuildError, MachineBuilder, RawTable};
use crate::core::{StateHistory, StateTransition};
use crate::effects::action::{run_steps, ActionRegistry, ActionStep};
use crate::effects::logger::Logger;
use crate::effects::table::{CompiledState, StateTable};
use crate::effects::transition::{Dispatch, Transition, TransitionError};
use chrono::Utc;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Crate version, reported when a machine initializes.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transitions a machine remembers unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// A transition that has been taken but whose actions have not run yet.
pub(crate) struct Fired<C> {
    pub(crate) outcome: Dispatch,
    pub(crate) steps: Arc<[ActionStep<C>]>,
}

/// State machine compiled from a [`RawTable`].
///
/// `C` is the context actions run against. A machine embedded in a host
/// type uses the host as its context, see [`MachineHost`](crate::effects::MachineHost).
pub struct Machine<C> {
    table: StateTable<C>,
    current: usize,
    actions: ActionRegistry<C>,
    logger: Logger,
    history: StateHistory,
}

impl<C> Machine<C> {
    /// Compile `table` and start in its initial state.
    ///
    /// Every named action in the table must be registered in `actions`.
    pub fn new(table: &RawTable<C>, actions: ActionRegistry<C>) -> Result<Self, BuildError> {
        Self::with_logger(table, actions, Logger::silent())
    }

    /// Like [`new`](Self::new), reporting diagnostics to `logger`.
    pub fn with_logger(
        table: &RawTable<C>,
        actions: ActionRegistry<C>,
        logger: Logger,
    ) -> Result<Self, BuildError> {
        let table = compile(table, &actions)?;
        Ok(Self::from_compiled(table, actions, logger))
    }

    pub fn builder() -> MachineBuilder<C> {
        MachineBuilder::new()
    }

    pub(crate) fn from_compiled(
        table: StateTable<C>,
        actions: ActionRegistry<C>,
        logger: Logger,
    ) -> Self {
        let machine = Self {
            current: table.initial,
            table,
            actions,
            logger,
            history: StateHistory::with_limit(DEFAULT_HISTORY_LIMIT),
        };
        tracing::debug!(
            version = VERSION,
            initial = machine.status(),
            states = machine.table.len(),
            "state machine initialized"
        );
        machine.logger.emit(&format!(
            "init(), initialized, v: {VERSION}, init state: {}, nStates: {}",
            machine.status(),
            machine.table.len()
        ));
        machine
    }

    /// Name of the current state.
    pub fn status(&self) -> &str {
        self.current_state().name()
    }

    pub fn current_state(&self) -> &CompiledState<C> {
        self.table.at(self.current)
    }

    pub fn table(&self) -> &StateTable<C> {
        &self.table
    }

    pub fn actions(&self) -> &ActionRegistry<C> {
        &self.actions
    }

    /// Named actions can be replaced or removed after construction.
    /// Removing one that a transition uses makes that dispatch fail with
    /// [`TransitionError::ActionNotDefined`].
    pub fn actions_mut(&mut self) -> &mut ActionRegistry<C> {
        &mut self.actions
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    /// The most recent transitions, up to the history limit.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Bound the history to `limit` transitions, `None` for no bound.
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.history.set_limit(limit);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Whether the current state has a transition for `event`.
    pub fn can_handle_event(&self, event: &str) -> bool {
        self.current_state().event(event).is_some()
    }

    /// Dispatch `event`, running actions against a separate `ctx`.
    pub fn on_event_with(&mut self, ctx: &mut C, event: &str) -> Result<Dispatch, TransitionError> {
        let fired = self.fire_event(event);
        self.run_with(ctx, fired)
    }

    /// Dispatch condition `data`, running actions against a separate `ctx`.
    pub fn on_condition_with(
        &mut self,
        ctx: &mut C,
        data: &Value,
    ) -> Result<Dispatch, TransitionError> {
        let fired = self.fire_condition(data);
        self.run_with(ctx, fired)
    }

    fn run_with(&self, ctx: &mut C, fired: Option<Fired<C>>) -> Result<Dispatch, TransitionError> {
        let Some(fired) = fired else {
            return Ok(Dispatch::Unmatched);
        };
        run_steps(ctx, &fired.steps, |_, name| self.actions.get(name).cloned())
            .inspect_err(|err| self.report_failure(err))?;
        Ok(fired.outcome)
    }

    /// Take the event transition for `event`, if any.
    ///
    /// The current state is updated before the caller runs the returned
    /// steps.
    pub(crate) fn fire_event(&mut self, event: &str) -> Option<Fired<C>> {
        let state = self.current_state();
        let Some(transition) = state.event(event) else {
            tracing::debug!(state = state.name(), event, "no event transition");
            self.logger.emit(&format!(
                "on_event() no switch evt e: {event}, from: {}",
                state.name()
            ));
            return None;
        };

        tracing::debug!(
            state = state.name(),
            event,
            to = %transition.target,
            "event transition"
        );
        self.logger.emit(&format!(
            "on_event() > switching to: {}, e: {event}, from: {}, action: {}",
            transition.target,
            state.name(),
            transition.has_action()
        ));
        let transition = transition.clone();
        Some(self.switch(transition))
    }

    /// Take the winning condition transition for `data`, if any.
    pub(crate) fn fire_condition(&mut self, data: &Value) -> Option<Fired<C>> {
        let state = self.current_state();
        let Some(transition) = state.match_condition(data) else {
            tracing::debug!(state = state.name(), %data, "no condition transition");
            self.logger.emit(&format!(
                "on_condition() no switch cond d: {data}, from: {}",
                state.name()
            ));
            return None;
        };

        tracing::debug!(
            state = state.name(),
            %data,
            to = %transition.target,
            "condition transition"
        );
        self.logger.emit(&format!(
            "on_condition() > switching to: {}, d: {data}, from: {}, action: {}",
            transition.target,
            state.name(),
            transition.has_action()
        ));
        let transition = transition.clone();
        Some(self.switch(transition))
    }

    fn switch(&mut self, transition: Transition<C>) -> Fired<C> {
        let from = self.status().to_string();
        self.current = transition.target_index;
        let to = self.status().to_string();

        self.history.record(StateTransition {
            from: from.clone(),
            to: to.clone(),
            trigger: transition.trigger,
            timestamp: Utc::now(),
        });

        Fired {
            outcome: Dispatch::Transitioned { from, to },
            steps: transition.action,
        }
    }

    pub(crate) fn report_failure(&self, err: &TransitionError) {
        tracing::warn!(state = self.status(), error = %err, "transition action failed");
        self.logger.emit(&format!(
            "action failed after switching to: {}, error: {err}",
            self.status()
        ));
    }
}

impl<C> fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("status", &self.status())
            .field("states", &self.table.len())
            .field("actions", &self.actions)
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransitionBuilder;
    use crate::core::ConditionSpec;
    use crate::effects::ActionSpec;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counter {
        hits: Vec<String>,
    }

    fn table() -> RawTable<Counter> {
        RawTable::new()
            .initial("idle")
            .state(
                "idle",
                vec![
                    TransitionBuilder::event("start")
                        .to("running")
                        .action(ActionSpec::named("mark").with_args("started")),
                    TransitionBuilder::cond(ConditionSpec::new().eq("load", 1)).to("running"),
                ],
            )
            .state(
                "running",
                vec![TransitionBuilder::event("stop").to("idle")],
            )
    }

    fn actions() -> ActionRegistry<Counter> {
        ActionRegistry::new().with("mark", |ctx: &mut Counter, args: &[Value]| {
            ctx.hits.push(args[0].as_str().unwrap_or_default().to_string());
            Ok(())
        })
    }

    #[test]
    fn starts_in_initial_state() {
        let machine = Machine::new(&table(), actions()).unwrap();

        assert_eq!(machine.status(), "idle");
        assert!(machine.history().is_empty());
    }

    #[test]
    fn event_with_separate_context_runs_actions() {
        let mut machine = Machine::new(&table(), actions()).unwrap();
        let mut ctx = Counter::default();

        let outcome = machine.on_event_with(&mut ctx, "start").unwrap();

        assert_eq!(
            outcome,
            Dispatch::Transitioned {
                from: "idle".to_string(),
                to: "running".to_string()
            }
        );
        assert_eq!(machine.status(), "running");
        assert_eq!(ctx.hits, vec!["started"]);
    }

    #[test]
    fn condition_with_separate_context() {
        let mut machine = Machine::new(&table(), actions()).unwrap();
        let mut ctx = Counter::default();

        let miss = machine.on_condition_with(&mut ctx, &json!({"load": 2})).unwrap();
        assert_eq!(miss, Dispatch::Unmatched);

        let hit = machine.on_condition_with(&mut ctx, &json!({"load": 1})).unwrap();
        assert!(hit.is_transitioned());
        assert_eq!(machine.status(), "running");
        assert!(ctx.hits.is_empty());
    }

    #[test]
    fn removed_action_fails_after_switching() {
        let mut machine = Machine::new(&table(), actions()).unwrap();
        machine.actions_mut().remove("mark");
        let mut ctx = Counter::default();

        let result = machine.on_event_with(&mut ctx, "start");

        assert!(matches!(
            result,
            Err(TransitionError::ActionNotDefined { ref name }) if name == "mark"
        ));
        assert_eq!(machine.status(), "running");
    }

    #[test]
    fn history_records_triggers() {
        let mut machine = Machine::new(&table(), actions()).unwrap();
        let mut ctx = Counter::default();

        machine.on_event_with(&mut ctx, "start").unwrap();
        machine.on_event_with(&mut ctx, "stop").unwrap();

        assert_eq!(machine.history().get_path(), vec!["idle", "running", "idle"]);
        let names: Vec<_> = machine
            .history()
            .transitions()
            .iter()
            .filter_map(|t| t.trigger.event())
            .collect();
        assert_eq!(names, vec!["start", "stop"]);
    }

    #[test]
    fn logger_receives_init_hit_and_miss_lines() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let captured = Arc::clone(&lines);
        let logger = Logger::new(move |line| captured.lock().unwrap().push(line.to_string()));

        let mut machine = Machine::with_logger(&table(), actions(), logger).unwrap();
        let mut ctx = Counter::default();
        machine.on_event_with(&mut ctx, "lala").unwrap();
        machine.on_event_with(&mut ctx, "start").unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("init(), initialized"));
        assert!(lines[0].contains("init state: idle"));
        assert!(lines[1].contains("no switch evt e: lala"));
        assert!(lines[2].contains("switching to: running"));
        assert!(lines[2].contains("action: true"));
    }

    #[test]
    fn history_is_bounded_by_default() {
        let table = RawTable::new()
            .initial("loop")
            .state("loop", vec![TransitionBuilder::event("t").to("loop")]);
        let mut machine = Machine::new(&table, ActionRegistry::new()).unwrap();

        for _ in 0..DEFAULT_HISTORY_LIMIT * 4 {
            machine.on_event_with(&mut (), "t").unwrap();
        }

        assert_eq!(machine.history().len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(machine.history().limit(), Some(DEFAULT_HISTORY_LIMIT));
    }

    #[test]
    fn history_limit_and_clear() {
        let mut machine = Machine::new(&table(), actions()).unwrap();
        let mut ctx = Counter::default();
        machine.set_history_limit(Some(1));

        machine.on_event_with(&mut ctx, "start").unwrap();
        machine.on_event_with(&mut ctx, "stop").unwrap();
        assert_eq!(machine.history().get_path(), vec!["running", "idle"]);

        machine.clear_history();
        assert!(machine.history().is_empty());
        machine.on_event_with(&mut ctx, "start").unwrap();
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn can_handle_event_checks_current_state() {
        let machine = Machine::new(&table(), actions()).unwrap();

        assert!(machine.can_handle_event("start"));
        assert!(!machine.can_handle_event("stop"));
    }
}
