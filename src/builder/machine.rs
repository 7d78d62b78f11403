//! Builder for constructing state machines.

use crate::builder::compiler::{compile, validate};
use crate::builder::error::BuildError;
use crate::builder::table::RawTable;
use crate::builder::transition::TransitionBuilder;
use crate::effects::{ActionRegistry, Logger, Machine, TransitionError, DEFAULT_HISTORY_LIMIT};
use serde_json::Value;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use statetable::builder::{MachineBuilder, TransitionBuilder};
/// use statetable::effects::{Machine, MachineHost};
/// use statetable::machine_host;
///
/// struct Counter {
///     machine: Machine<Counter>,
///     ticks: u32,
/// }
///
/// machine_host!(Counter, machine);
///
/// let machine = MachineBuilder::new()
///     .initial("idle")
///     .state("idle", vec![TransitionBuilder::event("tick").to("idle").action("count")])
///     .action("count", |c: &mut Counter, _args| {
///         c.ticks += 1;
///         Ok(())
///     })
///     .build()
///     .unwrap();
///
/// let mut counter = Counter { machine, ticks: 0 };
/// counter.on_event("tick").unwrap();
/// counter.on_event("tick").unwrap();
/// assert_eq!(counter.ticks, 2);
/// ```
pub struct MachineBuilder<C> {
    table: RawTable<C>,
    actions: ActionRegistry<C>,
    logger: Logger,
    history_limit: Option<usize>,
}

impl<C> MachineBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            table: RawTable::new(),
            actions: ActionRegistry::new(),
            logger: Logger::silent(),
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }

    /// Start from an existing raw table.
    pub fn from_table(table: RawTable<C>) -> Self {
        Self {
            table,
            ..Self::new()
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.table = self.table.initial(state);
        self
    }

    /// Declare a state and its transitions.
    pub fn state(
        mut self,
        name: impl Into<String>,
        transitions: impl IntoIterator<Item = TransitionBuilder<C>>,
    ) -> Self {
        self.table = self.table.state(name, transitions);
        self
    }

    /// Register a named action.
    pub fn action<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        self.actions.register(name, f);
        self
    }

    /// Replace the whole action registry.
    pub fn actions(mut self, actions: ActionRegistry<C>) -> Self {
        self.actions = actions;
        self
    }

    /// Receive diagnostic lines.
    pub fn logger<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.logger = Logger::new(sink);
        self
    }

    /// Keep at most `limit` transitions in the machine's history.
    /// Zero disables recording.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Keep every transition for the life of the machine.
    pub fn unbounded_history(mut self) -> Self {
        self.history_limit = None;
        self
    }

    /// Report every problem in the table at once.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        validate(&self.table, &self.actions)
    }

    /// Compile the table into a machine.
    /// Returns the first problem found, in declaration order.
    pub fn build(self) -> Result<Machine<C>, BuildError> {
        let table = compile(&self.table, &self.actions)?;
        let mut machine = Machine::from_compiled(table, self.actions, self.logger);
        machine.set_history_limit(self.history_limit);
        Ok(machine)
    }
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for MachineBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineBuilder")
            .field("table", &self.table)
            .field("actions", &self.actions)
            .field("logger", &self.logger)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConditionSpec;
    use std::sync::{Arc, Mutex};

    struct Ctx;

    #[test]
    fn builder_validates_required_fields() {
        let result = MachineBuilder::<Ctx>::new().build();

        assert!(matches!(
            result,
            Err(BuildError::MissingInitialState { .. })
        ));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = MachineBuilder::<Ctx>::new()
            .initial("init")
            .state("init", vec![TransitionBuilder::event("go").to("done")])
            .state("done", vec![])
            .build()
            .unwrap();

        assert_eq!(machine.status(), "init");
        assert_eq!(machine.table().len(), 2);
    }

    #[test]
    fn registered_actions_satisfy_dry_run() {
        let without = MachineBuilder::<Ctx>::new()
            .initial("a")
            .state("a", vec![TransitionBuilder::event("x").to("a").action("show")]);
        let with = MachineBuilder::<Ctx>::new()
            .initial("a")
            .state("a", vec![TransitionBuilder::event("x").to("a").action("show")])
            .action("show", |_, _| Ok(()));

        assert!(matches!(
            without.build(),
            Err(BuildError::UnresolvableAction { .. })
        ));
        assert!(with.build().is_ok());
    }

    #[test]
    fn validate_reports_every_problem() {
        let builder = MachineBuilder::<Ctx>::new().state(
            "a",
            vec![
                TransitionBuilder::cond(ConditionSpec::new().eq("k", 1)).to("b"),
                TransitionBuilder::event("x").to("c"),
            ],
        );

        match builder.validate() {
            Validation::Failure(errors) => assert_eq!(errors.len(), 3),
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn logger_is_wired_into_machine() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let captured = Arc::clone(&lines);

        let machine = MachineBuilder::<Ctx>::from_table(
            RawTable::new().initial("a").state("a", vec![]),
        )
        .logger(move |line| captured.lock().unwrap().push(line.to_string()))
        .build()
        .unwrap();

        assert!(!machine.logger().is_silent());
        assert_eq!(lines.lock().unwrap().len(), 1);
    }

    #[test]
    fn history_limit_is_applied() {
        let table = RawTable::new()
            .initial("a")
            .state("a", vec![TransitionBuilder::event("t").to("a")]);

        let mut bounded = MachineBuilder::<Ctx>::from_table(table.clone())
            .history_limit(3)
            .build()
            .unwrap();
        let mut silent = MachineBuilder::<Ctx>::from_table(table.clone())
            .history_limit(0)
            .build()
            .unwrap();
        let unbounded = MachineBuilder::<Ctx>::from_table(table)
            .unbounded_history()
            .build()
            .unwrap();

        let mut ctx = Ctx;
        for _ in 0..10 {
            bounded.on_event_with(&mut ctx, "t").unwrap();
            silent.on_event_with(&mut ctx, "t").unwrap();
        }

        assert_eq!(bounded.history().len(), 3);
        assert!(silent.history().is_empty());
        assert_eq!(unbounded.history().limit(), None);
    }
}
