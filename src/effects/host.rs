//! Composing state machine behavior into host types.
//!
//! Any type that owns a [`Machine`] over itself can implement
//! [`MachineHost`] and gets event dispatch, condition dispatch and status
//! for free. Actions then run with the host as their context, so they can
//! touch the host's own fields. Each host value owns its machine, so two
//! hosts never share a current state.

use crate::builder::{BuildError, RawTable};
use crate::effects::action::{run_steps, ActionRegistry};
use crate::effects::logger::Logger;
use crate::effects::machine::{Fired, Machine};
use crate::effects::transition::{Dispatch, TransitionError};
use serde_json::Value;

/// Behavior shared by every type that embeds a [`Machine`].
///
/// Implement the two accessors (or use [`machine_host!`](crate::machine_host))
/// and the dispatch methods are provided.
///
/// # Example
///
/// ```rust
/// use statetable::builder::{RawTable, TransitionBuilder};
/// use statetable::effects::{ActionRegistry, Machine, MachineHost};
/// use statetable::machine_host;
///
/// struct Door {
///     machine: Machine<Door>,
///     opened: u32,
/// }
///
/// machine_host!(Door, machine);
///
/// let table = RawTable::new()
///     .initial("closed")
///     .state("closed", vec![TransitionBuilder::event("open").to("open").action("count")])
///     .state("open", vec![TransitionBuilder::event("close").to("closed")]);
/// let actions = ActionRegistry::new().with("count", |door: &mut Door, _args| {
///     door.opened += 1;
///     Ok(())
/// });
///
/// let mut door = Door { machine: Machine::new(&table, actions).unwrap(), opened: 0 };
/// door.on_event("open").unwrap();
///
/// assert_eq!(door.status(), "open");
/// assert_eq!(door.opened, 1);
/// ```
pub trait MachineHost: Sized {
    fn machine(&self) -> &Machine<Self>;

    fn machine_mut(&mut self) -> &mut Machine<Self>;

    /// Dispatch a named event.
    ///
    /// An unknown event is logged and returns [`Dispatch::Unmatched`].
    fn on_event(&mut self, event: &str) -> Result<Dispatch, TransitionError> {
        let fired = self.machine_mut().fire_event(event);
        run_fired(self, fired)
    }

    /// Dispatch a data object against the current state's conditions.
    ///
    /// Data that matches nothing, or is not an object, returns
    /// [`Dispatch::Unmatched`].
    fn on_condition(&mut self, data: &Value) -> Result<Dispatch, TransitionError> {
        let fired = self.machine_mut().fire_condition(data);
        run_fired(self, fired)
    }

    /// Name of the current state.
    fn status(&self) -> &str {
        self.machine().status()
    }
}

fn run_fired<H: MachineHost>(host: &mut H, fired: Option<Fired<H>>) -> Result<Dispatch, TransitionError> {
    let Some(fired) = fired else {
        return Ok(Dispatch::Unmatched);
    };
    if let Err(err) = run_steps(host, &fired.steps, |host, name| {
        host.machine().actions().get(name).cloned()
    }) {
        host.machine().report_failure(&err);
        return Err(err);
    }
    Ok(fired.outcome)
}

/// Implement [`MachineHost`] for a struct by naming its machine field.
///
/// ```rust
/// use statetable::effects::Machine;
/// use statetable::machine_host;
///
/// struct Player {
///     fsm: Machine<Player>,
/// }
///
/// machine_host!(Player, fsm);
/// ```
#[macro_export]
macro_rules! machine_host {
    ($host:ty, $field:ident) => {
        impl $crate::effects::MachineHost for $host {
            fn machine(&self) -> &$crate::effects::Machine<Self> {
                &self.$field
            }

            fn machine_mut(&mut self) -> &mut $crate::effects::Machine<Self> {
                &mut self.$field
            }
        }
    };
}

/// A machine that is its own action context.
///
/// Named actions receive the `StateMachine` itself, so they may inspect
/// its status or history.
///
/// # Example
///
/// ```rust
/// use statetable::builder::{RawTable, TransitionBuilder};
/// use statetable::effects::{MachineHost, StateMachine};
/// use statetable::cond;
/// use serde_json::json;
///
/// let table = RawTable::new()
///     .initial("init")
///     .state("init", vec![TransitionBuilder::cond(cond! { "status" => 1 }).to("upda")])
///     .state("upda", vec![TransitionBuilder::event("rst").to("init")]);
///
/// let mut sm = StateMachine::new(&table).unwrap();
/// sm.on_condition(&json!({"status": 1})).unwrap();
/// assert_eq!(sm.status(), "upda");
/// ```
#[derive(Debug)]
pub struct StateMachine {
    machine: Machine<StateMachine>,
}

machine_host!(StateMachine, machine);

impl StateMachine {
    /// Compile a table without named actions.
    pub fn new(table: &RawTable<StateMachine>) -> Result<Self, BuildError> {
        Self::with_actions(table, ActionRegistry::new())
    }

    pub fn with_actions(
        table: &RawTable<StateMachine>,
        actions: ActionRegistry<StateMachine>,
    ) -> Result<Self, BuildError> {
        Ok(Self::from(Machine::new(table, actions)?))
    }

    pub fn with_logger(
        table: &RawTable<StateMachine>,
        actions: ActionRegistry<StateMachine>,
        logger: Logger,
    ) -> Result<Self, BuildError> {
        Ok(Self::from(Machine::with_logger(table, actions, logger)?))
    }

    pub fn into_inner(self) -> Machine<StateMachine> {
        self.machine
    }
}

impl From<Machine<StateMachine>> for StateMachine {
    fn from(machine: Machine<StateMachine>) -> Self {
        Self { machine }
    }
}
