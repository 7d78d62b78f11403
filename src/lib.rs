//! Statetable: a declarative, table-driven state machine
//!
//! A machine is declared as a table mapping state names to ordered lists of
//! transitions, then compiled once. At runtime it reacts to two stimuli:
//!
//! - **Events**: a named event looks up the current state's event map
//! - **Conditions**: a flat data object is matched against the current
//!   state's condition list, where exact matches outrank wildcard matches
//!
//! A successful dispatch moves the machine and then runs the transition's
//! actions. Actions are callbacks or names registered on the machine, and
//! every name is checked when the table is compiled.
//!
//! # Example
//!
//! ```rust
//! use statetable::builder::{RawTable, TransitionBuilder};
//! use statetable::effects::{MachineHost, StateMachine};
//! use statetable::cond;
//! use serde_json::json;
//!
//! let table = RawTable::new()
//!     .initial("init")
//!     .state("init", vec![
//!         TransitionBuilder::cond(cond! { "status" => 1 }).to("upda"),
//!         TransitionBuilder::event("john").to("upda"),
//!     ])
//!     .state("upda", vec![
//!         TransitionBuilder::cond(cond! { "status" => _ }).to("updb"),
//!         TransitionBuilder::cond(cond! { "trig" => 10, "lek" => _ }).to("init"),
//!     ])
//!     .state("updb", vec![
//!         TransitionBuilder::any_of([cond! { "status" => 1 }, cond! { "status" => 2 }]).to("upda"),
//!     ]);
//!
//! let mut sm = StateMachine::new(&table).unwrap();
//! assert_eq!(sm.status(), "init");
//!
//! sm.on_event("john").unwrap();
//! sm.on_condition(&json!({"status": 42})).unwrap();
//! assert_eq!(sm.status(), "updb");
//!
//! // unmatched stimuli are ignored
//! sm.on_condition(&json!({"status": 8})).unwrap();
//! assert_eq!(sm.status(), "updb");
//! ```

pub mod builder;
pub mod core;
pub mod effects;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, RawTable, TransitionBuilder};
pub use core::{ConditionSpec, WILDCARD};
pub use effects::{ActionRegistry, ActionSpec, Dispatch, Machine, MachineHost, StateMachine, TransitionError};
