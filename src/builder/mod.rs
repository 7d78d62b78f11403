//! Builder API for declaring and compiling state tables.
//!
//! A table is declared with [`RawTable`] and [`TransitionBuilder`], then
//! compiled into a [`Machine`](crate::effects::Machine), either directly
//! or through the fluent [`MachineBuilder`].

pub mod compiler;
pub mod error;
pub mod machine;
pub mod macros;
pub mod table;
pub mod transition;

pub use compiler::{compile, validate};
pub use error::BuildError;
pub use machine::MachineBuilder;
pub use table::RawTable;
pub use transition::{Selector, TransitionBuilder};
