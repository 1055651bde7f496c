//! This crate provides the core logic for a deterministic multi-tape Turing machine simulator.
//! It includes the execution engine (tapes, transition rules, states and the run loop) and the
//! loader that turns `.dtm` or JSON program descriptions into validated machines.

pub mod analyzer;
pub mod command;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod state;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `Command` struct from the command module.
pub use command::Command;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Machine` struct from the machine module.
pub use machine::Machine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the `MachineState` struct from the state module.
pub use state::MachineState;
/// Re-exports the tape types from the tape module.
pub use tape::{Tape, WritableTape};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    is_valid_symbol, Direction, Halt, MachineError, Mode, Program, StateBehavior, Step,
    BLANK_SYMBOL,
};
