//! This module defines the core data structures and types shared by the engine and the program
//! loader: head directions, state behaviors, program descriptions, step outcomes and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::command::Command;
use crate::Rule;

/// The reserved blank symbol. Every tape cell that was never written reads as this symbol.
pub const BLANK_SYMBOL: char = '~';
/// The first symbol of the printable tape alphabet.
pub const FIRST_SYMBOL: char = '!';
/// The last symbol of the printable tape alphabet.
pub const LAST_SYMBOL: char = '}';

/// Checks whether `c` may appear on a tape or in a transition rule.
///
/// A symbol is valid if it falls within `FIRST_SYMBOL..=LAST_SYMBOL`, or is exactly the
/// `BLANK_SYMBOL`.
pub fn is_valid_symbol(c: char) -> bool {
    if c > LAST_SYMBOL {
        c == BLANK_SYMBOL
    } else {
        c >= FIRST_SYMBOL
    }
}

/// Represents the possible directions a tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell towards the start of the tape.
    Back,
    /// Keep the head in the same position.
    Stay,
    /// Move the head one cell towards the end of the tape.
    Forward,
}

impl Direction {
    /// Returns the signed label of the direction as used in rendered commands.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Back => "-1",
            Direction::Stay => "0",
            Direction::Forward => "+1",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Determines how the machine behaves once it enters a state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateBehavior {
    /// Non-terminal state; the machine keeps executing commands.
    #[default]
    Normal,
    /// Terminal state; the input word is rejected.
    Holding,
    /// Terminal state; the input word is accepted.
    Accepting,
}

impl StateBehavior {
    /// Returns `true` for the two terminal behaviors.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StateBehavior::Normal)
    }
}

/// Controls how the analyzer treats commands that share a key but differ in payload.
///
/// - `Normal` (default): conflicts are logged and the first registered command wins.
/// - `Strict`: conflicts are rejected when the program is loaded.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Strict,
}

/// A machine description as produced by the parser, before it is turned into a `Machine`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// Human readable name of the program.
    #[serde(default = "default_name")]
    pub name: String,
    /// Conflict handling mode.
    #[serde(default)]
    pub mode: Mode,
    /// Number of states. State ids range over `0..states`.
    pub states: usize,
    /// Number of working tapes in addition to the output tape.
    pub tapes: usize,
    /// Id of the start state.
    pub start: usize,
    /// Ids of the holding (rejecting) states.
    #[serde(default)]
    pub holding: Vec<usize>,
    /// Ids of the accepting states.
    #[serde(default)]
    pub accepting: Vec<usize>,
    /// Transition rules in registration order.
    #[serde(default)]
    pub commands: Vec<Command>,
}

pub(crate) fn default_name() -> String {
    "Untitled".to_string()
}

impl Program {
    /// Number of tapes each command must address: the output tape plus every working tape.
    pub fn arity(&self) -> usize {
        self.tapes + 1
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A command was executed and the machine is in a non-terminal state.
    Continue,
    /// The machine stopped.
    Halt(Halt),
}

/// The reason a machine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Reached an accepting state.
    Accepted,
    /// Reached a holding state.
    Rejected,
    /// No command of the current state matched the configuration.
    Stuck,
}

impl Halt {
    /// Returns `true` only for `Halt::Accepted`.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Halt::Accepted)
    }
}

/// Represents the errors that can occur while loading a program.
///
/// Running a machine never fails: a rejection is a regular outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Indicates a syntax error in a program definition.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structurally invalid program.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates a malformed JSON program description.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl From<serde_json::Error> for MachineError {
    fn from(error: serde_json::Error) -> Self {
        MachineError::JsonError(error.to_string())
    }
}
