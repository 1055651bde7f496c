//! This module provides functions for analyzing machine programs before a `Machine` is built
//! from them. The engine trusts its construction input, so every precondition it relies on
//! (valid state ids, consistent tape arity, alphabet symbols) is checked here.

use crate::command::Command;
use crate::types::{is_valid_symbol, MachineError, Mode, Program};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::warn;

/// Represents the errors that can be found during the analysis of a program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The program declares no states at all.
    NoStates,
    /// The start state id is out of range.
    InvalidStartState(usize),
    /// Holding or accepting ids that are out of range.
    UndefinedTerminalStates(Vec<usize>),
    /// Commands whose source or target state is out of range.
    UndefinedCommandStates(Vec<String>),
    /// Commands whose symbol or direction count differs from the machine's tape count.
    InconsistentArity { expected: usize, commands: Vec<String> },
    /// Symbols outside the tape alphabet.
    InvalidSymbols(Vec<char>),
    /// Pairs of commands sharing a key but differing in payload (strict mode only).
    ConflictingCommands(Vec<(String, String)>),
}

impl From<AnalysisError> for MachineError {
    /// Converts an `AnalysisError` into a `MachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        let message = match error {
            AnalysisError::NoStates => "No states defined".to_string(),
            AnalysisError::InvalidStartState(id) => format!("Invalid start state: {id}"),
            AnalysisError::UndefinedTerminalStates(ids) => {
                format!("Terminal states are out of range: {ids:?}")
            }
            AnalysisError::UndefinedCommandStates(commands) => {
                format!("Commands reference undefined states: {commands:?}")
            }
            AnalysisError::InconsistentArity { expected, commands } => format!(
                "Commands must address {expected} output/working tapes: {commands:?}"
            ),
            AnalysisError::InvalidSymbols(symbols) => {
                format!("Symbols outside the tape alphabet: {symbols:?}")
            }
            AnalysisError::ConflictingCommands(pairs) => {
                format!("Conflicting commands for the same configuration: {pairs:?}")
            }
        };

        MachineError::ValidationError(message)
    }
}

/// Analyzes a program for structural errors.
///
/// Checks run in order and stop at the first error. Conflicting commands are an error in
/// `Mode::Strict`. Warnings for conflicts (in `Mode::Normal`) and for states unreachable from
/// the start state are only logged once every check has passed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(MachineError::ValidationError)` if any check fails.
pub fn analyze(program: &Program) -> Result<(), MachineError> {
    [
        check_structure,
        check_start_state,
        check_terminal_states,
        check_command_states,
        check_arity,
        check_symbols,
        check_conflicts,
    ]
    .iter()
    .try_for_each(|check| check(program))?;

    for (winner, shadowed) in find_conflicts(&program.commands) {
        warn!(%winner, %shadowed, "conflicting commands, the first one wins");
    }

    let unreachable = unreachable_states(program);
    if !unreachable.is_empty() {
        warn!(name = %program.name, states = ?unreachable, "unreachable states");
    }

    Ok(())
}

/// Finds pairs of commands that share a key but differ in payload.
///
/// The first element of each pair is the command that wins at run time.
pub fn find_conflicts(commands: &[Command]) -> Vec<(&Command, &Command)> {
    let mut first_by_key: HashMap<(usize, char, &[char]), &Command> = HashMap::new();
    let mut conflicts = Vec::new();

    for command in commands {
        let key = (command.source(), command.input(), command.working());
        match first_by_key.get(&key) {
            Some(first) if *first != command => conflicts.push((*first, command)),
            Some(_) => {}
            None => {
                first_by_key.insert(key, command);
            }
        }
    }

    conflicts
}

/// Returns the states that cannot be reached from the start state, in id order.
pub fn unreachable_states(program: &Program) -> Vec<usize> {
    let mut reachable = HashSet::from([program.start]);
    let mut queue = VecDeque::from([program.start]);

    while let Some(state) = queue.pop_front() {
        for command in program.commands.iter().filter(|c| c.source() == state) {
            if reachable.insert(command.target()) {
                queue.push_back(command.target());
            }
        }
    }

    (0..program.states)
        .filter(|id| !reachable.contains(id))
        .collect()
}

fn check_structure(program: &Program) -> Result<(), AnalysisError> {
    if program.states == 0 {
        return Err(AnalysisError::NoStates);
    }

    Ok(())
}

fn check_start_state(program: &Program) -> Result<(), AnalysisError> {
    if program.start >= program.states {
        return Err(AnalysisError::InvalidStartState(program.start));
    }

    Ok(())
}

/// Checks that every holding and accepting id names an existing state.
fn check_terminal_states(program: &Program) -> Result<(), AnalysisError> {
    let mut undefined: Vec<usize> = program
        .holding
        .iter()
        .chain(&program.accepting)
        .copied()
        .filter(|&id| id >= program.states)
        .collect();

    if undefined.is_empty() {
        return Ok(());
    }

    undefined.sort_unstable();
    undefined.dedup();
    Err(AnalysisError::UndefinedTerminalStates(undefined))
}

/// Checks that every command's source and target state exists.
fn check_command_states(program: &Program) -> Result<(), AnalysisError> {
    let undefined: Vec<String> = program
        .commands
        .iter()
        .filter(|c| c.source() >= program.states || c.target() >= program.states)
        .map(ToString::to_string)
        .collect();

    if undefined.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UndefinedCommandStates(undefined))
    }
}

/// Checks that every command reads, writes and moves exactly one symbol per output/working tape.
fn check_arity(program: &Program) -> Result<(), AnalysisError> {
    let expected = program.arity();
    let commands: Vec<String> = program
        .commands
        .iter()
        .filter(|c| {
            c.working().len() != expected
                || c.write().len() != expected
                || c.write_moves().len() != expected
        })
        .map(ToString::to_string)
        .collect();

    if commands.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::InconsistentArity { expected, commands })
    }
}

/// Checks that commands only use symbols of the tape alphabet.
///
/// The text parser already rejects such symbols; programs loaded from JSON are only checked here.
fn check_symbols(program: &Program) -> Result<(), AnalysisError> {
    let mut invalid: Vec<char> = program
        .commands
        .iter()
        .flat_map(|c| c.symbols())
        .filter(|&c| !is_valid_symbol(c))
        .collect();

    if invalid.is_empty() {
        return Ok(());
    }

    invalid.sort_unstable();
    invalid.dedup();
    Err(AnalysisError::InvalidSymbols(invalid))
}

/// Rejects commands that would shadow each other at run time, in strict mode only.
fn check_conflicts(program: &Program) -> Result<(), AnalysisError> {
    if program.mode != Mode::Strict {
        return Ok(());
    }

    let pairs: Vec<(String, String)> = find_conflicts(&program.commands)
        .iter()
        .map(|(first, second)| (first.to_string(), second.to_string()))
        .collect();

    if pairs.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::ConflictingCommands(pairs))
    }
}
