//! Machine states and their outgoing commands.

use crate::command::Command;
use crate::types::StateBehavior;
use std::fmt;

/// A state of the machine together with the commands that leave it.
///
/// Commands are kept in registration order, which is also the order used for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState {
    id: usize,
    behavior: StateBehavior,
    commands: Vec<Command>,
}

impl MachineState {
    /// Creates a state without commands.
    pub fn new(id: usize, behavior: StateBehavior) -> Self {
        Self {
            id,
            behavior,
            commands: Vec::new(),
        }
    }

    /// Appends a command. Duplicates and conflicting keys are not detected here.
    pub fn add_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Finds the first command, in registration order, that matches the configuration.
    pub fn find(&self, input: char, working: &[char]) -> Option<&Command> {
        self.commands
            .iter()
            .find(|command| command.matches(self.id, input, working))
    }

    /// Returns the state id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns whether the state is normal, holding or accepting.
    pub fn behavior(&self) -> StateBehavior {
        self.behavior
    }

    /// Changes the behavior, e.g. to mark the state as terminal.
    pub fn set_behavior(&mut self, behavior: StateBehavior) {
        self.behavior = behavior;
    }

    /// Returns the commands in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

/// Renders one command per line, ordered by key. Commands sharing a key keep registration order.
impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted: Vec<&Command> = self.commands.iter().collect();
        sorted.sort_by(|a, b| a.cmp_key(b));

        for command in sorted {
            writeln!(f, "{command}")?;
        }

        Ok(())
    }
}
