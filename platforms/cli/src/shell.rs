//! The interactive command shell.
//!
//! Every line is one command. Commands are recognized by the first letter of their first word,
//! case-insensitively, so `c`, `check` and `CHECK` are the same command.

use std::io::{self, BufRead, Write};
use std::path::Path;

use dtm::{Machine, MachineError, ProgramLoader};
use thiserror::Error;
use tracing::info;

/// Printed before each command when stdin is a terminal.
pub const PROMPT: &str = "dtm> ";

const HELP: &str = "\
This program simulates a deterministic Turing machine.
The following commands are available:

INPUT <path> : Loads the machine described in the given file.
RUN [word]   : Prints the content of the output tape after computing the word.
CHECK [word] : Prints whether the word is accepted by the machine.
PRINT        : Prints the commands of the machine.
HELP         : Prints this help message.
QUIT         : Terminates the program.
";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Input(String),
    Run(String),
    Check(String),
    Print,
    Help,
    Quit,
}

/// Reasons a line could not be turned into a `ShellCommand`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("There is no command")]
    NoCommand,
    /// An `INPUT` without exactly one path. The current machine is unloaded as well.
    #[error("The amount of arguments is incorrect.")]
    InputArguments,
    /// A `RUN` or `CHECK` with more than one word.
    #[error("The amount of arguments is incorrect.")]
    WordArguments,
    #[error("Command unknown. Type \"help\" for further hints.")]
    UnknownCommand,
}

impl ShellCommand {
    /// Parses one input line. `RUN` and `CHECK` treat a missing word as the empty word.
    pub fn parse(line: &str) -> Result<Self, ShellError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Err(ShellError::NoCommand);
        };

        let word = || match tokens.as_slice() {
            [_] => Ok(String::new()),
            [_, word] => Ok(word.to_string()),
            _ => Err(ShellError::WordArguments),
        };

        match first.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('i') => match tokens.as_slice() {
                [_, path] => Ok(ShellCommand::Input(path.to_string())),
                _ => Err(ShellError::InputArguments),
            },
            Some('r') => word().map(ShellCommand::Run),
            Some('c') => word().map(ShellCommand::Check),
            Some('p') => Ok(ShellCommand::Print),
            Some('h') => Ok(ShellCommand::Help),
            Some('q') => Ok(ShellCommand::Quit),
            _ => Err(ShellError::UnknownCommand),
        }
    }
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Holds the currently loaded machine and executes commands against it.
#[derive(Default)]
pub struct Shell {
    machine: Option<Machine>,
}

impl Shell {
    /// Creates a shell with no machine loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a machine from `path`, replacing the current one.
    ///
    /// On failure no machine is loaded afterwards.
    pub fn load(&mut self, path: &Path) -> Result<(), MachineError> {
        self.machine = None;

        let program = ProgramLoader::load_program(path)?;
        info!(path = %path.display(), name = %program.name, "program loaded");
        self.machine = Some(Machine::from(&program));

        Ok(())
    }

    /// Reads commands from `input` until `QUIT` or end of input.
    ///
    /// Results go to `out`, diagnostics to `err`. The prompt is only printed when `prompt` is set.
    pub fn run<R, W, E>(
        &mut self,
        input: R,
        out: &mut W,
        err: &mut E,
        prompt: bool,
    ) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut lines = input.lines();

        loop {
            if prompt {
                write!(out, "{PROMPT}")?;
                out.flush()?;
            }

            let Some(line) = lines.next().transpose()? else {
                return Ok(());
            };

            let command = match ShellCommand::parse(&line) {
                Ok(command) => command,
                Err(error) => {
                    if error == ShellError::InputArguments {
                        self.machine = None;
                    }
                    writeln!(err, "Error! {error}")?;
                    continue;
                }
            };

            if self.execute(command, out, err)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    fn execute<W, E>(
        &mut self,
        command: ShellCommand,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<Flow>
    where
        W: Write,
        E: Write,
    {
        match command {
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Help => write!(out, "{HELP}")?,
            ShellCommand::Input(path) => {
                if let Err(e) = self.load(Path::new(&path)) {
                    writeln!(err, "Error! {e}")?;
                }
            }
            ShellCommand::Print | ShellCommand::Run(_) | ShellCommand::Check(_) => {
                let Some(machine) = self.machine.as_mut() else {
                    writeln!(
                        err,
                        "Error! No machine has been loaded. Please use 'INPUT <path>' to do so."
                    )?;
                    return Ok(Flow::Continue);
                };

                match command {
                    ShellCommand::Print => write!(out, "{machine}")?,
                    ShellCommand::Run(word) => writeln!(out, "{}", machine.simulate(&word))?,
                    ShellCommand::Check(word) => {
                        let verdict = if machine.check(&word) { "accept" } else { "reject" };
                        writeln!(out, "{verdict}")?;
                    }
                    _ => {}
                }

                // Every run starts from blank tapes.
                machine.reset();
            }
        }

        Ok(Flow::Continue)
    }
}
