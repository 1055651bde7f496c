//! This module defines the `Machine` struct, which simulates a deterministic multi-tape Turing
//! machine. The machine owns its states (and through them every command), one read-only input
//! tape and `tapes + 1` writable tapes, the first of which is the output tape.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace};

use crate::analyzer::find_conflicts;
use crate::command::Command;
use crate::state::MachineState;
use crate::tape::{Tape, WritableTape};
use crate::types::{Halt, Program, StateBehavior, Step};

/// Index of the output tape among the writable tapes.
pub const OUTPUT_TAPE: usize = 0;

/// A deterministic multi-tape Turing machine.
///
/// The transition table only grows: commands can be added but never removed. Tapes are
/// execution state and are not reset between runs; call `reset` or build a new machine to get
/// independent runs.
#[derive(Debug, Clone)]
pub struct Machine {
    states: Vec<MachineState>,
    begin: usize,
    current: usize,
    input: Tape,
    working: Vec<WritableTape>,
    step_count: usize,
}

impl Machine {
    /// Creates a machine with `state_count` states and `tape_count` working tapes besides the
    /// output tape.
    ///
    /// Every state starts as `Normal`, ids in `holding` become `Holding` and ids in `accepting`
    /// become `Accepting`; an id in both sets is accepting. Ids outside `0..state_count` are
    /// ignored.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not a valid state id.
    pub fn new(
        state_count: usize,
        tape_count: usize,
        start: usize,
        holding: &HashSet<usize>,
        accepting: &HashSet<usize>,
    ) -> Self {
        assert!(
            start < state_count,
            "start state {start} is out of range (machine has {state_count} states)"
        );

        let states = (0..state_count)
            .map(|id| {
                let mut state = MachineState::new(id, StateBehavior::Normal);
                if holding.contains(&id) {
                    state.set_behavior(StateBehavior::Holding);
                }
                if accepting.contains(&id) {
                    state.set_behavior(StateBehavior::Accepting);
                }
                state
            })
            .collect();

        Self {
            states,
            begin: start,
            current: start,
            input: Tape::new(),
            working: vec![WritableTape::new(); tape_count + 1],
            step_count: 0,
        }
    }

    /// Registers a command with its source state.
    ///
    /// # Panics
    ///
    /// Panics if the command's source state does not exist.
    pub fn add_command(&mut self, command: Command) {
        self.states[command.source()].add_command(command);
    }

    /// Runs the machine on `word` and reports whether it was accepted.
    ///
    /// The word is rejected if the machine reaches a holding state or gets stuck in a state
    /// without a matching command. This never returns if the transition table loops forever.
    pub fn check(&mut self, word: &str) -> bool {
        self.load(word);
        self.run().is_accepted()
    }

    /// Runs the machine on `word` and returns the content of the output tape.
    pub fn simulate(&mut self, word: &str) -> String {
        self.check(word);
        self.working[OUTPUT_TAPE].to_string()
    }

    /// Writes `word` onto the input tape and moves the machine to its start state.
    ///
    /// An empty word leaves the input tape untouched. Otherwise the input content is replaced by
    /// the word and the input head is placed on its first symbol. Writable tapes are kept as is.
    pub fn load(&mut self, word: &str) {
        if !word.is_empty() {
            self.input.set_content(word.chars());
            self.input.rewind();
        }
        self.current = self.begin;
    }

    /// Executes steps until the machine halts.
    pub fn run(&mut self) -> Halt {
        debug!(state = self.current, "running machine");

        let halt = loop {
            if let Step::Halt(halt) = self.step() {
                break halt;
            }
        };

        debug!(state = self.current, steps = self.step_count, ?halt, "machine halted");
        halt
    }

    /// Executes a single fetch/match/execute cycle.
    ///
    /// Returns `Step::Halt` without touching the tapes if the current state is terminal or has
    /// no command matching the symbols under the heads.
    pub fn step(&mut self) -> Step {
        let state = &self.states[self.current];

        match state.behavior() {
            StateBehavior::Accepting => return Step::Halt(Halt::Accepted),
            StateBehavior::Holding => return Step::Halt(Halt::Rejected),
            StateBehavior::Normal => {}
        }

        let input = self.input.read();
        let working = self.symbols();

        let Some(command) = state.find(input, &working) else {
            trace!(state = self.current, %input, ?working, "no matching command");
            return Step::Halt(Halt::Stuck);
        };

        trace!(step = self.step_count, %command, "executing command");

        self.input.move_head(command.input_move());
        for (i, tape) in self.working.iter_mut().enumerate() {
            tape.write(command.write()[i]);
            tape.move_head(command.write_moves()[i]);
        }

        self.current = command.target();
        self.step_count += 1;

        Step::Continue
    }

    /// Restores fresh tapes and the start state.
    pub fn reset(&mut self) {
        self.input.reset();
        self.working.iter_mut().for_each(|tape| tape.reset());
        self.current = self.begin;
        self.step_count = 0;
    }

    /// Returns the symbols under the output and working heads, output tape first.
    pub fn symbols(&self) -> Vec<char> {
        self.working.iter().map(|tape| tape.read()).collect()
    }

    /// Returns every pair of commands that share a key but differ in payload.
    ///
    /// The first command of each pair is the one that wins at run time.
    pub fn conflicts(&self) -> Vec<(&Command, &Command)> {
        self.states
            .iter()
            .flat_map(|state| find_conflicts(state.commands()))
            .collect()
    }

    /// Returns the id of the current state.
    pub fn state(&self) -> usize {
        self.current
    }

    /// Returns the id of the start state.
    pub fn begin_state(&self) -> usize {
        self.begin
    }

    /// Returns all states in id order.
    pub fn states(&self) -> &[MachineState] {
        &self.states
    }

    /// Returns the number of commands executed since construction or the last `reset`.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the read-only input tape.
    pub fn input_tape(&self) -> &Tape {
        &self.input
    }

    /// Returns the writable tapes, output tape first.
    pub fn working_tapes(&self) -> &[WritableTape] {
        &self.working
    }

    /// Returns the output tape, the first writable tape.
    pub fn output_tape(&self) -> &WritableTape {
        &self.working[OUTPUT_TAPE]
    }
}

/// Builds a machine from a program. The program is expected to have passed analysis.
impl From<&Program> for Machine {
    fn from(program: &Program) -> Self {
        let holding: HashSet<usize> = program.holding.iter().copied().collect();
        let accepting: HashSet<usize> = program.accepting.iter().copied().collect();

        let mut machine = Machine::new(
            program.states,
            program.tapes,
            program.start,
            &holding,
            &accepting,
        );

        for command in &program.commands {
            machine.add_command(command.clone());
        }

        debug!(
            name = %program.name,
            states = program.states,
            tapes = program.tapes,
            commands = program.commands.len(),
            "machine constructed"
        );

        machine
    }
}

/// Renders the transition table: every state's commands, in state id order.
impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.states.iter().try_for_each(|state| write!(f, "{state}"))
    }
}
