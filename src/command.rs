//! Transition rules.
//!
//! A `Command` fires when the machine is in `source` state, the input head reads `input`, and
//! the output/working heads read `working`. It then moves the machine to `target`, moves the
//! input head and, for every output/working tape, writes a symbol and moves the head.

use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An immutable transition rule.
///
/// Two commands are equal only if every field, payload included, is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    source: usize,
    input: char,
    working: Vec<char>,
    target: usize,
    input_move: Direction,
    write: Vec<char>,
    write_moves: Vec<Direction>,
}

impl Command {
    /// Creates a command. No validation is performed: the arity of `working`, `write` and
    /// `write_moves` must match the machine's tape count, and both state ids must exist.
    pub fn new(
        source: usize,
        input: char,
        working: Vec<char>,
        target: usize,
        input_move: Direction,
        write: Vec<char>,
        write_moves: Vec<Direction>,
    ) -> Self {
        Self {
            source,
            input,
            working,
            target,
            input_move,
            write,
            write_moves,
        }
    }

    /// Checks whether this command applies to the given configuration.
    ///
    /// Only the key (source state, input symbol, working symbols) is compared.
    pub fn matches(&self, state: usize, input: char, working: &[char]) -> bool {
        self.source == state && self.input == input && self.working == working
    }

    /// Returns `true` if both commands share the same key.
    pub fn same_key(&self, other: &Command) -> bool {
        other.matches(self.source, self.input, &self.working)
    }

    /// Orders commands by source state, then input symbol, then working symbols.
    ///
    /// Commands with identical keys compare as `Equal` even when their payloads differ, so this
    /// is deliberately not an `Ord` implementation. Use it with a stable sort.
    pub fn cmp_key(&self, other: &Command) -> Ordering {
        self.source
            .cmp(&other.source)
            .then(self.input.cmp(&other.input))
            .then_with(|| self.working.cmp(&other.working))
    }

    /// Returns the state the command leaves from.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Returns the symbol expected under the input head.
    pub fn input(&self) -> char {
        self.input
    }

    /// Returns the symbols expected under the output and working heads, output tape first.
    pub fn working(&self) -> &[char] {
        &self.working
    }

    /// Returns the state the machine enters after the command.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Returns the move applied to the input head.
    pub fn input_move(&self) -> Direction {
        self.input_move
    }

    /// Returns the symbols written to the output and working tapes, output tape first.
    pub fn write(&self) -> &[char] {
        &self.write
    }

    /// Returns the moves applied to the output and working heads after writing.
    pub fn write_moves(&self) -> &[Direction] {
        &self.write_moves
    }

    /// Returns every symbol the command reads or writes.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        std::iter::once(self.input)
            .chain(self.working.iter().copied())
            .chain(self.write.iter().copied())
    }
}

/// Renders `(source, input, w0, w1, ...) -> (target, moveIn, w0', m0, w1', m1, ...)`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}", self.source, self.input)?;
        for symbol in &self.working {
            write!(f, ", {symbol}")?;
        }

        write!(f, ") -> ({}, {}", self.target, self.input_move)?;
        for (symbol, direction) in self.write.iter().zip(&self.write_moves) {
            write!(f, ", {symbol}, {direction}")?;
        }

        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(source: usize, input: char, working: &[char]) -> Command {
        Command::new(
            source,
            input,
            working.to_vec(),
            1,
            Direction::Forward,
            vec!['x'; working.len()],
            vec![Direction::Stay; working.len()],
        )
    }

    #[test]
    fn test_matches_compares_key_only() {
        let cmd = command(0, 'a', &['~', 'b']);

        assert!(cmd.matches(0, 'a', &['~', 'b']));
        assert!(!cmd.matches(1, 'a', &['~', 'b']));
        assert!(!cmd.matches(0, 'b', &['~', 'b']));
        assert!(!cmd.matches(0, 'a', &['b', '~']));
        assert!(!cmd.matches(0, 'a', &['~']));
    }

    #[test]
    fn test_equality_includes_payload() {
        let a = command(0, 'a', &['~']);
        let b = Command::new(
            0,
            'a',
            vec!['~'],
            2,
            Direction::Back,
            vec!['y'],
            vec![Direction::Forward],
        );

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.same_key(&b));
        assert_eq!(a.cmp_key(&b), Ordering::Equal);
    }

    #[test]
    fn test_key_ordering() {
        let a = command(0, 'b', &['a']);
        let b = command(1, 'a', &['a']);
        let c = command(0, 'a', &['z']);
        let d = command(0, 'a', &['b']);

        assert_eq!(a.cmp_key(&b), Ordering::Less);
        assert_eq!(c.cmp_key(&a), Ordering::Less);
        assert_eq!(d.cmp_key(&c), Ordering::Less);
        assert_eq!(c.cmp_key(&d), Ordering::Greater);
    }

    #[test]
    fn test_display() {
        let cmd = Command::new(
            0,
            'a',
            vec!['~', 'b'],
            3,
            Direction::Forward,
            vec!['a', '~'],
            vec![Direction::Forward, Direction::Back],
        );

        assert_eq!(cmd.to_string(), "(0, a, ~, b) -> (3, +1, a, +1, ~, -1)");
    }

    #[test]
    fn test_serde_round_trip() {
        let cmd = command(2, 'q', &['~']);
        let json = serde_json::to_string(&cmd).unwrap();
        let decoded: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, decoded);
    }
}
