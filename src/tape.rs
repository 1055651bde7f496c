//! Tape storage for the machine.
//!
//! A `Tape` is conceptually bi-infinite and blank-filled: the backing buffer only holds the
//! visited region and grows by one blank cell whenever the head steps past either edge.
//! The input tape is a plain `Tape`; the output and working tapes are `WritableTape`s.

use crate::types::{Direction, BLANK_SYMBOL};
use std::collections::VecDeque;
use std::fmt::{self, Write};
use std::ops::{Deref, DerefMut};

/// A read-only tape with a movable head.
///
/// Invariant: `cells` is never empty and `head < cells.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<char>,
    head: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// Creates a tape holding a single blank cell with the head on it.
    pub fn new() -> Self {
        Self {
            cells: VecDeque::from([BLANK_SYMBOL]),
            head: 0,
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells[self.head]
    }

    /// Moves the head one cell in `direction`, extending the tape with a blank if needed.
    ///
    /// Stepping off the left edge prepends a blank and keeps the head at index 0, so every
    /// existing cell shifts one index to the right.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Back => {
                if self.head == 0 {
                    self.cells.push_front(BLANK_SYMBOL);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Forward => {
                self.head += 1;
                if self.head == self.cells.len() {
                    self.cells.push_back(BLANK_SYMBOL);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Replaces the whole tape content.
    ///
    /// An empty sequence leaves a single blank cell. The head stays where it is if that
    /// position still exists, otherwise it is clamped to the last cell.
    pub fn set_content<I>(&mut self, content: I)
    where
        I: IntoIterator<Item = char>,
    {
        self.cells = content.into_iter().collect();
        if self.cells.is_empty() {
            self.cells.push_back(BLANK_SYMBOL);
        }
        self.head = self.head.min(self.cells.len() - 1);
    }

    /// Moves the head back to the first cell without touching the content.
    pub fn rewind(&mut self) {
        self.head = 0;
    }

    /// Restores the freshly constructed state: one blank cell, head at 0.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the current head index.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the number of cells visited so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A tape always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the visited cells from left to right.
    pub fn cells(&self) -> impl Iterator<Item = char> + '_ {
        self.cells.iter().copied()
    }
}

/// Renders the content with leading and trailing blanks stripped; interior blanks are kept.
impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.cells.iter().position(|&c| c != BLANK_SYMBOL) else {
            return Ok(());
        };
        let last = self
            .cells
            .iter()
            .rposition(|&c| c != BLANK_SYMBOL)
            .unwrap_or(first);

        self.cells
            .range(first..=last)
            .try_for_each(|&c| f.write_char(c))
    }
}

/// A tape whose head can also overwrite the current cell. Used for the output and working tapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritableTape {
    tape: Tape,
}

impl WritableTape {
    /// Creates a blank writable tape.
    pub fn new() -> Self {
        Self { tape: Tape::new() }
    }

    /// Overwrites the symbol under the head. The head does not move.
    pub fn write(&mut self, symbol: char) {
        let head = self.tape.head;
        self.tape.cells[head] = symbol;
    }
}

impl Deref for WritableTape {
    type Target = Tape;

    fn deref(&self) -> &Tape {
        &self.tape
    }
}

impl DerefMut for WritableTape {
    fn deref_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }
}

impl fmt::Display for WritableTape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tape, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tape_from(content: &str) -> Tape {
        let mut tape = Tape::new();
        tape.set_content(content.chars());
        tape
    }

    #[test]
    fn test_new_tape_reads_blank() {
        let tape = Tape::new();
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.len(), 1);
    }

    #[test]
    fn test_move_forward_extends_tape() {
        let mut tape = tape_from("ab");
        tape.move_head(Direction::Forward);
        assert_eq!(tape.read(), 'b');
        assert_eq!(tape.len(), 2);

        tape.move_head(Direction::Forward);
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert_eq!(tape.head(), 2);
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_move_back_prepends_blank() {
        let mut tape = tape_from("ab");
        tape.move_head(Direction::Back);

        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert_eq!(tape.cells().collect::<String>(), "~ab");

        // Existing cells shifted right by one.
        tape.move_head(Direction::Forward);
        assert_eq!(tape.read(), 'a');
    }

    #[test]
    fn test_stay_keeps_head() {
        let mut tape = tape_from("ab");
        tape.move_head(Direction::Stay);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.len(), 2);
    }

    #[test]
    fn test_set_content_empty_leaves_single_blank() {
        let mut tape = tape_from("abc");
        tape.set_content(std::iter::empty());
        assert_eq!(tape.len(), 1);
        assert_eq!(tape.read(), BLANK_SYMBOL);
    }

    #[test]
    fn test_set_content_clamps_head() {
        let mut tape = tape_from("abcd");
        for _ in 0..3 {
            tape.move_head(Direction::Forward);
        }
        assert_eq!(tape.read(), 'd');

        tape.set_content("xy".chars());
        assert_eq!(tape.head(), 1);
        assert_eq!(tape.read(), 'y');

        tape.rewind();
        assert_eq!(tape.read(), 'x');
    }

    #[test]
    fn test_render_trims_only_edges() {
        let tape = tape_from("~~a~b~~");
        assert_eq!(tape.to_string(), "a~b");

        let tape = tape_from("~~ab~cd~~");
        assert_eq!(tape.to_string(), "ab~cd");
    }

    #[test]
    fn test_render_blank_tape_is_empty() {
        assert_eq!(Tape::new().to_string(), "");
        assert_eq!(tape_from("~~~").to_string(), "");
    }

    #[test]
    fn test_write_then_read() {
        let mut tape = WritableTape::new();
        tape.write('x');
        assert_eq!(tape.read(), 'x');
        assert_eq!(tape.head(), 0);

        tape.move_head(Direction::Back);
        tape.write('y');
        assert_eq!(tape.to_string(), "yx");
    }

    #[test]
    fn test_reset() {
        let mut tape = WritableTape::new();
        tape.write('x');
        tape.move_head(Direction::Forward);
        tape.reset();

        assert_eq!(*tape, Tape::new());
    }
}
