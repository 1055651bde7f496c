use std::path::Path;

use dtm::{Machine, ProgramLoader};

const STARTS_WITH_A: &str = include_str!("../programs/starts-with-a.dtm");
const PALINDROME: &str = include_str!("../programs/palindrome.dtm");
const BINARY_INCREMENT: &str = include_str!("../programs/binary-increment.dtm");

/// Uses symbols that double as syntax, quoted on input and printed bare.
const RESERVED_SYMBOLS: &str = "
states: 2
tapes: 0
start: 0
accepting: 1
(0, ',', ~) -> (1, +1, '#', +1)
(0, '(', ~) -> (1, +1, ')', +1)
(0, ''', ~) -> (1, 0, ',', 0)
";

fn machine(source: &str) -> Machine {
    let program = ProgramLoader::load_program_from_string(source).expect("program parses");
    Machine::from(&program)
}

#[test]
fn starts_with_a_scenarios() {
    assert!(machine(STARTS_WITH_A).check("a"));
    assert!(machine(STARTS_WITH_A).check("abc"));
    assert!(!machine(STARTS_WITH_A).check("b"));
    assert!(!machine(STARTS_WITH_A).check(""));
    assert_eq!(machine(STARTS_WITH_A).simulate("a"), "a");
}

#[test]
fn palindrome_accepts_palindromes() {
    for word in ["", "a", "b", "aa", "aba", "abba", "babbab"] {
        assert!(machine(PALINDROME).check(word), "{word:?} should be accepted");
    }
}

#[test]
fn palindrome_rejects_other_words() {
    for word in ["ab", "ba", "aab", "abab", "abc", "c"] {
        assert!(!machine(PALINDROME).check(word), "{word:?} should be rejected");
    }
}

#[test]
fn palindrome_leaves_output_tape_blank() {
    assert_eq!(machine(PALINDROME).simulate("abba"), "");
}

#[test]
fn binary_increment_outputs_successor() {
    let cases = [
        ("", "1"),
        ("0", "1"),
        ("1", "10"),
        ("1011", "1100"),
        ("111", "1000"),
        ("10010", "10011"),
    ];

    for (word, expected) in cases {
        assert_eq!(machine(BINARY_INCREMENT).simulate(word), expected, "input {word:?}");
    }
}

#[test]
fn binary_increment_rejects_non_binary_input() {
    assert!(!machine(BINARY_INCREMENT).check("102"));
}

#[test]
fn printed_tables_reload_to_equivalent_machines() {
    for source in [STARTS_WITH_A, PALINDROME, BINARY_INCREMENT, RESERVED_SYMBOLS] {
        let program = ProgramLoader::load_program_from_string(source).unwrap();
        let printed = Machine::from(&program).to_string();

        let header = format!(
            "states: {}\ntapes: {}\nstart: {}\nholding: {}\naccepting: {}\n",
            program.states,
            program.tapes,
            program.start,
            join(&program.holding),
            join(&program.accepting),
        );
        let reloaded = ProgramLoader::load_program_from_string(&(header + &printed)).unwrap();

        assert_eq!(Machine::from(&reloaded).to_string(), printed);
        for word in ["", "a", "ab", "aba", "0", "11", ",", "(", "'"] {
            assert_eq!(
                Machine::from(&program).simulate(word),
                Machine::from(&reloaded).simulate(word)
            );
            assert_eq!(
                Machine::from(&program).check(word),
                Machine::from(&reloaded).check(word)
            );
        }
    }
}

#[test]
fn reserved_symbols_print_bare() {
    let program = ProgramLoader::load_program_from_string(RESERVED_SYMBOLS).unwrap();

    assert_eq!(
        Machine::from(&program).to_string(),
        "(0, ', ~) -> (1, 0, ,, 0)\n(0, (, ~) -> (1, +1, ), +1)\n(0, ,, ~) -> (1, +1, #, +1)\n"
    );
    assert_eq!(Machine::from(&program).simulate(","), "#");
    assert_eq!(Machine::from(&program).simulate("("), ")");
}

#[test]
fn bundled_programs_all_load() {
    let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("programs");
    let results = ProgramLoader::load_programs(&directory);

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(Result::is_ok));
}

fn join(ids: &[usize]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
