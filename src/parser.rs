//! This module provides the parser for `.dtm` machine descriptions, utilizing the `pest` crate.
//! It turns the grammar defined in `grammar.pest` into a `Program` and validates it.

use crate::{
    analyzer::analyze,
    command::Command,
    types::{default_name, is_valid_symbol, Direction, MachineError, Mode, Program},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the machine description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses the given input string into a `Program`.
///
/// The parsed program is validated with [`analyze`] before being returned.
///
/// # Returns
///
/// * `Ok(Program)` if the input is successfully parsed and validated.
/// * `Err(MachineError::ParseError)` if there are syntax errors or invalid symbols.
/// * `Err(MachineError::ValidationError)` if a section is missing or the program fails analysis.
pub fn parse(input: &str) -> Result<Program, MachineError> {
    let root = MachineParser::parse(Rule::program, input.trim())
        .map_err(|e| MachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| MachineError::ValidationError("Empty program".to_string()))?;

    let program = parse_program(root)?;

    analyze(&program)?;

    Ok(program)
}

/// Parses the top-level statements of a program from a `Pair<Rule::program>`.
///
/// Header sections may appear in any order, each at most once. Commands keep their order.
fn parse_program(pair: Pair<Rule>) -> Result<Program, MachineError> {
    let mut name: Option<String> = None;
    let mut mode: Option<Mode> = None;
    let mut states: Option<usize> = None;
    let mut tapes: Option<usize> = None;
    let mut start: Option<usize> = None;
    let mut holding: Option<Vec<usize>> = None;
    let mut accepting: Option<Vec<usize>> = None;
    let mut commands = Vec::new();
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_inner_string(p).trim().to_string()),
            Rule::mode => mode = Some(parse_mode(p)),
            Rule::states => states = Some(parse_inner_number(p)?),
            Rule::tapes => tapes = Some(parse_inner_number(p)?),
            Rule::start => start = Some(parse_inner_number(p)?),
            Rule::holding => holding = Some(parse_numbers(p)?),
            Rule::accepting => accepting = Some(parse_numbers(p)?),
            Rule::command => commands.push(parse_command(p)?),
            _ => {} // EOI
        }
    }

    Ok(Program {
        name: name.unwrap_or_else(default_name),
        mode: mode.unwrap_or_default(),
        states: check_required_rule(states, "states")?,
        tapes: check_required_rule(tapes, "tapes")?,
        start: check_required_rule(start, "start")?,
        holding: holding.unwrap_or_default(),
        accepting: accepting.unwrap_or_default(),
        commands,
    })
}

/// Parses a single command from a `Pair<Rule::command>`.
///
/// Rule: command > key > (number, symbol+), payload > (number, direction, (symbol, direction)*)
fn parse_command(pair: Pair<Rule>) -> Result<Command, MachineError> {
    let mut pairs = pair.into_inner();
    let key = next_pair(&mut pairs)?;
    let payload = next_pair(&mut pairs)?;

    let mut key = key.into_inner();
    let source = parse_number(next_pair(&mut key)?)?;
    let input = parse_symbol(next_pair(&mut key)?)?;
    let working = key.map(parse_symbol).collect::<Result<Vec<_>, _>>()?;

    let mut payload = payload.into_inner();
    let target = parse_number(next_pair(&mut payload)?)?;
    let input_move = parse_direction(next_pair(&mut payload)?)?;

    let mut write = Vec::new();
    let mut write_moves = Vec::new();
    while let Some(symbol) = payload.next() {
        write.push(parse_symbol(symbol)?);
        write_moves.push(parse_direction(next_pair(&mut payload)?)?);
    }

    Ok(Command::new(
        source,
        input,
        working,
        target,
        input_move,
        write,
        write_moves,
    ))
}

/// Parses a single direction from a `Pair<Rule::direction>`.
///
/// Supports `-1`, `<` or `L` for back, `0` or `S` for stay, and `+1`, `1`, `>` or `R` for forward.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, MachineError> {
    let span = pair.as_span();
    match pair.as_str() {
        "-1" | "<" | "L" => Ok(Direction::Back),
        "0" | "S" => Ok(Direction::Stay),
        "+1" | "1" | ">" | "R" => Ok(Direction::Forward),
        other => Err(parse_error(&format!("Unsupported direction: {other}"), span)),
    }
}

/// Parses a single symbol, handling quoted and unquoted forms, and checks it against the alphabet.
fn parse_symbol(pair: Pair<Rule>) -> Result<char, MachineError> {
    let span = pair.as_span();
    let raw = pair.as_str();
    let symbol = match raw.chars().count() {
        1 => raw.chars().next(),
        _ => raw
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .and_then(|s| s.chars().next()),
    };

    match symbol {
        Some(c) if is_valid_symbol(c) => Ok(c),
        _ => Err(parse_error(&format!("Invalid symbol: {raw:?}"), span)),
    }
}

/// Parses the value of a `mode:` section.
fn parse_mode(pair: Pair<Rule>) -> Mode {
    match pair.into_inner().next().map(|p| p.as_str()) {
        Some("strict") => Mode::Strict,
        _ => Mode::Normal,
    }
}

/// Parses a comma separated id list from a `Pair<Rule::holding>` or `Pair<Rule::accepting>`.
fn parse_numbers(pair: Pair<Rule>) -> Result<Vec<usize>, MachineError> {
    pair.into_inner().map(parse_number).collect()
}

/// Parses the single number inside a header section.
fn parse_inner_number(pair: Pair<Rule>) -> Result<usize, MachineError> {
    parse_number(next_pair(&mut pair.into_inner())?)
}

/// Parses a `Pair<Rule::number>` into a `usize`.
fn parse_number(pair: Pair<Rule>) -> Result<usize, MachineError> {
    pair.as_str()
        .parse::<usize>()
        .map_err(|e| parse_error(&format!("Invalid number: {e}"), pair.as_span()))
}

/// Extracts the inner string content from a `Pair`.
fn parse_inner_string(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Returns the next pair, or a validation error if the grammar produced fewer pairs than expected.
fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>) -> Result<Pair<'i, Rule>, MachineError> {
    pairs
        .next()
        .ok_or_else(|| MachineError::ValidationError("Unexpected end of command".to_string()))
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks if a header section has already been declared, ensuring each appears at most once.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), MachineError> {
    if !matches!(
        rule,
        Rule::name
            | Rule::mode
            | Rule::states
            | Rule::tapes
            | Rule::start
            | Rule::holding
            | Rule::accepting
    ) {
        return Ok(());
    };

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks if a required section is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, name: &str) -> Result<T, MachineError> {
    value.ok_or_else(|| MachineError::ValidationError(format!("Missing '{name}' section")))
}
