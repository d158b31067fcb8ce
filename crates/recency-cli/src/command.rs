//! Script command parser using nom
//!
//! One command per line:
//! ```text
//! PUT <key> <value>
//! GET <key>
//! PEEK <key>
//! DEL <key>
//! LEN | KEYS | CLEAR | STATS
//! ```
//! Command names are case-insensitive, keys and values are signed 64-bit
//! integers, and `#` starts a comment.

use std::fmt;

use nom::{
    character::complete::{alpha1, i64 as signed, space0, space1},
    combinator::{all_consuming, map},
    sequence::{pair, preceded, terminated},
    IResult,
};

/// A parsed script command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Insert or overwrite a key
    Put(i64, i64),
    /// Read a key, promoting it
    Get(i64),
    /// Read a key without promoting it
    Peek(i64),
    /// Remove a key
    Del(i64),
    /// Number of cached entries
    Len,
    /// Keys from most to least recently used
    Keys,
    /// Drop every entry
    Clear,
    /// Cache counters
    Stats,
}

/// Error for a line that is not a valid command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not start with a known command name
    UnknownCommand(String),
    /// Known command with missing or malformed arguments
    InvalidArguments(&'static str),
    /// Integer argument does not fit in 64 bits
    OutOfRange(String),
    /// Line is not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownCommand(name) => write!(f, "unknown command '{}'", name),
            ParseError::InvalidArguments(usage) => write!(f, "wrong arguments, usage: {}", usage),
            ParseError::OutOfRange(arg) => write!(f, "value out of range: '{}'", arg),
            ParseError::InvalidUtf8 => write!(f, "invalid UTF-8"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one script line
///
/// Returns `Ok(None)` for blank and comment-only lines.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (rest, name) = command_name(line)
        .map_err(|_| ParseError::UnknownCommand(first_word(line).to_string()))?;

    let name = name.to_ascii_uppercase();
    let (usage, parsed) = match name.as_str() {
        "PUT" => ("PUT <key> <value>", args(rest, put_args)),
        "GET" => ("GET <key>", args(rest, map(key_arg, Command::Get))),
        "PEEK" => ("PEEK <key>", args(rest, map(key_arg, Command::Peek))),
        "DEL" => ("DEL <key>", args(rest, map(key_arg, Command::Del))),
        "LEN" => ("LEN", no_args(rest, Command::Len)),
        "KEYS" => ("KEYS", no_args(rest, Command::Keys)),
        "CLEAR" => ("CLEAR", no_args(rest, Command::Clear)),
        "STATS" => ("STATS", no_args(rest, Command::Stats)),
        _ => return Err(ParseError::UnknownCommand(first_word(line).to_string())),
    };

    match parsed {
        Some(command) => Ok(Some(command)),
        None => match overflowing_arg(rest) {
            Some(arg) => Err(ParseError::OutOfRange(arg.to_string())),
            None => Err(ParseError::InvalidArguments(usage)),
        },
    }
}

/// First argument that is a well-formed integer too large for i64
fn overflowing_arg(rest: &str) -> Option<&str> {
    rest.split_whitespace().find(|arg| {
        let digits = arg.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(arg);
        !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && arg.parse::<i64>().is_err()
    })
}

fn command_name(input: &str) -> IResult<&str, &str> {
    alpha1(input)
}

fn key_arg(input: &str) -> IResult<&str, i64> {
    preceded(space1, signed)(input)
}

fn put_args(input: &str) -> IResult<&str, Command> {
    map(pair(key_arg, key_arg), |(key, value)| Command::Put(key, value))(input)
}

fn args<'a, P>(input: &'a str, parser: P) -> Option<Command>
where
    P: FnMut(&'a str) -> IResult<&'a str, Command>,
{
    all_consuming(terminated(parser, space0))(input)
        .ok()
        .map(|(_, command)| command)
}

fn no_args(input: &str, command: Command) -> Option<Command> {
    let parsed: IResult<&str, &str> = all_consuming(space0)(input);
    parsed.ok().map(|_| command)
}

fn first_word(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or(line)
}
