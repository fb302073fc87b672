use crate::error::CypherError;
use crate::types::Sector;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Evolve { sector: Sector },
    Nas { sector: Sector },
    Shutdown,
}

/// Classification of one input line
#[derive(Debug)]
pub enum ParsedLine {
    Command(Command),
    /// Blank line
    Empty,
    /// Not a JSON object, or fields of the wrong type
    Malformed,
    /// Well-formed JSON with a missing or unrecognized `command`
    Unrecognized(Option<String>),
    /// Recognized command with unusable arguments
    Invalid(CypherError),
}

#[derive(Debug, Deserialize)]
struct RawCommand {
    command: Option<String>,
    sector: Option<String>,
}

/// Classify a raw input line. Bytes that are not UTF-8 are malformed.
pub fn parse_bytes(line: &[u8]) -> ParsedLine {
    match std::str::from_utf8(line) {
        Ok(text) => parse_line(text),
        Err(_) => ParsedLine::Malformed,
    }
}

pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Empty;
    }

    let raw: RawCommand = match serde_json::from_str::<Value>(line) {
        Ok(value) if value.is_object() => match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(_) => return ParsedLine::Malformed,
        },
        _ => return ParsedLine::Malformed,
    };

    let sector = || -> Result<Sector, CypherError> {
        raw.sector
            .as_deref()
            .map(|name| name.parse::<Sector>())
            .transpose()
            .map(Option::unwrap_or_default)
    };

    match raw.command.as_deref() {
        Some("evolve") => match sector() {
            Ok(sector) => ParsedLine::Command(Command::Evolve { sector }),
            Err(e) => ParsedLine::Invalid(e),
        },
        Some("nas") => match sector() {
            Ok(sector) => ParsedLine::Command(Command::Nas { sector }),
            Err(e) => ParsedLine::Invalid(e),
        },
        Some("shutdown") => ParsedLine::Command(Command::Shutdown),
        other => ParsedLine::Unrecognized(other.map(str::to_string)),
    }
}
