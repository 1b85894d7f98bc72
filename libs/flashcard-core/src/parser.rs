//! Delimited text parser for card decks.
//!
//! # Format
//! ```text
//! front,back
//! apple,りんご
//! sky,空
//! ```
//!
//! The header row is optional. It is recognised when its first field matches
//! one of the configured front labels (case-insensitive). Every other line is
//! split on its first comma; anything after that comma, further commas
//! included, belongs to the back.

use crate::error::{ParseError, Result};
use crate::types::{Record, SessionConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Field delimiter.
pub const DELIMITER: char = ',';

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Records parsed from one source text, plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDeck {
    pub records: Vec<Record>,
    /// Names of the first two header columns, when a header row was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<(String, String)>,
    /// Non-blank lines dropped for lacking a usable front/back pair.
    pub dropped_lines: usize,
}

impl ParsedDeck {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Parse delimited content using the default front label.
pub fn parse(content: &str) -> Result<ParsedDeck> {
    parse_with(content, &SessionConfig::default())
}

/// Parse delimited content, recognising headers by `config.front_labels`.
pub fn parse_with(content: &str, config: &SessionConfig) -> Result<ParsedDeck> {
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
    let content = content.trim();
    if content.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut lines = content.lines().enumerate().peekable();
    let mut deck = ParsedDeck::default();

    if let Some((_, first)) = lines.peek() {
        if let Some(columns) = header_columns(first, config) {
            debug!(front = %columns.0, back = %columns.1, "detected header row");
            deck.columns = Some(columns);
            lines.next();
        }
    }

    for (idx, line) in lines {
        match parse_line(line) {
            LineType::Record(record) => deck.records.push(record),
            LineType::Blank => {}
            LineType::Malformed => {
                debug!(line = idx + 1, "dropping malformed line");
                deck.dropped_lines += 1;
            }
        }
    }

    debug!(
        records = deck.records.len(),
        dropped = deck.dropped_lines,
        "parsed deck"
    );
    Ok(deck)
}

enum LineType {
    Record(Record),
    Blank,
    Malformed,
}

fn parse_line(line: &str) -> LineType {
    if line.trim().is_empty() {
        return LineType::Blank;
    }

    match line.split_once(DELIMITER) {
        Some((front, back)) => {
            let record = Record::new(front, back);
            if record.front.is_empty() && record.back.is_empty() {
                LineType::Malformed
            } else {
                LineType::Record(record)
            }
        }
        None => LineType::Malformed,
    }
}

fn header_columns(line: &str, config: &SessionConfig) -> Option<(String, String)> {
    let mut fields = line.split(DELIMITER).map(str::trim);
    let front = fields.next()?;
    if !config.is_front_label(front) {
        return None;
    }
    let back = fields.next().unwrap_or_default();
    Some((front.to_string(), back.to_string()))
}
