//! Error types for flashcard-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing delimited card text.
///
/// Malformed lines are not errors: they are dropped and counted in
/// [`crate::parser::ParsedDeck::dropped_lines`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,
}

/// Errors from parsing configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid retry policy: {0}")]
    InvalidRetryPolicy(String),

    #[error("invalid deck size limit: {0}")]
    InvalidDeckLimit(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
