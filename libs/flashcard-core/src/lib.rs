//! Core flashcard study engine shared by every front end.
//!
//! Provides:
//! - Delimited text parser for term/definition decks
//! - Deck shuffling with reshuffle or replay on retry
//! - Session state machine (flip, orientation, known/missed, retry)
//! - Summary statistics and the render-sink boundary

pub mod app;
pub mod error;
pub mod parser;
pub mod session;
pub mod shuffle;
pub mod summary;
pub mod types;

pub use app::{Intent, RenderSink, Snapshot, StudyApp};
pub use error::{ConfigError, ParseError, Result};
pub use parser::{parse, parse_with, ParsedDeck};
pub use session::Session;
pub use shuffle::{pick_subset, shuffle, Dealer, Deck};
pub use summary::{summarize, MissedEntry, MissedList, Summary};
pub use types::{Notice, Phase, Record, RetryPolicy, SessionConfig, QUIZ_LIMIT_PRESET};
