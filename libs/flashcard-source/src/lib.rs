//! Deck source acquisition for the flashcard study engine.
//!
//! Fetches raw deck text from files or HTTP, recovers failures into an empty
//! deck with a notice, and starts [`flashcard_core::StudyApp`] sessions.

pub mod config;
pub mod error;
pub mod loader;
pub mod provider;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AcquisitionError, ConfigError, Result};
pub use loader::{load, LoadOutcome, Loader};
pub use provider::{AutoSource, FileSource, HttpSource, MemorySource, SourceProvider};
