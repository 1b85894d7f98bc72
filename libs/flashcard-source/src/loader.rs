//! Acquire, parse and hand a deck to a study session.
//!
//! Every failure on the way is recovered: the caller always ends up with a
//! session, at worst an empty one carrying a [`Notice`].

use flashcard_core::{parse_with, Notice, ParseError, Record, RenderSink, SessionConfig, StudyApp};
use tracing::{info, warn};

use crate::provider::SourceProvider;

/// Result of one acquisition + parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    pub dropped_lines: usize,
    /// Set when the deck is empty, explaining why.
    pub notice: Option<Notice>,
}

/// Acquire `identifier` from `provider` and parse it.
pub async fn load<P: SourceProvider>(
    provider: &P,
    identifier: &str,
    config: &SessionConfig,
) -> LoadOutcome {
    let text = match provider.acquire(identifier).await {
        Ok(text) => text,
        Err(e) => {
            warn!(identifier, error = %e, "could not acquire deck source");
            return LoadOutcome {
                notice: Some(Notice::SourceUnavailable {
                    message: e.to_string(),
                }),
                ..LoadOutcome::default()
            };
        }
    };

    match parse_with(&text, config) {
        Ok(deck) => {
            if deck.dropped_lines > 0 {
                warn!(identifier, dropped = deck.dropped_lines, "dropped malformed lines");
            }
            info!(identifier, cards = deck.len(), "loaded deck");
            let notice = deck.is_empty().then_some(Notice::NoCards);
            LoadOutcome {
                records: deck.records,
                dropped_lines: deck.dropped_lines,
                notice,
            }
        }
        Err(ParseError::EmptyInput) => {
            warn!(identifier, "deck source is empty");
            LoadOutcome {
                notice: Some(Notice::NoCards),
                ..LoadOutcome::default()
            }
        }
    }
}

/// Loads one source identifier into study sessions.
///
/// Acquisition methods take `&mut self`, so at most one acquisition per
/// loader is ever in flight. Dropping a pending `reload` leaves the previous
/// session untouched.
pub struct Loader<P> {
    provider: P,
    identifier: String,
    config: SessionConfig,
    last_dropped_lines: usize,
}

impl<P: SourceProvider> Loader<P> {
    pub fn new(provider: P, identifier: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            provider,
            identifier: identifier.into(),
            config,
            last_dropped_lines: 0,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Malformed lines dropped by the most recent load.
    pub fn last_dropped_lines(&self) -> usize {
        self.last_dropped_lines
    }

    /// Acquire the source and start the first session.
    pub async fn start<S: RenderSink>(&mut self, sink: S) -> StudyApp<S> {
        let outcome = self.fetch().await;
        match outcome.notice {
            Some(notice @ Notice::SourceUnavailable { .. }) => {
                StudyApp::unavailable(notice, self.config.clone(), sink)
            }
            _ => StudyApp::new(outcome.records, self.config.clone(), sink),
        }
    }

    /// Re-acquire the source and replace the session in `app`.
    ///
    /// The app keeps its own orientation and deck limit across the reload.
    pub async fn reload<S: RenderSink>(&mut self, app: &mut StudyApp<S>) {
        let outcome = self.fetch().await;
        app.replace_records(outcome.records, outcome.notice);
    }

    async fn fetch(&mut self) -> LoadOutcome {
        let outcome = load(&self.provider, &self.identifier, &self.config).await;
        self.last_dropped_lines = outcome.dropped_lines;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemorySource;
    use flashcard_core::{Phase, Snapshot};
    use pretty_assertions::assert_eq;

    fn config() -> SessionConfig {
        SessionConfig {
            shuffle_seed: Some(3),
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn load_parses_records() {
        let source = MemorySource::new().with("deck", "front,back\nhello,こんにちは\nbroken line");
        let outcome = load(&source, "deck", &config()).await;
        assert_eq!(outcome.records, vec![Record::new("hello", "こんにちは")]);
        assert_eq!(outcome.dropped_lines, 1);
        assert_eq!(outcome.notice, None);
    }

    #[tokio::test]
    async fn load_recovers_from_missing_source() {
        let outcome = load(&MemorySource::new(), "nope", &config()).await;
        assert!(outcome.records.is_empty());
        assert!(matches!(outcome.notice, Some(Notice::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn load_recovers_from_empty_text() {
        let source = MemorySource::new().with("blank", "   \n");
        let outcome = load(&source, "blank", &config()).await;
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.notice, Some(Notice::NoCards));
    }

    #[tokio::test]
    async fn header_only_source_has_no_cards() {
        let source = MemorySource::new().with("hdr", "front,back");
        let outcome = load(&source, "hdr", &config()).await;
        assert_eq!(outcome.notice, Some(Notice::NoCards));
    }

    #[tokio::test]
    async fn start_with_unavailable_source_renders_notice() {
        let mut loader = Loader::new(MemorySource::new(), "missing", config());
        let mut frames: Vec<Snapshot> = Vec::new();
        let mut app = loader.start(|s: &Snapshot| frames.push(s.clone())).await;
        assert!(!app.mark_known());
        assert_eq!(app.snapshot().phase, Phase::Summary);
        drop(app);
        assert_eq!(frames.len(), 1);
        assert!(matches!(frames[0].notice, Some(Notice::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn reload_replaces_session() {
        let source = MemorySource::new().with("deck", "a,1\nb,2");
        let mut loader = Loader::new(source, "deck", config());
        assert_eq!(loader.identifier(), "deck");
        assert_eq!(
            loader.provider().acquire(loader.identifier()).await.unwrap(),
            "a,1\nb,2"
        );
        let mut app = loader.start(|_: &Snapshot| {}).await;
        app.mark_known();
        assert_eq!(app.session().position(), 1);

        loader.reload(&mut app).await;
        assert_eq!(app.session().position(), 0);
        assert_eq!(app.session().deck_size(), 2);
        assert_eq!(loader.last_dropped_lines(), 0);
    }
}
