//! Boundary between the session engine and the UI.
//!
//! The UI forwards learner [`Intent`]s to a [`StudyApp`], which applies them to
//! its [`Session`] and pushes a fresh [`Snapshot`] to the injected
//! [`RenderSink`] after every state change.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::parser::ParsedDeck;
use crate::session::Session;
use crate::summary::Summary;
use crate::types::{Notice, Phase, Record, SessionConfig};

/// Consumes state snapshots and draws them.
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot);
}

impl<F> RenderSink for F
where
    F: FnMut(&Snapshot),
{
    fn render(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Learner actions forwarded by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Intent {
    Flip,
    /// Show the back field as the front when `true`.
    ToggleOrientation(bool),
    MarkKnown,
    MarkMissed,
    Retry,
    /// Applied at the next (re)start.
    SetDeckSizeLimit(Option<usize>),
}

/// Everything the UI needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    /// Visible card text; `None` outside the active phase.
    pub text: Option<String>,
    pub position: usize,
    pub total: usize,
    pub revealed: bool,
    pub side_inverted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl Snapshot {
    /// Counter text such as `"3 / 10"`; `None` once the session is over.
    pub fn progress_label(&self) -> Option<String> {
        match self.phase {
            Phase::Active => Some(format!("{} / {}", self.position + 1, self.total)),
            Phase::Summary => None,
        }
    }
}

/// Owns one session and drives a render sink.
pub struct StudyApp<S: RenderSink> {
    session: Session,
    config: SessionConfig,
    notice: Option<Notice>,
    sink: S,
}

impl<S: RenderSink> StudyApp<S> {
    /// Start studying `records` and render the first card.
    pub fn new(records: Vec<Record>, config: SessionConfig, sink: S) -> Self {
        let session = Session::new(records, &config);
        let notice = (session.deck_size() == 0).then_some(Notice::NoCards);
        let mut app = Self {
            session,
            config,
            notice,
            sink,
        };
        app.render();
        app
    }

    /// Start from a parser result.
    pub fn from_parsed(deck: ParsedDeck, config: SessionConfig, sink: S) -> Self {
        Self::new(deck.records, config, sink)
    }

    /// An empty app carrying `notice`, used when no source text could be loaded.
    pub fn unavailable(notice: Notice, config: SessionConfig, sink: S) -> Self {
        let mut app = Self {
            session: Session::empty(&config),
            config,
            notice: Some(notice),
            sink,
        };
        app.render();
        app
    }

    /// Replace the whole session with freshly loaded records.
    pub fn replace_records(&mut self, records: Vec<Record>, notice: Option<Notice>) {
        self.session = Session::new(records, &self.config);
        self.notice = notice.or_else(|| (self.session.deck_size() == 0).then_some(Notice::NoCards));
        self.render();
    }

    /// Apply one intent. Returns whether it changed the state.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let applied = match intent {
            Intent::Flip => self.session.flip(),
            Intent::ToggleOrientation(inverted) => {
                let applied = self.session.set_orientation(inverted);
                if applied {
                    self.config.side_inverted = inverted;
                    self.session.set_initial_orientation(inverted);
                }
                applied
            }
            Intent::MarkKnown => self.session.mark_known(),
            Intent::MarkMissed => self.session.mark_missed(),
            Intent::Retry => {
                let applied = self.session.retry();
                if applied {
                    self.refresh_notice();
                }
                applied
            }
            Intent::SetDeckSizeLimit(limit) => {
                info!(?limit, "deck size limit changed");
                self.config.deck_size_limit = limit;
                self.session.set_deck_size_limit(limit);
                true
            }
        };
        if applied {
            self.render();
        }
        applied
    }

    pub fn flip(&mut self) -> bool {
        self.dispatch(Intent::Flip)
    }

    pub fn toggle_orientation(&mut self, inverted: bool) -> bool {
        self.dispatch(Intent::ToggleOrientation(inverted))
    }

    pub fn mark_known(&mut self) -> bool {
        self.dispatch(Intent::MarkKnown)
    }

    pub fn mark_missed(&mut self) -> bool {
        self.dispatch(Intent::MarkMissed)
    }

    pub fn retry(&mut self) -> bool {
        self.dispatch(Intent::Retry)
    }

    pub fn set_deck_size_limit(&mut self, limit: Option<usize>) -> bool {
        self.dispatch(Intent::SetDeckSizeLimit(limit))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn snapshot(&self) -> Snapshot {
        let session = &self.session;
        Snapshot {
            phase: session.phase(),
            text: session.current_text().map(str::to_string),
            position: session.position(),
            total: session.deck_size(),
            revealed: session.revealed(),
            side_inverted: session.side_inverted(),
            summary: session.summary(),
            notice: self.notice.clone(),
        }
    }

    /// Keep `NoCards` in step with the dealt deck; a source failure sticks.
    fn refresh_notice(&mut self) {
        if matches!(self.notice, Some(Notice::SourceUnavailable { .. })) {
            return;
        }
        self.notice = (self.session.deck_size() == 0).then_some(Notice::NoCards);
    }

    fn render(&mut self) {
        let snapshot = self.snapshot();
        self.sink.render(&snapshot);
    }
}
