//! Study session state machine.
//!
//! A session is one pass through a dealt deck. It is `Active` while
//! `position < deck.len()` and enters `Summary` once every card has been
//! answered. Intents that do not apply to the current phase are ignored and
//! reported as `false`; a transition either applies completely or not at all.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::shuffle::{Dealer, Deck};
use crate::summary::{summarize, Summary};
use crate::types::{Phase, Record, RetryPolicy, SessionConfig};

/// Mutable progress state over one deck traversal.
#[derive(Debug, Clone)]
pub struct Session {
    dealer: Dealer,
    deck: Deck,
    position: usize,
    side_inverted: bool,
    initial_inverted: bool,
    revealed: bool,
    known_count: usize,
    missed: Vec<Arc<Record>>,
    missed_index: HashSet<Record>,
}

impl Session {
    /// Start a session over `records`, dealing the first deck.
    pub fn new(records: Vec<Record>, config: &SessionConfig) -> Self {
        let mut dealer = Dealer::new(records, config);
        let deck = dealer.deal();
        info!(
            cards = deck.len(),
            available = dealer.record_count(),
            policy = dealer.policy().as_str(),
            "session started"
        );
        Self::with_deck(dealer, deck, config.side_inverted)
    }

    /// A session with nothing to study. Starts in `Summary`.
    pub fn empty(config: &SessionConfig) -> Self {
        Self::new(Vec::new(), config)
    }

    fn with_deck(dealer: Dealer, deck: Deck, side_inverted: bool) -> Self {
        Self {
            dealer,
            deck,
            position: 0,
            side_inverted,
            initial_inverted: side_inverted,
            revealed: false,
            known_count: 0,
            missed: Vec::new(),
            missed_index: HashSet::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.position < self.deck.len() {
            Phase::Active
        } else {
            Phase::Summary
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase() == Phase::Active
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    pub fn deck(&self) -> &[Arc<Record>] {
        &self.deck
    }

    pub fn side_inverted(&self) -> bool {
        self.side_inverted
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn known_count(&self) -> usize {
        self.known_count
    }

    /// Records marked missed, in first-miss order, without duplicates.
    pub fn missed(&self) -> &[Arc<Record>] {
        &self.missed
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.dealer.policy()
    }

    /// The record under the cursor, if the session is active.
    pub fn current_record(&self) -> Option<&Record> {
        self.deck.get(self.position).map(Arc::as_ref)
    }

    /// Text currently visible on the card.
    ///
    /// Recomputed from (orientation, revealed) on every call.
    pub fn current_text(&self) -> Option<&str> {
        self.current_record().map(|record| {
            let (front, back) = record.oriented(self.side_inverted);
            if self.revealed {
                back
            } else {
                front
            }
        })
    }

    /// Turn the current card over.
    pub fn flip(&mut self) -> bool {
        if !self.accepts("flip") {
            return false;
        }
        self.revealed = !self.revealed;
        true
    }

    /// Swap which field counts as the front, keeping position and flip state.
    pub fn toggle_orientation(&mut self) -> bool {
        let inverted = !self.side_inverted;
        self.set_orientation(inverted)
    }

    /// Set whether the back field is shown as the front.
    pub fn set_orientation(&mut self, inverted: bool) -> bool {
        if !self.accepts("set_orientation") {
            return false;
        }
        self.side_inverted = inverted;
        true
    }

    pub fn mark_known(&mut self) -> bool {
        if !self.accepts("mark_known") {
            return false;
        }
        self.known_count += 1;
        self.advance();
        true
    }

    pub fn mark_missed(&mut self) -> bool {
        if !self.accepts("mark_missed") {
            return false;
        }
        let current = Arc::clone(&self.deck[self.position]);
        if self.missed_index.insert((*current).clone()) {
            self.missed.push(current);
        }
        self.advance();
        true
    }

    /// Start over with a new deck. Only valid in `Summary`.
    pub fn retry(&mut self) -> bool {
        if self.is_active() {
            debug!(position = self.position, "ignoring retry while active");
            return false;
        }
        let deck = self.dealer.redeal();
        info!(
            cards = deck.len(),
            policy = self.dealer.policy().as_str(),
            "session restarted"
        );
        self.deck = deck;
        self.position = 0;
        self.side_inverted = self.initial_inverted;
        self.revealed = false;
        self.known_count = 0;
        self.missed.clear();
        self.missed_index.clear();
        true
    }

    /// Orientation used by the next retry.
    pub fn set_initial_orientation(&mut self, inverted: bool) {
        self.initial_inverted = inverted;
    }

    /// Deck size limit used by the next retry.
    pub fn set_deck_size_limit(&mut self, limit: Option<usize>) {
        self.dealer.set_limit(limit);
    }

    /// Retry policy used by the next retry.
    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.dealer.set_policy(policy);
    }

    /// End-of-session statistics. `None` while the session is active.
    pub fn summary(&self) -> Option<Summary> {
        (!self.is_active()).then(|| summarize(self))
    }

    fn accepts(&self, intent: &'static str) -> bool {
        let active = self.is_active();
        if !active {
            debug!(intent, "ignoring intent outside an active session");
        }
        active
    }

    fn advance(&mut self) {
        self.position += 1;
        self.revealed = false;
        if !self.is_active() {
            info!(
                known = self.known_count,
                missed = self.missed.len(),
                total = self.deck.len(),
                "session complete"
            );
        }
    }
}
