//! End-of-session statistics.

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// A missed record as shown under the orientation at summary time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedEntry {
    pub front: String,
    pub back: String,
}

/// Missed records, or an explicit marker that there were none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "entries", rename_all = "snake_case")]
pub enum MissedList {
    NothingMissed,
    Missed(Vec<MissedEntry>),
}

impl MissedList {
    pub fn entries(&self) -> &[MissedEntry] {
        match self {
            Self::NothingMissed => &[],
            Self::Missed(entries) => entries,
        }
    }

    pub fn is_nothing_missed(&self) -> bool {
        matches!(self, Self::NothingMissed)
    }
}

/// Summary payload for a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub known_count: usize,
    pub missed: MissedList,
    /// Rounded share of known cards, 0 to 100.
    pub percent: u32,
}

/// Compute the summary for `session` from its recorded outcomes.
pub fn summarize(session: &Session) -> Summary {
    let total = session.deck_size();
    let known_count = session.known_count();
    let entries: Vec<MissedEntry> = session
        .missed()
        .iter()
        .map(|record| {
            let (front, back) = record.oriented(session.side_inverted());
            MissedEntry {
                front: front.to_string(),
                back: back.to_string(),
            }
        })
        .collect();

    Summary {
        total,
        known_count,
        missed: if entries.is_empty() {
            MissedList::NothingMissed
        } else {
            MissedList::Missed(entries)
        },
        percent: percent(known_count, total),
    }
}

/// `round(known / total * 100)`, or 0 for an empty deck.
pub fn percent(known: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (known as f64 / total as f64 * 100.0).round() as u32
}
