//! Deck shuffling and dealing.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::{Record, RetryPolicy, SessionConfig};

/// Working deck for one session. Records are shared with the dealer.
pub type Deck = Vec<Arc<Record>>;

/// Return a uniformly random permutation of `items`, leaving the input untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    // Fisher-Yates
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Pick `min(count, items.len())` items at random, without replacement.
pub fn pick_subset<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut out = shuffle(items, rng);
    out.truncate(count);
    out
}

/// Produces decks from a parsed record set according to the retry policy.
///
/// The full permutation drawn at the last shuffle is retained so that
/// [`RetryPolicy::PreserveOrder`] can replay it exactly.
#[derive(Debug, Clone)]
pub struct Dealer {
    records: Vec<Arc<Record>>,
    permutation: Vec<Arc<Record>>,
    policy: RetryPolicy,
    limit: Option<usize>,
    rng: StdRng,
}

impl Dealer {
    pub fn new(records: Vec<Record>, config: &SessionConfig) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            records: records.into_iter().map(Arc::new).collect(),
            permutation: Vec::new(),
            policy: config.retry_policy,
            limit: config.deck_size_limit,
            rng,
        }
    }

    /// Number of records available to deal from.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RetryPolicy) {
        self.policy = policy;
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Takes effect at the next deal.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    /// Deal the deck for a new session. Always draws a fresh permutation.
    pub fn deal(&mut self) -> Deck {
        self.permutation = shuffle(&self.records, &mut self.rng);
        self.current_deck()
    }

    /// Deal the deck for a retry, honoring the retry policy.
    pub fn redeal(&mut self) -> Deck {
        match self.policy {
            RetryPolicy::Reshuffle => self.deal(),
            RetryPolicy::PreserveOrder if self.permutation.len() == self.records.len() => {
                debug!("replaying previous permutation");
                self.current_deck()
            }
            RetryPolicy::PreserveOrder => self.deal(),
        }
    }

    fn current_deck(&self) -> Deck {
        let size = self
            .limit
            .map_or(self.permutation.len(), |limit| limit.min(self.permutation.len()));
        self.permutation[..size].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn records(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::new(format!("f{i}"), format!("b{i}"))).collect()
    }

    fn seeded(seed: u64) -> SessionConfig {
        SessionConfig {
            shuffle_seed: Some(seed),
            ..SessionConfig::default()
        }
    }

    fn fronts(deck: &Deck) -> Vec<String> {
        deck.iter().map(|r| r.front.clone()).collect()
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<u32> = (0..50).collect();
        let mut output = shuffle(&input, &mut rng);
        assert_eq!(input, (0..50).collect::<Vec<_>>());
        output.sort_unstable();
        assert_eq!(output, input);
    }

    #[test]
    fn shuffle_small_inputs_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(shuffle::<u8, _>(&[], &mut rng), Vec::<u8>::new());
        assert_eq!(shuffle(&[42], &mut rng), vec![42]);
    }

    #[test]
    fn shuffle_is_deterministic_with_seed() {
        let make = |seed: u64| shuffle(&(0..20).collect::<Vec<u32>>(), &mut StdRng::seed_from_u64(seed));
        assert_eq!(make(99), make(99));
    }

    #[test]
    fn shuffle_reaches_every_ordering() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
        for _ in 0..6000 {
            *counts.entry(shuffle(&[1, 2, 3], &mut rng)).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            assert!((800..1200).contains(count), "skewed count {count}");
        }
    }

    #[test]
    fn pick_subset_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<u32> = (0..10).collect();
        let picked = pick_subset(&items, 4, &mut rng);
        assert_eq!(picked.len(), 4);
        let mut unique = picked.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 4);

        assert_eq!(pick_subset(&items, 25, &mut rng).len(), 10);
        assert!(pick_subset(&items, 0, &mut rng).is_empty());
    }

    #[test]
    fn dealer_applies_limit() {
        let config = SessionConfig {
            deck_size_limit: Some(3),
            ..seeded(5)
        };
        let mut dealer = Dealer::new(records(8), &config);
        assert_eq!(dealer.limit(), Some(3));
        assert_eq!(dealer.record_count(), 8);
        assert_eq!(dealer.deal().len(), 3);

        dealer.set_limit(Some(100));
        assert_eq!(dealer.deal().len(), 8);
    }

    #[test]
    fn preserve_order_replays_permutation() {
        let config = SessionConfig {
            retry_policy: RetryPolicy::PreserveOrder,
            ..seeded(11)
        };
        let mut dealer = Dealer::new(records(12), &config);
        let first = dealer.deal();
        let again = dealer.redeal();
        assert_eq!(fronts(&first), fronts(&again));
        assert!(first.iter().zip(&again).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[test]
    fn preserve_order_reapplies_limit_to_same_permutation() {
        let config = SessionConfig {
            retry_policy: RetryPolicy::PreserveOrder,
            ..seeded(11)
        };
        let mut dealer = Dealer::new(records(12), &config);
        let full = dealer.deal();
        dealer.set_limit(Some(4));
        let short = dealer.redeal();
        assert_eq!(fronts(&short), fronts(&full)[..4].to_vec());
    }

    #[test]
    fn reshuffle_draws_new_permutation() {
        let mut dealer = Dealer::new(records(12), &seeded(11));
        let first = dealer.deal();
        let retries: Vec<Vec<String>> = (0..5).map(|_| fronts(&dealer.redeal())).collect();
        assert!(retries.iter().any(|order| *order != fronts(&first)));
        for order in retries {
            let mut sorted = order.clone();
            sorted.sort();
            let mut expected = fronts(&first);
            expected.sort();
            assert_eq!(sorted, expected);
        }
    }
}
