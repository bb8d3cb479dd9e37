use std::collections::HashMap;
use std::sync::Arc;

use tracing::{event, Level};

use crate::core::{CardBitSet, Pocket};

use super::errors::Result;
use super::pocket_odds::PocketOdds;
use super::pocket_ranks::PocketRanks;
use super::pocket_scores::PocketScores;

/// Holds the value computed for the most recent board.
///
/// Asking for the same board again hands back the same `Arc`. Asking for a
/// different board drops the old value and builds a new one.
#[derive(Debug)]
pub struct BoardCache<V> {
    entry: Option<(CardBitSet, Arc<V>)>,
}

impl<V> Default for BoardCache<V> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<V> BoardCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `community`, building it on a miss.
    ///
    /// A failed build leaves the previous entry in place.
    pub fn get_or_try_insert<F>(&mut self, community: CardBitSet, build: F) -> Result<Arc<V>>
    where
        F: FnOnce(CardBitSet) -> Result<V>,
    {
        if let Some((key, value)) = &self.entry {
            if *key == community {
                event!(Level::TRACE, %community, "board cache hit");
                return Ok(value.clone());
            }
        }
        event!(Level::TRACE, %community, "board cache miss");
        let value = Arc::new(build(community)?);
        self.entry = Some((community, value.clone()));
        Ok(value)
    }

    /// The board currently cached, if any.
    pub fn community(&self) -> Option<CardBitSet> {
        self.entry.as_ref().map(|(k, _)| *k)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

/// The strength caches a strategy keeps for the hand in progress.
///
/// Odds are kept per pocket for the current board. Moving to a new board
/// forgets every pocket computed for the old one.
#[derive(Debug, Default)]
pub struct PocketCaches {
    scores: BoardCache<PocketScores>,
    ranks: BoardCache<PocketRanks>,
    odds_board: Option<CardBitSet>,
    odds: HashMap<Pocket, Arc<PocketOdds>>,
}

impl PocketCaches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scores(&mut self, community: CardBitSet) -> Result<Arc<PocketScores>> {
        self.scores.get_or_try_insert(community, PocketScores::new)
    }

    pub fn ranks(&mut self, community: CardBitSet) -> Result<Arc<PocketRanks>> {
        // A hit must not evict the scores of another board.
        if self.ranks.community() == Some(community) {
            return self.ranks.get_or_try_insert(community, PocketRanks::new);
        }
        let scores = self.scores(community)?;
        self.ranks
            .get_or_try_insert(community, |_| Ok(PocketRanks::from_scores(&scores)))
    }

    pub fn odds(&mut self, community: CardBitSet, pocket: Pocket) -> Result<Arc<PocketOdds>> {
        if self.odds_board != Some(community) {
            self.odds.clear();
            self.odds_board = Some(community);
        }
        if let Some(odds) = self.odds.get(&pocket) {
            event!(Level::TRACE, %community, %pocket, "odds cache hit");
            return Ok(odds.clone());
        }
        let scores = self.scores(community)?;
        let odds = Arc::new(PocketOdds::from_scores(&scores, pocket)?);
        self.odds.insert(pocket, odds.clone());
        Ok(odds)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.scores.clear();
        self.ranks.clear();
        self.odds_board = None;
        self.odds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiError;

    fn board(s: &str) -> CardBitSet {
        CardBitSet::from_str_cards(s).unwrap()
    }

    fn pocket(s: &str) -> Pocket {
        Pocket::from_str_cards(s).unwrap()
    }

    #[test]
    fn test_board_cache_single_slot() {
        let mut cache: BoardCache<usize> = BoardCache::new();
        let mut builds = 0;
        let a = board("AsKhQd");
        let b = board("AsKhJd");
        let first = cache
            .get_or_try_insert(a, |c| {
                builds += 1;
                Ok(c.count())
            })
            .unwrap();
        let again = cache.get_or_try_insert(a, |_| Ok(99)).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(1, builds);

        let other = cache.get_or_try_insert(b, |_| Ok(7)).unwrap();
        assert_eq!(7, *other);
        let back = cache.get_or_try_insert(a, |_| Ok(3)).unwrap();
        assert!(!Arc::ptr_eq(&first, &back));
        assert_eq!(3, *back);
    }

    #[test]
    fn test_failed_build_keeps_entry() {
        let mut cache: BoardCache<usize> = BoardCache::new();
        let a = board("AsKhQd");
        cache.get_or_try_insert(a, |_| Ok(1)).unwrap();
        let err = cache.get_or_try_insert(board("2c"), |c| Err(AiError::InvalidCommunity(c.count())));
        assert_eq!(Err(AiError::InvalidCommunity(1)), err);
        assert_eq!(Some(a), cache.community());
    }

    #[test]
    fn test_ranks_same_instance() {
        let mut caches = PocketCaches::new();
        let flop = board("AsKhQd");
        let one = caches.ranks(flop).unwrap();
        let two = caches.ranks(flop).unwrap();
        assert!(Arc::ptr_eq(&one, &two));

        let turn = board("AsKhQdJc");
        let three = caches.ranks(turn).unwrap();
        assert!(!Arc::ptr_eq(&one, &three));
        assert_eq!(turn, three.community());
    }

    #[test]
    fn test_ranks_reject_pre_flop() {
        let mut caches = PocketCaches::new();
        assert_eq!(
            AiError::InvalidCommunity(0),
            caches.ranks(CardBitSet::new()).unwrap_err()
        );
    }

    #[test]
    fn test_scores_same_instance() {
        let mut caches = PocketCaches::new();
        let river = board("AsKhQdJcTs");
        let one = caches.scores(river).unwrap();
        let two = caches.scores(river).unwrap();
        assert!(Arc::ptr_eq(&one, &two));
    }

    #[test]
    fn test_odds_per_pocket_and_board() {
        let mut caches = PocketCaches::new();
        let turn = board("AsKhQd2c");
        let other_turn = board("AsKhJd2c");
        let p1 = pocket("JcTs");
        let p2 = pocket("9h8d");

        let a = caches.odds(turn, p1).unwrap();
        let b = caches.odds(turn, p1).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let c = caches.odds(turn, p2).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));

        let _ = caches.odds(other_turn, p2).unwrap();
        let d = caches.odds(turn, p1).unwrap();
        assert!(!Arc::ptr_eq(&a, &d));
    }
}
