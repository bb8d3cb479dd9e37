use tracing::instrument;

use crate::core::{Card, CardBitSet, Pocket, Rankable};

use super::errors::{AiError, Result};
use super::pocket_matrix::PocketMatrix;

/// The score of every pocket's best hand on one board.
///
/// Pockets that share a card with the board score 0, every real hand scores
/// above that.
#[derive(Debug, Clone)]
pub struct PocketScores {
    community: CardBitSet,
    scores: PocketMatrix<u32>,
}

impl PocketScores {
    /// Rank every pocket on a flop, turn or river.
    #[instrument(level = "trace")]
    pub fn new(community: CardBitSet) -> Result<Self> {
        check_community(&community)?;
        let mut scores = PocketMatrix::default();
        for pocket in Pocket::all().filter(|p| p.is_disjoint(&community)) {
            scores.set_pocket(&pocket, (community | pocket.to_set()).rank().score());
        }
        Ok(Self { community, scores })
    }

    pub fn community(&self) -> CardBitSet {
        self.community
    }

    pub fn score(&self, pocket: &Pocket) -> u32 {
        self.scores.get_pocket(pocket)
    }

    pub fn score_cards(&self, a: Card, b: Card) -> u32 {
        self.scores.get_cards(a, b)
    }

    pub fn score_indices(&self, i: usize, j: usize) -> u32 {
        self.scores.get(i, j)
    }

    pub(crate) fn matrix(&self) -> &PocketMatrix<u32> {
        &self.scores
    }
}

/// Post flop boards only: three to five cards.
pub(crate) fn check_community(community: &CardBitSet) -> Result<()> {
    let n = community.count();
    if !(3..=5).contains(&n) {
        return Err(AiError::InvalidCommunity(n));
    }
    Ok(())
}
