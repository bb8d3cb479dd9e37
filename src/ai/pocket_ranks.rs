use tracing::{instrument, trace};

use crate::core::{Card, CardBitSet, Pocket};

use super::errors::Result;
use super::pocket_matrix::PocketMatrix;
use super::pocket_scores::PocketScores;

/// Raw hand strength of every pocket on one board.
///
/// Raw strength is the share of opponent holdings a pocket beats right now,
/// counting a tie as half a win. Nothing about future cards goes into it.
#[derive(Debug, Clone)]
pub struct PocketRanks {
    community: CardBitSet,
    strengths: PocketMatrix<f32>,
}

impl PocketRanks {
    pub fn new(community: CardBitSet) -> Result<Self> {
        let scores = PocketScores::new(community)?;
        Ok(Self::from_scores(&scores))
    }

    /// Compare every live pocket against every live opponent holding.
    #[instrument(level = "trace", skip(scores), fields(community = %scores.community()))]
    pub fn from_scores(scores: &PocketScores) -> Self {
        let community = scores.community();
        let live: Vec<(Pocket, u64, u32)> = scores
            .matrix()
            .iter()
            .filter(|(p, _)| p.is_disjoint(&community))
            .map(|(p, s)| (p, p.to_set().bits(), *s))
            .collect();

        let mut strengths = PocketMatrix::default();
        for (pocket, bits, score) in live.iter() {
            let (mut wins, mut ties, mut total) = (0u32, 0u32, 0u32);
            for (_, other_bits, other_score) in live.iter() {
                if bits & other_bits != 0 {
                    continue;
                }
                total += 1;
                match (*score).cmp(other_score) {
                    std::cmp::Ordering::Greater => wins += 1,
                    std::cmp::Ordering::Equal => ties += 1,
                    std::cmp::Ordering::Less => {}
                }
            }
            if total > 0 {
                let hs = (wins as f32 + ties as f32 / 2.0) / total as f32;
                strengths.set_pocket(pocket, hs);
            }
        }
        trace!(live = live.len(), "computed raw hand strengths");
        Self {
            community,
            strengths,
        }
    }

    pub fn community(&self) -> CardBitSet {
        self.community
    }

    /// Share of opponent holdings this pocket beats, ties counting half.
    pub fn raw_hand_strength(&self, pocket: &Pocket) -> f32 {
        self.strengths.get_pocket(pocket)
    }

    pub fn raw_hand_strength_cards(&self, a: Card, b: Card) -> f32 {
        self.strengths.get_cards(a, b)
    }

    pub fn raw_hand_strength_indices(&self, i: usize, j: usize) -> f32 {
        self.strengths.get(i, j)
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
    fn test_rejects_pre_flop() {
        assert_eq!(
            AiError::InvalidCommunity(0),
            PocketRanks::new(CardBitSet::new()).unwrap_err()
        );
        assert_eq!(
            AiError::InvalidCommunity(2),
            PocketRanks::new(board("AsKh")).unwrap_err()
        );
    }

    #[test]
    fn test_royal_flush_is_near_certain() {
        let ranks = PocketRanks::new(board("KsQsJs")).unwrap();
        assert!(ranks.raw_hand_strength(&pocket("AsTs")) > 0.95);
    }

    #[test]
    fn test_nothing_on_dry_board() {
        let ranks = PocketRanks::new(board("AsKh7d")).unwrap();
        assert!(ranks.raw_hand_strength(&pocket("3c2c")) < 0.10);
    }

    #[test]
    fn test_drawing_dead_on_trips_board() {
        let ranks = PocketRanks::new(board("7s7h7dKc2s")).unwrap();
        let hs = ranks.raw_hand_strength(&pocket("3c4d"));
        assert!(hs < 0.15, "hs = {hs}");
    }

    #[test]
    fn test_middle_pair() {
        let ranks = PocketRanks::new(board("As7h4d")).unwrap();
        let hs = ranks.raw_hand_strength(&pocket("7c6c"));
        assert!((0.50..=0.85).contains(&hs), "hs = {hs}");
    }

    #[test]
    fn test_every_value_in_range_and_symmetric() {
        let ranks = PocketRanks::new(board("9h8h2cKd")).unwrap();
        for p in Pocket::all() {
            let lo = p.low().index();
            let hi = p.high().index();
            let v = ranks.raw_hand_strength_indices(lo, hi);
            assert!((0.0..=1.0).contains(&v));
            assert_eq!(v, ranks.raw_hand_strength_indices(hi, lo));
        }
    }

    #[test]
    fn test_nuts_on_river() {
        // Broadway straight with no flush possible.
        let ranks = PocketRanks::new(board("AsKhQd2c3h")).unwrap();
        let nuts = ranks.raw_hand_strength_cards(
            Card::try_from("Jc").unwrap(),
            Card::try_from("Td").unwrap(),
        );
        assert!(nuts > 0.99);
    }

    #[test]
    fn test_board_cards_read_zero() {
        let ranks = PocketRanks::new(board("AsKhQd")).unwrap();
        assert_eq!(0.0, ranks.raw_hand_strength(&pocket("AsAd")));
    }
}
