use std::cmp::Ordering;

use tracing::{instrument, trace};

use crate::core::{Card, CardBitSet, CardIter, Pocket, Rankable};

use super::errors::{AiError, Result};
use super::pocket_matrix::PocketMatrix;
use super::pocket_scores::PocketScores;

const AHEAD: usize = 0;
const TIED: usize = 1;
const BEHIND: usize = 2;

fn outcome(ours: u32, theirs: u32) -> usize {
    match ours.cmp(&theirs) {
        Ordering::Greater => AHEAD,
        Ordering::Equal => TIED,
        Ordering::Less => BEHIND,
    }
}

/// Strength of one pocket on a flop or turn, looking ahead to the river.
///
/// Every opponent holding is played against every way the board can run
/// out. How often the pocket moves from behind to ahead is the positive
/// potential, how often it falls from ahead to behind is the negative
/// potential. Effective hand strength against an opponent is the share of
/// runouts the pocket ends up winning, which is the same as
/// `HS * (1 - NPot) + (1 - HS) * PPot` for that single opponent.
#[derive(Debug, Clone)]
pub struct PocketOdds {
    community: CardBitSet,
    pocket: Pocket,
    hand_strength: f32,
    positive_potential: f32,
    negative_potential: f32,
    effective_hand_strength: f32,
    vs: PocketMatrix<f32>,
}

impl PocketOdds {
    pub fn new(community: CardBitSet, pocket: Pocket) -> Result<Self> {
        let scores = PocketScores::new(community)?;
        Self::from_scores(&scores, pocket)
    }

    /// Build from the scores already computed for the current board.
    #[instrument(level = "trace", skip(scores), fields(community = %scores.community(), pocket = %pocket))]
    pub fn from_scores(scores: &PocketScores, pocket: Pocket) -> Result<Self> {
        let community = scores.community();
        let to_come = match community.count() {
            3 => 2,
            4 => 1,
            5 => return Err(AiError::NoCardsToCome),
            n => return Err(AiError::InvalidCommunity(n)),
        };
        if !pocket.is_disjoint(&community) {
            return Err(AiError::InvalidPocket);
        }

        let known = community | pocket.to_set();
        let our_now = scores.score(&pocket);
        let opponents: Vec<(Pocket, u64, usize)> = Pocket::all()
            .filter(|p| p.is_disjoint(&known))
            .map(|p| (p, p.to_set().bits(), outcome(our_now, scores.score(&p))))
            .collect();

        // Per opponent: runouts won, tied and played.
        let mut won = vec![0u32; opponents.len()];
        let mut tied = vec![0u32; opponents.len()];
        let mut played = vec![0u32; opponents.len()];
        // Transitions summed over every opponent and runout, [now][river].
        let mut transitions = [[0u64; 3]; 3];

        let remaining = known.complement().to_vec();
        for runout in CardIter::new(&remaining, to_come) {
            let board = community | runout;
            let ours = (board | pocket.to_set()).rank().score();
            for (i, (opp, bits, now)) in opponents.iter().enumerate() {
                if bits & runout.bits() != 0 {
                    continue;
                }
                let theirs = (board | opp.to_set()).rank().score();
                let end = outcome(ours, theirs);
                played[i] += 1;
                match end {
                    AHEAD => won[i] += 1,
                    TIED => tied[i] += 1,
                    _ => {}
                }
                transitions[*now][end] += 1;
            }
        }

        let mut vs = PocketMatrix::default();
        let mut ehs_sum = 0.0f64;
        let mut counted = 0usize;
        let mut now_counts = [0u32; 3];
        for (i, (opp, _, now)) in opponents.iter().enumerate() {
            now_counts[*now] += 1;
            if played[i] == 0 {
                continue;
            }
            let ehs = (won[i] as f32 + tied[i] as f32 / 2.0) / played[i] as f32;
            vs.set_pocket(opp, ehs);
            ehs_sum += ehs as f64;
            counted += 1;
        }

        let total_now: u32 = now_counts.iter().sum();
        let hand_strength = if total_now == 0 {
            0.0
        } else {
            (now_counts[AHEAD] as f32 + now_counts[TIED] as f32 / 2.0) / total_now as f32
        };

        let row = |r: usize| transitions[r].iter().sum::<u64>() as f64;
        let ppot_den = row(BEHIND) + row(TIED) / 2.0;
        let positive_potential = if ppot_den > 0.0 {
            (transitions[BEHIND][AHEAD] as f64
                + transitions[BEHIND][TIED] as f64 / 2.0
                + transitions[TIED][AHEAD] as f64 / 2.0)
                / ppot_den
        } else {
            0.0
        };
        let npot_den = row(AHEAD) + row(TIED) / 2.0;
        let negative_potential = if npot_den > 0.0 {
            (transitions[AHEAD][BEHIND] as f64
                + transitions[TIED][BEHIND] as f64 / 2.0
                + transitions[AHEAD][TIED] as f64 / 2.0)
                / npot_den
        } else {
            0.0
        };
        let effective_hand_strength = if counted == 0 {
            0.0
        } else {
            (ehs_sum / counted as f64) as f32
        };

        trace!(
            hand_strength,
            positive_potential,
            negative_potential,
            effective_hand_strength,
            "computed pocket odds"
        );

        Ok(Self {
            community,
            pocket,
            hand_strength,
            positive_potential: positive_potential as f32,
            negative_potential: negative_potential as f32,
            effective_hand_strength,
            vs,
        })
    }

    pub fn community(&self) -> CardBitSet {
        self.community
    }

    pub fn pocket(&self) -> Pocket {
        self.pocket
    }

    /// Share of opponent holdings beaten right now.
    pub fn hand_strength(&self) -> f32 {
        self.hand_strength
    }

    /// Chance of moving from behind (or tied) to ahead by the river.
    pub fn positive_potential(&self) -> f32 {
        self.positive_potential
    }

    /// Chance of moving from ahead (or tied) to behind by the river.
    pub fn negative_potential(&self) -> f32 {
        self.negative_potential
    }

    /// Effective strength averaged over every opponent holding.
    pub fn effective_hand_strength(&self) -> f32 {
        self.effective_hand_strength
    }

    /// Effective strength against one opponent holding.
    pub fn effective_hand_strength_vs(&self, opponent: &Pocket) -> Result<f32> {
        let known = self.community | self.pocket.to_set();
        if !opponent.is_disjoint(&known) {
            return Err(AiError::ImpossibleOpponent);
        }
        Ok(self.vs.get_pocket(opponent))
    }

    pub fn effective_hand_strength_cards(&self, a: Card, b: Card) -> Result<f32> {
        let opponent = Pocket::new(a, b).ok_or(AiError::ImpossibleOpponent)?;
        self.effective_hand_strength_vs(&opponent)
    }

    pub fn effective_hand_strength_indices(&self, i: usize, j: usize) -> Result<f32> {
        let opponent = Pocket::from_indices(i, j).ok_or(AiError::ImpossibleOpponent)?;
        self.effective_hand_strength_vs(&opponent)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn board(s: &str) -> CardBitSet {
        CardBitSet::from_str_cards(s).unwrap()
    }

    fn pocket(s: &str) -> Pocket {
        Pocket::from_str_cards(s).unwrap()
    }

    #[test]
    fn test_rejects_bad_boards() {
        let p = pocket("AsKh");
        assert_eq!(
            AiError::InvalidCommunity(0),
            PocketOdds::new(CardBitSet::new(), p).unwrap_err()
        );
        assert_eq!(
            AiError::InvalidCommunity(2),
            PocketOdds::new(board("QdJc"), p).unwrap_err()
        );
        assert_eq!(
            AiError::NoCardsToCome,
            PocketOdds::new(board("QdJcTs2h3h"), pocket("9h8d")).unwrap_err()
        );
    }

    #[test]
    fn test_rejects_pocket_on_board() {
        assert_eq!(
            AiError::InvalidPocket,
            PocketOdds::new(board("AsKhQdJc"), pocket("AsTd")).unwrap_err()
        );
    }

    #[test]
    fn test_set_on_turn() {
        let odds = PocketOdds::new(board("KsKh7d2c"), pocket("KdKc")).unwrap();
        assert!(odds.effective_hand_strength() > 0.95);
        assert!(odds.hand_strength() > 0.95);
    }

    #[test]
    fn test_made_straight_on_turn() {
        let odds = PocketOdds::new(board("KsQhJd3c"), pocket("Ts9s")).unwrap();
        assert!(odds.effective_hand_strength() > 0.80);
    }

    #[test]
    fn test_drawing_dead_on_turn() {
        // Any ten of spades is a royal flush.
        let odds = PocketOdds::new(board("AsKsQsJs"), pocket("3h2h")).unwrap();
        let vs_royal = odds.effective_hand_strength_vs(&pocket("Ts9h")).unwrap();
        assert_abs_diff_eq!(0.0, vs_royal, epsilon = 1e-6);
        assert!(odds.effective_hand_strength() < 0.5);
    }

    #[test]
    fn test_draw_has_positive_potential() {
        let odds = PocketOdds::new(board("9s8s2dKh"), pocket("AsTs")).unwrap();
        assert!(odds.positive_potential() > 0.15);
        for v in [
            odds.hand_strength(),
            odds.positive_potential(),
            odds.negative_potential(),
            odds.effective_hand_strength(),
        ] {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_vs_access_agrees() {
        let odds = PocketOdds::new(board("AsKhQd4c"), pocket("JcTs")).unwrap();
        let opp = pocket("9h8d");
        let by_pocket = odds.effective_hand_strength_vs(&opp).unwrap();
        let by_cards = odds
            .effective_hand_strength_cards(opp.high(), opp.low())
            .unwrap();
        let by_index = odds
            .effective_hand_strength_indices(opp.low().index(), opp.high().index())
            .unwrap();
        assert_eq!(by_pocket, by_cards);
        assert_eq!(by_pocket, by_index);
        assert_eq!(
            AiError::ImpossibleOpponent,
            odds.effective_hand_strength_vs(&pocket("Jc2d")).unwrap_err()
        );
        assert_eq!(
            AiError::ImpossibleOpponent,
            odds.effective_hand_strength_indices(3, 3).unwrap_err()
        );
    }

    #[test]
    fn test_flop_lookahead() {
        let odds = PocketOdds::new(board("AsKsQs"), pocket("JsTs")).unwrap();
        assert!(odds.effective_hand_strength() > 0.95);
        assert_abs_diff_eq!(0.0, odds.negative_potential(), epsilon = 1e-6);
    }
}
