use tracing::debug;

use crate::core::{Card, Pocket};

use super::context::{ActionKind, PlayerInfo};
use super::hand_selection::HandSelectionScheme;
use super::pocket_matrix::PocketMatrix;

/// Lowest weight a still possible hand is scaled down to.
const MIN_WEIGHT: f32 = 0.05;

/// How likely an opponent is to hold each pocket.
///
/// Every pocket starts out equally likely. Pockets that can't be held are
/// zeroed and stay zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HandProbabilityMatrix {
    weights: PocketMatrix<f32>,
}

impl Default for HandProbabilityMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl HandProbabilityMatrix {
    pub fn new() -> Self {
        Self {
            weights: PocketMatrix::new(1.0),
        }
    }

    /// Set every pocket to `value`.
    pub fn init(&mut self, value: f32) {
        self.weights.clear(value);
    }

    pub fn probability(&self, a: Card, b: Card) -> f32 {
        self.weights.get_cards(a, b)
    }

    pub fn probability_pocket(&self, pocket: &Pocket) -> f32 {
        self.weights.get_pocket(pocket)
    }

    pub fn set_probability(&mut self, pocket: &Pocket, value: f32) {
        self.weights.set_pocket(pocket, value);
    }

    pub fn weights(&self) -> &PocketMatrix<f32> {
        &self.weights
    }

    /// Update the weights after seeing `player` act before the flop.
    ///
    /// Pockets sharing a card with `hole_cards` are impossible and drop to
    /// zero. When the action put chips in the pot and the scheme has groups,
    /// every other pocket is scaled by how strong the scheme thinks it is.
    pub fn adjust_weights_pre_flop(
        &mut self,
        scheme: Option<&HandSelectionScheme>,
        player: &PlayerInfo,
        action: Option<ActionKind>,
        hole_cards: &Pocket,
    ) {
        let known = hole_cards.to_set();
        let scheme = scheme.filter(|s| s.has_groups());
        let voluntary = action.is_some_and(|a| a.is_voluntary());
        let mut zeroed = 0usize;

        for (pocket, weight) in Pocket::all().zip(self.weights.values_mut()) {
            if *weight == 0.0 {
                continue;
            }
            if !pocket.is_disjoint(&known) {
                *weight = 0.0;
                zeroed += 1;
                continue;
            }
            if let (true, Some(scheme)) = (voluntary, scheme) {
                let strength = scheme.hand_strength_pocket(&pocket);
                *weight *= strength.max(MIN_WEIGHT);
            }
        }
        debug!(
            player = %player.name,
            seat = player.seat,
            ?action,
            zeroed,
            "adjusted pre-flop hand weights"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::HandGroup;

    fn card(s: &str) -> Card {
        Card::try_from(s).unwrap()
    }

    fn pocket(s: &str) -> Pocket {
        Pocket::from_str_cards(s).unwrap()
    }

    fn player() -> PlayerInfo {
        PlayerInfo::new(1, "TestPlayer", 1000)
    }

    #[test]
    fn test_init_and_symmetry() {
        let mut m = HandProbabilityMatrix::new();
        assert_eq!(1.0, m.probability(card("As"), card("Kh")));
        m.init(0.8);
        assert_eq!(0.8, m.probability(card("As"), card("Kh")));
        assert_eq!(0.8, m.probability(card("Kh"), card("As")));
        m.init(-0.5);
        assert_eq!(-0.5, m.probability(card("2c"), card("3d")));
    }

    #[test]
    fn test_zeroes_conflicting_pockets() {
        let mut m = HandProbabilityMatrix::new();
        m.adjust_weights_pre_flop(None, &player(), None, &pocket("AsAh"));
        assert_eq!(0.0, m.probability(card("As"), card("Kc")));
        assert_eq!(0.0, m.probability(card("Ah"), card("Qd")));
        assert_eq!(0.0, m.probability(card("As"), card("Ah")));
        assert_eq!(1.0, m.probability(card("Ac"), card("Ad")));
        assert_eq!(1.0, m.probability(card("Kc"), card("Qd")));
        // Each card pairs with 51 others, and AsAh is counted twice.
        let zeros = m.weights().iter().filter(|(_, w)| **w == 0.0).count();
        assert_eq!(101, zeros);
    }

    #[test]
    fn test_zeroed_stay_zero() {
        let mut m = HandProbabilityMatrix::new();
        m.adjust_weights_pre_flop(None, &player(), None, &pocket("QcQd"));
        m.adjust_weights_pre_flop(None, &player(), None, &pocket("AsKh"));
        assert_eq!(0.0, m.probability(card("Qc"), card("Js")));
        assert_eq!(0.0, m.probability(card("Qd"), card("Jh")));
        assert_eq!(0.0, m.probability(card("As"), card("2d")));
    }

    #[test]
    fn test_voluntary_action_uses_scheme() {
        let mut scheme = HandSelectionScheme::new("Premium");
        scheme.add_group(HandGroup::from_notation(10, ["AA", "KK"]).unwrap());
        scheme.add_group(HandGroup::from_notation(5, ["AKs"]).unwrap());

        let mut m = HandProbabilityMatrix::new();
        m.adjust_weights_pre_flop(
            Some(&scheme),
            &player(),
            Some(ActionKind::Raise),
            &pocket("2c3d"),
        );
        assert_eq!(1.0, m.probability(card("Ac"), card("Ad")));
        assert_eq!(0.5, m.probability(card("Ah"), card("Kh")));
        assert_eq!(MIN_WEIGHT, m.probability(card("7h"), card("8s")));
        assert_eq!(0.0, m.probability(card("2c"), card("Qs")));

        // Folding tells nothing about the range.
        let mut m = HandProbabilityMatrix::new();
        m.adjust_weights_pre_flop(
            Some(&scheme),
            &player(),
            Some(ActionKind::Fold),
            &pocket("2c3d"),
        );
        assert_eq!(1.0, m.probability(card("7h"), card("8s")));
    }
}
