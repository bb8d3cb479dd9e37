//! The facts about the table that a decision is made from.
//!
//! None of this is game management. These are plain snapshots filled in by
//! whatever runs the table and handed to the strategy.

use std::fmt;

use crate::core::{CardBitSet, Pocket};

use super::errors::{AiError, Result};
use super::opponent_model::OpponentModel;

/// The betting rounds of a hand.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BettingRound {
    PreFlop,
    Flop,
    Turn,
    River,
}

impl BettingRound {
    /// The round implied by a number of community cards.
    pub fn from_community_len(n: usize) -> Result<Self> {
        match n {
            0 => Ok(BettingRound::PreFlop),
            3 => Ok(BettingRound::Flop),
            4 => Ok(BettingRound::Turn),
            5 => Ok(BettingRound::River),
            _ => Err(AiError::InvalidCommunity(n)),
        }
    }

    /// Community cards still to be dealt after this round.
    pub fn cards_to_come(&self) -> usize {
        match self {
            BettingRound::PreFlop => 5,
            BettingRound::Flop => 2,
            BettingRound::Turn => 1,
            BettingRound::River => 0,
        }
    }

    /// The post flop rounds, in order.
    pub fn post_flop() -> [BettingRound; 3] {
        [BettingRound::Flop, BettingRound::Turn, BettingRound::River]
    }
}

impl fmt::Display for BettingRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BettingRound::PreFlop => "pre-flop",
            BettingRound::Flop => "flop",
            BettingRound::Turn => "turn",
            BettingRound::River => "river",
        };
        f.write_str(name)
    }
}

/// How much aggression there has been in the current round.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PotStatus {
    NoPotAction,
    Called,
    Raised,
    Reraised,
}

impl PotStatus {
    pub fn is_raised(&self) -> bool {
        *self >= PotStatus::Raised
    }
}

/// Where a player sits relative to the button, as the opponent model buckets
/// it. The discriminant is the tracker slot, slot 0 being the overall one.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PositionCategory {
    Early = 1,
    Middle = 2,
    Late = 3,
    Small = 4,
    Big = 5,
}

impl PositionCategory {
    pub fn all() -> [PositionCategory; 5] {
        [
            PositionCategory::Early,
            PositionCategory::Middle,
            PositionCategory::Late,
            PositionCategory::Small,
            PositionCategory::Big,
        ]
    }

    pub fn slot(&self) -> usize {
        *self as usize
    }

    pub fn is_blind(&self) -> bool {
        matches!(self, PositionCategory::Small | PositionCategory::Big)
    }
}

/// Where a player acts after the flop, relative to the others still in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PostFlopPosition {
    Early,
    Middle,
    Late,
    /// Acts after everyone else.
    Last,
}

/// A betting action as it was observed at the table.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl ActionKind {
    /// Bets and raises.
    pub fn is_aggressive(&self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise)
    }

    /// Anything that puts chips in the pot by choice.
    pub fn is_voluntary(&self) -> bool {
        matches!(self, ActionKind::Call | ActionKind::Bet | ActionKind::Raise)
    }
}

/// The action the strategy wants to take.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    /// Bet or raise by the given number of chips on top of the call.
    Raise(u32),
}

/// A seat at the table as the strategy sees it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub seat: usize,
    pub name: String,
    pub chips: u32,
}

impl PlayerInfo {
    pub fn new(seat: usize, name: impl Into<String>, chips: u32) -> Self {
        Self {
            seat,
            name: name.into(),
            chips,
        }
    }
}

/// An opponent still at the table, with what has been learned about them.
#[derive(Debug, Clone)]
pub struct OpponentView<'a> {
    pub player: PlayerInfo,
    pub chips_at_start: u32,
    pub position: PositionCategory,
    pub folded: bool,
    pub last_action_this_round: Option<ActionKind>,
    /// The first player to put chips in this round.
    pub first_bettor: bool,
    /// Put chips in before the flop without being forced to.
    pub paid_to_play: bool,
    pub first_raiser_pre_flop: bool,
    pub last_raiser_pre_flop: bool,
    pub is_button: bool,
    pub model: &'a OpponentModel,
}

impl<'a> OpponentView<'a> {
    /// A seat that is still in and hasn't done anything yet.
    pub fn new(player: PlayerInfo, position: PositionCategory, model: &'a OpponentModel) -> Self {
        Self {
            chips_at_start: player.chips,
            player,
            position,
            folded: false,
            last_action_this_round: None,
            first_bettor: false,
            paid_to_play: false,
            first_raiser_pre_flop: false,
            last_raiser_pre_flop: false,
            is_button: false,
            model,
        }
    }

    /// Half or more of the starting stack is already in the pot.
    pub fn is_pot_committed(&self) -> bool {
        self.player.chips <= self.chips_at_start / 2
    }

    pub fn is_all_in(&self) -> bool {
        self.player.chips == 0
    }
}

/// Who raised before the flop, from the acting player's point of view.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreFlopRaisers {
    pub was_first_raiser: bool,
    pub was_last_raiser: bool,
    pub was_only_raiser: bool,
    /// Some other player raised pre-flop and then checked this round.
    pub raiser_checked_this_round: bool,
}

/// Everything the strategy needs to decide one action.
#[derive(Debug, Clone)]
pub struct DecisionContext<'a> {
    pub round: BettingRound,
    pub pot_status: PotStatus,
    pub pocket: Pocket,
    pub community: CardBitSet,
    pub player: PlayerInfo,
    pub chips_at_start: u32,
    pub position: PositionCategory,
    pub post_flop_position: PostFlopPosition,
    /// Pre-flop acting order, 0 for the first to act.
    pub starting_order: usize,
    pub is_button: bool,
    pub pot: u32,
    pub to_call: u32,
    pub big_blind: u32,
    pub min_raise: u32,
    pub min_chip: u32,
    pub limit: bool,
    pub players_with_cards: usize,
    pub players_yet_to_act: usize,
    /// Players that just called the big blind this round.
    pub limpers: usize,
    /// Players that folded since the last bet or raise.
    pub folds_since_last_bet: usize,
    pub hands_before_big_blind: u32,
    pub has_acted_this_round: bool,
    pub last_action_this_round: Option<ActionKind>,
    pub pre_flop: PreFlopRaisers,
    /// Earlier post flop rounds that were checked around.
    pub rounds_without_action: u32,
    pub consecutive_hands_unpaid: u32,
    pub opponents: Vec<OpponentView<'a>>,
}

/// Harrington's M: how many orbits a stack lasts paying only the blinds.
pub fn hoh_m(chips: u32, big_blind: u32) -> f32 {
    if big_blind == 0 {
        f32::INFINITY
    } else {
        chips as f32 / (1.5 * big_blind as f32)
    }
}

impl<'a> DecisionContext<'a> {
    /// A context for a player who hasn't acted yet in an unopened pot. The
    /// round follows from the number of community cards.
    pub fn new(
        pocket: Pocket,
        community: CardBitSet,
        player: PlayerInfo,
        big_blind: u32,
    ) -> Result<Self> {
        let round = BettingRound::from_community_len(community.count())?;
        if !pocket.is_disjoint(&community) {
            return Err(AiError::InvalidPocket);
        }
        Ok(Self {
            round,
            pot_status: PotStatus::NoPotAction,
            pocket,
            community,
            chips_at_start: player.chips,
            player,
            position: PositionCategory::Middle,
            post_flop_position: PostFlopPosition::Middle,
            starting_order: 0,
            is_button: false,
            pot: 0,
            to_call: 0,
            big_blind,
            min_raise: big_blind,
            min_chip: 1,
            limit: false,
            players_with_cards: 1,
            players_yet_to_act: 0,
            limpers: 0,
            folds_since_last_bet: 0,
            hands_before_big_blind: 0,
            has_acted_this_round: false,
            last_action_this_round: None,
            pre_flop: PreFlopRaisers::default(),
            rounds_without_action: 0,
            consecutive_hands_unpaid: 0,
            opponents: Vec::new(),
        })
    }

    /// Opponents that have not folded.
    pub fn live_opponents(&self) -> impl Iterator<Item = &OpponentView<'a>> {
        self.opponents.iter().filter(|o| !o.folded)
    }

    /// The first player to bet this round, if any.
    pub fn first_bettor(&self) -> Option<&OpponentView<'a>> {
        self.live_opponents().find(|o| o.first_bettor)
    }

    /// Pot odds as pot : call, zero when there is nothing to call.
    pub fn pot_odds(&self) -> f32 {
        if self.to_call == 0 {
            0.0
        } else {
            self.pot as f32 / self.to_call as f32
        }
    }

    pub fn is_pot_committed(&self) -> bool {
        self.player.chips <= self.chips_at_start / 2
    }

    pub fn in_position(&self) -> bool {
        self.players_yet_to_act == 0
    }

    /// The player who opened the betting before the flop.
    pub fn pre_flop_first_raiser(&self) -> Option<&OpponentView<'a>> {
        self.opponents.iter().find(|o| o.first_raiser_pre_flop)
    }

    /// The player who put in the last raise before the flop.
    pub fn pre_flop_last_raiser(&self) -> Option<&OpponentView<'a>> {
        self.opponents.iter().find(|o| o.last_raiser_pre_flop)
    }

    pub fn m(&self) -> f32 {
        hoh_m(self.player.chips, self.big_blind)
    }

    /// Mean M over everyone still holding cards.
    pub fn remaining_average_m(&self) -> f32 {
        let (total, n) = self
            .live_opponents()
            .fold((self.player.chips as u64, 1u64), |(t, n), o| {
                (t + o.player.chips as u64, n + 1)
            });
        hoh_m((total / n) as u32, self.big_blind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_from_community() {
        assert_eq!(BettingRound::PreFlop, BettingRound::from_community_len(0).unwrap());
        assert_eq!(BettingRound::Flop, BettingRound::from_community_len(3).unwrap());
        assert_eq!(BettingRound::River, BettingRound::from_community_len(5).unwrap());
        assert_eq!(
            Err(AiError::InvalidCommunity(2)),
            BettingRound::from_community_len(2)
        );
    }

    #[test]
    fn test_pot_status_order() {
        assert!(!PotStatus::Called.is_raised());
        assert!(PotStatus::Raised.is_raised());
        assert!(PotStatus::Reraised.is_raised());
    }

    #[test]
    fn test_new_context() {
        let pocket = Pocket::from_str_cards("AsKs").unwrap();
        let board = CardBitSet::from_str_cards("2c7d9h").unwrap();
        let ctx = DecisionContext::new(pocket, board, PlayerInfo::new(0, "me", 300), 20).unwrap();
        assert_eq!(BettingRound::Flop, ctx.round);
        assert_eq!(300, ctx.chips_at_start);
        assert_eq!(0.0, ctx.pot_odds());
        assert_eq!(10.0, ctx.m());
        assert_eq!(10.0, ctx.remaining_average_m());
        assert!(!ctx.is_pot_committed());

        let bad = CardBitSet::from_str_cards("As7d9h").unwrap();
        assert_eq!(
            Err(AiError::InvalidPocket),
            DecisionContext::new(pocket, bad, PlayerInfo::new(0, "me", 300), 20).map(|c| c.pot)
        );
    }

    #[test]
    fn test_average_m_skips_folded() {
        let model = OpponentModel::new();
        let pocket = Pocket::from_str_cards("AsKs").unwrap();
        let mut ctx =
            DecisionContext::new(pocket, CardBitSet::new(), PlayerInfo::new(0, "me", 300), 20)
                .unwrap();
        let mut folded =
            OpponentView::new(PlayerInfo::new(2, "b", 3000), PositionCategory::Late, &model);
        folded.folded = true;
        ctx.opponents.push(OpponentView::new(
            PlayerInfo::new(1, "a", 900),
            PositionCategory::Early,
            &model,
        ));
        ctx.opponents.push(folded);
        assert_eq!(20.0, ctx.remaining_average_m());
        assert_eq!(1, ctx.live_opponents().count());
        assert!(ctx.pre_flop_first_raiser().is_none());
    }

    #[test]
    fn test_position_slots() {
        let slots: Vec<usize> = PositionCategory::all().iter().map(|p| p.slot()).collect();
        assert_eq!(vec![1, 2, 3, 4, 5], slots);
    }
}
