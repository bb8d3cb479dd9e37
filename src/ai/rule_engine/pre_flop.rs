use tracing::trace;

use crate::ai::bet_range::BetRange;
use crate::ai::context::{
    hoh_m, BettingRound, DecisionContext, OpponentView, PositionCategory, PostFlopPosition,
    PotStatus,
};
use crate::ai::errors::Result;
use crate::ai::outcome::{AiOutcome, Bucket};
use crate::ai::simple_bias::SimpleBias;
use crate::core::{Pocket, Value};

use super::inputs::{ratio, scale, HohZone, RuleInputs};
use super::{Factor, Outcome, RuleEngine};

/// Seats at a full table.
const SEATS: f32 = 10.0;

/// Which bias table stands in for a tightness in `[0, 1]`.
fn bias_table(tightness: f32) -> usize {
    let distance = if tightness > 0.5 {
        tightness - 0.5
    } else {
        tightness
    };
    ((0.5 - distance) / 0.05).round().max(0.0) as usize
}

/// How far a player with this tightness moves a hand's strength towards
/// the bias table's view of it. Only moves that match the tightness count:
/// tight players see hands as weaker, loose ones as stronger.
fn bias_delta(tightness: f32, pocket: &Pocket, strength: f32) -> f32 {
    let bias = SimpleBias::bias_value_pocket(bias_table(tightness), pocket);
    if (tightness >= 0.5 && bias < strength) || (tightness < 0.5 && bias > strength) {
        (bias - strength) * (tightness - 0.5).abs() * 2.0
    } else {
        0.0
    }
}

/// Connected cards below an ace, the hands that make the best straights.
fn is_low_connector(pocket: &Pocket) -> bool {
    let high = pocket.high().value;
    high != Value::Ace && high.gap(pocket.low().value) == 1
}

/// The values the rules all read, worked out once.
struct Spot {
    hand_strength: f32,
    adjusted: f32,
    fold_delta: f32,
    aggression: f32,
    position: f32,
    observation: f32,
    pot_odds_weight: f32,
    stack_weight: f32,
    opponent_stack_weight: f32,
    tilt: f32,
    steam: f32,
    steaming: bool,
    steal_suspicion: f32,
    bored: f32,
    pot_odds: f32,
    zone: HohZone,
}

impl Spot {
    fn new(inputs: &RuleInputs<'_, '_>) -> Self {
        let ctx = inputs.ctx;
        let p = inputs.personality;
        let observation = p.observation_weight();

        let others = ctx.players_with_cards.saturating_sub(1);
        let table_tightness = if others == 0 {
            0.5
        } else {
            ctx.live_opponents()
                .map(|o| o.model.pre_flop_tightness(o.position, 0.5))
                .sum::<f32>()
                / others as f32
        };
        let tightness = (p.tightness
            * (observation * ((1.0 + (2.0 - table_tightness * 2.0)) / 2.0) + (1.0 - observation)))
            .clamp(0.0, 1.0);

        let hand_strength = inputs.hand.pre_flop;
        let fold_delta = bias_delta(tightness, &ctx.pocket, hand_strength);
        let bored =
            ctx.consecutive_hands_unpaid.min(10) as f32 / 10.0 - p.boredom_offset();

        trace!(
            table_tightness,
            tightness,
            hand_strength,
            fold_delta,
            bored,
            m = ctx.m(),
            "pre-flop spot"
        );

        Self {
            hand_strength,
            adjusted: hand_strength + fold_delta,
            fold_delta,
            aggression: scale(p.aggression, -0.2, 0.2),
            position: p.position_weight(),
            observation,
            pot_odds_weight: p.pot_odds_weight(),
            stack_weight: p.stack_size_weight(),
            opponent_stack_weight: p.opponent_stack_size_weight(),
            tilt: p.tilt_weight(),
            steam: inputs.mood.steam,
            steaming: inputs.mood.steaming(p.tilt_weight()),
            steal_suspicion: inputs.mood.steal_suspicion,
            bored,
            pot_odds: ctx.pot_odds(),
            zone: HohZone::from_m(ctx.m()),
        }
    }
}

impl RuleEngine {
    pub(super) fn determine_eligible(&mut self, ctx: &DecisionContext<'_>) {
        let raised = ctx.pot_status.is_raised();
        let chips = ctx.player.chips;

        self.set_eligible(Outcome::Fold, ctx.to_call > 0);
        self.set_eligible(Outcome::Check, ctx.to_call == 0);

        if ctx.round == BettingRound::PreFlop {
            self.set_eligible(Outcome::Raise, chips > ctx.to_call);
            if ctx.position == PositionCategory::Big || raised {
                self.set_eligible(Outcome::Call, raised);
            }
        } else {
            self.set_eligible(Outcome::Call, ctx.to_call > 0);
            self.set_eligible(Outcome::Raise, ctx.to_call > 0 && chips > ctx.to_call);
        }
    }

    pub(super) fn execute_pre_flop(&mut self, inputs: &RuleInputs<'_, '_>) -> Result<()> {
        let ctx = inputs.ctx;
        let spot = Spot::new(inputs);

        self.adjust(Outcome::Fold, Factor::Default, 1.0)?;
        self.adjust(Outcome::Check, Factor::Default, 1.0)?;

        if !ctx.has_acted_this_round && ctx.pot_status == PotStatus::NoPotAction && ctx.to_call > 0
        {
            return self.consider_opening(inputs, &spot);
        }

        if matches!(spot.zone, HohZone::Red | HohZone::Dead) {
            return self.consider_shoving(ctx, &spot);
        }

        if ctx.pot_status == PotStatus::NoPotAction
            || (ctx.pot_status == PotStatus::Called && ctx.limpers == 1)
        {
            self.consider_open_pot(ctx, &spot)?;
        }
        if ctx.pot_status == PotStatus::Called && ctx.limpers > 1 {
            self.consider_limpers(ctx, &spot)?;
        }
        match ctx.pot_status {
            PotStatus::Raised => self.consider_raise(ctx, &spot)?,
            PotStatus::Reraised => self.consider_reraise(ctx, &spot)?,
            _ => {}
        }

        let stack_behind = ctx.player.chips.saturating_sub(ctx.to_call);
        if self.strongest != Outcome::OpenPot
            && ctx.pot_status == PotStatus::NoPotAction
            && ctx.player.chips >= ctx.to_call
            && stack_behind >= ctx.big_blind
        {
            self.consider_steal(inputs, &spot)?;
        }

        if matches!(ctx.pot_status, PotStatus::NoPotAction | PotStatus::Called)
            && self.strongest == Outcome::Fold
        {
            self.consider_limp(ctx, &spot)?;
        }
        Ok(())
    }

    /// First in facing only the blinds: raise good hands, fold the rest.
    fn consider_opening(&mut self, inputs: &RuleInputs<'_, '_>, spot: &Spot) -> Result<()> {
        let ctx = inputs.ctx;
        let players = ctx.players_with_cards as f32;
        let mut position_adjust =
            spot.position * (ctx.starting_order as f32 + SEATS - players) / SEATS;
        if spot.position < 1.0 {
            position_adjust += (1.0 - spot.position) * 0.8;
        }
        trace!(order = ctx.starting_order, position_adjust, "opening");

        if spot.adjusted + position_adjust >= 1.0 {
            let aggression = scale(inputs.personality.aggression, 0.0, 2.0);
            let call = if ctx.position == PositionCategory::Small {
                0.25 * if aggression > 1.0 {
                    2.0 - aggression
                } else {
                    3.6 * (1.0 - aggression) + 1.0
                }
            } else {
                0.05 * if aggression > 1.0 {
                    2.0 - aggression
                } else {
                    9.0 * (1.0 - aggression) + 1.0
                }
            };
            let mut outcome = AiOutcome::new(ctx.pot_status, ctx.round, ctx.limit);
            outcome.add_tuple(
                Bucket::BetRaise,
                "Desirable opening hand in this position.",
                0.0,
                call,
                1.0 - call,
            );
            self.strongest = outcome.strongest_outcome(ctx.pot_status);
            self.outcome = Some(outcome);
        }
        Ok(())
    }

    /// Short stacked: all in or get out of the way.
    fn consider_shoving(&mut self, ctx: &DecisionContext<'_>, spot: &Spot) -> Result<()> {
        self.set_eligible(Outcome::AllIn, true);
        let odds = ratio(ctx.pot, ctx.player.chips);
        let closing = 9.0 - ctx.hands_before_big_blind as f32;
        let (hand, blinds, odds_divisor) = match ctx.pot_status {
            PotStatus::NoPotAction => (0.20, 0.40, 10.0),
            PotStatus::Called => (0.15, 0.25, 15.0),
            PotStatus::Raised | PotStatus::Reraised => (0.10, 0.15, 25.0),
        };
        self.adjust(Outcome::AllIn, Factor::HandSelection, spot.adjusted + hand)?;
        self.adjust(Outcome::AllIn, Factor::BlindsClosing, blinds * closing / 9.0)?;
        self.adjust(Outcome::AllIn, Factor::PotOdds, odds / odds_divisor)?;
        self.adjust(Outcome::AllIn, Factor::Aggression, spot.aggression)
    }

    /// Unopened, or a single limper who can be ignored.
    fn consider_open_pot(&mut self, ctx: &DecisionContext<'_>, spot: &Spot) -> Result<()> {
        let outcome = if ctx.pot_status == PotStatus::NoPotAction {
            Outcome::OpenPot
        } else {
            Outcome::Raise
        };
        self.set_eligible(outcome, true);
        self.adjust(outcome, Factor::HandSelection, 0.6 + spot.adjusted / 2.0)?;
        self.adjust(outcome, Factor::Aggression, spot.aggression)?;
        match ctx.position {
            PositionCategory::Middle => {
                self.adjust(outcome, Factor::Position, spot.position * 0.1)?
            }
            PositionCategory::Late => {
                self.adjust(outcome, Factor::Position, spot.position * 0.2)?
            }
            _ => {}
        }
        match spot.zone {
            HohZone::Yellow => self.adjust(outcome, Factor::StackSize, 0.025 * spot.stack_weight)?,
            HohZone::Orange => self.adjust(outcome, Factor::StackSize, 0.05 * spot.stack_weight)?,
            _ => {}
        }
        if spot.steaming {
            self.adjust(outcome, Factor::Steam, spot.steam * spot.tilt * 0.1)?;
        }
        Ok(())
    }

    fn consider_limpers(&mut self, ctx: &DecisionContext<'_>, spot: &Spot) -> Result<()> {
        self.adjust(Outcome::Raise, Factor::HandSelection, 0.7 + spot.adjusted / 2.0)?;
        self.adjust(Outcome::Raise, Factor::Aggression, spot.aggression)?;
        self.adjust(Outcome::Call, Factor::HandSelection, 0.5)?;

        let last = ctx.post_flop_position == PostFlopPosition::Last;
        let (call, raise) = if ctx.has_acted_this_round {
            match ctx.post_flop_position {
                PostFlopPosition::Early => (-0.05, -0.1),
                PostFlopPosition::Middle => (0.0, 0.0),
                PostFlopPosition::Late | PostFlopPosition::Last if last => (0.075, 0.15),
                PostFlopPosition::Late | PostFlopPosition::Last => (0.05, 0.1),
            }
        } else {
            match ctx.position {
                PositionCategory::Small => (-0.075, -0.15),
                PositionCategory::Big => (-0.06, -0.12),
                PositionCategory::Early => (-0.05, -0.1),
                PositionCategory::Middle => (0.0, 0.0),
                PositionCategory::Late if last => (0.075, 0.15),
                PositionCategory::Late => (0.05, 0.1),
            }
        };
        if call != 0.0 {
            self.adjust(Outcome::Call, Factor::Position, call * spot.position)?;
            self.adjust(Outcome::Raise, Factor::Position, raise * spot.position)?;
        }
        if spot.steaming {
            self.adjust(Outcome::Raise, Factor::Steam, spot.steam * spot.tilt * 0.1)?;
        }
        Ok(())
    }

    /// Discount a raiser short enough that they could be raising with less.
    fn adjust_for_raiser_stack(
        &mut self,
        raiser: Option<&OpponentView<'_>>,
        big_blind: u32,
        spot: &Spot,
    ) -> Result<()> {
        let Some(raiser) = raiser else {
            return Ok(());
        };
        let weight = match HohZone::from_m(hoh_m(raiser.player.chips, big_blind)) {
            HohZone::Dead | HohZone::Red => 0.05,
            HohZone::Orange => 0.025,
            HohZone::Yellow => 0.015,
            HohZone::Green => return Ok(()),
        };
        let value = spot.opponent_stack_weight * spot.adjusted * weight;
        self.adjust(Outcome::Call, Factor::RaiserStackSize, value)?;
        self.adjust(Outcome::Raise, Factor::RaiserStackSize, value)
    }

    /// A short stack should be keener to get it in than to call.
    fn adjust_for_own_stack(&mut self, spot: &Spot) -> Result<()> {
        let weight = match spot.zone {
            HohZone::Orange => 0.05,
            HohZone::Yellow => 0.02,
            _ => return Ok(()),
        };
        self.adjust(
            Outcome::Call,
            Factor::StackSize,
            spot.stack_weight * spot.adjusted * weight,
        )
    }

    fn adjust_for_price(&mut self, ctx: &DecisionContext<'_>, spot: &Spot) -> Result<()> {
        self.adjust(
            Outcome::Call,
            Factor::PotOdds,
            spot.pot_odds * spot.pot_odds_weight * 0.02,
        )?;
        let share = 2.0 * ratio(ctx.to_call, ctx.player.chips);
        self.adjust(
            Outcome::Call,
            Factor::BetToCall,
            -0.15 * share * share * (1.0 - spot.hand_strength),
        )
    }

    fn consider_raise(&mut self, ctx: &DecisionContext<'_>, spot: &Spot) -> Result<()> {
        if ctx.position.is_blind() && spot.steal_suspicion > 0.0 {
            self.adjust(Outcome::Call, Factor::StealSuspected, spot.steal_suspicion)?;
            self.adjust(Outcome::Raise, Factor::StealSuspected, spot.steal_suspicion)?;
        }
        self.adjust_for_price(ctx, spot)?;

        let raiser = ctx.pre_flop_first_raiser().or_else(|| ctx.first_bettor());
        self.adjust_for_raiser_stack(raiser, ctx.big_blind, spot)?;

        if let Some(raiser) = raiser {
            let frequency = (raiser.model.hands_raised_pre_flop_percent(0.1) - 0.1).max(0.0);
            let value = spot.observation * frequency * 0.3 * spot.hand_strength;
            self.adjust(Outcome::Call, Factor::OpponentRaiseFrequency, value)?;
            self.adjust(Outcome::Raise, Factor::OpponentRaiseFrequency, value)?;
        }

        self.adjust_for_own_stack(spot)?;

        self.adjust(
            Outcome::Call,
            Factor::HandSelection,
            1.0 + (spot.adjusted - 0.6) / 4.0,
        )?;
        let pair_boost = if ctx.pocket.is_pair() { 0.4 } else { 0.2 };
        self.adjust(Outcome::Raise, Factor::HandSelection, spot.adjusted + pair_boost)?;
        self.adjust(Outcome::Raise, Factor::Aggression, spot.aggression)?;

        if spot.bored > 0.0 {
            self.adjust(Outcome::Raise, Factor::Boredom, spot.bored * 0.05)?;
        }
        if spot.steaming {
            self.adjust(Outcome::Raise, Factor::Steam, spot.steam * spot.tilt * 0.1)?;
        }
        Ok(())
    }

    fn consider_reraise(&mut self, ctx: &DecisionContext<'_>, spot: &Spot) -> Result<()> {
        self.adjust(
            Outcome::Call,
            Factor::HandSelection,
            0.9 + (spot.adjusted - 0.6) / 4.0,
        )?;
        self.adjust_for_price(ctx, spot)?;

        let pair_boost = if ctx.pocket.is_pair() { 0.1 } else { 0.05 };
        self.adjust(Outcome::Raise, Factor::HandSelection, spot.adjusted + pair_boost)?;
        self.adjust(Outcome::Raise, Factor::Aggression, spot.aggression)?;

        let (call, raise) = match ctx.post_flop_position {
            PostFlopPosition::Early => (-0.025, -0.5),
            PostFlopPosition::Middle => (0.0, 0.0),
            PostFlopPosition::Late => (0.025, 0.05),
            PostFlopPosition::Last => (0.04, 0.08),
        };
        if call != 0.0 {
            self.adjust(Outcome::Call, Factor::Position, call * spot.position)?;
            self.adjust(Outcome::Raise, Factor::Position, raise * spot.position)?;
        }

        let first = ctx.pre_flop_first_raiser();
        let last = ctx.pre_flop_last_raiser();
        self.adjust_for_raiser_stack(last, ctx.big_blind, spot)?;
        self.adjust_for_own_stack(spot)?;

        // A blind coming over the top may just be defending against a steal.
        if let (Some(first), Some(last)) = (first, last) {
            if last.position.is_blind() {
                let value = match first.position {
                    PositionCategory::Early => 0.01,
                    PositionCategory::Middle => 0.03,
                    PositionCategory::Late | PositionCategory::Small => 0.08,
                    PositionCategory::Big => 0.0,
                };
                if value > 0.0 {
                    self.adjust(Outcome::Call, Factor::RaiserPosition, value)?;
                }
            }
        }

        let players_when_raised = ctx.players_with_cards + ctx.folds_since_last_bet;
        self.adjust(
            Outcome::Call,
            Factor::PlayersLeft,
            (10.0 - players_when_raised as f32) * 0.01,
        )?;

        if let Some(last) = last {
            let value = match last.position {
                PositionCategory::Early => -0.07,
                PositionCategory::Middle => -0.04,
                PositionCategory::Late => -0.02,
                PositionCategory::Small => -0.01,
                PositionCategory::Big => 0.0,
            };
            if value < 0.0 {
                self.adjust(Outcome::Call, Factor::ReraiserPosition, value)?;
            }
        }

        if spot.steaming {
            self.adjust(Outcome::Raise, Factor::Steam, spot.steam * spot.tilt * 0.05)?;
        }
        Ok(())
    }

    fn consider_steal(&mut self, inputs: &RuleInputs<'_, '_>, spot: &Spot) -> Result<()> {
        let ctx = inputs.ctx;
        self.set_eligible(Outcome::Steal, ctx.player.chips > ctx.to_call);
        self.adjust(Outcome::Steal, Factor::HandSelection, spot.adjusted + 0.65)?;
        self.adjust(Outcome::Steal, Factor::Aggression, spot.aggression)?;

        let steal_tightness = inputs.personality.steal_tightness();
        let delta = bias_delta(steal_tightness, &ctx.pocket, spot.hand_strength);
        if delta != 0.0 {
            // Same pull as the tightness bias, stretched a little further.
            self.adjust(Outcome::Steal, Factor::BlindStealing, delta * 0.75)?;
        }

        let position = match ctx.position {
            PositionCategory::Early => -0.4,
            PositionCategory::Middle => -0.2,
            PositionCategory::Late if ctx.is_button => 0.2,
            PositionCategory::Late => 0.1,
            PositionCategory::Small => -0.15,
            PositionCategory::Big => 0.0,
        };
        if position != 0.0 {
            self.adjust(Outcome::Steal, Factor::Position, position * spot.position)?;
        }
        if spot.bored > 0.0 {
            self.adjust(Outcome::Steal, Factor::Boredom, spot.bored * 0.1)?;
        }
        if spot.steaming {
            self.adjust(Outcome::Raise, Factor::Steam, spot.steam * spot.tilt * 0.1)?;
        }
        Ok(())
    }

    fn consider_limp(&mut self, ctx: &DecisionContext<'_>, spot: &Spot) -> Result<()> {
        self.set_eligible(Outcome::Limp, true);
        self.adjust(
            Outcome::Limp,
            Factor::HandSelection,
            (1.0 + (spot.adjusted + spot.fold_delta - 0.70) / 2.0).min(1.0),
        )?;
        match ctx.position {
            PositionCategory::Middle => {
                self.adjust(Outcome::Limp, Factor::Position, spot.position * 0.02)?
            }
            PositionCategory::Late => {
                self.adjust(Outcome::Limp, Factor::Position, spot.position * 0.05)?
            }
            _ => {}
        }
        let odds = spot.pot_odds * spot.pot_odds_weight;
        self.adjust(Outcome::Limp, Factor::PotOdds, odds * 0.02)?;

        if is_low_connector(&ctx.pocket) {
            let rank = (ctx.pocket.high().value as u8 + 2) as f32;
            let per_rank = if ctx.pocket.is_suited() { 0.0025 } else { 0.00225 };
            self.adjust(Outcome::Limp, Factor::ImpliedOdds, odds * rank * per_rank)?;
        }
        if spot.bored > 0.0 {
            self.adjust(Outcome::Limp, Factor::Boredom, spot.bored * 0.2)?;
        }
        Ok(())
    }

    pub(super) fn set_pre_flop_bet_range(&mut self, ctx: &DecisionContext<'_>) -> Result<()> {
        if self.strongest != Outcome::AllIn && ctx.remaining_average_m() < 10.0 {
            self.bet_range = BetRange::pot_relative(0.5, 0.75)?;
        } else {
            match self.strongest {
                Outcome::OpenPot => {
                    let (min, max) = match ctx.position {
                        PositionCategory::Early => (2.5, 3.0),
                        PositionCategory::Middle => (3.0, 3.5),
                        PositionCategory::Late => (3.5, 4.0),
                        PositionCategory::Small => (3.0, 3.0),
                        PositionCategory::Big => (3.0, 5.0),
                    };
                    self.bet_range = BetRange::big_blind_relative(min, max)?;
                }
                Outcome::Steal => self.bet_range = BetRange::big_blind_relative(2.0, 4.0)?,
                Outcome::AllIn => self.bet_range = BetRange::all_in(),
                Outcome::Raise => self.bet_range = BetRange::big_blind_relative(3.0, 4.5)?,
                _ => {}
            }
        }
        if let Some(outcome) = self.outcome.as_mut() {
            outcome.set_bet_range(Some(self.bet_range.clone()), None);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::ai::context::{PlayerAction, PlayerInfo};
    use crate::ai::opponent_model::OpponentModel;
    use crate::ai::rule_engine::{HandStrengths, Mood, Personality};
    use crate::core::CardBitSet;

    fn context<'a>(
        pocket: &str,
        chips: u32,
        opponents: usize,
        model: &'a OpponentModel,
    ) -> DecisionContext<'a> {
        let pocket = Pocket::from_str_cards(pocket).unwrap();
        let player = PlayerInfo::new(0, "hero", chips);
        let mut ctx = DecisionContext::new(pocket, CardBitSet::new(), player, 20).unwrap();
        ctx.players_with_cards = opponents + 1;
        ctx.opponents = (1..=opponents)
            .map(|seat| {
                let player = PlayerInfo::new(seat, format!("villain {seat}"), chips);
                OpponentView::new(player, PositionCategory::Late, model)
            })
            .collect();
        ctx
    }

    fn run(ctx: &DecisionContext<'_>, pre_flop: f32, mood: Mood) -> RuleEngine {
        let personality = Personality::default();
        let inputs = RuleInputs {
            ctx,
            hand: HandStrengths {
                pre_flop,
                ..Default::default()
            },
            personality: &personality,
            mood,
            randomize: false,
        };
        let mut engine = RuleEngine::default();
        let mut rng = StdRng::seed_from_u64(7);
        engine.execute(&inputs, &mut rng).unwrap();
        engine
    }

    #[test]
    fn test_bias_table() {
        assert_eq!(0, bias_table(0.5));
        assert_eq!(0, bias_table(1.0));
        assert_eq!(10, bias_table(0.0));
        assert_eq!(5, bias_table(0.75));
    }

    #[test]
    fn test_low_connectors() {
        for (hand, expected) in [("7s6s", true), ("KdQc", true), ("AsKs", false), ("7h2c", false)] {
            let pocket = Pocket::from_str_cards(hand).unwrap();
            assert_eq!(expected, is_low_connector(&pocket), "{hand}");
        }
    }

    #[test_log::test]
    fn test_premium_hand_opens() {
        let model = OpponentModel::new();
        let mut ctx = context("AsAh", 2000, 5, &model);
        ctx.position = PositionCategory::Early;
        ctx.to_call = 20;
        ctx.pot = 30;

        let engine = run(&ctx, 1.0, Mood::default());
        assert_eq!(Outcome::OpenPot, engine.strongest_outcome());
        let outcome = engine.outcome().unwrap();
        assert_relative_eq!(0.05, outcome.call(), epsilon = 1e-6);
        assert_relative_eq!(0.95, outcome.bet_raise(), epsilon = 1e-6);
        let range = BetRange::big_blind_relative(2.5, 3.0).unwrap();
        assert_eq!(&range, engine.bet_range());
        assert_eq!(Some(&range), outcome.bet_range());
    }

    #[test_log::test]
    fn test_weak_hand_folds_first_in() {
        let model = OpponentModel::new();
        let mut ctx = context("7h2c", 2000, 5, &model);
        ctx.position = PositionCategory::Early;
        ctx.to_call = 20;
        ctx.pot = 30;

        let engine = run(&ctx, 0.3, Mood::default());
        assert_eq!(Outcome::Fold, engine.strongest_outcome());
        assert_eq!(PlayerAction::Fold, engine.action());
        assert!(engine.outcome().is_none());
        assert!(!engine.is_eligible(Outcome::Check));
    }

    #[test_log::test]
    fn test_short_stack_moves_in() {
        let model = OpponentModel::new();
        let mut ctx = context("QsQd", 100, 3, &model);
        ctx.pot_status = PotStatus::Raised;
        ctx.position = PositionCategory::Late;
        ctx.to_call = 60;
        ctx.pot = 90;

        let engine = run(&ctx, 0.9, Mood::default());
        assert!(engine.is_eligible(Outcome::AllIn));
        // 0.9 + 0.1, 0.15 for the blinds and 0.9 / 25 for the odds.
        assert_relative_eq!(1.186, engine.score(Outcome::AllIn), epsilon = 1e-5);
        assert_eq!(Outcome::AllIn, engine.strongest_outcome());
        assert_eq!(&BetRange::all_in(), engine.bet_range());
    }

    #[test_log::test]
    fn test_big_blind_defends_against_steal() {
        let model = OpponentModel::new();
        let mut ctx = context("9sTs", 2000, 2, &model);
        ctx.pot_status = PotStatus::Raised;
        ctx.position = PositionCategory::Big;
        ctx.to_call = 40;
        ctx.pot = 90;
        let mood = Mood {
            steal_suspicion: 0.1,
            ..Default::default()
        };

        let engine = run(&ctx, 0.6, mood);
        assert!(engine.is_eligible(Outcome::Call));
        let suspected = engine
            .adjustments()
            .iter()
            .filter(|a| a.factor() == Factor::StealSuspected)
            .count();
        assert_eq!(2, suspected);
        assert_relative_eq!(0.9, engine.score(Outcome::Raise), epsilon = 1e-6);
        assert_eq!(Outcome::Call, engine.strongest_outcome());
        assert_eq!(PlayerAction::Call, engine.action());
    }

    #[test_log::test]
    fn test_single_limper_is_raised() {
        let model = OpponentModel::new();
        let mut ctx = context("KsQs", 2000, 3, &model);
        ctx.pot_status = PotStatus::Called;
        ctx.limpers = 1;
        ctx.position = PositionCategory::Late;
        ctx.to_call = 20;
        ctx.pot = 50;

        let engine = run(&ctx, 0.8, Mood::default());
        assert_relative_eq!(1.2, engine.score(Outcome::Raise), epsilon = 1e-6);
        assert_eq!(Outcome::Raise, engine.strongest_outcome());
        assert_eq!(&BetRange::big_blind_relative(3.0, 4.5).unwrap(), engine.bet_range());
    }

    #[test_log::test]
    fn test_short_table_raises_by_pot() {
        let model = OpponentModel::new();
        let mut ctx = context("KsQs", 250, 3, &model);
        ctx.pot_status = PotStatus::Called;
        ctx.limpers = 1;
        ctx.position = PositionCategory::Late;
        ctx.to_call = 20;
        ctx.pot = 50;

        let engine = run(&ctx, 0.8, Mood::default());
        assert_eq!(Outcome::Raise, engine.strongest_outcome());
        assert_eq!(&BetRange::pot_relative(0.5, 0.75).unwrap(), engine.bet_range());
    }

    #[test_log::test]
    fn test_connectors_limp_behind() {
        let model = OpponentModel::new();
        let mut ctx = context("7s6s", 2000, 4, &model);
        ctx.pot_status = PotStatus::Called;
        ctx.limpers = 3;
        ctx.position = PositionCategory::Middle;
        ctx.to_call = 20;
        ctx.pot = 100;

        let engine = run(&ctx, 0.35, Mood::default());
        assert!(engine.is_eligible(Outcome::Limp));
        // 0.825 hand, 0.02 position, 0.1 odds and 0.0875 implied odds.
        assert_relative_eq!(1.0325, engine.score(Outcome::Limp), epsilon = 1e-5);
        assert_eq!(Outcome::Limp, engine.strongest_outcome());
        assert_eq!(PlayerAction::Call, engine.action());
    }
}
