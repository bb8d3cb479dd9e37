use std::f32::consts::PI;

use rand::Rng;
use tracing::trace;

use crate::ai::bet_range::BetRange;
use crate::ai::context::{
    ActionKind, BettingRound, DecisionContext, OpponentView, PositionCategory, PotStatus,
};
use crate::ai::errors::Result;
use crate::ai::hand_potential::{BoardTexture, HandPotential};
use crate::ai::outcome::{AiOutcome, Bucket};

use super::inputs::{ratio, scale, RuleInputs};
use super::{Factor, Outcome, RuleEngine};

/// Draw counts over the next card, weighted by how much the player likes
/// each kind of draw and by what the board does to them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Draws {
    straight: f32,
    flush: f32,
    /// Outs counted with nut outs worth more.
    weighted_outs: usize,
}

impl Draws {
    fn new(inputs: &RuleInputs<'_, '_>) -> Result<Self> {
        let ctx = inputs.ctx;
        let potential = HandPotential::new(ctx.pocket, ctx.community)?;
        let straight_weight = scale(inputs.personality.straight_draws, -1.0, 1.0);
        let flush_weight = scale(inputs.personality.flush_draws, -1.0, 1.0);

        let mut straight = straight_weight * potential.nut_straight as f32
            + straight_weight * 0.5 * potential.non_nut_straight as f32;
        let mut flush = flush_weight * potential.nut_flush as f32
            + flush_weight * 0.5 * potential.non_nut_flush() as f32;

        let board = BoardTexture::new(ctx.community);
        if board.draws_devalued() {
            straight = 0.0;
            flush = 0.0;
        } else if board.has_possible_flush() {
            flush *= 0.75;
            straight = if board.has_flush() { 0.0 } else { straight * 0.5 };
        }

        Ok(Self {
            straight,
            flush,
            weighted_outs: potential.nut_flush * 3
                + potential.non_nut_flush()
                + potential.nut_straight * 2
                + potential.non_nut_straight,
        })
    }
}

/// What the bettor in front is known to do.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BettorHabits {
    open: f32,
    overbet: f32,
    bet_fold: f32,
}

impl BettorHabits {
    fn new(bettor: Option<&OpponentView<'_>>, round: BettingRound) -> Result<Self> {
        let Some(bettor) = bettor else {
            return Ok(Self {
                open: 0.5 * 0.1,
                overbet: 0.5,
                bet_fold: 0.5,
            });
        };
        let act = bettor.model.act_post_flop(round, 0.1)?;
        Ok(Self {
            open: bettor.model.open_post_flop(round, 0.5)? * act,
            overbet: bettor.model.overbet_frequency(0.5),
            bet_fold: bettor.model.bet_fold_frequency(0.5),
        })
    }
}

/// The shape of the curve the call rules read raw strength through.
fn s_curve(strength: f32) -> f32 {
    ((strength - 0.5) * PI).sin() * 0.5 + 0.5
}

impl RuleEngine {
    pub(super) fn execute_post_flop<R: Rng + ?Sized>(
        &mut self,
        inputs: &RuleInputs<'_, '_>,
        rng: &mut R,
    ) -> Result<()> {
        let ctx = inputs.ctx;
        if ctx.players_with_cards == 2 {
            let mut live = ctx.live_opponents();
            if let (Some(opponent), None) = (live.next(), live.next()) {
                return self.execute_heads_up(inputs, opponent, rng);
            }
        }
        self.execute_multi_way(inputs)
    }

    /// Against one opponent the rules pick from a mix of named tactics.
    fn execute_heads_up<R: Rng + ?Sized>(
        &mut self,
        inputs: &RuleInputs<'_, '_>,
        opponent: &OpponentView<'_>,
        rng: &mut R,
    ) -> Result<()> {
        let ctx = inputs.ctx;
        let chips = ctx.player.chips;
        let probable = inputs.hand.biased;
        let draw = inputs.hand.draw;

        let opponent_all_in = opponent.is_all_in();
        let opponent_committed = opponent.is_pot_committed();

        let mut pot_total = ctx.pot;
        if opponent_committed {
            pot_total += opponent.player.chips.min(chips.saturating_sub(ctx.to_call));
        }
        let break_even = if ctx.to_call == 0 {
            0.0
        } else {
            1.0 / (ratio(pot_total, ctx.to_call) + 1.0)
        };
        // Enough behind to make a bet worth making.
        let can_push = !opponent_committed && chips > ctx.pot / 2;

        trace!(
            probable,
            draw,
            pot_total,
            break_even,
            in_position = ctx.in_position(),
            opponent_committed,
            "heads up"
        );

        let mut outcome = AiOutcome::new(ctx.pot_status, ctx.round, ctx.limit);

        if ctx.has_acted_this_round || ctx.to_call > 0 {
            self.face_bet(&mut outcome, opponent_all_in, probable, draw, break_even);
        } else {
            if can_push
                && ctx.round == BettingRound::Flop
                && ctx.pre_flop.was_last_raiser
                && inputs.hand.apparent > 0.5
            {
                self.set_eligible(Outcome::ContinuationBet, true);
                outcome.add_tuple(Bucket::BetRaise, "Continuation Bet", 0.35, 0.0, 0.65);
            }
            if ctx.in_position() {
                self.act_first_in_position(&mut outcome, ctx, can_push, probable, draw);
            } else {
                self.act_first_out_of_position(&mut outcome, ctx, can_push, probable, draw);
            }
        }

        let (bet_range, all_in_reason) = self.heads_up_bet_range(ctx, opponent, probable, draw)?;
        outcome.set_bet_range(Some(bet_range.clone()), all_in_reason);
        self.bet_range = bet_range;

        self.strongest = if inputs.randomize {
            outcome.select_outcome(ctx.pot_status, rng)
        } else {
            outcome.strongest_outcome(ctx.pot_status)
        };
        trace!(outcome = %outcome.to_html(0), strongest = %self.strongest, "heads up tactics");
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Facing a bet or a raise: raise the near certain winners, otherwise
    /// call or fold on price.
    fn face_bet(
        &mut self,
        outcome: &mut AiOutcome,
        opponent_all_in: bool,
        probable: f32,
        draw: f32,
        break_even: f32,
    ) {
        if !opponent_all_in && probable > 0.85 {
            self.set_eligible(Outcome::Raise, true);
            outcome.add_tuple(
                Bucket::BetRaise,
                "Very Likely Best Hand",
                0.0,
                1.0 - probable,
                probable,
            );
        } else if break_even <= draw {
            self.set_eligible(Outcome::Call, true);
            let reason = if probable < 0.4 {
                "Pot Odds / Likely Worst Hand"
            } else if probable > 0.6 {
                "Pot Odds / Likely Best Hand"
            } else {
                "Pot Odds"
            };
            outcome.add_tuple(Bucket::Call, reason, 0.0, 1.0, 0.0);
        } else {
            self.set_eligible(Outcome::Fold, true);
            outcome.add_tuple(Bucket::CheckFold, "Pot Odds", 1.0, 0.0, 0.0);
        }
    }

    fn act_first_in_position(
        &mut self,
        outcome: &mut AiOutcome,
        ctx: &DecisionContext<'_>,
        can_push: bool,
        probable: f32,
        draw: f32,
    ) {
        if probable > 0.5 {
            self.set_eligible(Outcome::Bet, true);
            outcome.add_tuple(Bucket::BetRaise, "Likely Best Hand", 0.25, 0.0, 0.75);
        } else {
            self.set_eligible(Outcome::Check, true);
            outcome.add_tuple(Bucket::CheckFold, "Likely Worst Hand", 1.0, 0.0, 0.0);
            if !self.is_eligible(Outcome::ContinuationBet) && can_push {
                self.set_eligible(Outcome::Bluff, true);
                outcome.add_tuple(Bucket::BetRaise, "Bluff", 0.85, 0.0, 0.15);
            }
        }

        if ctx.player.chips >= ctx.pot && draw > 0.85 {
            self.set_eligible(Outcome::Trap, true);
            outcome.add_tuple(Bucket::BetRaise, "Trap", 0.0, 0.0, 1.0);
        }
        if draw > 0.95 {
            self.set_eligible(Outcome::SlowPlay, true);
            outcome.add_tuple(Bucket::CheckFold, "Slow-Play", 0.2, 0.4, 0.4);
        }
    }

    fn act_first_out_of_position(
        &mut self,
        outcome: &mut AiOutcome,
        ctx: &DecisionContext<'_>,
        can_push: bool,
        probable: f32,
        draw: f32,
    ) {
        if probable > 0.5 {
            self.set_eligible(Outcome::Bet, true);
            outcome.add_tuple(Bucket::BetRaise, "Likely Best Hand", 0.2, 0.0, 0.8);

            if draw > 0.75 {
                // Check-raising needs a pot's worth behind.
                if ctx.player.chips >= ctx.pot {
                    self.set_eligible(Outcome::CheckRaise, true);
                    outcome.add_tuple(Bucket::CheckFold, "Check-Raise", 0.2, 0.0, 0.8);
                    if draw > 0.85 {
                        self.set_eligible(Outcome::Trap, true);
                        outcome.add_tuple(Bucket::BetRaise, "Trap", 0.0, 0.0, 1.0);
                    }
                }
                if draw > 0.95 {
                    self.set_eligible(Outcome::SlowPlay, true);
                    outcome.add_tuple(Bucket::CheckFold, "Slow-Play", 0.2, 0.0, 0.8);
                }
            }
        } else {
            if probable < 0.5 {
                self.set_eligible(Outcome::Check, true);
                outcome.add_tuple(Bucket::CheckFold, "Likely Worst Hand", 1.0, 0.0, 0.0);
            }
            if can_push {
                if ctx.round.cards_to_come() > 0 && draw > 0.5 {
                    self.set_eligible(Outcome::SemiBluff, true);
                    outcome.add_tuple(Bucket::BetRaise, "Semi-Bluff", 0.5, 0.0, 0.5);
                } else {
                    self.set_eligible(Outcome::Bluff, true);
                    outcome.add_tuple(Bucket::BetRaise, "Bluff", 0.85, 0.0, 0.15);
                }
            }
        }
    }

    /// Size heads-up bets off the pot, moving in when any reasonable bet
    /// would commit either player anyway.
    fn heads_up_bet_range(
        &self,
        ctx: &DecisionContext<'_>,
        opponent: &OpponentView<'_>,
        probable: f32,
        draw: f32,
    ) -> Result<(BetRange, Option<String>)> {
        let mut fractions = vec![if probable > 0.85 {
            1.0 / 3.0
        } else if probable < 0.3 {
            1.0
        } else {
            2.0 / 3.0
        }];
        let chance_to_improve = draw - probable;
        if chance_to_improve > 1.0 / 3.0 {
            fractions.push(0.5);
        } else if chance_to_improve > 0.15 {
            fractions.push(2.0 / 3.0);
        } else if probable > 0.5 && chance_to_improve < -0.1 {
            fractions.push(1.0);
        }
        let pot_fraction = fractions.iter().sum::<f32>() / fractions.len() as f32;
        let bet = (pot_fraction * ctx.pot as f32) as u32;
        trace!(pot_fraction, bet, "heads up sizing");

        let reason = if ctx.is_pot_committed() {
            Some("Pot Committed")
        } else if opponent.is_pot_committed() {
            Some("Opponent is Pot Committed")
        } else if ctx.player.chips.saturating_sub(bet) <= ctx.chips_at_start / 2 {
            Some("Reasonable Bet Will Commit Me to the Pot")
        } else if opponent.player.chips.saturating_sub(bet) <= opponent.chips_at_start / 2 {
            Some("Call of Reasonable Bet Will Commit Opponent to the Pot")
        } else {
            None
        };
        match reason {
            Some(reason) => Ok((BetRange::all_in(), Some(reason.to_string()))),
            None => Ok((BetRange::pot_relative(pot_fraction, pot_fraction)?, None)),
        }
    }

    /// Three or more players: score every outcome factor by factor.
    fn execute_multi_way(&mut self, inputs: &RuleInputs<'_, '_>) -> Result<()> {
        let ctx = inputs.ctx;
        let p = inputs.personality;
        let hand = &inputs.hand;
        let players = ctx.players_with_cards;

        let pot_odds_weight = p.pot_odds_weight();
        let pot_odds = ctx.pot_odds();
        let rhs = hand.raw;
        let bhs = hand.biased;
        let potential = hand.positive_potential;
        let outdraw_risk =
            (1.0 + hand.negative_potential).powi(players.saturating_sub(1) as i32) - 1.0;
        let ehs = hand.effective(pot_odds_weight * pot_odds, players);
        let draws = Draws::new(inputs)?;

        trace!(
            rhs,
            bhs,
            ehs,
            potential,
            outdraw_risk,
            straight_draw = draws.straight,
            flush_draw = draws.flush,
            checked_rounds = ctx.rounds_without_action,
            "multi-way"
        );

        self.bet_range = BetRange::pot_relative(0.5, 1.0)?;

        if ctx.round == BettingRound::River && ctx.pot_status != PotStatus::NoPotAction && rhs >= 1.0 {
            return self.play_river_nuts(ctx);
        }

        let spot = Scoring {
            rhs,
            bhs,
            ehs,
            potential,
            outdraw_risk,
            pot_odds,
            pot_odds_weight,
            position: p.position_weight(),
            observation: p.observation_weight(),
            aggression: scale(p.aggression, -1.0, 1.0),
            checked_around: ctx.rounds_without_action as f32 * 0.15,
            after: ctx.players_yet_to_act as f32,
        };

        if ctx.pot_status == PotStatus::NoPotAction {
            self.open_betting(inputs, &spot, &draws)
        } else {
            self.face_action(ctx, &spot, &draws)
        }
    }

    /// With the nuts on the river the only question is how much.
    fn play_river_nuts(&mut self, ctx: &DecisionContext<'_>) -> Result<()> {
        let chips = ctx.player.chips;
        if chips > ctx.to_call {
            let behind = chips - ctx.to_call;
            self.bet_range = if ctx.pot == 0 {
                BetRange::all_in()
            } else {
                let all_in_ratio = ratio(behind, ctx.pot).ceil();
                BetRange::pot_relative(all_in_ratio.min(0.5), all_in_ratio)?
            };
            self.set_eligible(Outcome::Raise, true);
            self.adjust(Outcome::Raise, Factor::RawHandStrength, 1.0)
        } else {
            self.set_eligible(Outcome::Call, true);
            self.adjust(Outcome::Call, Factor::RawHandStrength, 1.0)
        }
    }

    fn open_betting(
        &mut self,
        inputs: &RuleInputs<'_, '_>,
        s: &Scoring,
        draws: &Draws,
    ) -> Result<()> {
        let ctx = inputs.ctx;
        self.set_eligible(Outcome::Check, true);
        self.adjust(Outcome::Check, Factor::Default, 1.0)?;

        // Chance nobody left to act has a hand worth continuing with.
        let mut all_weak = 1.0;
        for opponent in ctx.live_opponents() {
            if opponent.last_action_this_round == Some(ActionKind::Check) {
                continue;
            }
            all_weak *= opponent.model.check_fold_post_flop(ctx.round, 0.5)?;
        }
        trace!(all_weak, "opening the betting");

        self.set_eligible(Outcome::Bet, true);
        self.adjust(Outcome::Bet, Factor::FirstAction, 0.25)?;
        self.adjust(Outcome::Bet, Factor::LeftToAct, -0.08 * s.after * s.position)?;
        self.adjust(Outcome::Bet, Factor::RawHandStrength, s.rhs * s.rhs + 0.05)?;
        self.adjust(Outcome::Bet, Factor::BiasedHandStrength, s.bhs - s.rhs)?;
        self.adjust(Outcome::Bet, Factor::HandPotential, s.potential)?;
        self.adjust(Outcome::Bet, Factor::OutdrawRisk, s.outdraw_risk)?;
        self.adjust(Outcome::Bet, Factor::Aggression, s.aggression * 0.1)?;
        self.adjust(Outcome::Bet, Factor::CheckedAround, s.checked_around)?;
        if ctx.round == BettingRound::Flop || ctx.rounds_without_action > 0 {
            self.adjust(
                Outcome::Bet,
                Factor::StealPotential,
                s.observation * (1.0 - s.rhs * s.rhs) * all_weak * 0.5,
            )?;
        }
        let tilt = inputs.personality.tilt_weight();
        if inputs.mood.steaming(tilt) {
            self.adjust(Outcome::Bet, Factor::Steam, inputs.mood.steam * tilt * 0.1)?;
        }

        if self.strongest == Outcome::Bet && ctx.players_yet_to_act > 0 {
            self.set_eligible(Outcome::CheckRaise, true);
            self.adjust(
                Outcome::CheckRaise,
                Factor::LeftToAct,
                0.06 * s.after * s.position * (1.0 - all_weak),
            )?;
            self.adjust(
                Outcome::CheckRaise,
                Factor::RawHandStrength,
                s.rhs * s.rhs * s.rhs + 0.1,
            )?;
            self.adjust(Outcome::CheckRaise, Factor::BiasedHandStrength, s.bhs - s.rhs)?;
            self.adjust(
                Outcome::CheckRaise,
                Factor::StealPotential,
                s.observation * all_weak * -0.15,
            )?;
            self.adjust(Outcome::CheckRaise, Factor::OutdrawRisk, -s.outdraw_risk)?;
        } else if ctx.pre_flop.was_last_raiser
            && ctx.players_with_cards < 4
            && ctx.round == BettingRound::Flop
        {
            self.continuation_bet(ctx, s, draws)?;
        } else if ctx.pre_flop.raiser_checked_this_round {
            self.probe_bet = true;
            self.bet_range = BetRange::pot_relative(0.3, 0.5)?;
            self.adjust(Outcome::Bet, Factor::ProbeBet, s.rhs * 0.1)?;
        }
        Ok(())
    }

    fn continuation_bet(
        &mut self,
        ctx: &DecisionContext<'_>,
        s: &Scoring,
        draws: &Draws,
    ) -> Result<()> {
        let outcome = Outcome::ContinuationBet;
        self.set_eligible(outcome, true);
        self.adjust(outcome, Factor::RawHandStrength, s.rhs * s.rhs + 0.05)?;
        self.adjust(
            outcome,
            Factor::HandPotential,
            s.potential - 0.01 * draws.weighted_outs as f32,
        )?;
        self.adjust(outcome, Factor::FirstAction, 0.35)?;

        let raisers = &ctx.pre_flop;
        if raisers.was_first_raiser {
            if raisers.was_only_raiser {
                self.adjust(outcome, Factor::OnlyPreFlopRaiser, 0.15)?;
            } else {
                self.adjust(outcome, Factor::FirstPreFlopRaiser, 0.17)?;
            }
            match ctx.position {
                PositionCategory::Early => self.adjust(outcome, Factor::PreFlopPosition, 0.1)?,
                PositionCategory::Middle => {
                    self.adjust(outcome, Factor::PreFlopPosition, 0.05)?
                }
                _ => {}
            }
        } else {
            self.adjust(outcome, Factor::LastPreFlopRaiser, 0.05)?;
        }

        if ctx.players_with_cards == 3 {
            self.adjust(outcome, Factor::PlayersLeft, -0.1)?;
        }
        if self.strongest == outcome {
            self.bet_range = BetRange::pot_relative(0.4, 0.7)?;
        }
        Ok(())
    }

    /// Somebody has already bet: weigh calling and raising against folding.
    fn face_action(&mut self, ctx: &DecisionContext<'_>, s: &Scoring, draws: &Draws) -> Result<()> {
        let chips = ctx.player.chips;
        self.set_eligible(Outcome::Fold, true);
        self.adjust(Outcome::Fold, Factor::Default, 1.0)?;
        self.set_eligible(Outcome::Call, true);
        self.set_eligible(Outcome::Raise, ctx.to_call < chips);

        let bettor = BettorHabits::new(ctx.first_bettor(), ctx.round)?;
        let river = ctx.round == BettingRound::River;
        let share = ratio(ctx.to_call, chips);
        let priced_potential = s.potential * s.pot_odds_weight * (s.pot_odds + 1.0) / 2.0;
        let priced_strength = (s.pot_odds + 1.0) * s.pot_odds_weight * s.ehs / 2.0;

        let call_rhs = s_curve(s.rhs);
        let call_bhs = s_curve(s.bhs);
        let call = Outcome::Call;
        self.adjust(call, Factor::LeftToAct, -0.08 * s.after * s.position)?;
        self.adjust(call, Factor::RawHandStrength, call_rhs + 0.1)?;
        self.adjust(call, Factor::BiasedHandStrength, call_bhs - call_rhs)?;
        self.adjust(call, Factor::OutdrawRisk, -s.outdraw_risk)?;
        self.adjust(call, Factor::CheckedAround, s.checked_around)?;
        self.adjust(call, Factor::StraightDraw, draws.straight * 0.075)?;
        self.adjust(call, Factor::FlushDraw, draws.flush * 0.05)?;
        if river {
            self.adjust(call, Factor::PotOdds, priced_strength)?;
        } else {
            self.adjust(call, Factor::HandPotential, priced_potential)?;
        }
        self.adjust(
            call,
            Factor::BetToCall,
            -0.15 * (2.0 * share).powi(2) * (1.0 - s.ehs),
        )?;
        self.adjust(
            call,
            Factor::OpponentBetFrequency,
            s.observation * bettor.open * 0.2,
        )?;
        self.adjust(
            call,
            Factor::OpponentOverbetFrequency,
            s.observation * bettor.overbet * 0.1,
        )?;

        let raise_rhs = (s.rhs + 0.05).powi(2);
        let raise_bhs = (s.bhs + 0.05).powi(2);
        let raise = Outcome::Raise;
        self.adjust(raise, Factor::LeftToAct, -0.05 * s.after * s.position)?;
        self.adjust(raise, Factor::RawHandStrength, raise_rhs + 0.1)?;
        self.adjust(raise, Factor::BiasedHandStrength, raise_bhs - raise_rhs)?;
        self.adjust(raise, Factor::OutdrawRisk, s.outdraw_risk)?;
        self.adjust(raise, Factor::CheckedAround, s.checked_around)?;
        self.adjust(raise, Factor::Aggression, s.aggression * 0.1)?;
        if river {
            self.adjust(raise, Factor::PotOdds, priced_strength)?;
        } else {
            self.adjust(raise, Factor::HandPotential, priced_potential)?;
        }
        self.adjust(raise, Factor::BetToCall, -0.15 * share.powi(2) * (1.0 - s.ehs))?;
        self.adjust(
            raise,
            Factor::OpponentBetFrequency,
            s.observation * bettor.open * 0.2,
        )?;
        self.adjust(
            raise,
            Factor::OpponentOverbetFrequency,
            s.observation * bettor.overbet * 0.1,
        )?;
        self.adjust(
            raise,
            Factor::OpponentBetFoldFrequency,
            s.observation * bettor.bet_fold * 0.1,
        )
    }
}

/// The numbers every multi-way rule reads.
#[derive(Debug, Clone, Copy)]
struct Scoring {
    rhs: f32,
    bhs: f32,
    ehs: f32,
    potential: f32,
    outdraw_risk: f32,
    pot_odds: f32,
    pot_odds_weight: f32,
    position: f32,
    observation: f32,
    aggression: f32,
    checked_around: f32,
    /// Players still to act behind.
    after: f32,
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::ai::context::{PlayerAction, PlayerInfo};
    use crate::ai::opponent_model::OpponentModel;
    use crate::ai::rule_engine::{HandStrengths, Mood, Personality};
    use crate::core::{CardBitSet, Pocket};

    fn context<'a>(
        pocket: &str,
        board: &str,
        opponents: usize,
        model: &'a OpponentModel,
    ) -> DecisionContext<'a> {
        let pocket = Pocket::from_str_cards(pocket).unwrap();
        let board = CardBitSet::from_str_cards(board).unwrap();
        let player = PlayerInfo::new(0, "hero", 1000);
        let mut ctx = DecisionContext::new(pocket, board, player, 20).unwrap();
        ctx.players_with_cards = opponents + 1;
        ctx.pot = 200;
        ctx.opponents = (1..=opponents)
            .map(|seat| {
                let player = PlayerInfo::new(seat, format!("villain {seat}"), 1000);
                OpponentView::new(player, PositionCategory::Middle, model)
            })
            .collect();
        ctx
    }

    fn strengths(raw: f32, biased: f32, positive: f32, negative: f32) -> HandStrengths {
        HandStrengths {
            raw,
            biased,
            positive_potential: positive,
            negative_potential: negative,
            draw: biased,
            apparent: biased,
            ..Default::default()
        }
    }

    fn run(ctx: &DecisionContext<'_>, hand: HandStrengths) -> RuleEngine {
        let personality = Personality::default();
        let inputs = RuleInputs {
            ctx,
            hand,
            personality: &personality,
            mood: Mood::default(),
            randomize: false,
        };
        let mut engine = RuleEngine::default();
        let mut rng = StdRng::seed_from_u64(11);
        engine.execute(&inputs, &mut rng).unwrap();
        engine
    }

    #[test]
    fn test_s_curve() {
        assert_relative_eq!(0.5, s_curve(0.5));
        assert_relative_eq!(1.0, s_curve(1.0));
        assert_relative_eq!(0.0, s_curve(0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_straight_draws_halved_by_flush_board() {
        let model = OpponentModel::new();
        let personality = Personality {
            straight_draws: 1.0,
            ..Default::default()
        };
        let draws = |board: &str| {
            let ctx = context("8c9d", board, 2, &model);
            let inputs = RuleInputs {
                ctx: &ctx,
                hand: HandStrengths::default(),
                personality: &personality,
                mood: Mood::default(),
                randomize: false,
            };
            Draws::new(&inputs).unwrap()
        };

        // Four sevens to the nuts, four queens to a straight an ace high
        // straight beats.
        let rainbow = draws("ThJs2c");
        assert_relative_eq!(6.0, rainbow.straight);
        assert_eq!(12, rainbow.weighted_outs);
        // Flush draws are ignored at the default setting.
        assert_eq!(0.0, rainbow.flush);

        let suited = draws("ThJh2h");
        assert_relative_eq!(3.0, suited.straight);
    }

    #[test_log::test]
    fn test_heads_up_raises_the_nuts() {
        let model = OpponentModel::new();
        let mut ctx = context("AsAd", "Ac7h2d", 1, &model);
        ctx.pot_status = PotStatus::Raised;
        ctx.to_call = 100;
        let mut hand = strengths(0.9, 0.9, 0.0, 0.0);
        hand.draw = 0.92;

        let engine = run(&ctx, hand);
        assert_eq!(Outcome::Raise, engine.strongest_outcome());
        assert_eq!(PlayerAction::Raise(0), engine.action());
        let outcome = engine.outcome().unwrap();
        assert_relative_eq!(0.9, outcome.bet_raise(), epsilon = 1e-6);
        assert!(outcome.to_html(0).contains("Very Likely Best Hand"));
        let third = BetRange::pot_relative(1.0 / 3.0, 1.0 / 3.0).unwrap();
        assert_eq!(&third, engine.bet_range());
        assert_eq!(None, outcome.all_in_reason());
    }

    #[test_log::test]
    fn test_heads_up_folds_without_the_price() {
        let model = OpponentModel::new();
        let mut ctx = context("Th4c", "Ac7h2d", 1, &model);
        ctx.pot_status = PotStatus::Raised;
        ctx.pot = 100;
        ctx.to_call = 100;
        let mut hand = strengths(0.2, 0.2, 0.0, 0.0);
        hand.draw = 0.25;

        let engine = run(&ctx, hand);
        assert_eq!(Outcome::Fold, engine.strongest_outcome());
        assert_eq!(1.0, engine.outcome().unwrap().check_fold());
    }

    #[test_log::test]
    fn test_heads_up_semi_bluff_out_of_position() {
        let model = OpponentModel::new();
        let mut ctx = context("8h9h", "Ah7h2d", 1, &model);
        ctx.players_yet_to_act = 1;
        let mut hand = strengths(0.3, 0.3, 0.3, 0.0);
        hand.draw = 0.6;

        let engine = run(&ctx, hand);
        let outcome = engine.outcome().unwrap();
        assert_eq!(2, outcome.tactic_count());
        assert!(engine.is_eligible(Outcome::SemiBluff));
        assert!(!engine.is_eligible(Outcome::Bluff));
        assert_relative_eq!(0.75, outcome.check_fold(), epsilon = 1e-6);
        assert_eq!(Outcome::Check, engine.strongest_outcome());
        let two_thirds = BetRange::pot_relative(2.0 / 3.0, 2.0 / 3.0).unwrap();
        assert_eq!(&two_thirds, engine.bet_range());
    }

    #[test_log::test]
    fn test_heads_up_pot_committed_moves_in() {
        let model = OpponentModel::new();
        let mut ctx = context("AsAd", "Ac7h2d", 1, &model);
        ctx.pot_status = PotStatus::Raised;
        ctx.to_call = 100;
        ctx.player.chips = 300;

        let engine = run(&ctx, strengths(0.95, 0.95, 0.0, 0.0));
        let outcome = engine.outcome().unwrap();
        assert_eq!(Some("Pot Committed"), outcome.all_in_reason());
        assert_eq!(&BetRange::all_in(), engine.bet_range());
        assert!(outcome.to_html(0).contains("Pot Committed"));
    }

    #[test_log::test]
    fn test_multi_way_bets_strong_hand() {
        let model = OpponentModel::new();
        let mut ctx = context("AsAh", "Ad7c2h", 2, &model);
        ctx.players_yet_to_act = 2;

        let engine = run(&ctx, strengths(0.95, 0.95, 0.05, 0.05));
        assert!(engine.outcome().is_none());
        assert_relative_eq!(1.2071875, engine.score(Outcome::Bet), epsilon = 1e-5);
        assert!(engine.is_eligible(Outcome::CheckRaise));
        assert_relative_eq!(0.907375, engine.score(Outcome::CheckRaise), epsilon = 1e-5);
        assert_eq!(Outcome::Bet, engine.strongest_outcome());
        assert_eq!(&BetRange::pot_relative(0.5, 1.0).unwrap(), engine.bet_range());
    }

    #[test_log::test]
    fn test_multi_way_continuation_bet() {
        let model = OpponentModel::new();
        let mut ctx = context("Kc9d", "2h7sQd", 2, &model);
        ctx.position = PositionCategory::Early;
        ctx.pre_flop.was_first_raiser = true;
        ctx.pre_flop.was_last_raiser = true;
        ctx.pre_flop.was_only_raiser = true;

        let engine = run(&ctx, strengths(0.7, 0.7, 0.1, 0.0));
        assert_relative_eq!(0.95375, engine.score(Outcome::Bet), epsilon = 1e-5);
        assert_relative_eq!(1.14, engine.score(Outcome::ContinuationBet), epsilon = 1e-5);
        assert_eq!(Outcome::ContinuationBet, engine.strongest_outcome());
        assert_eq!(&BetRange::pot_relative(0.4, 0.7).unwrap(), engine.bet_range());
    }

    #[test_log::test]
    fn test_multi_way_probe_bet() {
        let model = OpponentModel::new();
        let mut ctx = context("Kc9d", "2h7sQd", 3, &model);
        ctx.pre_flop.raiser_checked_this_round = true;

        let engine = run(&ctx, strengths(0.5, 0.5, 0.0, 0.0));
        assert!(engine.is_probe_bet());
        assert_eq!(&BetRange::pot_relative(0.3, 0.5).unwrap(), engine.bet_range());
        assert_eq!(Outcome::Check, engine.strongest_outcome());
    }

    #[test_log::test]
    fn test_multi_way_folds_weak_river() {
        let model = OpponentModel::new();
        let mut ctx = context("Th4c", "Ac7h2dKsQs", 2, &model);
        ctx.pot_status = PotStatus::Raised;
        ctx.pot = 300;
        ctx.to_call = 100;
        ctx.players_yet_to_act = 1;

        let engine = run(&ctx, strengths(0.2, 0.2, 0.0, 0.0));
        assert_relative_eq!(0.2497315, engine.score(Outcome::Call), epsilon = 1e-5);
        assert_eq!(Outcome::Fold, engine.strongest_outcome());
    }

    #[test_log::test]
    fn test_multi_way_river_nuts_raise() {
        let model = OpponentModel::new();
        let mut ctx = context("AhKh", "QhJhTh2c3d", 2, &model);
        ctx.pot_status = PotStatus::Raised;
        ctx.pot = 400;
        ctx.to_call = 100;

        let engine = run(&ctx, strengths(1.0, 1.0, 0.0, 0.0));
        assert_eq!(Outcome::Raise, engine.strongest_outcome());
        assert_eq!(&BetRange::pot_relative(0.5, 3.0).unwrap(), engine.bet_range());
    }
}
