//! Weighted rules that score every possible outcome of a decision.
//!
//! Each rule looks at one game factor and nudges the score of one outcome.
//! Only outcomes eligible in the current spot collect score, and the
//! eligible outcome with the highest score is the recommendation. Heads-up
//! after the flop the rules instead build an [`AiOutcome`] out of named
//! tactics and pick from its mix.

mod adjustment;
mod codes;
mod inputs;
mod post_flop;
mod pre_flop;

use rand::Rng;
use tracing::{debug, instrument, trace};

pub use self::adjustment::{AccumulationPolicy, OutcomeAdjustment, OutcomeScore};
pub use self::codes::{Curve, Factor, OUTCOME_COUNT, OUTCOME_NONE, Outcome};
pub use self::inputs::{HandStrengths, HohZone, Mood, Personality, RuleInputs, scale};

use super::bet_range::BetRange;
use super::context::{BettingRound, PlayerAction};
use super::errors::Result;
use super::outcome::AiOutcome;

#[derive(Debug, Clone)]
pub struct RuleEngine {
    policy: AccumulationPolicy,
    scores: [OutcomeScore; OUTCOME_COUNT],
    eligible: [bool; OUTCOME_COUNT],
    adjustments: Vec<OutcomeAdjustment>,
    strongest: Outcome,
    bet_range: BetRange,
    outcome: Option<AiOutcome>,
    probe_bet: bool,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(AccumulationPolicy::default())
    }
}

impl RuleEngine {
    pub fn new(policy: AccumulationPolicy) -> Self {
        Self {
            policy,
            scores: [OutcomeScore::default(); OUTCOME_COUNT],
            eligible: [false; OUTCOME_COUNT],
            adjustments: Vec::new(),
            strongest: Outcome::Fold,
            bet_range: BetRange::BigBlind { min: 2.0, max: 4.0 },
            outcome: None,
            probe_bet: false,
        }
    }

    pub fn policy(&self) -> AccumulationPolicy {
        self.policy
    }

    /// Forget every score, adjustment and eligibility flag.
    pub fn reset(&mut self) {
        self.scores = [OutcomeScore::default(); OUTCOME_COUNT];
        self.eligible = [false; OUTCOME_COUNT];
        self.adjustments.clear();
        self.strongest = Outcome::Fold;
        self.bet_range = BetRange::BigBlind { min: 2.0, max: 4.0 };
        self.outcome = None;
        self.probe_bet = false;
    }

    pub fn set_eligible(&mut self, outcome: Outcome, eligible: bool) {
        self.eligible[outcome.index()] = eligible;
    }

    pub fn is_eligible(&self, outcome: Outcome) -> bool {
        self.eligible[outcome.index()]
    }

    /// Check when checking is allowed, fold otherwise.
    fn reset_strongest(&mut self) {
        self.strongest = if self.is_eligible(Outcome::Check) {
            Outcome::Check
        } else {
            Outcome::Fold
        };
    }

    /// Add `value` to an outcome's score as a linear, unweighted rule.
    pub fn adjust(&mut self, outcome: Outcome, factor: Factor, value: f32) -> Result<()> {
        let adjustment = OutcomeAdjustment::linear(outcome, factor, value)?;
        self.apply(adjustment);
        Ok(())
    }

    /// Count a rule towards its outcome. Ignored unless the outcome is
    /// eligible.
    pub fn apply(&mut self, adjustment: OutcomeAdjustment) {
        let outcome = adjustment.outcome();
        if !self.is_eligible(outcome) {
            return;
        }
        self.scores[outcome.index()].add(&adjustment);
        trace!(
            outcome = %outcome,
            factor = %adjustment.factor(),
            value = adjustment.value(),
            score = self.score(outcome),
            "adjusted"
        );
        self.adjustments.push(adjustment);
        self.determine_strongest();
    }

    pub fn score(&self, outcome: Outcome) -> f32 {
        self.scores[outcome.index()].value(self.policy)
    }

    /// Every rule counted so far, oldest first.
    pub fn adjustments(&self) -> &[OutcomeAdjustment] {
        &self.adjustments
    }

    /// The eligible outcome scoring at least 0.01, later codes winning ties.
    /// Stays put when nothing qualifies.
    fn determine_strongest(&mut self) {
        let mut best = 0.0f32;
        for outcome in Outcome::ALL {
            let score = self.score(outcome);
            if self.is_eligible(outcome) && (score * 100.0) as i32 > 0 && score >= best {
                self.strongest = outcome;
                best = score;
            }
        }
    }

    pub fn strongest_outcome(&self) -> Outcome {
        self.strongest
    }

    pub fn bet_range(&self) -> &BetRange {
        &self.bet_range
    }

    /// The tactic mix, when the last run built one.
    pub fn outcome(&self) -> Option<&AiOutcome> {
        self.outcome.as_ref()
    }

    /// The last run found a spot to bet into a raiser who checked.
    pub fn is_probe_bet(&self) -> bool {
        self.probe_bet
    }

    /// The table action for the strongest outcome. Bets and raises come
    /// back unsized, as `Raise(0)`.
    pub fn action(&self) -> PlayerAction {
        match self.strongest {
            Outcome::Check | Outcome::CheckRaise => PlayerAction::Check,
            Outcome::Fold => PlayerAction::Fold,
            Outcome::Limp | Outcome::Call | Outcome::SlowPlay => PlayerAction::Call,
            Outcome::AllIn
            | Outcome::OpenPot
            | Outcome::Bet
            | Outcome::ContinuationBet
            | Outcome::Steal
            | Outcome::Raise
            | Outcome::SemiBluff
            | Outcome::Trap
            | Outcome::Bluff => PlayerAction::Raise(0),
        }
    }

    /// Run every rule for the spot in `inputs` and return the strongest
    /// outcome.
    #[instrument(
        level = "debug",
        skip(self, inputs, rng),
        fields(round = %inputs.ctx.round, player = %inputs.ctx.player.name)
    )]
    pub fn execute<R: Rng + ?Sized>(&mut self, inputs: &RuleInputs<'_, '_>, rng: &mut R) -> Result<Outcome> {
        self.reset();
        self.determine_eligible(inputs.ctx);
        self.reset_strongest();

        if inputs.ctx.round == BettingRound::PreFlop {
            self.execute_pre_flop(inputs)?;
            self.set_pre_flop_bet_range(inputs.ctx)?;
        } else {
            self.execute_post_flop(inputs, rng)?;
        }

        debug!(
            strongest = %self.strongest,
            bet_range = %self.bet_range,
            adjustments = self.adjustments.len(),
            probe_bet = self.probe_bet,
            "rules done"
        );
        Ok(self.strongest)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::ai::errors::AiError;

    #[test]
    fn test_eligibility_is_per_outcome() {
        let mut engine = RuleEngine::default();
        engine.set_eligible(Outcome::Bet, true);
        assert!(engine.is_eligible(Outcome::Bet));
        assert!(!engine.is_eligible(Outcome::Raise));
        engine.set_eligible(Outcome::Raise, true);
        engine.set_eligible(Outcome::Bet, false);
        assert!(!engine.is_eligible(Outcome::Bet));
        assert!(engine.is_eligible(Outcome::Raise));
    }

    #[test]
    fn test_ineligible_adjustments_ignored() {
        let mut engine = RuleEngine::default();
        engine.adjust(Outcome::Call, Factor::PotOdds, 0.7).unwrap();
        assert_eq!(0.0, engine.score(Outcome::Call));
        assert!(engine.adjustments().is_empty());
        assert_eq!(Outcome::Fold, engine.strongest_outcome());
    }

    #[test]
    fn test_strongest_outcome() {
        let mut engine = RuleEngine::default();
        for o in [Outcome::Check, Outcome::Bet, Outcome::CheckRaise] {
            engine.set_eligible(o, true);
        }
        engine.reset_strongest();
        assert_eq!(Outcome::Check, engine.strongest_outcome());

        engine.adjust(Outcome::Bet, Factor::RawHandStrength, 0.005).unwrap();
        // Below a hundredth doesn't count.
        assert_eq!(Outcome::Check, engine.strongest_outcome());

        engine.adjust(Outcome::Check, Factor::Default, 0.5).unwrap();
        engine.adjust(Outcome::Bet, Factor::RawHandStrength, 0.495).unwrap();
        assert_relative_eq!(0.5, engine.score(Outcome::Bet), epsilon = 1e-6);
        // Later codes win ties.
        engine.adjust(Outcome::CheckRaise, Factor::LeftToAct, 0.7).unwrap();
        assert_eq!(Outcome::CheckRaise, engine.strongest_outcome());
        assert_eq!(PlayerAction::Check, engine.action());
    }

    #[test]
    fn test_nan_is_an_error() {
        let mut engine = RuleEngine::default();
        engine.set_eligible(Outcome::Call, true);
        assert_eq!(
            Err(AiError::NanAdjustment("value")),
            engine.adjust(Outcome::Call, Factor::PotOdds, f32::NAN)
        );
    }

    #[test]
    fn test_policies() {
        let mut max = RuleEngine::new(AccumulationPolicy::Max);
        let mut mean = RuleEngine::new(AccumulationPolicy::WeightedMean);
        for engine in [&mut max, &mut mean] {
            engine.set_eligible(Outcome::Raise, true);
            engine.adjust(Outcome::Raise, Factor::HandSelection, 0.8).unwrap();
            engine.adjust(Outcome::Raise, Factor::Aggression, 0.2).unwrap();
        }
        assert_relative_eq!(0.8, max.score(Outcome::Raise));
        assert_relative_eq!(0.5, mean.score(Outcome::Raise));
        assert_eq!(AccumulationPolicy::Max, max.policy());
    }

    #[test]
    fn test_action_mapping() {
        let mut engine = RuleEngine::default();
        let cases = [
            (Outcome::Fold, PlayerAction::Fold),
            (Outcome::Limp, PlayerAction::Call),
            (Outcome::SlowPlay, PlayerAction::Call),
            (Outcome::Steal, PlayerAction::Raise(0)),
            (Outcome::Bluff, PlayerAction::Raise(0)),
        ];
        for (outcome, action) in cases {
            engine.strongest = outcome;
            assert_eq!(action, engine.action());
        }
    }

    #[test]
    fn test_reset() {
        let mut engine = RuleEngine::default();
        engine.set_eligible(Outcome::Bet, true);
        engine.adjust(Outcome::Bet, Factor::FirstAction, 0.25).unwrap();
        engine.reset();
        assert!(!engine.is_eligible(Outcome::Bet));
        assert_eq!(0.0, engine.score(Outcome::Bet));
        assert!(engine.adjustments().is_empty());
        assert!(engine.outcome().is_none());
        assert_eq!(BetRange::BigBlind { min: 2.0, max: 4.0 }, *engine.bet_range());
    }
}
