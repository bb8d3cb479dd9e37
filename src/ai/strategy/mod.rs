//! Strategies turn a [`DecisionContext`] into the action to take.
//!
//! [`V2Strategy`] works out how strong the hand is, runs the rule engine
//! over it and sizes whatever bet the rules settle on. It also carries the
//! little state a player keeps between decisions: steam from bad beats and
//! how much the current pre-flop raiser looks like a thief.

#[cfg(feature = "serde")]
mod config;
mod strengths;

use std::fmt;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
pub use self::config::{StrategyConfig, StrategyConfigError};
pub use self::strengths::hand_strengths;

use crate::ai::bet_range::{BetContext, BetRange};
use crate::ai::board_cache::PocketCaches;
use crate::ai::context::{
    ActionKind, BettingRound, DecisionContext, PlayerAction, PositionCategory, PotStatus,
};
use crate::ai::errors::Result;
use crate::ai::hand_selection::HandSelectionScheme;
use crate::ai::opponent_model::OpponentModel;
use crate::ai::rule_engine::{
    AccumulationPolicy, Mood, Outcome, Personality, RuleEngine, RuleInputs,
};
use crate::core::Pocket;

/// The kinds of strategy there are.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    V2,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::V2 => f.write_str("v2"),
        }
    }
}

/// What a strategy decided and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: PlayerAction,
    /// The rule outcome the action came from.
    pub outcome: Outcome,
    /// Chips put in on top of the call. Zero unless betting or raising.
    pub amount: u32,
    pub explanation: String,
}

/// Another player's action, as seen from this seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedAction {
    pub round: BettingRound,
    /// The pot status before the action.
    pub pot_status: PotStatus,
    pub position: PositionCategory,
    pub is_button: bool,
    pub kind: ActionKind,
    pub amount: u32,
    /// Chips in the pot.
    pub pot: u32,
}

/// A player's decision making.
///
/// The table tells the strategy when a hand starts and ends and what the
/// other players do, and asks it for a decision whenever it's this player's
/// turn.
pub trait Strategy: Send {
    fn kind(&self) -> StrategyKind;

    /// A new hand was dealt. Called before any action of the hand is
    /// observed.
    fn start_hand(&mut self, pocket: Pocket);

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Decision>;

    /// Watch another player act. `model` is that player's opponent model.
    fn player_acted(&mut self, action: &ObservedAction, model: &mut OpponentModel);

    /// The hand is over. `bad_beat` is how badly this player lost a hand
    /// they were favoured in, zero if they didn't.
    fn end_hand(&mut self, bad_beat: f32);
}

/// Weighted rules with opponent modelling.
#[derive(Debug)]
pub struct V2Strategy {
    personality: Personality,
    randomize: bool,
    hand_selection: Option<HandSelectionScheme>,
    caches: PocketCaches,
    engine: RuleEngine,
    rng: StdRng,
    mood: Mood,
    pocket: Option<Pocket>,
}

impl V2Strategy {
    /// A strategy with the default accumulation policy that draws heads-up
    /// tactics at random. Without a seed the generator is seeded from the
    /// thread's generator.
    pub fn new(personality: Personality, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            personality,
            randomize: true,
            hand_selection: None,
            caches: PocketCaches::new(),
            engine: RuleEngine::default(),
            rng,
            mood: Mood::default(),
            pocket: None,
        }
    }

    pub fn with_accumulation(mut self, policy: AccumulationPolicy) -> Self {
        self.engine = RuleEngine::new(policy);
        self
    }

    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// Starting hand groups used instead of the bias tables. Schemes
    /// without any hands are ignored.
    pub fn with_hand_selection(mut self, scheme: Option<HandSelectionScheme>) -> Self {
        self.hand_selection = scheme;
        self
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    /// The engine as the last decision left it.
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Chips to bet or raise by for the range the rules picked.
    fn size_bet(&mut self, ctx: &DecisionContext<'_>, range: &BetRange) -> u32 {
        let bet_ctx = BetContext::from_decision(ctx);
        let room = ctx.player.chips.saturating_sub(ctx.to_call);
        let amount = if ctx.limit {
            ctx.min_raise
        } else {
            range.choose_bet_amount(&bet_ctx, &mut self.rng)
        };
        amount.min(room)
    }

    fn explain(&self, ctx: &DecisionContext<'_>, outcome: Outcome, amount: u32) -> String {
        if let Some(mix) = self.engine.outcome() {
            return mix.to_html(1);
        }
        if amount == 0 {
            return outcome.to_string();
        }
        let bet_ctx = BetContext::from_decision(ctx);
        format!("{outcome} {}", self.engine.bet_range().describe(&bet_ctx, false))
    }
}

impl Strategy for V2Strategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::V2
    }

    fn start_hand(&mut self, pocket: Pocket) {
        self.pocket = Some(pocket);
        self.mood.steal_suspicion = 0.0;
    }

    #[instrument(
        level = "debug",
        skip(self, ctx),
        fields(round = %ctx.round, player = %ctx.player.name, pocket = %ctx.pocket)
    )]
    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Decision> {
        if self.pocket != Some(ctx.pocket) {
            self.start_hand(ctx.pocket);
        }

        let hand = hand_strengths(&mut self.caches, ctx, self.hand_selection.as_ref())?;
        let inputs = RuleInputs {
            ctx,
            hand,
            personality: &self.personality,
            mood: self.mood,
            randomize: self.randomize,
        };
        let outcome = self.engine.execute(&inputs, &mut self.rng)?;

        let (action, amount) = match self.engine.action() {
            PlayerAction::Raise(_) => {
                let range = self.engine.bet_range().clone();
                match self.size_bet(ctx, &range) {
                    0 if ctx.to_call == 0 => (PlayerAction::Check, 0),
                    0 => (PlayerAction::Call, 0),
                    amount => (PlayerAction::Raise(amount), amount),
                }
            }
            PlayerAction::Fold | PlayerAction::Check | PlayerAction::Call
                if ctx.to_call == 0 =>
            {
                (PlayerAction::Check, 0)
            }
            PlayerAction::Check => (PlayerAction::Fold, 0),
            action => (action, 0),
        };

        let decision = Decision {
            action,
            outcome,
            amount,
            explanation: self.explain(ctx, outcome, amount),
        };
        debug!(
            action = ?decision.action,
            outcome = %decision.outcome,
            raw = hand.raw,
            biased = hand.biased,
            pre_flop = hand.pre_flop,
            "decided"
        );
        Ok(decision)
    }

    fn player_acted(&mut self, action: &ObservedAction, model: &mut OpponentModel) {
        if action.round != BettingRound::PreFlop {
            if action.kind.is_aggressive() && action.amount > action.pot / 2 {
                model.note_overbet_pot_post_flop();
            }
            return;
        }

        if action.pot_status == PotStatus::NoPotAction {
            // The first raise in could be a blind steal.
            if action.kind.is_aggressive() {
                self.mood.steal_suspicion = match action.position {
                    PositionCategory::Middle => 0.03,
                    PositionCategory::Late if action.is_button => 0.10,
                    PositionCategory::Late => 0.08,
                    PositionCategory::Small => 0.12,
                    PositionCategory::Early | PositionCategory::Big => self.mood.steal_suspicion,
                };
            }
            return;
        }

        match action.kind {
            ActionKind::Raise | ActionKind::Bet => self.mood.steal_suspicion = 0.0,
            ActionKind::Call => {
                // Calling a steal at a poor price means a real hand behind.
                if action.amount == 0 || (action.pot as f32 / action.amount as f32) < 3.0 {
                    self.mood.steal_suspicion = 0.0;
                } else {
                    self.mood.steal_suspicion /= 2.0;
                }
            }
            ActionKind::Fold | ActionKind::Check => {}
        }
    }

    fn end_hand(&mut self, bad_beat: f32) {
        self.mood.steam = if bad_beat > 0.0 {
            (self.mood.steam + bad_beat.ln()).max(0.0)
        } else {
            self.mood.steam * 0.5
        };
        debug!(steam = self.mood.steam, "hand over");
    }
}
