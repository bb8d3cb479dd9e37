//! The decision core: hand strength, opponent modelling and the rules that
//! turn them into an action.
//!
//! Strength caches are built per board from [`PocketScores`] up:
//! [`PocketRanks`] for how often a pocket is ahead now and [`PocketOdds`]
//! for how that changes with the cards to come. [`OpponentModel`]s keep
//! recency weighted statistics about the other players. The
//! [`RuleEngine`] scores every possible [`Outcome`] from all of that, and a
//! [`Strategy`] turns the winner into a [`Decision`] with a bet sized from
//! a [`BetRange`].

/// Errors for the whole module.
mod errors;
/// Export `AiError`
pub use self::errors::{AiError, Result};

/// Storage with one slot per pocket.
mod pocket_matrix;
/// Export `PocketMatrix`
pub use self::pocket_matrix::{POCKET_COUNT, PocketMatrix};

/// Ordinal scores of every pocket on a board.
mod pocket_scores;
pub use self::pocket_scores::PocketScores;

/// Raw hand strength of every pocket on a board.
mod pocket_ranks;
pub use self::pocket_ranks::PocketRanks;

/// Hand strength with potential for one pocket.
mod pocket_odds;
pub use self::pocket_odds::PocketOdds;

/// Single board memoization of the strength tables.
mod board_cache;
pub use self::board_cache::{BoardCache, PocketCaches};

/// Flush and straight draws.
mod hand_potential;
pub use self::hand_potential::{BoardTexture, HandPotential};

/// Starting hand classes and the groups they are sorted into.
mod hand_selection;
pub use self::hand_selection::{HAND_CLASS_COUNT, HandClass, HandGroup, HandSelectionScheme};

/// Static opponent range tables.
mod simple_bias;
pub use self::simple_bias::{MAX_TABLE, SimpleBias};

/// Weights of an opponent's possible holdings.
mod hand_probability;
pub use self::hand_probability::HandProbabilityMatrix;

/// Recency weighted statistics.
mod tracker;
pub use self::tracker::{BooleanTracker, FloatTracker};

/// What is known about each opponent.
mod opponent_model;
pub use self::opponent_model::{HandRecord, OpponentModel, RecordedAction};

/// Table facts a decision is made from.
mod context;
pub use self::context::{
    ActionKind, BettingRound, DecisionContext, OpponentView, PlayerAction, PlayerInfo,
    PositionCategory, PostFlopPosition, PotStatus, PreFlopRaisers, hoh_m,
};

/// Bet sizing.
mod bet_range;
pub use self::bet_range::{ALL_IN, BIG_BLIND, BetContext, BetRange, POT_SIZE, STACK_SIZE, StackOwner};

/// Check/fold, call and bet/raise mixes.
mod outcome;
pub use self::outcome::{AiOutcome, Bucket};

/// Weighted rules.
mod rule_engine;
pub use self::rule_engine::{
    AccumulationPolicy, Curve, Factor, HandStrengths, HohZone, Mood, OUTCOME_COUNT, OUTCOME_NONE,
    Outcome, OutcomeAdjustment, OutcomeScore, Personality, RuleEngine, RuleInputs, scale,
};

/// Putting it all together.
mod strategy;
pub use self::strategy::{Decision, ObservedAction, Strategy, StrategyKind, V2Strategy, hand_strengths};
#[cfg(feature = "serde")]
pub use self::strategy::{StrategyConfig, StrategyConfigError};
