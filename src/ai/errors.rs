use thiserror::Error;

use super::context::BettingRound;

/// Precondition failures of the decision core.
///
/// Not having enough observations is never one of these; trackers and the
/// opponent model hand back the caller's default instead.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum AiError {
    #[error("Community must hold between 3 and 5 cards, found {0}")]
    InvalidCommunity(usize),

    #[error("Community already holds the river, there are no cards to come")]
    NoCardsToCome,

    #[error("Pocket must be two distinct cards that are not on the board")]
    InvalidPocket,

    #[error("Opponent pocket shares a card with the board or the player")]
    ImpossibleOpponent,

    #[error("Round {0} has no post flop statistics")]
    InvalidRound(BettingRound),

    #[error("BetRange min greater than max")]
    BetRangeMinGreaterThanMax,

    #[error("BetRange min/max both zero")]
    BetRangeZero,

    #[error("Stack relative BetRange but no player")]
    BetRangeNoPlayer,

    #[error("Unrecognized BetRange type {0}")]
    UnrecognizedBetRangeType(u8),

    #[error("Unrecognized starting hand {0:?}")]
    InvalidHandClass(String),

    #[error("NaN in {0}")]
    NanAdjustment(&'static str),

    #[error("Unknown outcome code {0}")]
    UnknownOutcome(i32),

    #[error("Malformed tracker encoding: {0}")]
    TrackerDecode(String),

    #[error("Unable to read persisted value {value:?} for key {key}")]
    PersistedValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, AiError>;
