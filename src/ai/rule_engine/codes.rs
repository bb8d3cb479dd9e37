use std::fmt;

use crate::ai::errors::{AiError, Result};

/// Code used where no outcome has been picked.
pub const OUTCOME_NONE: i32 = -1;

/// Number of outcomes, the size of any table keyed by outcome.
pub const OUTCOME_COUNT: usize = 15;

/// What the rules can end up recommending. The discriminant is the stable
/// outcome code.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Fold = 0,
    Check = 1,
    Limp = 2,
    Steal = 3,
    OpenPot = 4,
    Call = 5,
    Raise = 6,
    SemiBluff = 7,
    Trap = 8,
    SlowPlay = 9,
    CheckRaise = 10,
    Bet = 11,
    AllIn = 12,
    ContinuationBet = 13,
    Bluff = 14,
}

impl Outcome {
    pub const ALL: [Outcome; OUTCOME_COUNT] = [
        Outcome::Fold,
        Outcome::Check,
        Outcome::Limp,
        Outcome::Steal,
        Outcome::OpenPot,
        Outcome::Call,
        Outcome::Raise,
        Outcome::SemiBluff,
        Outcome::Trap,
        Outcome::SlowPlay,
        Outcome::CheckRaise,
        Outcome::Bet,
        Outcome::AllIn,
        Outcome::ContinuationBet,
        Outcome::Bluff,
    ];

    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Look an outcome up by code. `OUTCOME_NONE` is `None`.
    pub fn from_code(code: i32) -> Result<Option<Outcome>> {
        if code == OUTCOME_NONE {
            return Ok(None);
        }
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .map(Some)
            .ok_or(AiError::UnknownOutcome(code))
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The short name used in rule tables and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Fold => "fold",
            Outcome::Check => "check",
            Outcome::Limp => "limp",
            Outcome::Steal => "steal",
            Outcome::OpenPot => "openpot",
            Outcome::Call => "call",
            Outcome::Raise => "raisevalue",
            Outcome::SemiBluff => "semibluff",
            Outcome::Trap => "trap",
            Outcome::SlowPlay => "slowplay",
            Outcome::CheckRaise => "checkraise",
            Outcome::Bet => "bet",
            Outcome::AllIn => "allin",
            Outcome::ContinuationBet => "continuationbet",
            Outcome::Bluff => "bluff",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for Outcome {
    type Error = AiError;

    fn try_from(code: i32) -> Result<Self> {
        Outcome::from_code(code)?.ok_or(AiError::UnknownOutcome(code))
    }
}

/// The game facts a rule can look at. Gaps in the codes are kept so that
/// saved rule tables stay readable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Factor {
    Default = 0,
    HandSelection = 1,
    BlindStealing = 2,
    LeftToAct = 3,
    Position = 8,
    StackSize = 9,
    PotOdds = 11,
    RawHandStrength = 12,
    BiasedHandStrength = 13,
    HandPotential = 14,
    BetToCall = 15,
    Aggression = 18,
    StealSuspected = 20,
    StraightDraw = 22,
    FlushDraw = 23,
    ProbeBet = 25,
    PlayersLeft = 26,
    FirstPreFlopRaiser = 27,
    LastPreFlopRaiser = 28,
    OnlyPreFlopRaiser = 29,
    PreFlopPosition = 30,
    RaiserStackSize = 31,
    ImpliedOdds = 32,
    RaiserPosition = 33,
    ReraiserPosition = 34,
    Boredom = 35,
    Steam = 36,
    FirstAction = 37,
    OutdrawRisk = 38,
    CheckedAround = 39,
    BlindsClosing = 40,
    OpponentBetFrequency = 41,
    OpponentRaiseFrequency = 42,
    OpponentOverbetFrequency = 43,
    OpponentBetFoldFrequency = 44,
    StealPotential = 45,
}

impl Factor {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Factor::Default => "default",
            Factor::HandSelection => "handselection",
            Factor::BlindStealing => "blindstealing",
            Factor::LeftToAct => "lefttoact",
            Factor::Position => "position",
            Factor::StackSize => "stacksize",
            Factor::PotOdds => "potodds",
            Factor::RawHandStrength => "rawhandstrength",
            Factor::BiasedHandStrength => "biasedhandstrength",
            Factor::HandPotential => "handpotential",
            Factor::BetToCall => "bettocall",
            Factor::Aggression => "aggression",
            Factor::StealSuspected => "stealsuspected",
            Factor::StraightDraw => "straightdraw",
            Factor::FlushDraw => "flushdraw",
            Factor::ProbeBet => "probebet",
            Factor::PlayersLeft => "playersleft",
            Factor::FirstPreFlopRaiser => "firstpreflopraiser",
            Factor::LastPreFlopRaiser => "lastpreflopraiser",
            Factor::OnlyPreFlopRaiser => "onlypreflopraiser",
            Factor::PreFlopPosition => "preflopposition",
            Factor::RaiserStackSize => "raiserstacksize",
            Factor::ImpliedOdds => "impliedodds",
            Factor::RaiserPosition => "raiserposition",
            Factor::ReraiserPosition => "reraiserposition",
            Factor::Boredom => "boredom",
            Factor::Steam => "steam",
            Factor::FirstAction => "firstaction",
            Factor::OutdrawRisk => "outdrawrisk",
            Factor::CheckedAround => "checkedaround",
            Factor::BlindsClosing => "blindsclosing",
            Factor::OpponentBetFrequency => "opponentbetfrequency",
            Factor::OpponentRaiseFrequency => "opponentraisefrequency",
            Factor::OpponentOverbetFrequency => "opponentoverbetfrequency",
            Factor::OpponentBetFoldFrequency => "opponentbetfoldfrequency",
            Factor::StealPotential => "stealpotential",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a normalized factor is bent before weighting.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Curve {
    #[default]
    Linear = 1,
    Square = 2,
    Cube = 3,
}

impl Curve {
    pub fn degree(&self) -> i32 {
        *self as i32
    }

    pub fn apply(&self, x: f32) -> f32 {
        x.powi(self.degree())
    }
}
