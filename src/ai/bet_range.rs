use std::fmt;

use rand::Rng;

use super::context::DecisionContext;
use super::errors::{AiError, Result};

/// Type codes as they are stored and exchanged.
pub const POT_SIZE: u8 = 1;
pub const STACK_SIZE: u8 = 2;
pub const BIG_BLIND: u8 = 3;
pub const ALL_IN: u8 = 4;

/// The player whose stack a stack relative range is measured against.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOwner {
    pub seat: usize,
    pub name: String,
    pub chips: u32,
}

/// The chip facts needed to turn a range into an amount.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BetContext {
    /// Seat of the player betting.
    pub seat: usize,
    pub chips: u32,
    pub pot: u32,
    pub big_blind: u32,
    pub to_call: u32,
    pub min_raise: u32,
    pub min_chip: u32,
}

impl BetContext {
    pub fn from_decision(ctx: &DecisionContext<'_>) -> Self {
        Self {
            seat: ctx.player.seat,
            chips: ctx.player.chips,
            pot: ctx.pot,
            big_blind: ctx.big_blind,
            to_call: ctx.to_call,
            min_raise: ctx.min_raise,
            min_chip: ctx.min_chip,
        }
    }

    /// Most the player can put in on top of the call.
    fn room(&self) -> u32 {
        self.chips.saturating_sub(self.to_call)
    }
}

/// How much to bet once the decision to bet or raise is made.
///
/// Every range except all in is a pair of factors applied to a base amount:
/// the pot plus the call, a stack less the call, or the big blind.
///
/// # Examples
///
/// ```
/// use holdem_ai::ai::{BetContext, BetRange};
///
/// let range = BetRange::pot_relative(0.5, 0.5).unwrap();
/// let ctx = BetContext {
///     chips: 1000,
///     pot: 200,
///     min_chip: 1,
///     ..Default::default()
/// };
/// assert_eq!(100, range.min_bet(&ctx));
/// assert_eq!("50% pot", range.to_description());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum BetRange {
    AllIn,
    PotSize { min: f32, max: f32 },
    BigBlind { min: f32, max: f32 },
    StackSize { owner: StackOwner, min: f32, max: f32 },
}

fn check_bounds(min: f32, max: f32) -> Result<()> {
    if min > max {
        return Err(AiError::BetRangeMinGreaterThanMax);
    }
    Ok(())
}

impl BetRange {
    pub fn all_in() -> Self {
        BetRange::AllIn
    }

    pub fn pot_relative(min: f32, max: f32) -> Result<Self> {
        if min == 0.0 && max == 0.0 {
            return Err(AiError::BetRangeZero);
        }
        check_bounds(min, max)?;
        Ok(BetRange::PotSize { min, max })
    }

    pub fn big_blind_relative(min: f32, max: f32) -> Result<Self> {
        if min == 0.0 && max == 0.0 {
            return Err(AiError::BetRangeZero);
        }
        check_bounds(min, max)?;
        Ok(BetRange::BigBlind { min, max })
    }

    /// Relative to `owner`'s stack, which must hold chips.
    pub fn stack_relative(owner: Option<StackOwner>, min: f32, max: f32) -> Result<Self> {
        let owner = owner
            .filter(|o| o.chips > 0)
            .ok_or(AiError::BetRangeNoPlayer)?;
        check_bounds(min, max)?;
        Ok(BetRange::StackSize { owner, min, max })
    }

    /// Build from a stored type code.
    pub fn from_code(code: u8, min: f32, max: f32, owner: Option<StackOwner>) -> Result<Self> {
        match code {
            POT_SIZE => Self::pot_relative(min, max),
            STACK_SIZE => Self::stack_relative(owner, min, max),
            BIG_BLIND => Self::big_blind_relative(min, max),
            ALL_IN => Ok(Self::all_in()),
            other => Err(AiError::UnrecognizedBetRangeType(other)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            BetRange::AllIn => ALL_IN,
            BetRange::PotSize { .. } => POT_SIZE,
            BetRange::BigBlind { .. } => BIG_BLIND,
            BetRange::StackSize { .. } => STACK_SIZE,
        }
    }

    /// The low factor, zero for all in.
    pub fn min(&self) -> f32 {
        match self {
            BetRange::AllIn => 0.0,
            BetRange::PotSize { min, .. }
            | BetRange::BigBlind { min, .. }
            | BetRange::StackSize { min, .. } => *min,
        }
    }

    /// The high factor, zero for all in.
    pub fn max(&self) -> f32 {
        match self {
            BetRange::AllIn => 0.0,
            BetRange::PotSize { max, .. }
            | BetRange::BigBlind { max, .. }
            | BetRange::StackSize { max, .. } => *max,
        }
    }

    pub fn owner(&self) -> Option<&StackOwner> {
        match self {
            BetRange::StackSize { owner, .. } => Some(owner),
            _ => None,
        }
    }

    pub fn min_bet(&self, ctx: &BetContext) -> u32 {
        self.amount_at(ctx, 0.0)
    }

    pub fn max_bet(&self, ctx: &BetContext) -> u32 {
        self.amount_at(ctx, 1.0)
    }

    /// All the player's chips for all in. Otherwise a factor is drawn
    /// uniformly between min and max and resolved like `min_bet` is, so the
    /// amount is rounded to the chip and respects the minimum raise.
    pub fn choose_bet_amount<R: Rng>(&self, ctx: &BetContext, rng: &mut R) -> u32 {
        if let BetRange::AllIn = self {
            return ctx.chips;
        }
        let v: f32 = rng.random();
        self.amount_at(ctx, v)
    }

    /// Resolve the factor at `v` of the way from min to max into chips.
    fn amount_at(&self, ctx: &BetContext, v: f32) -> u32 {
        let (base, min, max) = match self {
            BetRange::AllIn => return ctx.chips,
            BetRange::PotSize { min, max } => ((ctx.pot + ctx.to_call) as f32, *min, *max),
            BetRange::StackSize { owner, min, max } => {
                (owner.chips.saturating_sub(ctx.to_call) as f32, *min, *max)
            }
            BetRange::BigBlind { min, max } => (ctx.big_blind as f32, *min, *max),
        };
        // Truncates and saturates at zero.
        let mut bet = (base * (min + v * (max - min))) as u32;

        let chip = ctx.min_chip.max(1);
        let odd = bet % chip;
        if odd > 0 {
            bet += chip - odd;
        }
        if bet < ctx.min_raise {
            bet = if min > 0.0 { ctx.min_raise } else { 0 };
        }
        bet.min(ctx.room())
    }

    /// Short form like `25%-75% pot` or `3.0x BB`.
    pub fn to_description(&self) -> String {
        match self {
            BetRange::AllIn => "All In".to_string(),
            BetRange::PotSize { min, max } => format!("{} pot", percent_span(*min, *max)),
            BetRange::StackSize { min, max, .. } => {
                format!("{} stack", percent_span(*min, *max))
            }
            BetRange::BigBlind { min, max } => {
                if min == max {
                    format!("{min:?}x BB")
                } else {
                    format!("{min:?}-{max:?}x BB")
                }
            }
        }
    }

    /// Long form with the chip amounts for the player in `ctx`.
    ///
    /// The amounts follow `, or ` or a `<br>` when `want_break` is set, and
    /// are flagged when the top of the range is every chip the player has.
    pub fn describe(&self, ctx: &BetContext, want_break: bool) -> String {
        let label = match self {
            BetRange::AllIn => return format!("All In (${} chips)", ctx.chips),
            BetRange::PotSize { min, max } => format!("{} pot size", percent_span(*min, *max)),
            BetRange::StackSize { owner, min, max } => {
                if owner.seat == ctx.seat {
                    format!("{} stack", percent_span(*min, *max))
                } else {
                    format!("{} of {}'s stack", percent_span(*min, *max), owner.name)
                }
            }
            BetRange::BigBlind { .. } => self.to_description(),
        };

        let low = self.min_bet(ctx);
        let high = self.max_bet(ctx);
        let amount = if low == high {
            format!("${low}")
        } else {
            format!("${low}-${high}")
        };
        let all_in = if high > 0 && high == ctx.room() {
            " (All In)"
        } else {
            ""
        };
        let sep = if want_break { "<br>" } else { ", or " };
        format!("{label}{sep}{amount}{all_in}")
    }
}

fn percent_span(min: f32, max: f32) -> String {
    let pct = |f: f32| (f * 100.0) as i32;
    if min == max {
        format!("{}%", pct(min))
    } else {
        format!("{}%-{}%", pct(min), pct(max))
    }
}

impl fmt::Display for BetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_description())
    }
}
