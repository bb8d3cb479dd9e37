use std::cell::Cell;
use std::fmt::Write;

use rand::Rng;

use super::bet_range::BetRange;
use super::context::{BettingRound, PotStatus};
use super::rule_engine::Outcome;

/// The three ways a tactic can lean.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Check if free, fold otherwise.
    CheckFold = 0,
    Call = 1,
    /// Bet if nobody has, raise otherwise.
    BetRaise = 2,
}

#[derive(Debug, Clone, PartialEq)]
struct Tactic {
    bucket: Bucket,
    reason: String,
    check_fold: f32,
    call: f32,
    bet_raise: f32,
}

/// A mix of tactics, each with its own check/fold, call and bet/raise
/// probabilities. The outcome's probabilities are the means over every
/// tactic added.
#[derive(Debug, Clone)]
pub struct AiOutcome {
    tactics: Vec<Tactic>,
    means: Cell<Option<[f32; 3]>>,
    bet_range: Option<BetRange>,
    all_in_reason: Option<String>,
    pot_status: PotStatus,
    round: BettingRound,
    limit: bool,
}

impl AiOutcome {
    pub fn new(pot_status: PotStatus, round: BettingRound, limit: bool) -> Self {
        Self {
            tactics: Vec::new(),
            means: Cell::new(None),
            bet_range: None,
            all_in_reason: None,
            pot_status,
            round,
            limit,
        }
    }

    pub fn add_tuple(
        &mut self,
        bucket: Bucket,
        reason: impl Into<String>,
        check_fold: f32,
        call: f32,
        bet_raise: f32,
    ) {
        self.tactics.push(Tactic {
            bucket,
            reason: reason.into(),
            check_fold,
            call,
            bet_raise,
        });
        self.means.set(None);
    }

    pub fn tactic_count(&self) -> usize {
        self.tactics.len()
    }

    pub fn set_bet_range(&mut self, bet_range: Option<BetRange>, all_in_reason: Option<String>) {
        self.bet_range = bet_range;
        self.all_in_reason = all_in_reason;
    }

    pub fn bet_range(&self) -> Option<&BetRange> {
        self.bet_range.as_ref()
    }

    pub fn all_in_reason(&self) -> Option<&str> {
        self.all_in_reason.as_deref()
    }

    fn means(&self) -> [f32; 3] {
        if let Some(means) = self.means.get() {
            return means;
        }
        let mut sums = [0.0f32; 3];
        for t in &self.tactics {
            sums[0] += t.check_fold;
            sums[1] += t.call;
            sums[2] += t.bet_raise;
        }
        let means = if self.tactics.is_empty() {
            sums
        } else {
            let n = self.tactics.len() as f32;
            sums.map(|s| s / n)
        };
        self.means.set(Some(means));
        means
    }

    pub fn check_fold(&self) -> f32 {
        self.means()[0]
    }

    pub fn call(&self) -> f32 {
        self.means()[1]
    }

    pub fn bet_raise(&self) -> f32 {
        self.means()[2]
    }

    fn passive(pot_status: PotStatus) -> Outcome {
        if pot_status == PotStatus::NoPotAction {
            Outcome::Check
        } else {
            Outcome::Fold
        }
    }

    /// The bucket with the largest mean. Ties go to the more aggressive
    /// bucket.
    pub fn strongest_outcome(&self, pot_status: PotStatus) -> Outcome {
        let [check_fold, call, bet_raise] = self.means();
        if check_fold > call {
            if check_fold > bet_raise {
                return Self::passive(pot_status);
            }
        } else if call > bet_raise {
            return Outcome::Call;
        }
        match (pot_status, self.round) {
            (PotStatus::NoPotAction, BettingRound::PreFlop) => Outcome::OpenPot,
            (PotStatus::NoPotAction, _) => Outcome::Bet,
            _ => Outcome::Raise,
        }
    }

    /// A bucket drawn at random in proportion to the means.
    ///
    /// The means are used as they are, without normalizing, so whatever is
    /// left above their sum goes to betting. An unopened pot draws `Bet`
    /// even pre-flop, where `strongest_outcome` says `OpenPot`.
    pub fn select_outcome<R: Rng + ?Sized>(&self, pot_status: PotStatus, rng: &mut R) -> Outcome {
        let [check_fold, call, _] = self.means();
        let v: f32 = rng.random();
        if v < check_fold {
            Self::passive(pot_status)
        } else if v < check_fold + call {
            Outcome::Call
        } else if pot_status == PotStatus::NoPotAction {
            Outcome::Bet
        } else {
            Outcome::Raise
        }
    }

    fn push_reasons(&self, buf: &mut String, bucket: Bucket) {
        let mut reasons = self
            .tactics
            .iter()
            .filter(|t| t.bucket == bucket)
            .map(|t| t.reason.as_str())
            .peekable();
        if reasons.peek().is_some() {
            buf.push_str(" (");
            buf.push_str(&reasons.collect::<Vec<_>>().join(", "));
            buf.push(')');
        }
    }

    fn push_percent(buf: &mut String, p: f32) {
        let _ = write!(buf, " {:.0}%", p * 100.0);
    }

    fn push_lead(buf: &mut String, brevity: u32) {
        if !buf.is_empty() {
            buf.push_str(" or ");
        } else if brevity < 1 {
            buf.push_str("Recommend ");
        }
    }

    /// Describe the recommendation.
    ///
    /// Higher brevity says less: from 1 there is no "Recommend" header, from
    /// 2 no reasons, from 3 no bet size and from 5 no percentages.
    pub fn to_html(&self, brevity: u32) -> String {
        let [check_fold, call, bet_raise] = self.means();
        let mut buf = String::new();

        if check_fold > 0.0 {
            Self::push_lead(&mut buf, brevity);
            buf.push_str(if self.pot_status == PotStatus::NoPotAction {
                "Check"
            } else {
                "Fold"
            });
            if brevity < 5 {
                Self::push_percent(&mut buf, check_fold);
            }
            if brevity < 2 {
                self.push_reasons(&mut buf, Bucket::CheckFold);
            }
        }

        if call > 0.0 {
            Self::push_lead(&mut buf, brevity);
            buf.push_str("Call");
            if brevity < 5 {
                Self::push_percent(&mut buf, call);
            }
            if brevity < 2 {
                self.push_reasons(&mut buf, Bucket::Call);
            }
        }

        if bet_raise > 0.0 {
            Self::push_lead(&mut buf, brevity);
            buf.push_str(match (self.pot_status, self.round) {
                (PotStatus::NoPotAction, BettingRound::PreFlop) => "Raise",
                (PotStatus::NoPotAction, _) => "Bet",
                (PotStatus::Raised, _) => "Raise",
                _ => "Re-Raise",
            });
            if brevity < 5 {
                Self::push_percent(&mut buf, bet_raise);
            }
            let mut shown_all_in = false;
            if let (true, false, Some(range)) = (brevity < 3, self.limit, &self.bet_range) {
                let _ = write!(buf, " {range}");
                shown_all_in = matches!(range, BetRange::AllIn);
            }
            if let Some(reason) = &self.all_in_reason {
                if !shown_all_in {
                    buf.push_str(" All In");
                }
                if brevity < 2 {
                    let _ = write!(buf, " ({reason})");
                }
            }
            if brevity < 2 {
                self.push_reasons(&mut buf, Bucket::BetRaise);
            }
        }

        buf
    }
}
