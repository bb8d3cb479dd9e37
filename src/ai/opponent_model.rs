//! What has been learned about one opponent.
//!
//! The model is fed once per hand from a [`HandRecord`] of everything the
//! player did, and is read by the rule engine through getters that fall back
//! to a caller supplied default until enough hands have been seen.

use std::collections::BTreeMap;

use tracing::{instrument, trace};

use super::context::{ActionKind, BettingRound, PositionCategory};
use super::errors::{AiError, Result};
use super::tracker::{BooleanTracker, FloatTracker};

const PRE_FLOP_CAPACITY: usize = 10;
const PRE_FLOP_THRESHOLD: usize = 5;
const HAND_CAPACITY: usize = 20;
const HAND_THRESHOLD: usize = 5;
const STREET_CAPACITY: usize = 10;
const STREET_THRESHOLD: usize = 5;

/// One action as it was taken at the table.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAction {
    pub kind: ActionKind,
    /// Chips put in by this action.
    pub amount: u32,
    /// The pot before this action.
    pub pot_before: u32,
    /// Somebody had bet or raised earlier in the round. Blinds alone don't
    /// count.
    pub facing_bet: bool,
}

impl RecordedAction {
    pub fn new(kind: ActionKind, amount: u32, pot_before: u32, facing_bet: bool) -> Self {
        Self {
            kind,
            amount,
            pot_before,
            facing_bet,
        }
    }

    fn is_overbet(&self) -> bool {
        self.kind.is_aggressive() && self.amount > self.pot_before
    }
}

/// Everything one player did in one hand.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandRecord {
    pub position: PositionCategory,
    rounds: [Vec<RecordedAction>; 4],
}

impl HandRecord {
    pub fn new(position: PositionCategory) -> Self {
        Self {
            position,
            rounds: Default::default(),
        }
    }

    pub fn record(&mut self, round: BettingRound, action: RecordedAction) {
        self.rounds[round as usize].push(action);
    }

    /// Builder flavor of `record`.
    pub fn with(mut self, round: BettingRound, action: RecordedAction) -> Self {
        self.record(round, action);
        self
    }

    pub fn actions(&self, round: BettingRound) -> &[RecordedAction] {
        &self.rounds[round as usize]
    }
}

/// Per opponent statistics.
///
/// Tightness entries are 1.0 for a hand folded before the flop and 0.0 for
/// one played. Aggression entries are 1.0 when the player raised before the
/// flop and 0.0 when they only called. Slot 0 of both is the overall
/// tracker, slots 1 to 5 follow [`PositionCategory`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentModel {
    tightness: [FloatTracker; 6],
    aggression: [FloatTracker; 6],

    hands_paid: BooleanTracker,
    hands_limped: BooleanTracker,
    hands_folded_unraised: BooleanTracker,
    hands_raised_pre_flop: BooleanTracker,
    hands_overbet_pot_post_flop: BooleanTracker,
    hands_bet_fold_post_flop: BooleanTracker,

    // Indexed flop, turn, river.
    act: [BooleanTracker; 3],
    check_fold: [BooleanTracker; 3],
    open: [BooleanTracker; 3],
    raise: [BooleanTracker; 3],

    hands_played: u32,
    overbet_pot_post_flop: bool,
}

impl Default for OpponentModel {
    fn default() -> Self {
        Self::new()
    }
}

fn street_trackers() -> [BooleanTracker; 3] {
    std::array::from_fn(|_| BooleanTracker::new(STREET_CAPACITY, STREET_THRESHOLD))
}

fn street_index(round: BettingRound) -> Result<usize> {
    match round {
        BettingRound::Flop => Ok(0),
        BettingRound::Turn => Ok(1),
        BettingRound::River => Ok(2),
        BettingRound::PreFlop => Err(AiError::InvalidRound(round)),
    }
}

const STREET_NAMES: [&str; 3] = ["Flop", "Turn", "River"];

impl OpponentModel {
    pub fn new() -> Self {
        let pre_flop = || FloatTracker::new(PRE_FLOP_CAPACITY, PRE_FLOP_THRESHOLD);
        let hand = || BooleanTracker::new(HAND_CAPACITY, HAND_THRESHOLD);
        Self {
            tightness: std::array::from_fn(|_| pre_flop()),
            aggression: std::array::from_fn(|_| pre_flop()),
            hands_paid: hand(),
            hands_limped: hand(),
            hands_folded_unraised: hand(),
            hands_raised_pre_flop: hand(),
            hands_overbet_pot_post_flop: hand(),
            hands_bet_fold_post_flop: hand(),
            act: street_trackers(),
            check_fold: street_trackers(),
            open: street_trackers(),
            raise: street_trackers(),
            hands_played: 0,
            overbet_pot_post_flop: false,
        }
    }

    /// Forget everything. The trackers are cleared where they are.
    pub fn init(&mut self) {
        for t in self.tightness.iter_mut().chain(self.aggression.iter_mut()) {
            t.clear();
        }
        for (_, t) in self.booleans_mut() {
            t.clear();
        }
        self.hands_played = 0;
        self.overbet_pot_post_flop = false;
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    /// Set while a hand is in progress once the player bets more than the
    /// pot after the flop.
    pub fn overbet_pot_post_flop(&self) -> bool {
        self.overbet_pot_post_flop
    }

    pub fn note_overbet_pot_post_flop(&mut self) {
        self.overbet_pot_post_flop = true;
    }

    pub fn tightness_tracker(&self, position: Option<PositionCategory>) -> &FloatTracker {
        &self.tightness[position.map_or(0, |p| p.slot())]
    }

    pub fn aggression_tracker(&self, position: Option<PositionCategory>) -> &FloatTracker {
        &self.aggression[position.map_or(0, |p| p.slot())]
    }

    pub fn tightness_tracker_mut(&mut self, position: Option<PositionCategory>) -> &mut FloatTracker {
        &mut self.tightness[position.map_or(0, |p| p.slot())]
    }

    pub fn aggression_tracker_mut(
        &mut self,
        position: Option<PositionCategory>,
    ) -> &mut FloatTracker {
        &mut self.aggression[position.map_or(0, |p| p.slot())]
    }

    /// How often the player folds before the flop from `position`.
    pub fn pre_flop_tightness(&self, position: PositionCategory, default: f32) -> f32 {
        Self::with_fallback(&self.tightness, position, default)
    }

    /// How often the player raises, rather than calls, before the flop.
    pub fn pre_flop_aggression(&self, position: PositionCategory, default: f32) -> f32 {
        Self::with_fallback(&self.aggression, position, default)
    }

    fn with_fallback(trackers: &[FloatTracker; 6], position: PositionCategory, default: f32) -> f32 {
        let at = &trackers[position.slot()];
        if at.is_ready() {
            return at.weighted_average(default);
        }
        trackers[0].weighted_average(default)
    }

    /// How often the player bets or raises in `round`.
    pub fn act_post_flop(&self, round: BettingRound, default: f32) -> Result<f32> {
        Ok(self.act[street_index(round)?].weighted_percent_true(default))
    }

    /// How often the player bets when first in.
    pub fn open_post_flop(&self, round: BettingRound, default: f32) -> Result<f32> {
        Ok(self.open[street_index(round)?].weighted_percent_true(default))
    }

    /// How often the player raises a bet.
    pub fn raise_post_flop(&self, round: BettingRound, default: f32) -> Result<f32> {
        Ok(self.raise[street_index(round)?].weighted_percent_true(default))
    }

    /// How often the player's first action is a check or a fold.
    pub fn check_fold_post_flop(&self, round: BettingRound, default: f32) -> Result<f32> {
        Ok(self.check_fold[street_index(round)?].weighted_percent_true(default))
    }

    pub fn act_tracker_mut(&mut self, round: BettingRound) -> Result<&mut BooleanTracker> {
        Ok(&mut self.act[street_index(round)?])
    }

    pub fn open_tracker_mut(&mut self, round: BettingRound) -> Result<&mut BooleanTracker> {
        Ok(&mut self.open[street_index(round)?])
    }

    pub fn raise_tracker_mut(&mut self, round: BettingRound) -> Result<&mut BooleanTracker> {
        Ok(&mut self.raise[street_index(round)?])
    }

    pub fn check_fold_tracker_mut(&mut self, round: BettingRound) -> Result<&mut BooleanTracker> {
        Ok(&mut self.check_fold[street_index(round)?])
    }

    pub fn hands_paid_percent(&self, default: f32) -> f32 {
        self.hands_paid.weighted_percent_true(default)
    }

    pub fn hands_limped_percent(&self, default: f32) -> f32 {
        self.hands_limped.weighted_percent_true(default)
    }

    pub fn hands_folded_unraised_percent(&self, default: f32) -> f32 {
        self.hands_folded_unraised.weighted_percent_true(default)
    }

    pub fn hands_raised_pre_flop_percent(&self, default: f32) -> f32 {
        self.hands_raised_pre_flop.weighted_percent_true(default)
    }

    pub fn overbet_frequency(&self, default: f32) -> f32 {
        self.hands_overbet_pot_post_flop.weighted_percent_true(default)
    }

    pub fn bet_fold_frequency(&self, default: f32) -> f32 {
        self.hands_bet_fold_post_flop.weighted_percent_true(default)
    }

    /// Feed the finished hand into the trackers.
    #[instrument(level = "trace", skip(self, hand), fields(position = ?hand.position))]
    pub fn end_hand(&mut self, hand: &HandRecord) {
        self.end_pre_flop(hand);

        let mut bet_post_flop = false;
        let mut overbet = self.overbet_pot_post_flop;
        let mut bet_fold = false;
        for round in BettingRound::post_flop() {
            let actions = hand.actions(round);
            let Some(first) = actions.first() else {
                continue;
            };
            // street_index can't fail for post flop rounds.
            let i = round as usize - 1;
            let aggressive = actions.iter().any(|a| a.kind.is_aggressive());
            self.act[i].add_entry(aggressive);
            self.check_fold[i].add_entry(matches!(first.kind, ActionKind::Check | ActionKind::Fold));
            if !first.facing_bet {
                self.open[i].add_entry(first.kind.is_aggressive());
            }
            if actions.iter().any(|a| a.facing_bet) {
                self.raise[i].add_entry(
                    actions
                        .iter()
                        .any(|a| a.facing_bet && a.kind.is_aggressive()),
                );
            }

            if aggressive {
                bet_post_flop = true;
                overbet |= actions.iter().any(RecordedAction::is_overbet);
                let first_bet = actions.iter().position(|a| a.kind.is_aggressive());
                if let Some(at) = first_bet {
                    bet_fold |= actions[at..].iter().any(|a| a.kind == ActionKind::Fold);
                }
            }
        }
        if bet_post_flop {
            self.hands_overbet_pot_post_flop.add_entry(overbet);
            self.hands_bet_fold_post_flop.add_entry(bet_fold);
        }

        self.hands_played += 1;
        self.overbet_pot_post_flop = false;
        trace!(hands_played = self.hands_played, "opponent model updated");
    }

    fn end_pre_flop(&mut self, hand: &HandRecord) {
        let actions = hand.actions(BettingRound::PreFlop);
        let Some(first) = actions.first() else {
            return;
        };
        let slot = hand.position.slot();
        let raised = actions.iter().any(|a| a.kind.is_aggressive());
        let paid = actions.iter().any(|a| a.kind.is_voluntary());

        if !first.facing_bet {
            self.hands_folded_unraised
                .add_entry(first.kind == ActionKind::Fold);
        }
        match first.kind {
            // The big blind checking its option says nothing about tightness.
            ActionKind::Check if !paid => {
                self.hands_paid.add_entry(false);
                self.hands_raised_pre_flop.add_entry(false);
                return;
            }
            ActionKind::Fold => {
                for t in [0, slot] {
                    self.tightness[t].add_entry(1.0);
                }
                self.hands_paid.add_entry(false);
                self.hands_limped.add_entry(false);
                self.hands_raised_pre_flop.add_entry(false);
                return;
            }
            _ => {}
        }

        let aggression = if raised { 1.0 } else { 0.0 };
        for t in [0, slot] {
            self.tightness[t].add_entry(0.0);
            self.aggression[t].add_entry(aggression);
        }
        self.hands_paid.add_entry(paid);
        self.hands_limped
            .add_entry(first.kind == ActionKind::Call && !first.facing_bet);
        self.hands_raised_pre_flop.add_entry(raised);
    }

    fn booleans(&self) -> Vec<(String, &BooleanTracker)> {
        let mut all = vec![
            ("handsPaid".to_string(), &self.hands_paid),
            ("handsLimped".to_string(), &self.hands_limped),
            ("handsFoldedUnraised".to_string(), &self.hands_folded_unraised),
            ("handsRaisedPreFlop".to_string(), &self.hands_raised_pre_flop),
            (
                "handsOverbetPotPostFlop".to_string(),
                &self.hands_overbet_pot_post_flop,
            ),
            ("handsBetFoldPostFlop".to_string(), &self.hands_bet_fold_post_flop),
        ];
        for (i, street) in STREET_NAMES.iter().enumerate() {
            all.push((format!("act{street}"), &self.act[i]));
            all.push((format!("checkFold{street}"), &self.check_fold[i]));
            all.push((format!("open{street}"), &self.open[i]));
            all.push((format!("raise{street}"), &self.raise[i]));
        }
        all
    }

    fn booleans_mut(&mut self) -> Vec<(String, &mut BooleanTracker)> {
        let mut all = vec![
            ("handsPaid".to_string(), &mut self.hands_paid),
            ("handsLimped".to_string(), &mut self.hands_limped),
            ("handsFoldedUnraised".to_string(), &mut self.hands_folded_unraised),
            ("handsRaisedPreFlop".to_string(), &mut self.hands_raised_pre_flop),
            (
                "handsOverbetPotPostFlop".to_string(),
                &mut self.hands_overbet_pot_post_flop,
            ),
            (
                "handsBetFoldPostFlop".to_string(),
                &mut self.hands_bet_fold_post_flop,
            ),
        ];
        let streets = self
            .act
            .iter_mut()
            .zip(self.check_fold.iter_mut())
            .zip(self.open.iter_mut())
            .zip(self.raise.iter_mut());
        for ((((act, check_fold), open), raise), street) in streets.zip(STREET_NAMES) {
            all.push((format!("act{street}"), act));
            all.push((format!("checkFold{street}"), check_fold));
            all.push((format!("open{street}"), open));
            all.push((format!("raise{street}"), raise));
        }
        all
    }

    /// Write every statistic into `map` with keys starting with `prefix`.
    pub fn save_to_map(&self, map: &mut BTreeMap<String, String>, prefix: &str) {
        map.insert(format!("{prefix}handsPlayed"), self.hands_played.to_string());
        map.insert(
            format!("{prefix}overbetPotPostFlop"),
            self.overbet_pot_post_flop.to_string(),
        );
        for (i, t) in self.tightness.iter().enumerate() {
            map.insert(format!("{prefix}tightness{i}"), t.encode());
        }
        for (i, t) in self.aggression.iter().enumerate() {
            map.insert(format!("{prefix}aggression{i}"), t.encode());
        }
        for (name, t) in self.booleans() {
            map.insert(format!("{prefix}{name}"), t.encode());
        }
    }

    /// Read back what `save_to_map` wrote. Keys that are missing leave the
    /// matching statistic as it is. On error the model is left untouched.
    pub fn load_from_map(&mut self, map: &BTreeMap<String, String>, prefix: &str) -> Result<()> {
        let mut loaded = self.clone();
        loaded.load_fields(map, prefix)?;
        *self = loaded;
        Ok(())
    }

    fn load_fields(&mut self, map: &BTreeMap<String, String>, prefix: &str) -> Result<()> {
        let get = |name: &str| {
            let key = format!("{prefix}{name}");
            map.get(&key).map(|v| (key, v.as_str()))
        };
        if let Some((key, value)) = get("handsPlayed") {
            self.hands_played = value.trim().parse().map_err(|_| AiError::PersistedValue {
                key,
                value: value.to_string(),
            })?;
        }
        if let Some((key, value)) = get("overbetPotPostFlop") {
            self.overbet_pot_post_flop =
                value.trim().parse().map_err(|_| AiError::PersistedValue {
                    key,
                    value: value.to_string(),
                })?;
        }
        for (i, t) in self.tightness.iter_mut().enumerate() {
            t.decode(map.get(&format!("{prefix}tightness{i}")).map(String::as_str))?;
        }
        for (i, t) in self.aggression.iter_mut().enumerate() {
            t.decode(map.get(&format!("{prefix}aggression{i}")).map(String::as_str))?;
        }
        for (name, t) in self.booleans_mut() {
            t.decode(map.get(&format!("{prefix}{name}")).map(String::as_str))?;
        }
        Ok(())
    }
}
