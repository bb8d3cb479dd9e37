use crate::ai::context::DecisionContext;

/// Map a `[0, 1]` setting onto `[low, high]`. `high` may be below `low`.
pub fn scale(value: f32, low: f32, high: f32) -> f32 {
    low + (high - low) * value
}

/// `a / b`, zero when there is nothing to divide by.
pub(crate) fn ratio(a: u32, b: u32) -> f32 {
    if b == 0 {
        0.0
    } else {
        a as f32 / b as f32
    }
}

/// A player's style. Every setting is in `[0, 1]` with 0.5 as neutral and
/// is stretched onto whatever range the rule reading it works in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Personality {
    /// Higher folds more starting hands.
    pub tightness: f32,
    pub aggression: f32,
    /// How much seat position changes play.
    pub position: f32,
    /// How much the price of a call matters.
    pub pot_odds: f32,
    /// How much opponent statistics are trusted.
    pub observation: f32,
    /// Higher opens more pots hoping to take the blinds.
    pub steal_blinds: f32,
    /// How much losing big pots loosens play.
    pub tilt: f32,
    /// How quickly a run of unplayed hands loosens play.
    pub boredom: f32,
    /// How much a short stack changes play.
    pub stack_size: f32,
    /// How much a short stacked raiser is discounted.
    pub opponent_stack_size: f32,
    pub straight_draws: f32,
    pub flush_draws: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            tightness: 0.5,
            aggression: 0.5,
            position: 0.5,
            pot_odds: 0.5,
            observation: 0.5,
            steal_blinds: 0.5,
            tilt: 0.5,
            boredom: 0.5,
            stack_size: 0.5,
            opponent_stack_size: 0.5,
            straight_draws: 0.5,
            flush_draws: 0.5,
        }
    }
}

impl Personality {
    /// Every setting with its name, for validation and logging.
    pub fn settings(&self) -> [(&'static str, f32); 12] {
        [
            ("tightness", self.tightness),
            ("aggression", self.aggression),
            ("position", self.position),
            ("pot_odds", self.pot_odds),
            ("observation", self.observation),
            ("steal_blinds", self.steal_blinds),
            ("tilt", self.tilt),
            ("boredom", self.boredom),
            ("stack_size", self.stack_size),
            ("opponent_stack_size", self.opponent_stack_size),
            ("straight_draws", self.straight_draws),
            ("flush_draws", self.flush_draws),
        ]
    }

    pub(crate) fn position_weight(&self) -> f32 {
        scale(self.position, 0.0, 2.0)
    }

    pub(crate) fn observation_weight(&self) -> f32 {
        scale(self.observation, 0.0, 2.0)
    }

    pub(crate) fn pot_odds_weight(&self) -> f32 {
        scale(self.pot_odds, 0.0, 2.0)
    }

    pub(crate) fn tilt_weight(&self) -> f32 {
        scale(self.tilt, 0.0, 1.0)
    }

    pub(crate) fn stack_size_weight(&self) -> f32 {
        scale(self.stack_size, 0.0, 2.0)
    }

    pub(crate) fn opponent_stack_size_weight(&self) -> f32 {
        scale(self.opponent_stack_size, 0.0, 2.0)
    }

    /// Subtracted from how bored the player is, so a patient player never
    /// gets bored.
    pub(crate) fn boredom_offset(&self) -> f32 {
        scale(self.boredom, 1.0, 0.0)
    }

    /// How wide blind steals are, 1 for the tightest.
    pub(crate) fn steal_tightness(&self) -> f32 {
        scale(self.steal_blinds, 1.0, 0.0)
    }
}

/// What the player carries from hand to hand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mood {
    /// Grows with bad beats and cools off over good hands.
    pub steam: f32,
    /// How likely the pre-flop raise in front is a blind steal.
    pub steal_suspicion: f32,
}

impl Mood {
    pub(crate) fn steaming(&self, tilt: f32) -> bool {
        self.steam > 0.1 && tilt > 0.0
    }
}

/// How good the hand is, worked out before the rules run.
///
/// Before the flop only `pre_flop` is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandStrengths {
    /// Starting hand strength in `[0, 1]`.
    pub pre_flop: f32,
    /// Chance of being ahead of every opponent right now, treating their
    /// hands as random.
    pub raw: f32,
    /// Chance of being ahead of one opponent, with their hands weighted by
    /// how they play.
    pub biased: f32,
    pub positive_potential: f32,
    pub negative_potential: f32,
    /// Biased strength counting the cards to come. The same as `biased` on
    /// the river.
    pub draw: f32,
    /// How strong the hand looks from across the table.
    pub apparent: f32,
}

impl HandStrengths {
    /// Strength with potential, crediting draws more the better the price.
    pub fn effective(&self, scaled_pot_odds: f32, players_with_cards: usize) -> f32 {
        let exponent = players_with_cards.saturating_sub(1).max(1) as i32;
        let potential = (1.0 - self.biased).min(self.positive_potential * (scaled_pot_odds + 1.0));
        (self.biased - self.raw * self.negative_potential + potential)
            .min(1.0)
            .powi(exponent)
    }
}

/// Harrington's zones, by how many orbits of blinds a stack can pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HohZone {
    Dead,
    Red,
    Orange,
    Yellow,
    Green,
}

impl HohZone {
    pub fn from_m(m: f32) -> Self {
        if m >= 20.0 {
            HohZone::Green
        } else if m >= 10.0 {
            HohZone::Yellow
        } else if m >= 6.0 {
            HohZone::Orange
        } else if m >= 1.0 {
            HohZone::Red
        } else {
            HohZone::Dead
        }
    }
}

/// Everything one run of the rules reads.
#[derive(Debug, Clone, Copy)]
pub struct RuleInputs<'c, 'a> {
    pub ctx: &'c DecisionContext<'a>,
    pub hand: HandStrengths,
    pub personality: &'c Personality,
    pub mood: Mood,
    /// Draw heads-up tactics at random instead of taking the strongest.
    pub randomize: bool,
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_scale() {
        assert_eq!(1.0, scale(0.5, 0.0, 2.0));
        assert_eq!(-0.2, scale(0.0, -0.2, 0.2));
        assert_eq!(0.0, scale(1.0, 1.0, 0.0));
        let p = Personality::default();
        assert_eq!(1.0, p.position_weight());
        assert_eq!(0.5, p.boredom_offset());
    }

    #[test]
    fn test_zones() {
        assert_eq!(HohZone::Green, HohZone::from_m(20.0));
        assert_eq!(HohZone::Yellow, HohZone::from_m(19.9));
        assert_eq!(HohZone::Orange, HohZone::from_m(6.0));
        assert_eq!(HohZone::Red, HohZone::from_m(1.0));
        assert_eq!(HohZone::Dead, HohZone::from_m(0.5));
        assert_eq!(HohZone::Green, HohZone::from_m(f32::INFINITY));
    }

    #[test]
    fn test_effective_strength() {
        let hand = HandStrengths {
            raw: 0.5,
            biased: 0.6,
            positive_potential: 0.2,
            negative_potential: 0.1,
            ..Default::default()
        };
        // 0.6 - 0.05 + min(0.4, 0.2)
        assert_relative_eq!(0.75, hand.effective(0.0, 2), epsilon = 1e-6);
        // Good odds cap the potential at 1 - biased.
        assert_relative_eq!(0.95, hand.effective(3.0, 2), epsilon = 1e-6);
        assert_relative_eq!(0.75 * 0.75, hand.effective(0.0, 3), epsilon = 1e-6);
    }
}
