use std::fmt;

use super::card::Card;
use super::card_bit_set::CardBitSet;
use super::error::CardParseError;

/// Two hole cards.
///
/// The cards are stored lowest index first so that `Pocket::new(a, b)` and
/// `Pocket::new(b, a)` are the same value.
///
/// # Examples
///
/// ```
/// use holdem_ai::core::{Card, Pocket};
///
/// let a = Card::try_from("As").unwrap();
/// let k = Card::try_from("Kh").unwrap();
/// assert_eq!(Pocket::new(a, k), Pocket::new(k, a));
/// assert!(Pocket::new(a, a).is_none());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pocket {
    low: Card,
    high: Card,
}

impl Pocket {
    /// Create a pocket. Returns None if both cards are the same.
    pub fn new(a: Card, b: Card) -> Option<Self> {
        match a.index().cmp(&b.index()) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Create a pocket from card indices.
    pub fn from_indices(a: usize, b: usize) -> Option<Self> {
        Self::new(Card::from_index(a)?, Card::from_index(b)?)
    }

    /// Parse four characters like `AsKh`.
    pub fn from_str_cards(s: &str) -> Result<Self, CardParseError> {
        let set = CardBitSet::from_str_cards(s)?;
        Self::try_from(set)
    }

    /// The card with the lower index.
    pub fn low(&self) -> Card {
        self.low
    }

    /// The card with the higher index.
    pub fn high(&self) -> Card {
        self.high
    }

    pub fn cards(&self) -> [Card; 2] {
        [self.low, self.high]
    }

    pub fn is_pair(&self) -> bool {
        self.low.value == self.high.value
    }

    pub fn is_suited(&self) -> bool {
        self.low.suit == self.high.suit
    }

    pub fn contains(&self, card: Card) -> bool {
        self.low == card || self.high == card
    }

    pub fn to_set(&self) -> CardBitSet {
        let mut set = CardBitSet::new();
        set.insert(self.low);
        set.insert(self.high);
        set
    }

    /// True if the pocket shares no card with the set.
    pub fn is_disjoint(&self, cards: &CardBitSet) -> bool {
        !cards.contains(self.low) && !cards.contains(self.high)
    }

    /// Iterate every one of the 1326 possible pockets.
    pub fn all() -> impl Iterator<Item = Pocket> {
        (1..52usize).flat_map(|hi| (0..hi).filter_map(move |lo| Pocket::from_indices(lo, hi)))
    }
}

impl TryFrom<CardBitSet> for Pocket {
    type Error = CardParseError;

    fn try_from(set: CardBitSet) -> Result<Self, Self::Error> {
        let mut iter = set.iter();
        match (iter.next(), iter.next(), iter.next()) {
            (Some(low), Some(high), None) => Ok(Self { low, high }),
            _ => Err(CardParseError::WrongCardCount(set.count())),
        }
    }
}

impl fmt::Display for Pocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Higher card first, the way players read hands.
        write!(f, "{}{}", self.high, self.low)
    }
}
