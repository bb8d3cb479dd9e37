use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use super::card::{Card, DECK_SIZE};
use super::error::CardParseError;

/// A set of cards stored as one bit per card index.
///
/// Equality is set equality, so two boards holding the same cards compare
/// equal no matter the order they were dealt in. That makes this the key the
/// board caches use.
///
/// # Examples
///
/// ```
/// use holdem_ai::core::{Card, CardBitSet};
///
/// let flop = CardBitSet::from_str_cards("AsKsQs").unwrap();
/// assert_eq!(3, flop.count());
/// assert!(flop.contains(Card::try_from("Ks").unwrap()));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct CardBitSet {
    cards: u64,
}

const FULL_DECK: u64 = (1 << DECK_SIZE) - 1;

impl CardBitSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self { cards: 0 }
    }

    /// A set holding all 52 cards.
    pub fn full_deck() -> Self {
        Self { cards: FULL_DECK }
    }

    /// Parse a run of cards like `AsKd7c`. Duplicates are rejected.
    pub fn from_str_cards(s: &str) -> Result<Self, CardParseError> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        let mut set = Self::new();
        for chunk in chars.chunks(2) {
            let text: String = chunk.iter().collect();
            let card = Card::try_from(text.as_str())?;
            if !set.insert(card) {
                return Err(CardParseError::DuplicateCard(card));
            }
        }
        Ok(set)
    }

    /// Add a card. Returns true if the card wasn't already present.
    pub fn insert(&mut self, card: Card) -> bool {
        let bit = 1u64 << card.index();
        let added = self.cards & bit == 0;
        self.cards |= bit;
        added
    }

    /// Remove a card. Returns true if it was present.
    pub fn remove(&mut self, card: Card) -> bool {
        let bit = 1u64 << card.index();
        let present = self.cards & bit != 0;
        self.cards &= !bit;
        present
    }

    pub fn contains(&self, card: Card) -> bool {
        self.contains_index(card.index())
    }

    pub fn contains_index(&self, idx: usize) -> bool {
        idx < DECK_SIZE && self.cards & (1u64 << idx) != 0
    }

    pub fn count(&self) -> usize {
        self.cards.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.cards == 0
    }

    pub fn is_disjoint(&self, other: &CardBitSet) -> bool {
        self.cards & other.cards == 0
    }

    /// All the cards not in this set.
    pub fn complement(&self) -> Self {
        Self {
            cards: !self.cards & FULL_DECK,
        }
    }

    /// The raw bits, one per card index.
    pub fn bits(&self) -> u64 {
        self.cards
    }

    /// Iterate the cards in index order.
    pub fn iter(&self) -> CardBitSetIter {
        CardBitSetIter { cards: self.cards }
    }

    /// Collect the cards into a vector in index order.
    pub fn to_vec(&self) -> Vec<Card> {
        self.iter().collect()
    }
}

impl BitOr for CardBitSet {
    type Output = CardBitSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        CardBitSet {
            cards: self.cards | rhs.cards,
        }
    }
}

impl BitOrAssign for CardBitSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.cards |= rhs.cards;
    }
}

impl BitAnd for CardBitSet {
    type Output = CardBitSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        CardBitSet {
            cards: self.cards & rhs.cards,
        }
    }
}

impl FromIterator<Card> for CardBitSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardBitSet::new();
        for card in iter {
            set.insert(card);
        }
        set
    }
}

impl From<Card> for CardBitSet {
    fn from(card: Card) -> Self {
        let mut set = CardBitSet::new();
        set.insert(card);
        set
    }
}

impl fmt::Display for CardBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in self.iter() {
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

/// Iterator over the cards of a `CardBitSet`, lowest index first.
#[derive(Debug, Clone)]
pub struct CardBitSetIter {
    cards: u64,
}

impl Iterator for CardBitSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        if self.cards == 0 {
            return None;
        }
        let idx = self.cards.trailing_zeros() as usize;
        // Clear the lowest set bit
        self.cards &= self.cards - 1;
        Card::from_index(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.cards.count_ones() as usize;
        (n, Some(n))
    }
}

impl IntoIterator for CardBitSet {
    type Item = Card;
    type IntoIter = CardBitSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Suit, Value};

    #[test]
    fn test_insert_remove() {
        let mut set = CardBitSet::new();
        let card = Card::new(Value::Ace, Suit::Spade);
        assert!(set.insert(card));
        assert!(!set.insert(card));
        assert_eq!(1, set.count());
        assert!(set.remove(card));
        assert!(!set.remove(card));
        assert!(set.is_empty());
    }

    #[test]
    fn test_order_independent_equality() {
        let a = CardBitSet::from_str_cards("AsKd7c").unwrap();
        let b = CardBitSet::from_str_cards("7cAsKd").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_rejected() {
        assert_eq!(
            Err(CardParseError::DuplicateCard(Card::new(Value::Ace, Suit::Spade))),
            CardBitSet::from_str_cards("AsAs")
        );
    }

    #[test]
    fn test_complement() {
        let flop = CardBitSet::from_str_cards("2s3s4s").unwrap();
        let rest = flop.complement();
        assert_eq!(49, rest.count());
        assert!(flop.is_disjoint(&rest));
        assert_eq!(CardBitSet::full_deck(), flop | rest);
    }

    #[test]
    fn test_iter_sorted() {
        let set = CardBitSet::from_str_cards("AdKh2s").unwrap();
        let cards: Vec<usize> = set.iter().map(|c| c.index()).collect();
        assert_eq!(vec![0, 46, 51], cards);
        assert_eq!("2sKhAd", set.to_string());
    }
}
