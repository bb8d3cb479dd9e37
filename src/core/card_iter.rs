use crate::core::{Card, CardBitSet};

/// Given some cards create every possible group of `num_cards` of them.
///
/// Used to enumerate board runouts and opponent holdings.
///
/// # Examples
///
/// ```
/// use holdem_ai::core::{CardBitSet, CardIter};
///
/// let cards = CardBitSet::from_str_cards("2s3s4s5s").unwrap().to_vec();
/// assert_eq!(6, CardIter::new(&cards, 2).count());
/// ```
#[derive(Debug)]
pub struct CardIter<'a> {
    /// All the possible cards that can be dealt
    possible_cards: &'a [Card],

    /// Offsets of the combination that will be returned next.
    idx: Vec<usize>,

    /// Set once every combination has been returned.
    done: bool,
}

impl CardIter<'_> {
    /// Create a new `CardIter` from a slice of cards.
    /// `num_cards` represents how many cards should be in each set.
    pub fn new(possible_cards: &[Card], num_cards: usize) -> CardIter<'_> {
        CardIter {
            possible_cards,
            idx: (0..num_cards).collect(),
            done: num_cards > possible_cards.len(),
        }
    }

    /// Move `idx` to the next combination in lexicographic order.
    fn advance(&mut self) {
        let n = self.possible_cards.len();
        let k = self.idx.len();
        // Find the right-most offset that still has room to move.
        let Some(level) = (0..k).rev().find(|&i| self.idx[i] < n - k + i) else {
            self.done = true;
            return;
        };
        self.idx[level] += 1;
        for i in level + 1..k {
            self.idx[i] = self.idx[i - 1] + 1;
        }
    }
}

impl Iterator for CardIter<'_> {
    type Item = CardBitSet;

    fn next(&mut self) -> Option<CardBitSet> {
        if self.done {
            return None;
        }
        let result: CardBitSet = self.idx.iter().map(|&i| self.possible_cards[i]).collect();
        self.advance();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Suit, Value};

    fn cards(s: &str) -> Vec<Card> {
        CardBitSet::from_str_cards(s).unwrap().to_vec()
    }

    #[test]
    fn test_iter_one() {
        let h = cards("2s");
        for set in CardIter::new(&h, 1) {
            assert_eq!(1, set.count());
        }
        assert_eq!(1, CardIter::new(&h, 1).count());
    }

    #[test]
    fn test_iter_two() {
        let h = cards("2s3s4s");
        assert_eq!(3, CardIter::new(&h, 2).count());
        for set in CardIter::new(&h, 2) {
            assert_eq!(2, set.count());
        }
    }

    #[test]
    fn test_iter_zero_yields_empty_set() {
        let h = cards("2s3s");
        let all: Vec<CardBitSet> = CardIter::new(&h, 0).collect();
        assert_eq!(vec![CardBitSet::new()], all);
    }

    #[test]
    fn test_iter_too_many() {
        let h = cards("2s3s");
        assert_eq!(0, CardIter::new(&h, 3).count());
    }

    #[test]
    fn test_iter_remaining_deck() {
        // 47 cards left after a flop and a pocket, C(47, 2) runouts.
        let known = CardBitSet::from_str_cards("AsKsQsJhTh").unwrap();
        let rest = known.complement().to_vec();
        assert_eq!(1081, CardIter::new(&rest, 2).count());
    }

    #[test]
    fn test_iter_contains_correct_cards() {
        let card1 = Card::new(Value::Ace, Suit::Heart);
        let card2 = Card::new(Value::King, Suit::Heart);
        let h = vec![card1, card2];

        let combos: Vec<_> = CardIter::new(&h, 2).collect();
        assert_eq!(1, combos.len());
        assert!(combos[0].contains(card1));
        assert!(combos[0].contains(card2));
    }
}
