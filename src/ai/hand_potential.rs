use tracing::{instrument, trace};

use crate::core::{Card, CardBitSet, CoreRank, Pocket, Rankable, Suit, Value};

use super::errors::{AiError, Result};

/// Bit per value, Two in the lowest bit.
fn value_mask(cards: CardBitSet) -> u16 {
    cards
        .iter()
        .fold(0u16, |mask, c| mask | (1 << (c.value as u8)))
}

fn suit_count(cards: CardBitSet, suit: Suit) -> usize {
    cards.iter().filter(|c| c.suit == suit).count()
}

/// The values `high - 4 ..= high` as a mask. The wheel wraps the ace round.
fn straight_window(high: u8) -> u16 {
    if high == Value::Five as u8 {
        0b1_0000_0000_1111
    } else {
        0b1_1111 << (high - 4)
    }
}

/// Top value of the best straight in `mask`.
fn straight_high(mask: u16) -> Option<u8> {
    (Value::Five as u8..=Value::Ace as u8)
        .rev()
        .find(|&high| mask & straight_window(high) == straight_window(high))
}

/// Top value of the best straight anyone could make on `board` with two
/// hole cards.
fn nut_straight_high(board: CardBitSet) -> Option<u8> {
    let mask = value_mask(board);
    (Value::Five as u8..=Value::Ace as u8)
        .rev()
        .find(|&high| (mask & straight_window(high)).count_ones() >= 3)
}

/// What a board can make on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTexture {
    value_counts: [u8; 13],
    suit_counts: [u8; 4],
}

impl BoardTexture {
    pub fn new(board: CardBitSet) -> Self {
        let mut value_counts = [0u8; 13];
        let mut suit_counts = [0u8; 4];
        for card in board.iter() {
            value_counts[card.value as usize] += 1;
            suit_counts[card.suit as usize] += 1;
        }
        Self {
            value_counts,
            suit_counts,
        }
    }

    fn most_of_a_value(&self) -> u8 {
        self.value_counts.iter().copied().max().unwrap_or(0)
    }

    pub fn has_pair(&self) -> bool {
        self.most_of_a_value() >= 2
    }

    pub fn has_trips(&self) -> bool {
        self.most_of_a_value() >= 3
    }

    pub fn has_quads(&self) -> bool {
        self.most_of_a_value() >= 4
    }

    /// Trips plus a pair of another value.
    pub fn has_full_house(&self) -> bool {
        let trips = self.value_counts.iter().position(|&n| n >= 3);
        trips.is_some_and(|t| {
            self.value_counts
                .iter()
                .enumerate()
                .any(|(v, &n)| v != t && n >= 2)
        })
    }

    /// Three or more of a suit, so a flush is possible.
    pub fn has_possible_flush(&self) -> bool {
        self.suit_counts.iter().any(|&n| n >= 3)
    }

    /// Five of a suit.
    pub fn has_flush(&self) -> bool {
        self.suit_counts.iter().any(|&n| n >= 5)
    }

    /// Quads or a full house on board, so drawing to a straight or flush is
    /// close to worthless.
    pub fn draws_devalued(&self) -> bool {
        self.has_quads() || self.has_full_house()
    }
}

/// How often a pocket makes a flush or a straight with the next card.
///
/// Nut hands can't be beaten by a better hand of the same kind. On the
/// river there's no next card and every count is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandPotential {
    pub nut_flush: usize,
    pub flush: usize,
    pub nut_straight: usize,
    pub non_nut_straight: usize,
    /// Number of next cards looked at.
    pub cards_seen: usize,
}

impl HandPotential {
    #[instrument(level = "trace", skip(pocket, community), fields(pocket = %pocket, community = %community))]
    pub fn new(pocket: Pocket, community: CardBitSet) -> Result<Self> {
        match community.count() {
            3 | 4 => {}
            5 => return Ok(Self::default()),
            n => return Err(AiError::InvalidCommunity(n)),
        }
        if !pocket.is_disjoint(&community) {
            return Err(AiError::InvalidPocket);
        }

        let held = pocket.to_set();
        let unseen = (community | held).complement();
        let mut potential = Self::default();

        for next in unseen.iter() {
            let mut board = community;
            board.insert(next);
            let hand = board | held;
            potential.cards_seen += 1;
            match hand.rank().core() {
                CoreRank::Flush => {
                    potential.flush += 1;
                    if is_nut_flush(&pocket, board) {
                        potential.nut_flush += 1;
                    }
                }
                CoreRank::Straight => {
                    if straight_high(value_mask(hand)) == nut_straight_high(board) {
                        potential.nut_straight += 1;
                    } else {
                        potential.non_nut_straight += 1;
                    }
                }
                _ => {}
            }
        }
        trace!(?potential, "counted draws");
        Ok(potential)
    }

    pub fn non_nut_flush(&self) -> usize {
        self.flush - self.nut_flush
    }

    /// Straights of any kind.
    pub fn straight(&self) -> usize {
        self.nut_straight + self.non_nut_straight
    }
}

/// No unseen card of the flush suit beats the pocket's best card in it.
fn is_nut_flush(pocket: &Pocket, board: CardBitSet) -> bool {
    let Some(suit) = Suit::suits()
        .into_iter()
        .find(|&s| suit_count(board | pocket.to_set(), s) >= 5)
    else {
        return false;
    };
    let Some(best) = pocket
        .cards()
        .into_iter()
        .filter(|c| c.suit == suit)
        .map(|c| c.value)
        .max()
    else {
        return false;
    };
    Value::values()
        .into_iter()
        .filter(|&v| v > best)
        .all(|v| board.contains(Card::new(v, suit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potential(pocket: &str, board: &str) -> HandPotential {
        HandPotential::new(
            Pocket::from_str_cards(pocket).unwrap(),
            CardBitSet::from_str_cards(board).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_nut_flush_draw() {
        // Nine spades left and nothing beats the ace.
        let p = potential("AsKs", "2s7s9d");
        assert_eq!(47, p.cards_seen);
        assert_eq!(9, p.flush);
        assert_eq!(9, p.nut_flush);
        assert_eq!(0, p.non_nut_flush());
    }

    #[test]
    fn test_weak_flush_draw() {
        let p = potential("3s4s", "Ks7s9d");
        assert_eq!(9, p.flush);
        assert_eq!(0, p.nut_flush);
        assert_eq!(9, p.non_nut_flush());
    }

    #[test]
    fn test_open_ended_straight_draw() {
        let p = potential("8c9d", "Th Js 2c");
        // Sevens make the best straight possible, queens lose to ace king.
        assert_eq!(4, p.nut_straight);
        assert_eq!(4, p.non_nut_straight);
        assert_eq!(8, p.straight());
        assert_eq!(0, p.flush);
    }

    #[test]
    fn test_river_has_no_draws() {
        let p = potential("AsKs", "2s7s9d3c4h");
        assert_eq!(HandPotential::default(), p);
    }

    #[test]
    fn test_invalid_input() {
        let pocket = Pocket::from_str_cards("AsKs").unwrap();
        assert_eq!(
            Err(AiError::InvalidCommunity(0)),
            HandPotential::new(pocket, CardBitSet::new())
        );
        assert_eq!(
            Err(AiError::InvalidPocket),
            HandPotential::new(pocket, CardBitSet::from_str_cards("As7d9d").unwrap())
        );
    }

    #[test]
    fn test_board_texture() {
        let t = BoardTexture::new(CardBitSet::from_str_cards("7s7d7c2h2s").unwrap());
        assert!(t.has_pair());
        assert!(t.has_trips());
        assert!(!t.has_quads());
        assert!(t.has_full_house());
        assert!(t.draws_devalued());

        let t = BoardTexture::new(CardBitSet::from_str_cards("2h5h9hKd").unwrap());
        assert!(!t.has_pair());
        assert!(t.has_possible_flush());
        assert!(!t.has_flush());
        assert!(!t.draws_devalued());

        let t = BoardTexture::new(CardBitSet::from_str_cards("7s7d7c").unwrap());
        assert!(t.has_trips());
        assert!(!t.has_full_house());
    }
}
