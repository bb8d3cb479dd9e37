use std::iter;

use super::{Card, CardBitSet};

/// The best five card hand that some cards make.
///
/// The u32 orders hands inside a category. It holds the deciding values
/// (trips before the pair in a full house, pairs before the kicker and so
/// on) packed four bits each with the first one most significant, so two
/// hands of the same category compare by their details.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub enum Rank {
    HighCard(u32),
    OnePair(u32),
    TwoPair(u32),
    ThreeOfAKind(u32),
    /// Detail is the top card. The wheel plays five high.
    Straight(u32),
    Flush(u32),
    FullHouse(u32),
    FourOfAKind(u32),
    StraightFlush(u32),
}

/// The category of a hand without any kicker information.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub enum CoreRank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl From<Rank> for CoreRank {
    fn from(rank: Rank) -> Self {
        rank.split().0
    }
}

/// Bits reserved for the in-category detail of a score.
const SCORE_DETAIL_BITS: u32 = 26;

impl Rank {
    fn split(&self) -> (CoreRank, u32) {
        match *self {
            Rank::HighCard(d) => (CoreRank::HighCard, d),
            Rank::OnePair(d) => (CoreRank::OnePair, d),
            Rank::TwoPair(d) => (CoreRank::TwoPair, d),
            Rank::ThreeOfAKind(d) => (CoreRank::ThreeOfAKind, d),
            Rank::Straight(d) => (CoreRank::Straight, d),
            Rank::Flush(d) => (CoreRank::Flush, d),
            Rank::FullHouse(d) => (CoreRank::FullHouse, d),
            Rank::FourOfAKind(d) => (CoreRank::FourOfAKind, d),
            Rank::StraightFlush(d) => (CoreRank::StraightFlush, d),
        }
    }

    /// Flatten the rank into a single positive integer.
    ///
    /// Scores order exactly like ranks do: a better category always wins,
    /// and inside a category the detail decides. Equal hands get equal
    /// scores.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdem_ai::core::Rank;
    ///
    /// assert!(Rank::Straight(0).score() > Rank::ThreeOfAKind(u32::MAX >> 8).score());
    /// assert!(Rank::HighCard(0).score() > 0);
    /// ```
    pub fn score(&self) -> u32 {
        let (core, detail) = self.split();
        ((core as u32 + 1) << SCORE_DETAIL_BITS) | (detail & ((1 << SCORE_DETAIL_BITS) - 1))
    }

    /// The category of this rank.
    pub fn core(&self) -> CoreRank {
        self.split().0
    }
}

/// Ace, two, three, four and five.
const WHEEL: u16 = 0b1_0000_0000_1111;

/// Pack card values into nibbles, first one most significant. Values are
/// offset by one so a deuce still counts.
fn pack(values: impl IntoIterator<Item = u8>) -> u32 {
    values
        .into_iter()
        .fold(0, |acc, v| (acc << 4) | (u32::from(v) + 1))
}

/// The values in `mask`, highest first.
fn descending(mask: u16) -> impl Iterator<Item = u8> {
    (0..13u8).rev().filter(move |v| mask & (1 << v) != 0)
}

fn highest(mask: u16) -> Option<u8> {
    descending(mask).next()
}

/// Top card of the best straight in `mask`.
fn straight_high(mask: u16) -> Option<u8> {
    (4..13u8)
        .rev()
        .find(|&high| (mask >> (high - 4)) & 0b1_1111 == 0b1_1111)
        .or_else(|| (mask & WHEEL == WHEEL).then_some(3))
}

/// Per value and per suit summary of a handful of cards.
struct Tally {
    counts: [u8; 13],
    suits: [u16; 4],
    values: u16,
}

impl Tally {
    fn new(cards: impl Iterator<Item = Card>) -> Self {
        let mut tally = Tally {
            counts: [0; 13],
            suits: [0; 4],
            values: 0,
        };
        for card in cards {
            let bit = 1 << card.value as u16;
            tally.counts[card.value as usize] += 1;
            tally.suits[card.suit as usize] |= bit;
            tally.values |= bit;
        }
        tally
    }

    /// Values held exactly `n` times.
    fn with_count(&self, n: u8) -> u16 {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == n)
            .fold(0, |mask, (v, _)| mask | (1 << v))
    }

    /// The best kickers left once `used` values have played.
    fn kickers(&self, used: u16, n: usize) -> impl Iterator<Item = u8> {
        descending(self.values & !used).take(n)
    }

    fn best(&self) -> Rank {
        if let Some(&suited) = self.suits.iter().find(|s| s.count_ones() >= 5) {
            return match straight_high(suited) {
                Some(high) => Rank::StraightFlush(pack([high])),
                None => Rank::Flush(pack(descending(suited).take(5))),
            };
        }

        let trips = self.with_count(3);
        let pairs = self.with_count(2);

        if let Some(quad) = highest(self.with_count(4)) {
            let kicker = self.kickers(1 << quad, 1);
            return Rank::FourOfAKind(pack(iter::once(quad).chain(kicker)));
        }
        if let Some(set) = highest(trips) {
            // With two sets the lower one plays as the pair.
            if let Some(pair) = highest((trips | pairs) & !(1 << set)) {
                return Rank::FullHouse(pack([set, pair]));
            }
        }
        if let Some(high) = straight_high(self.values) {
            return Rank::Straight(pack([high]));
        }
        if let Some(set) = highest(trips) {
            let kickers = self.kickers(1 << set, 2);
            return Rank::ThreeOfAKind(pack(iter::once(set).chain(kickers)));
        }
        // Seven cards can hold three pairs. Only the top two play.
        let mut paired = descending(pairs);
        match (paired.next(), paired.next()) {
            (Some(top), Some(second)) => {
                let kicker = self.kickers((1 << top) | (1 << second), 1);
                Rank::TwoPair(pack([top, second].into_iter().chain(kicker)))
            }
            (Some(pair), None) => {
                let kickers = self.kickers(1 << pair, 3);
                Rank::OnePair(pack(iter::once(pair).chain(kickers)))
            }
            _ => Rank::HighCard(pack(descending(self.values).take(5))),
        }
    }
}

/// The hand ranking oracle. Anything that can list its cards can be ranked.
pub trait Rankable {
    fn cards(&self) -> impl Iterator<Item = Card>;

    /// Rank the cards to find the best 5 card hand.
    /// This works on 5 to 7 cards, the sizes a hold'em hand goes through.
    ///
    /// # Examples
    /// ```
    /// use holdem_ai::core::{CardBitSet, Rank, Rankable};
    ///
    /// let hand = CardBitSet::from_str_cards("2h2d8d8sKd6sTh").unwrap();
    /// let rank = hand.rank();
    /// assert!(Rank::TwoPair(0) <= rank);
    /// assert!(Rank::TwoPair(u32::MAX) >= rank);
    /// ```
    fn rank(&self) -> Rank {
        Tally::new(self.cards()).best()
    }
}

impl Rankable for Vec<Card> {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

impl Rankable for [Card] {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

impl Rankable for CardBitSet {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter()
    }
}
