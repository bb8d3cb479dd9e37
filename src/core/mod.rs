/// Card, Suit and Value.
mod card;
/// Export the card types.
pub use self::card::{Card, Suit, Value, DECK_SIZE};

/// A set of cards backed by a single u64.
mod card_bit_set;
/// Export `CardBitSet`
pub use self::card_bit_set::{CardBitSet, CardBitSetIter};

/// Two hole cards.
mod pocket;
/// Export `Pocket`
pub use self::pocket::Pocket;

/// Everything that can go wrong reading cards.
mod error;
/// Export `CardParseError`
pub use self::error::CardParseError;

/// Hand ranking.
mod rank;
/// Export the trait and the results.
pub use self::rank::{CoreRank, Rank, Rankable};

/// Combinations of cards.
mod card_iter;
/// Export `CardIter`
pub use self::card_iter::CardIter;
