use thiserror::Error;

/// Errors produced while parsing cards out of strings.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CardParseError {
    #[error("Unable to parse value from char {0}")]
    UnexpectedValueChar(char),
    #[error("Unable to parse suit from char {0}")]
    UnexpectedSuitChar(char),
    #[error("Unexpected trailing char {0}")]
    UnexpectedChar(char),
    #[error("Card string ended before a full card was read")]
    UnexpectedEnd,
    #[error("Expected exactly two cards, found {0}")]
    WrongCardCount(usize),
    #[error("Card {0} appears more than once")]
    DuplicateCard(super::Card),
}
