//! The dealer's card deck.
//!
//! A deck file holds a single line such as `6ABCDEA`: the number of cards
//! followed by that many card letters. Draws cycle through the deck forever.

use shared::Card;
use thiserror::Error;

/// Smallest deck the dealer accepts.
pub const MIN_DECK_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck file is unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("deck is empty")]
    Empty,
    #[error("invalid card count {0:?}")]
    Count(String),
    #[error("deck must hold at least {MIN_DECK_SIZE} cards, found {0}")]
    TooSmall(usize),
    #[error("unknown card {0:?}")]
    UnknownCard(char),
    #[error("deck declares {declared} cards but lists {actual}")]
    Length { declared: usize, actual: usize },
    #[error("deck file must contain exactly one line")]
    ExtraLines,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Parses one deck line, without its newline.
    pub fn parse(line: &str) -> Result<Self, DeckError> {
        if line.is_empty() {
            return Err(DeckError::Empty);
        }

        let split = line
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(line.len());
        let (count, letters) = line.split_at(split);
        let declared: usize = count
            .parse()
            .map_err(|_| DeckError::Count(count.to_string()))?;
        if declared < MIN_DECK_SIZE {
            return Err(DeckError::TooSmall(declared));
        }

        let cards = letters
            .chars()
            .map(|letter| Card::from_letter(letter).ok_or(DeckError::UnknownCard(letter)))
            .collect::<Result<Vec<_>, _>>()?;
        if cards.len() != declared {
            return Err(DeckError::Length {
                declared,
                actual: cards.len(),
            });
        }

        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card handed out after `drawn` cards have already been dealt.
    pub fn card_at(&self, drawn: u64) -> Option<Card> {
        let len = u64::try_from(self.cards.len()).ok().filter(|&len| len > 0)?;
        let index = usize::try_from(drawn % len).ok()?;
        self.cards.get(index).copied()
    }
}
