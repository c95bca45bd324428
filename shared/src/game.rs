use crate::path::{Path, PathError};
use crate::{PlayerId, CARD_TYPES, STARTING_MONEY};
use serde::Serialize;
use std::fmt;

/// The five card types. On the wire a card is its 1-based position
/// (`A` = 1 ... `E` = 5); 0 means no card was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Card {
    A,
    B,
    C,
    D,
    E,
}

impl Card {
    pub const ALL: [Card; CARD_TYPES] = [Card::A, Card::B, Card::C, Card::D, Card::E];

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|card| card.letter() == letter)
    }

    /// Decodes the wire value of a drawn card. `Some(None)` is "no card".
    pub fn from_wire(value: i64) -> Option<Option<Self>> {
        match value {
            0 => Some(None),
            1..=5 => Some(Some(Self::ALL[value as usize - 1])),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Card::A => 'A',
            Card::B => 'B',
            Card::C => 'C',
            Card::D => 'D',
            Card::E => 'E',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn wire(self) -> i64 {
        self.index() as i64 + 1
    }
}

/// One participant's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub money: i64,
    pub points: i64,
    /// Index of the site this player occupies. Never decreases.
    pub site: usize,
    pub v1_visits: u32,
    pub v2_visits: u32,
    pub cards: [u32; CARD_TYPES],
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            money: STARTING_MONEY,
            points: 0,
            site: 0,
            v1_visits: 0,
            v2_visits: 0,
            cards: [0; CARD_TYPES],
        }
    }

    pub fn card_count(&self, card: Card) -> u32 {
        self.cards[card.index()]
    }

    pub fn total_cards(&self) -> u64 {
        self.cards.iter().map(|&count| u64::from(count)).sum()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Player {} Money={} V1={} V2={} Points={}",
            self.id, self.money, self.v1_visits, self.v2_visits, self.points
        )?;
        for card in Card::ALL {
            write!(f, " {}={}", card.letter(), self.card_count(card))?;
        }
        Ok(())
    }
}

/// A path plus the players moving along it.
///
/// The dealer holds the authoritative instance; every player process keeps a
/// mirror that only ever changes through [`Game::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub(crate) path: Path,
    pub(crate) players: Vec<Player>,
}

impl Game {
    /// Builds a game from path text with every player on the opening barrier.
    ///
    /// Player 0 is seated as the most recent arrival so it moves first, and
    /// player `player_count - 1` moves last.
    pub fn new(path_text: &str, player_count: usize) -> Result<Self, PathError> {
        let mut path = Path::parse(path_text, player_count)?;
        let players = (0..player_count).map(Player::new).collect();

        if let Some(start) = path.site_mut(0) {
            for id in (0..player_count).rev() {
                start.insert(id);
            }
        }

        Ok(Self { path, players })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Cards drawn so far by everyone, which is also the deck position of the
    /// next draw.
    pub fn cards_drawn(&self) -> u64 {
        self.players.iter().map(Player::total_cards).sum()
    }
}
