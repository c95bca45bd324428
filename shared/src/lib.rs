//! # Shared Game Library
//!
//! Everything the dealer and the players must agree on lives here: the path
//! and player model, the line-based wire protocol, the turn rules and the
//! board display. Both roles link this crate so that the dealer's
//! authoritative game and every player's mirror evolve through exactly the
//! same code.
//!
//! ## Module Organization
//!
//! ### Path Module (`path`)
//! Parses and validates the `<N>;` path text into sites with a type, a
//! capacity and an ordered occupancy list.
//!
//! ### Game Module (`game`)
//! Players, cards and the [`Game`] that ties them to a path.
//!
//! ### Engine Module (`engine`)
//! Turn order, movement legality, state-update validation and application,
//! game-over detection.
//!
//! ### Protocol Module (`protocol`)
//! Strict decoding of `YT` / `DO` / `HAP` / `EARLY` / `DONE` lines, message
//! serialization and the newline-or-EOF line reader.
//!
//! ### Scoring Module (`scoring`)
//! Final score computation, including the card set bonus.
//!
//! ### Board Module (`board`)
//! Renders the occupancy grid printed after every move.

pub mod board;
pub mod engine;
pub mod game;
pub mod path;
pub mod protocol;
pub mod scoring;

pub use engine::{MoveError, Transition, UpdateError};
pub use game::{Card, Game, Player};
pub use path::{Path, PathError, Site, SiteError, SiteKind};
pub use protocol::{Message, ProtocolError, StateUpdate};

/// Zero-based player identity, also the player's index in [`Game::players`].
pub type PlayerId = usize;

/// Money every player holds when the game starts.
pub const STARTING_MONEY: i64 = 7;

/// Number of distinct card types (`A` to `E`).
pub const CARD_TYPES: usize = 5;

/// Width of one encoded site record (`Mo1`, `::-`) and of one rendered site
/// column block (`Mo `).
pub const SITE_WIDTH: usize = 3;

/// A path needs at least its two bounding barriers.
pub const MIN_SITES: usize = 2;

/// Byte a player writes to its output once it is ready to receive the path.
pub const HANDSHAKE: u8 = b'^';
