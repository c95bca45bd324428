//! # Dealer Library
//!
//! The dealer is the authoritative side of the game. It starts one process
//! per player, hands each of them the path, and then runs the turn loop:
//! prompt the turn holder, check the move it asks for, work out what landing
//! there earns, and broadcast the resulting state-update to everyone.
//!
//! ## Module Organization
//!
//! ### Config Module (`config`)
//! Command line parsing and loading of the deck and path files.
//!
//! ### Deck Module (`deck`)
//! The validated card sequence and the deterministic draw rule.
//!
//! ### Rules Module (`rules`)
//! Site effects: money on `Mo`, money to points on `Do`, a card on `Ri`.
//!
//! ### Supervisor Module (`supervisor`)
//! Spawning, handshaking, killing and reaping the player processes.
//!
//! ### Session Module (`session`)
//! The turn loop itself, generic over the player pipes so it can be driven
//! in memory by tests.
//!
//! ### Error Module (`error`)
//! Every way a run can fail and the exit code for each.
//!
//! ## Failure Handling
//!
//! Content errors (arguments, deck, path) are reported before any player is
//! started. Once play begins, any protocol violation ends the game with
//! `EARLY` and every player is killed. A `SIGHUP` kills and reaps every
//! player immediately without any further protocol traffic.

pub mod config;
pub mod deck;
pub mod error;
pub mod rules;
pub mod session;
pub mod supervisor;

pub use config::Config;
pub use deck::Deck;
pub use error::DealerError;
pub use session::Session;
pub use supervisor::Supervisor;
