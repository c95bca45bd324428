//! Player failures and the exit code each one maps to.

use shared::{PathError, ProtocolError};
use std::io;
use thiserror::Error;

/// Everything that ends a player run early. `Display` is the one-line
/// diagnostic printed before exiting with [`PlayerError::exit_code`].
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Usage: player pcount ID")]
    Usage,
    #[error("Invalid player count")]
    PlayerCount,
    #[error("Invalid ID")]
    PlayerId,
    #[error("Invalid path")]
    Path(#[source] PathError),
    #[error("Early game over")]
    Early,
    #[error("Communications error")]
    Communication(#[from] LinkError),
}

impl PlayerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            PlayerError::Usage => 1,
            PlayerError::PlayerCount => 2,
            PlayerError::PlayerId => 3,
            PlayerError::Path(_) => 4,
            PlayerError::Early => 5,
            PlayerError::Communication(_) => 6,
        }
    }
}

/// Problems on the pipes to the dealer.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("dealer closed the connection")]
    Closed,
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("no legal move available")]
    NoMove,
}
