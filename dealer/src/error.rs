//! Dealer failures and the exit code each one maps to.

use crate::deck::DeckError;
use shared::{PathError, PlayerId, ProtocolError};
use std::io;
use thiserror::Error;

/// Everything that can end a dealer run early. `Display` is the one-line
/// diagnostic printed before exiting with [`DealerError::exit_code`].
#[derive(Debug, Error)]
pub enum DealerError {
    #[error("Usage: dealer deck path p1 {{p2}}")]
    Usage,
    #[error("Error reading deck")]
    Deck(#[source] DeckError),
    #[error("Error reading path")]
    Path(#[source] PathSource),
    #[error("Error starting process")]
    Start {
        player: PlayerId,
        #[source]
        source: StartFault,
    },
    #[error("Communications error")]
    Communication(#[source] CommsFault),
    /// The hangup signal could not be watched.
    #[error("Communications error")]
    Signal(#[source] io::Error),
    /// The dealer was told to hang up. Exits like a communication error but
    /// prints nothing.
    #[error("Communications error")]
    Hangup,
}

impl DealerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            DealerError::Usage => 1,
            DealerError::Deck(_) => 2,
            DealerError::Path(_) => 3,
            DealerError::Start { .. } => 4,
            DealerError::Communication(_) | DealerError::Signal(_) | DealerError::Hangup => 5,
        }
    }

    /// Whether the diagnostic line is suppressed.
    pub fn is_silent(&self) -> bool {
        matches!(self, DealerError::Hangup)
    }
}

/// Why the path could not be loaded.
#[derive(Debug, Error)]
pub enum PathSource {
    #[error("path file is unreadable: {0}")]
    Io(#[from] io::Error),
    #[error("path file must contain exactly one line")]
    ExtraLines,
    #[error(transparent)]
    Invalid(#[from] PathError),
}

/// Why a player could not be brought up.
#[derive(Debug, Error)]
pub enum StartFault {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("player pipes were not created")]
    Pipes,
    #[error("handshake failed: {0}")]
    Handshake(#[source] io::Error),
}

/// What went wrong talking to the players once they were running.
#[derive(Debug, Error)]
pub enum CommsFault {
    #[error("player {0} closed its output")]
    Closed(PlayerId),
    #[error("i/o error with player {player}: {source}")]
    Io {
        player: PlayerId,
        #[source]
        source: io::Error,
    },
    #[error("player {player}: {source}")]
    Protocol {
        player: PlayerId,
        #[source]
        source: ProtocolError,
    },
    #[error("no player is owed a turn")]
    NoTurnHolder,
    #[error("game already ended early")]
    Terminated,
}

impl From<CommsFault> for DealerError {
    fn from(fault: CommsFault) -> Self {
        DealerError::Communication(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_and_messages() {
        let cases = [
            (DealerError::Usage, 1, "Usage: dealer deck path p1 {p2}"),
            (DealerError::Deck(DeckError::Empty), 2, "Error reading deck"),
            (
                DealerError::Path(PathSource::ExtraLines),
                3,
                "Error reading path",
            ),
            (
                DealerError::Start {
                    player: 0,
                    source: StartFault::Spawn {
                        program: "./missing".to_string(),
                        source: io::Error::from(io::ErrorKind::NotFound),
                    },
                },
                4,
                "Error starting process",
            ),
            (
                DealerError::Communication(CommsFault::Closed(1)),
                5,
                "Communications error",
            ),
        ];
        for (error, code, message) in cases {
            assert_eq!(error.exit_code(), code);
            assert_eq!(error.to_string(), message);
            assert!(!error.is_silent());
        }
    }

    #[test]
    fn test_hangup_is_silent() {
        assert_eq!(DealerError::Hangup.exit_code(), 5);
        assert!(DealerError::Hangup.is_silent());
    }
}
