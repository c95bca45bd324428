//! Player command line: `<playerCount> <id>`.

use crate::error::PlayerError;
use clap::Parser;
use log::debug;
use shared::protocol::parse_int;
use shared::PlayerId;
use std::ffi::OsString;

#[derive(Parser, Debug)]
#[command(disable_help_flag = true)]
pub struct Args {
    /// Number of players in the game
    #[arg(allow_hyphen_values = true)]
    pub player_count: String,
    /// This player's zero-based seat
    #[arg(allow_hyphen_values = true)]
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub player_count: usize,
    pub id: PlayerId,
}

impl Config {
    /// Checks the argument count, then the player count, then the id.
    pub fn from_args<I, T>(args: I) -> Result<Self, PlayerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Args::try_parse_from(args).map_err(|e| {
            debug!("argument error: {}", e);
            PlayerError::Usage
        })?;

        let player_count = parse_number(&args.player_count)
            .filter(|&count| count >= 1)
            .ok_or(PlayerError::PlayerCount)?;
        let id = parse_number(&args.id)
            .filter(|&id| id < player_count)
            .ok_or(PlayerError::PlayerId)?;

        Ok(Self { player_count, id })
    }
}

/// Same integer syntax as the wire protocol; negatives never fit.
fn parse_number(text: &str) -> Option<usize> {
    parse_int(text).and_then(|n| usize::try_from(n).ok())
}
