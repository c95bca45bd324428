//! Command line parsing and loading of the deck and path files.

use crate::deck::{Deck, DeckError};
use crate::error::{DealerError, PathSource};
use clap::Parser;
use log::{debug, info};
use shared::Game;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// dealer deck path p1 {p2}
#[derive(Parser, Debug)]
#[command(disable_help_flag = true)]
pub struct Args {
    /// File holding the single deck line
    pub deck: PathBuf,
    /// File holding the single path line
    pub path: PathBuf,
    /// Player programs, one per seat
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub players: Vec<String>,
}

/// Everything needed to start a game.
#[derive(Debug)]
pub struct Config {
    pub deck: Deck,
    pub game: Game,
    pub programs: Vec<String>,
}

impl Config {
    /// Parses the command line then loads the deck, then the path.
    pub async fn from_args<I, T>(args: I) -> Result<Self, DealerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Args::try_parse_from(args).map_err(|e| {
            debug!("argument error: {}", e);
            DealerError::Usage
        })?;

        let deck = load_deck(&args.deck).await.map_err(DealerError::Deck)?;
        let path = load_path(&args.path).await.map_err(DealerError::Path)?;
        let game = Game::new(&path, args.players.len())
            .map_err(|e| DealerError::Path(PathSource::Invalid(e)))?;

        info!(
            "loaded {} card deck and {} site path for {} players",
            deck.len(),
            game.path().len(),
            args.players.len()
        );

        Ok(Self {
            deck,
            game,
            programs: args.players,
        })
    }
}

async fn load_deck(file: &Path) -> Result<Deck, DeckError> {
    let text = tokio::fs::read_to_string(file).await?;
    let line = only_line(&text).ok_or(DeckError::ExtraLines)?;
    Deck::parse(line)
}

async fn load_path(file: &Path) -> Result<String, PathSource> {
    let text = tokio::fs::read_to_string(file).await?;
    let line = only_line(&text).ok_or(PathSource::ExtraLines)?;
    Ok(line.to_string())
}

/// The first line of `text`, or `None` when anything follows its newline.
fn only_line(text: &str) -> Option<&str> {
    match text.split_once('\n') {
        Some((line, "")) => Some(line),
        Some(_) => None,
        None => Some(text),
    }
}
