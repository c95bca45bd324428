//! # Player Library
//!
//! A player process is started by the dealer as `<program> <playerCount>
//! <id>` with its stdin and stdout connected to the dealer. It announces
//! itself with `^`, receives the path, and from then on mirrors every
//! state-update while answering each `YT` prompt with the move its
//! [`Strategy`] picks. The board and the scores go to stderr since stdout
//! carries the protocol.
//!
//! ## Module Organization
//!
//! ### Config Module (`config`)
//! Argument validation.
//!
//! ### Session Module (`session`)
//! The message loop and the mirrored game.
//!
//! ### Strategy Module (`strategy`)
//! The [`Strategy`] trait and the two built-in players.
//!
//! ### Error Module (`error`)
//! Failures and their exit codes.

pub mod config;
pub mod error;
pub mod session;
pub mod strategy;

pub use config::Config;
pub use error::PlayerError;
pub use session::{PlayerSession, Step};
pub use strategy::{Collector, Spender, Strategy};

use log::error;
use std::ffi::OsString;
use tokio::io::BufReader;

/// Runs a player over stdin and stdout and returns the process exit code.
pub async fn launch<I, T, S>(args: I, strategy: &S) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    S: Strategy + ?Sized,
{
    match play(args, strategy).await {
        Ok(_) => 0,
        Err(e) => {
            error!("player failed: {:?}", e);
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

async fn play<I, T, S>(args: I, strategy: &S) -> Result<Vec<i64>, PlayerError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    S: Strategy + ?Sized,
{
    let config = Config::from_args(args)?;
    let reader = BufReader::new(tokio::io::stdin());
    let mut session =
        PlayerSession::connect(reader, tokio::io::stdout(), std::io::stderr(), config).await?;
    session.run(strategy).await
}
