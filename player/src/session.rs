//! The player's side of the protocol.
//!
//! A player keeps a mirror of the dealer's game. The mirror is built from
//! the path line and only changes when a state-update arrives, so the
//! player sees exactly what the dealer sees.

use crate::config::Config;
use crate::error::{LinkError, PlayerError};
use crate::strategy::Strategy;
use log::{debug, info, warn};
use shared::board::{scores_line, Board};
use shared::protocol::{self, Message, ProtocolError};
use shared::{Game, PlayerId, HANDSHAKE};
use std::fmt::Display;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

/// What handling one dealer message amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// We were prompted and asked to move to this site.
    Moved(usize),
    /// Someone's move was applied to the mirror.
    Updated(PlayerId),
    /// The game ended normally with these scores.
    Finished(Vec<i64>),
}

pub struct PlayerSession<R, W, D> {
    reader: R,
    writer: W,
    display: D,
    game: Game,
    me: PlayerId,
}

impl<R, W, D> PlayerSession<R, W, D>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    D: Write,
{
    /// Sends the handshake, reads the path and shows the opening board.
    pub async fn connect(mut reader: R, mut writer: W, display: D, config: Config) -> Result<Self, PlayerError> {
        writer.write_all(&[HANDSHAKE]).await.map_err(LinkError::from)?;
        writer.flush().await.map_err(LinkError::from)?;

        let line = protocol::read_line(&mut reader).await.map_err(LinkError::from)?;
        if line.is_eof() {
            return Err(LinkError::Closed.into());
        }
        let game = Game::new(&line.text, config.player_count).map_err(PlayerError::Path)?;
        info!(
            "player {} of {} joined a {} site game",
            config.id,
            config.player_count,
            game.path().len()
        );

        let mut session = Self {
            reader,
            writer,
            display,
            game,
            me: config.id,
        };
        session.show(Board::build(&session.game));
        Ok(session)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Plays until the dealer says the game is over.
    pub async fn run<S: Strategy + ?Sized>(&mut self, strategy: &S) -> Result<Vec<i64>, PlayerError> {
        loop {
            if let Step::Finished(scores) = self.step(strategy).await? {
                return Ok(scores);
            }
        }
    }

    /// Reads and handles one message from the dealer.
    pub async fn step<S: Strategy + ?Sized>(&mut self, strategy: &S) -> Result<Step, PlayerError> {
        let line = protocol::read_line(&mut self.reader)
            .await
            .map_err(LinkError::from)?;
        if line.is_eof() {
            return Err(LinkError::Closed.into());
        }

        match Message::decode(&line.text).map_err(LinkError::from)? {
            Message::YourTurn => {
                let site = strategy
                    .choose(&self.game, self.me)
                    .ok_or(LinkError::NoMove)?;
                debug!("player {} chooses site {}", self.me, site);
                let reply = Message::Move {
                    site: i64::try_from(site).map_err(|_| LinkError::NoMove)?,
                };
                protocol::send(&mut self.writer, &reply)
                    .await
                    .map_err(LinkError::from)?;
                Ok(Step::Moved(site))
            }
            Message::Update(update) => {
                let transition = self
                    .game
                    .validate_update(&update)
                    .map_err(|e| LinkError::Protocol(ProtocolError::IllegalUpdate(e)))?;
                self.game.apply(&transition);
                if let Some(details) = self.game.player(transition.player).map(ToString::to_string) {
                    self.show(details);
                }
                self.show(Board::build(&self.game));
                Ok(Step::Updated(transition.player))
            }
            Message::Early => {
                warn!("dealer ended the game early");
                Err(PlayerError::Early)
            }
            Message::Done => {
                let scores = self.game.final_scores();
                self.show(scores_line(&scores));
                Ok(Step::Finished(scores))
            }
            other @ Message::Move { .. } => {
                Err(LinkError::Protocol(ProtocolError::Unexpected(other.to_string())).into())
            }
        }
    }

    fn show<T: Display>(&mut self, text: T) {
        let mut text = text.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        if let Err(e) = self.display.write_all(text.as_bytes()) {
            debug!("could not write to display: {}", e);
        }
    }
}
