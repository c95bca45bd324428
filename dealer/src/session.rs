//! The dealer's turn loop.
//!
//! A [`Session`] owns the authoritative [`Game`] and drives the players over
//! their channels: broadcast the path, then prompt the turn holder, check its
//! move, broadcast the resulting state-update, repeat until everyone has
//! reached the final barrier.
//!
//! Once the game has been ended early with `EARLY`, nothing else is ever sent.
//! Players speak only when prompted; anything already waiting on a pipe
//! before a prompt goes out ends the game early.

use crate::deck::Deck;
use crate::error::{CommsFault, DealerError};
use crate::rules;
use crate::supervisor::Channel;
use log::{debug, info, log_enabled, warn, Level};
use shared::board::{scores_line, Board};
use shared::protocol::{self, Message, ProtocolError, StateUpdate};
use shared::{Game, PlayerId};
use std::fmt::Display;
use std::future::poll_fn;
use std::io::Write;
use std::pin::Pin;
use std::task::Poll;
use tokio::io::{AsyncBufRead, AsyncWrite};

pub struct Session<'a, R, W, D> {
    game: Game,
    deck: &'a Deck,
    channels: &'a mut [Channel<R, W>],
    display: D,
    terminated: bool,
}

impl<'a, R, W, D> Session<'a, R, W, D>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    D: Write,
{
    /// `channels[i]` must be the pipes of player `i`.
    pub fn new(game: Game, deck: &'a Deck, channels: &'a mut [Channel<R, W>], display: D) -> Self {
        Self {
            game,
            deck,
            channels,
            display,
            terminated: false,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Plays a whole game and returns the final scores.
    pub async fn run(&mut self) -> Result<Vec<i64>, DealerError> {
        self.start().await?;
        while !self.game.is_over() {
            self.play_turn().await?;
        }
        self.finish().await
    }

    /// Sends the path to every player and shows the opening board.
    pub async fn start(&mut self) -> Result<(), DealerError> {
        self.ensure_running()?;
        let path = self.game.path().raw().to_string();
        self.send_all(&path).await;
        self.show(Board::build(&self.game));
        Ok(())
    }

    /// Runs one prompt, move, broadcast cycle. Any failure ends the game
    /// early before it is returned.
    pub async fn play_turn(&mut self) -> Result<(), DealerError> {
        self.ensure_running()?;
        if let Err(fault) = self.take_turn().await {
            warn!("ending game early: {}", fault);
            self.abort().await;
            return Err(fault.into());
        }
        Ok(())
    }

    /// Announces the normal end and prints the final scores.
    pub async fn finish(&mut self) -> Result<Vec<i64>, DealerError> {
        self.ensure_running()?;
        self.send_all(&Message::Done).await;
        let scores = self.game.final_scores();
        info!("game over, scores {:?}", scores);
        self.show(scores_line(&scores));
        Ok(scores)
    }

    /// Tells every player the game ended early. Only the first call sends
    /// anything.
    pub async fn abort(&mut self) {
        if self.terminated {
            return;
        }
        self.send_all(&Message::Early).await;
        self.terminated = true;
    }

    fn ensure_running(&self) -> Result<(), DealerError> {
        if self.terminated {
            Err(CommsFault::Terminated.into())
        } else {
            Ok(())
        }
    }

    async fn take_turn(&mut self) -> Result<(), CommsFault> {
        let player = self.game.whose_turn().ok_or(CommsFault::NoTurnHolder)?;
        self.reject_unsolicited().await?;
        let requested = self.prompt(player).await?;
        let site = self
            .game
            .check_move(player, requested)
            .map_err(|e| CommsFault::Protocol {
                player,
                source: e.into(),
            })?;

        let transition = rules::resolve(&self.game, self.deck, player, site);
        let update = StateUpdate::from(&transition);
        info!("player {} moves to site {}: {}", player, site, update);
        self.send_all(&update).await;

        self.game.apply(&transition);
        if let Some(details) = self.game.player(player).map(ToString::to_string) {
            self.show(details);
        }
        self.show(Board::build(&self.game));

        if log_enabled!(Level::Debug) {
            match serde_json::to_string(self.game.players()) {
                Ok(snapshot) => debug!("players: {}", snapshot),
                Err(e) => debug!("could not serialize players: {}", e),
            }
        }
        Ok(())
    }

    /// Fails if any player has written something nobody asked for. Only
    /// data that is already readable counts; this never waits.
    async fn reject_unsolicited(&mut self) -> Result<(), CommsFault> {
        for (player, channel) in self.channels.iter_mut().enumerate() {
            let stray = poll_fn(|cx| match Pin::new(&mut channel.reader).poll_fill_buf(cx) {
                Poll::Ready(Ok(buf)) if !buf.is_empty() => {
                    Poll::Ready(Some(String::from_utf8_lossy(buf).into_owned()))
                }
                _ => Poll::Ready(None),
            })
            .await;

            if let Some(text) = stray {
                debug!("player {} wrote {:?} unprompted", player, text);
                let line = text.lines().next().unwrap_or_default().to_string();
                return Err(CommsFault::Protocol {
                    player,
                    source: ProtocolError::Unexpected(line),
                });
            }
        }
        Ok(())
    }

    /// Sends `YT` to `player` and returns the site it asks to move to.
    async fn prompt(&mut self, player: PlayerId) -> Result<i64, CommsFault> {
        let channel = self
            .channels
            .get_mut(player)
            .ok_or(CommsFault::Closed(player))?;
        let io_fault = |source| CommsFault::Io { player, source };

        debug!("prompting player {}", player);
        protocol::send(&mut channel.writer, &Message::YourTurn)
            .await
            .map_err(io_fault)?;
        let line = protocol::read_line(&mut channel.reader)
            .await
            .map_err(io_fault)?;
        if line.is_eof() {
            return Err(CommsFault::Closed(player));
        }
        debug!("player {} replied {:?}", player, line.text);

        match Message::decode(&line.text) {
            Ok(Message::Move { site }) => Ok(site),
            Ok(other) => Err(CommsFault::Protocol {
                player,
                source: ProtocolError::Unexpected(other.to_string()),
            }),
            Err(source) => Err(CommsFault::Protocol { player, source }),
        }
    }

    /// Sends `message` to every player. A player that has gone away is
    /// noticed the next time it is prompted.
    async fn send_all<M: Display + ?Sized>(&mut self, message: &M) {
        for (player, channel) in self.channels.iter_mut().enumerate() {
            if let Err(e) = protocol::send(&mut channel.writer, message).await {
                warn!("could not send {} to player {}: {}", message, player, e);
            }
        }
    }

    fn show<T: Display>(&mut self, text: T) {
        let mut text = text.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        let written = self
            .display
            .write_all(text.as_bytes())
            .and_then(|_| self.display.flush());
        if let Err(e) = written {
            warn!("could not write to display: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{split, BufReader, ReadHalf, WriteHalf};
    use tokio_test::io::{Builder, Mock};

    const PATH: &[u8] = b"3;::-Mo1::-\n";

    type MockChannel = Channel<BufReader<ReadHalf<Mock>>, WriteHalf<Mock>>;

    /// One player's pipes, scripted in the order the exchange must happen.
    fn channel(mock: Mock) -> MockChannel {
        let (reader, writer) = split(mock);
        Channel {
            reader: BufReader::new(reader),
            writer,
        }
    }

    #[tokio::test]
    async fn test_full_game() {
        let deck = Deck::parse("4ABCD").unwrap();
        let game = Game::new("3;::-Mo1::-", 2).unwrap();
        let first = Builder::new()
            .write(PATH)
            .write(b"YT\n")
            .read(b"DO1\n")
            .write(b"HAP0,1,0,3,0\n")
            .write(b"HAP1,2,0,0,0\n")
            .write(b"YT\n")
            .read(b"DO2\n")
            .write(b"HAP0,2,0,0,0\n")
            .write(b"DONE\n")
            .build();
        let second = Builder::new()
            .write(PATH)
            .write(b"HAP0,1,0,3,0\n")
            .write(b"YT\n")
            .read(b"DO2\n")
            .write(b"HAP1,2,0,0,0\n")
            .write(b"HAP0,2,0,0,0\n")
            .write(b"DONE\n")
            .build();
        let mut channels = vec![channel(first), channel(second)];
        let mut display = Vec::new();

        let scores = Session::new(game, &deck, &mut channels, &mut display)
            .run()
            .await
            .unwrap();
        assert_eq!(scores, vec![0, 0]);

        let shown = String::from_utf8(display).unwrap();
        assert!(shown.starts_with(":: Mo :: \n1        \n0        \n"));
        assert!(shown.contains("Player 0 Money=10 V1=0 V2=0 Points=0 A=0 B=0 C=0 D=0 E=0\n"));
        assert!(shown.ends_with("Scores: 0,0\n"));
    }

    #[tokio::test]
    async fn test_discard_and_draw_sites() {
        let deck = Deck::parse("4CABD").unwrap();
        let game = Game::new("4;::-Do1Ri1::-", 1).unwrap();
        let only = Builder::new()
            .write(b"4;::-Do1Ri1::-\n")
            .write(b"YT\n")
            .read(b"DO1\n")
            .write(b"HAP0,1,3,-7,0\n")
            .write(b"YT\n")
            .read(b"DO2\n")
            .write(b"HAP0,2,0,0,3\n")
            .write(b"YT\n")
            .read(b"DO3\n")
            .write(b"HAP0,3,0,0,0\n")
            .write(b"DONE\n")
            .build();
        let mut channels = vec![channel(only)];

        let mut session = Session::new(game, &deck, &mut channels, std::io::sink());
        let scores = session.run().await.unwrap();
        // 7 money converts to 3 points, plus one card
        assert_eq!(scores, vec![4]);
    }

    #[tokio::test]
    async fn test_signed_move_is_accepted() {
        let deck = Deck::parse("4ABCD").unwrap();
        let game = Game::new("3;::-Mo1::-", 2).unwrap();
        let first = Builder::new()
            .write(PATH)
            .write(b"YT\n")
            .read(b"DO+1\n")
            .write(b"HAP0,1,0,3,0\n")
            .build();
        let second = Builder::new().write(PATH).write(b"HAP0,1,0,3,0\n").build();
        let mut channels = vec![channel(first), channel(second)];

        let mut session = Session::new(game, &deck, &mut channels, std::io::sink());
        session.start().await.unwrap();
        session.play_turn().await.unwrap();
        assert!(!session.is_terminated());
        assert_eq!(session.game().players()[0].site, 1);
        assert_eq!(session.game().players()[0].money, 10);
    }

    #[tokio::test]
    async fn test_illegal_move_ends_game_early() {
        let deck = Deck::parse("4ABCD").unwrap();
        let game = Game::new("3;::-Mo1::-", 2).unwrap();
        let first = Builder::new()
            .write(PATH)
            .write(b"YT\n")
            .read(b"DO9\n")
            .write(b"EARLY\n")
            .build();
        let second = Builder::new().write(PATH).write(b"EARLY\n").build();
        let mut channels = vec![channel(first), channel(second)];

        let mut session = Session::new(game, &deck, &mut channels, std::io::sink());
        session.start().await.unwrap();
        let before = session.game().clone();

        let err = session.play_turn().await.unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert!(session.is_terminated());
        assert_eq!(session.game(), &before);

        // Nothing further goes out once EARLY has been sent
        assert!(session.play_turn().await.is_err());
        assert!(session.finish().await.is_err());
        session.abort().await;
    }

    #[tokio::test]
    async fn test_unprompted_reply_ends_game_early() {
        let deck = Deck::parse("4ABCD").unwrap();
        let game = Game::new("3;::-Mo1::-", 2).unwrap();
        // Player 1 answers before player 0 has even been prompted
        let first = Builder::new().write(PATH).write(b"EARLY\n").build();
        let second = Builder::new()
            .write(PATH)
            .read(b"DO1\n")
            .write(b"EARLY\n")
            .build();
        let mut channels = vec![channel(first), channel(second)];

        let mut session = Session::new(game, &deck, &mut channels, std::io::sink());
        session.start().await.unwrap();
        let err = session.play_turn().await.unwrap_err();
        assert!(matches!(
            err,
            DealerError::Communication(CommsFault::Protocol {
                player: 1,
                source: ProtocolError::Unexpected(_),
            })
        ));
        assert!(session.is_terminated());
    }

    #[tokio::test]
    async fn test_leftover_reply_ends_game_early() {
        let deck = Deck::parse("4ABCD").unwrap();
        let game = Game::new("3;::-Mo1::-", 2).unwrap();
        // Player 0 sends a second move along with its first
        let first = Builder::new()
            .write(PATH)
            .write(b"YT\n")
            .read(b"DO1\nDO2\n")
            .write(b"HAP0,1,0,3,0\n")
            .write(b"EARLY\n")
            .build();
        let second = Builder::new()
            .write(PATH)
            .write(b"HAP0,1,0,3,0\n")
            .write(b"EARLY\n")
            .build();
        let mut channels = vec![channel(first), channel(second)];

        let mut session = Session::new(game, &deck, &mut channels, std::io::sink());
        session.start().await.unwrap();
        session.play_turn().await.unwrap();
        let err = session.play_turn().await.unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_malformed_and_closed_replies() {
        let deck = Deck::parse("4ABCD").unwrap();
        let replies: [&'static [u8]; 4] = [b"", b"\n", b"DO1 \n", b"HAP0,1,0,0,0\n"];

        for reply in replies {
            let game = Game::new("3;::-Mo1::-", 2).unwrap();
            let mut first = Builder::new();
            first.write(PATH).write(b"YT\n");
            if !reply.is_empty() {
                first.read(reply).write(b"EARLY\n");
            }
            let second = Builder::new().write(PATH).write(b"EARLY\n").build();
            let mut channels = vec![channel(first.build()), channel(second)];

            let mut session = Session::new(game, &deck, &mut channels, std::io::sink());
            session.start().await.unwrap();

            let err = session.play_turn().await.unwrap_err();
            assert!(matches!(err, DealerError::Communication(_)), "{reply:?}");
        }
    }
}
