//! Line-based wire protocol between the dealer and its players.
//!
//! Every message is one line of text terminated by `\n`:
//!
//! | Line | Sender | Meaning |
//! |---|---|---|
//! | `YT` | dealer | your turn |
//! | `DO<site>` | player | move to `site` |
//! | `HAP<p>,<s>,<pts>,<money>,<card>` | dealer | player `p` moved |
//! | `EARLY` | dealer | game ended abnormally |
//! | `DONE` | dealer | game over |
//!
//! Decoding is strict. Numbers are an optional `-` followed by ASCII digits
//! and nothing else is tolerated, not even trailing whitespace.

use crate::engine::{MoveError, UpdateError};
use std::fmt;
use thiserror::Error;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const YOUR_TURN: &str = "YT";
const MOVE_PREFIX: &str = "DO";
const UPDATE_PREFIX: &str = "HAP";
const EARLY: &str = "EARLY";
const DONE: &str = "DONE";
const UPDATE_FIELDS: usize = 5;

/// A state-update exactly as it appears on the wire. Nothing about it has been
/// checked against a game yet; see [`crate::Game::validate_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateUpdate {
    pub player: i64,
    pub site: i64,
    pub points: i64,
    pub money: i64,
    pub card: i64,
}

impl fmt::Display for StateUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{UPDATE_PREFIX}{},{},{},{},{}",
            self.player, self.site, self.points, self.money, self.card
        )
    }
}

/// A decoded protocol line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    YourTurn,
    Move { site: i64 },
    Update(StateUpdate),
    Early,
    Done,
}

impl Message {
    /// Decodes one line, without its terminating newline.
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        let malformed = || ProtocolError::Malformed(line.to_string());

        match line {
            YOUR_TURN => return Ok(Message::YourTurn),
            EARLY => return Ok(Message::Early),
            DONE => return Ok(Message::Done),
            _ => {}
        }

        if let Some(site) = line.strip_prefix(MOVE_PREFIX) {
            let site = parse_int(site).ok_or_else(malformed)?;
            return Ok(Message::Move { site });
        }

        if let Some(fields) = line.strip_prefix(UPDATE_PREFIX) {
            let values = fields
                .split(',')
                .map(parse_int)
                .collect::<Option<Vec<_>>>()
                .filter(|values| values.len() == UPDATE_FIELDS)
                .ok_or_else(malformed)?;
            return Ok(Message::Update(StateUpdate {
                player: values[0],
                site: values[1],
                points: values[2],
                money: values[3],
                card: values[4],
            }));
        }

        Err(malformed())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::YourTurn => f.write_str(YOUR_TURN),
            Message::Move { site } => write!(f, "{MOVE_PREFIX}{site}"),
            Message::Update(update) => fmt::Display::fmt(update, f),
            Message::Early => f.write_str(EARLY),
            Message::Done => f.write_str(DONE),
        }
    }
}

/// Protocol violations seen by either side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed message {0:?}")]
    Malformed(String),
    #[error("illegal move: {0}")]
    IllegalMove(#[from] MoveError),
    #[error("illegal state-update: {0}")]
    IllegalUpdate(#[from] UpdateError),
    #[error("unexpected message {0}")]
    Unexpected(String),
}

/// An optional sign then one or more ASCII digits, fitting in an `i64`.
pub fn parse_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// One line read from a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadLine {
    pub text: String,
    /// Whether the line ended with `\n` rather than end-of-stream.
    pub terminated: bool,
}

impl ReadLine {
    /// Both roles treat an empty line like a closed stream.
    pub fn is_eof(&self) -> bool {
        self.text.is_empty()
    }
}

/// Reads up to and including the next `\n`, or to end-of-stream.
pub async fn read_line<R>(reader: &mut R) -> io::Result<ReadLine>
where
    R: AsyncBufRead + Unpin,
{
    let mut buffer = Vec::new();
    reader.read_until(b'\n', &mut buffer).await?;
    let terminated = buffer.last() == Some(&b'\n');
    if terminated {
        buffer.pop();
    }
    Ok(ReadLine {
        text: String::from_utf8_lossy(&buffer).into_owned(),
        terminated,
    })
}

/// Writes `message` followed by a newline and flushes.
pub async fn send<W, M>(writer: &mut W, message: &M) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    M: fmt::Display + ?Sized,
{
    let line = format!("{message}\n");
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
