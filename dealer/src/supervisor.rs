//! Player process management.
//!
//! The [`Supervisor`] owns every spawned player together with both ends of
//! its pipes. Players are started one at a time and must answer with the
//! handshake byte before the next one is launched. If anything goes wrong
//! part way, every player started so far is killed and reaped.

use crate::error::{DealerError, StartFault};
use log::{debug, info, warn};
use shared::{PlayerId, HANDSHAKE};
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// The two pipe ends the dealer uses to talk to one player.
#[derive(Debug)]
pub struct Channel<R, W> {
    pub reader: R,
    pub writer: W,
}

pub type PlayerChannel = Channel<BufReader<ChildStdout>, ChildStdin>;

#[derive(Debug, Default)]
pub struct Supervisor {
    children: Vec<Child>,
    channels: Vec<PlayerChannel>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches every program in seat order as `<program> <count> <id>`.
    pub async fn start(&mut self, programs: &[String]) -> Result<(), DealerError> {
        for (player, program) in programs.iter().enumerate() {
            if let Err(source) = self.launch(player, programs.len(), program).await {
                warn!("player {} ({}) failed to start: {}", player, program, source);
                self.terminate_all().await;
                return Err(DealerError::Start { player, source });
            }
        }
        info!("all {} players started", programs.len());
        Ok(())
    }

    async fn launch(&mut self, player: PlayerId, count: usize, program: &str) -> Result<(), StartFault> {
        let mut child = Command::new(program)
            .arg(count.to_string())
            .arg(player.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| StartFault::Spawn {
                program: program.to_string(),
                source,
            })?;
        debug!("spawned player {} as pid {:?}", player, child.id());

        let pipes = (child.stdin.take(), child.stdout.take());
        self.children.push(child);
        let (Some(writer), Some(stdout)) = pipes else {
            return Err(StartFault::Pipes);
        };

        let mut reader = BufReader::new(stdout);
        await_handshake(&mut reader)
            .await
            .map_err(StartFault::Handshake)?;
        debug!("player {} is ready", player);

        self.channels.push(Channel { reader, writer });
        Ok(())
    }

    /// Pipes to every started player, in seat order.
    pub fn channels_mut(&mut self) -> &mut [PlayerChannel] {
        &mut self.channels
    }

    pub fn player_count(&self) -> usize {
        self.children.len()
    }

    /// Kills and reaps every player. Safe to call more than once.
    pub async fn terminate_all(&mut self) {
        self.channels.clear();
        for mut child in self.children.drain(..) {
            if let Err(e) = child.start_kill() {
                debug!("kill failed, player probably already exited: {}", e);
            }
            match child.wait().await {
                Ok(status) => debug!("reaped player: {}", status),
                Err(e) => warn!("failed to reap player: {}", e),
            }
        }
    }

    /// Closes every pipe and waits for the players to exit on their own.
    pub async fn shutdown(&mut self) {
        self.channels.clear();
        for mut child in self.children.drain(..) {
            match child.wait().await {
                Ok(status) => debug!("player exited: {}", status),
                Err(e) => warn!("failed to wait for player: {}", e),
            }
        }
    }
}

/// Reads the single handshake byte a player sends once it is ready.
pub async fn await_handshake<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let byte = reader.read_u8().await?;
    if byte == HANDSHAKE {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected handshake, got byte {byte:#04x}"),
        ))
    }
}
