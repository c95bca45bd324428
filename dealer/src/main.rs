use dealer::{Config, DealerError, Session, Supervisor};
use log::{error, info};
use std::process;
use tokio::signal::unix::{signal, SignalKind};

/// Runs the dealer and exits with its status code.
#[tokio::main]
async fn main() {
    env_logger::init();

    let code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            if !e.is_silent() {
                error!("dealer failed: {:?}", e);
                eprintln!("{}", e);
            }
            e.exit_code()
        }
    };
    process::exit(code);
}

async fn run() -> Result<(), DealerError> {
    let config = Config::from_args(std::env::args_os()).await?;

    let mut hangup = signal(SignalKind::hangup()).map_err(DealerError::Signal)?;
    let mut supervisor = Supervisor::new();

    let outcome = tokio::select! {
        result = play(config, &mut supervisor) => result,
        _ = hangup.recv() => Err(DealerError::Hangup),
    };

    match &outcome {
        Ok(()) => supervisor.shutdown().await,
        Err(e) => {
            info!("stopping all players: {}", e);
            supervisor.terminate_all().await;
        }
    }
    outcome
}

async fn play(config: Config, supervisor: &mut Supervisor) -> Result<(), DealerError> {
    supervisor.start(&config.programs).await?;

    let stdout = std::io::stdout();
    let mut session = Session::new(config.game, &config.deck, supervisor.channels_mut(), stdout.lock());
    session.run().await?;
    Ok(())
}
