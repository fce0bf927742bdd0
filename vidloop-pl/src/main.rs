//! Playlist controller (vidloop-pl) - Main entry point
//!
//! Loads the movie list from the TOML config, then runs the control loop.
//! Commands are read line by line from stdin, one per line:
//! `next`, `played`, `seek <n>`, `goto <n>`, `clear`, `quit`, or any
//! movie name, `+n`/`-n` offset or button keyword.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidloop_common::config::{load_config, ConfigResolver};
use vidloop_pl::control::{Command, ControlLoop, PlaybackOptions};
use vidloop_pl::playlist::{EntropyRandom, FileResumeStore, Movie, Sequencer};

/// Command-line arguments for vidloop-pl
#[derive(Parser, Debug)]
#[command(name = "vidloop-pl")]
#[command(about = "Playlist controller for a looping video player")]
#[command(version)]
struct Args {
    /// Config file (otherwise VIDLOOP_CONFIG, then the platform config dirs)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pick movies at random
    #[arg(long, env = "VIDLOOP_RANDOM")]
    random: bool,

    /// Resume the sequential position across restarts
    #[arg(long, env = "VIDLOOP_RESUME")]
    resume: bool,

    /// Resume record location
    #[arg(long, env = "VIDLOOP_RESUME_FILE")]
    resume_file: Option<PathBuf>,

    /// Simulated playback length per movie, in seconds
    #[arg(long, env = "VIDLOOP_PLAY_SECONDS")]
    play_seconds: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = ConfigResolver::new(args.config.clone()).resolve();
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing
    let level = config.logging.level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("vidloop_pl={level},vidloop_common={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting vidloop playlist controller v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Config: {}", path.display()),
        None => warn!("No config file found, using defaults"),
    }

    let options = PlaybackOptions {
        random: args.random || config.playlist.random,
        resume: args.resume || config.playlist.resume,
        play_duration: Duration::from_secs(
            args.play_seconds
                .unwrap_or(config.playlist.play_seconds)
                .max(1),
        ),
    };
    let resume_file = args
        .resume_file
        .unwrap_or_else(|| config.playlist.resume_file.clone());
    info!(
        random = options.random,
        resume = options.resume,
        resume_file = %resume_file.display(),
        "Playback options"
    );

    let movies: Vec<Movie> = config.movies.iter().map(Movie::from).collect();
    let sequencer = Sequencer::new(movies)
        .with_resume_store(FileResumeStore::new(resume_file))
        .with_random(EntropyRandom::new());

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(read_commands(tx));

    let control = ControlLoop::new(sequencer, options);
    tokio::select! {
        _ = control.run(rx) => {}
        _ = shutdown_signal() => {}
    }

    info!("Shutdown complete");
    Ok(())
}

/// Forward stdin lines to the control loop until EOF or the loop exits
async fn read_commands(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(command) = Command::parse(&line) else {
                    continue;
                };
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read failed: {}", e);
                break;
            }
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
