// SPDX-License-Identifier: MIT OR Apache-2.0
//! `pancam` - headless presentation player
//!
//! Loads a presentation and a tuning config, then drives the playback
//! engine from line commands on stdin:
//! - Raw input (`key`, `down`, `move`, `up`, `wheel`, `menu`) goes through
//!   the gesture controller
//! - Navigation and playback commands go straight to the player
//!
//! Local changes are written to stdout as JSON lines for a mirroring
//! console. Logs go to stderr.
//!
//! ```text
//! pancam <presentation.ron> [--config <file>] [--frame <ref>] [--edit]
//! ```

mod command;
mod config;
mod host;

use command::Command;
use config::AppConfig;
use host::Host;
use pancam_viewport::{FrameRef, Presentation};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: pancam <presentation.ron> [--config <file>] [--frame <ref>] [--edit]";

/// Startup errors
#[derive(Debug, Error)]
enum AppError {
    #[error("{0}\n{USAGE}")]
    Args(#[from] pico_args::Error),

    #[error("{USAGE}")]
    Usage,

    #[error("Config: {0}")]
    Config(#[from] pancam_player::ConfigError),

    #[error("Presentation: {0}")]
    Presentation(#[from] pancam_viewport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mirror output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Command line arguments
#[derive(Debug)]
struct Args {
    presentation: PathBuf,
    config: Option<PathBuf>,
    frame: Option<String>,
    edit: bool,
}

impl Args {
    fn parse(mut args: pico_args::Arguments) -> Result<Self, AppError> {
        if args.contains(["-h", "--help"]) {
            return Err(AppError::Usage);
        }
        let config = args.opt_value_from_str("--config")?;
        let frame = args.opt_value_from_str("--frame")?;
        let edit = args.contains("--edit");
        let presentation = args
            .finish()
            .into_iter()
            .next()
            .map(PathBuf::from)
            .ok_or(AppError::Usage)?;

        Ok(Self {
            presentation,
            config,
            frame,
            edit,
        })
    }
}

fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Forward stdin lines to the engine loop
async fn read_commands(tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Reading stdin failed: {e}");
                break;
            }
        }
    }
}

async fn run(args: Args, config: AppConfig) -> Result<(), AppError> {
    let source = tokio::fs::read_to_string(&args.presentation).await?;
    let presentation = Arc::new(Presentation::from_ron_str(&source)?);
    tracing::info!(
        "Loaded \"{}\": {} frames, {} layers",
        presentation.title,
        presentation.len(),
        presentation.layers.len()
    );

    let start_frame = args
        .frame
        .as_deref()
        .or(presentation.initial_frame.as_deref())
        .and_then(FrameRef::from_fragment);

    let mut host = Host::new(Arc::clone(&presentation), &config, args.edit);
    let origin = Instant::now();
    host.start(start_frame, origin.elapsed())?;

    let (tx, mut rx) = mpsc::channel(64);
    tokio::spawn(read_commands(tx));

    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            _ = ticker.tick() => host.tick(origin.elapsed()),
            line = rx.recv() => {
                let Some(line) = line else {
                    tracing::info!("Input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if host.apply(command, origin.elapsed()).is_break() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("{e}"),
                }
            }
        }

        for change in host.drain_changes() {
            let mut json = change.to_json()?;
            json.push('\n');
            stdout.write_all(json.as_bytes()).await?;
        }
        stdout.flush().await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = match Args::parse(pico_args::Arguments::from_env()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let config = match &args.config {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&AppConfig::default());
            tracing::error!("{}", AppError::from(e));
            std::process::exit(1);
        }
    };
    init_tracing(&config);
    tracing::info!("Starting pancam v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args, config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
