//! # pushmod
//!
//! Run push payloads through the bridge from a terminal, calling the same
//! exported functions the notification extension calls.
//!
//! ## Commands
//!
//! - `modify`: Build a handle from a payload, read it back, destroy it
//! - `check-config`: Validate a bridge config file
//!
//! ## Example
//!
//! ```bash
//! # Flat payload from flags
//! pushmod modify --title "Hello" --body "World"
//!
//! # APNs payload from a file, with truncation settings
//! pushmod modify --payload push.json --config pushmod.toml
//!
//! # Check a config before shipping it
//! pushmod check-config pushmod.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use push_bridge::BridgeConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{check_config, modify};

/// Run push payloads through the pushmod bridge.
#[derive(Parser, Debug)]
#[command(name = "pushmod")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log bridge activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Modify a notification and print the resulting title and body as JSON
    Modify {
        /// JSON payload file (or use --title/--body)
        #[arg(long, short, conflicts_with_all = ["title", "body"])]
        payload: Option<PathBuf>,

        /// Notification title
        #[arg(long)]
        title: Option<String>,

        /// Notification body
        #[arg(long)]
        body: Option<String>,

        /// Bridge config file (defaults to $PUSHMOD_CONFIG)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Validate a config file and print the effective settings
    CheckConfig {
        /// Config file to check
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Modify {
            payload,
            title,
            body,
            config,
        } => {
            let data = match payload {
                Some(path) => std::fs::read(&path)
                    .with_context(|| format!("Failed to read payload {}", path.display()))?,
                None => modify::flat_payload(title, body)?,
            };
            let config = match config {
                Some(path) => BridgeConfig::from_file(&path)?,
                None => BridgeConfig::from_env()?,
            };
            modify::run(&data, config)?;
        }
        Commands::CheckConfig { path } => {
            check_config::run(&path)?;
        }
    }

    Ok(())
}

/// Stderr logging; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "pushmod=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
