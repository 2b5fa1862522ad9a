//! CLI command definitions and dispatch for the `orbot` binary.
//!
//! Uses clap derive macros. The webhook server runs under `orbot serve`;
//! `orbot counter ...` gives operators direct access to the claim counters.

pub mod counter;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Ration orb claims on your game server from chat.
#[derive(Parser)]
#[command(name = "orbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory (defaults to $ORBOT_DATA_DIR or ~/.orbot).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook server.
    Serve {
        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Password for the game server's RCON listener.
        #[arg(long, env = "ORBOT_RCON_PASSWORD", hide_env_values = true)]
        rcon_password: String,

        /// Shared secret the platform signs webhook deliveries with.
        #[arg(long, env = "ORBOT_WEBHOOK_SECRET", hide_env_values = true)]
        webhook_secret: String,
    },

    /// Inspect or edit the claim counters directly.
    Counter {
        #[command(subcommand)]
        action: counter::CounterCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
