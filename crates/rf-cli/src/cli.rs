//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fleet refill log.
///
/// Reconstructs refill events per vehicle from fluid-level sensor readings,
/// odometer readings and drivers' refill notes, and estimates tank capacity
/// and consumption over a time window.
#[derive(Debug, Parser)]
#[command(name = "rf", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconstruct refill events and consumption per vehicle.
    Report {
        /// Fleet snapshot (JSON with devices, sensor and odometer readings).
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// Include vehicles without refill activity.
        #[arg(long)]
        all: bool,
    },

    /// Show the latest fluid level of every vehicle.
    Levels {
        /// Fleet snapshot (JSON with devices, sensor and odometer readings).
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show the refill claims found in an annotation text.
    Claims {
        /// The annotation text, e.g. "[01/03 -> 20 L]".
        #[arg(long)]
        text: String,

        #[command(flatten)]
        window: WindowArgs,
    },
}

/// Time window bounds shared by subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct WindowArgs {
    /// Window start: ISO 8601, YYYY-MM-DD, or relative (e.g. '30 days ago').
    #[arg(long)]
    pub from: Option<String>,

    /// Window end: ISO 8601, YYYY-MM-DD, or relative. Defaults to now.
    #[arg(long)]
    pub to: Option<String>,
}
