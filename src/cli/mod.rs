//! CLI argument definitions.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_CONFIG_FILE, default_assets_dir};
use crate::logging::LogFormat;

/// stroomer - Stream Deck keys that send SNMP commands.
#[derive(Parser, Debug)]
#[command(name = "stroomer", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file
    #[arg(
        long,
        short = 'c',
        global = true,
        env = "STROOMER_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Directory holding icons and the label font [default: Assets beside the config file]
    #[arg(long, global = true, env = "STROOMER_ASSETS")]
    pub assets: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, default_value = "text", env = "STROOMER_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Assets directory, explicit or derived from the config path.
    pub fn assets_dir(&self) -> PathBuf {
        self.assets
            .clone()
            .unwrap_or_else(|| default_assets_dir(&self.config))
    }

    pub fn config_path(&self) -> &Path {
        &self.config
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive all attached decks until an exit key is pressed (default)
    Run,

    /// Load the configuration and show devices, buttons and problems
    Check(CheckArgs),

    /// List attached Stream Deck devices
    List(ListArgs),

    /// Show version and build information
    Version,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
