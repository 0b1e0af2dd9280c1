// CLI argument parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{
    API_URL_ENV_VAR, DEFAULT_API_URL, DEFAULT_SESSION_FILENAME, DEFAULT_TIMEOUT_SECS,
    SESSION_FILE_ENV_VAR,
};

#[derive(Parser, Debug)]
#[command(name = "eero", version)]
#[command(about = "Unofficial CLI application to interact with Eero devices.")]
pub struct Cli {
    /// Load/Save session from FILE
    #[arg(
        short = 's',
        long,
        value_name = "FILE",
        env = SESSION_FILE_ENV_VAR,
        default_value = DEFAULT_SESSION_FILENAME
    )]
    pub session_file: PathBuf,

    /// Base URL of the eero API
    #[arg(long, value_name = "URL", env = API_URL_ENV_VAR, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Authenticate with Eero platform
    Auth,

    /// Show account information
    Account,

    /// Get a list of devices
    Devices {
        /// Report networks that fail instead of aborting on the first one
        #[arg(long)]
        keep_going: bool,
    },

    /// Get a list of networks
    Networks,

    /// Print session token if it exists
    Session,
}

impl Commands {
    /// Whether the command needs a stored session before it can run.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Commands::Auth)
    }
}

impl Cli {
    /// Default tracing directive for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "eero_cli=info",
            2 => "eero_cli=debug",
            _ => "eero_cli=trace",
        }
    }
}
