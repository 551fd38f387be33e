//! CLI argument definitions shared by every client
//!
//! Downstream binaries flatten [`GlobalArgs`] into their top-level parser and
//! [`AuthArgs`] into each subcommand that talks to the server.

use clap::{ArgAction, Args};
use std::path::PathBuf;

/// Environment variable consulted when `--config` is not given
pub const CONFIG_ENV: &str = "ATS_CLIENT_CONFIG";

/// Options every client accepts
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file
    #[arg(long, env = CONFIG_ENV, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print request details
    #[arg(long, global = true)]
    pub debug_requests: bool,

    /// Increase verbosity (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Options for commands that can act on behalf of another user
#[derive(Debug, Clone, Default, Args)]
pub struct AuthArgs {
    /// userid to impersonate
    #[arg(long = "as-user", value_name = "USER_ID")]
    pub as_user: Option<String>,
}
