//! Process-wide logging setup
//!
//! Logging goes through the `log` facade and is printed by `env_logger` on
//! stderr. The HTTP transport is noisy at info level, so it is held at `warn`
//! unless request debugging is asked for. A non-empty `RUST_LOG` replaces the
//! command-line levels entirely, transport filters included.

use crate::cli::args::GlobalArgs;
use log::{LevelFilter, SetLoggerError};
use std::env;

/// Modules whose output `--debug-requests` turns on
const TRANSPORT_MODULES: &[&str] = &["reqwest", "hyper"];

/// Level for the client's own messages
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Level for the HTTP transport crates
pub fn transport_level(debug_requests: bool) -> LevelFilter {
    if debug_requests {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    }
}

/// Logger builder for the given flags, or for `env_filter` when one is set.
fn builder(verbose: u8, quiet: bool, debug_requests: bool, env_filter: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    match env_filter {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None => {
            builder.filter_level(level_for(verbose, quiet));
            for module in TRANSPORT_MODULES {
                builder.filter_module(module, transport_level(debug_requests));
            }
        }
    }
    builder
}

/// Install the logger. Only the first call in a process has any effect.
pub fn init(verbose: u8, quiet: bool, debug_requests: bool) -> Result<(), SetLoggerError> {
    let env_filter = env::var(env_logger::DEFAULT_FILTER_ENV)
        .ok()
        .filter(|filters| !filters.trim().is_empty());
    builder(verbose, quiet, debug_requests, env_filter.as_deref()).try_init()
}

/// Install the logger from the global CLI options
pub fn init_from_args(args: &GlobalArgs) -> Result<(), SetLoggerError> {
    init(args.verbose, args.quiet, args.debug_requests)
}
