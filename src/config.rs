// Configuration: command-line flags, environment overrides and logging
// setup. Only the data file location and verbosity are configurable.

use crate::store::DEFAULT_DATA_FILE;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Store meals by category and get a random recommendation.
#[derive(Parser, Debug, Clone)]
#[command(name = "mealrec", version, long_about = None)]
pub struct Config {
    /// Meal file to load and save
    #[arg(short, long, env = "MEALREC_FILE", default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Log level used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Install the global `tracing` subscriber. Logs go to stderr so they
    /// never interleave with command output on stdout.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
