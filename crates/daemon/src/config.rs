use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use snapfind_runtime::{DEFAULT_HOST, DEFAULT_PORT, default_settings_path};

/// Flags shared by the `snapfindd` binary and the `snapfind run` subcommand.
#[derive(Debug, Parser, Clone)]
#[command(name = "snapfindd", about = "snapfind basename search daemon")]
pub struct Cli {
    /// Host to listen on.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    pub port: Option<u16>,

    /// Path to the settings file.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Run with the on-disk basename cache disabled and a throwaway
    /// settings store, for exercising the daemon without touching the
    /// user's real state.
    #[arg(long)]
    pub test: bool,

    /// Enable trace-level logging, overriding `-v`/`--verbose`.
    #[arg(long)]
    pub trace: bool,

    /// Increase log verbosity. Repeatable.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub host: String,
    pub port: u16,
    pub settings_path: PathBuf,
    pub test_mode: bool,
    pub verbose: u8,
    pub trace: bool,
}

impl DaemonConfig {
    pub fn from_args(args: &Cli) -> Result<Self> {
        Ok(Self {
            host: args.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.unwrap_or(DEFAULT_PORT),
            settings_path: args.settings.clone().unwrap_or_else(default_settings_path),
            test_mode: args.test,
            verbose: args.verbose,
            trace: args.trace,
        })
    }

    pub fn from_env() -> Result<Self> {
        let args = Cli::parse();
        Self::from_args(&args)
    }
}
