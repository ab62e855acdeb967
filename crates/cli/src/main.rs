mod client;

use clap::{Parser, Subcommand};
use client::{DaemonClient, expect_json};
use log::error;
use snapfind_daemon::DaemonConfig;
use snapfind_protocol::{IndexStatusResponse, StatusOk};
use snapfind_runtime::logging;

#[derive(Debug, Parser)]
#[command(name = "snapfind", about = "fuzzy basename file search")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Host to connect to or listen on.
    #[arg(long)]
    host: Option<String>,

    /// Port to connect to or listen on.
    #[arg(long)]
    port: Option<u16>,

    /// Path to the settings file.
    #[arg(long)]
    settings: Option<std::path::PathBuf>,

    /// Run with the on-disk basename cache disabled and a throwaway
    /// settings store.
    #[arg(long)]
    test: bool,

    /// Enable trace-level logging, overriding `-v`/`--verbose`.
    #[arg(long)]
    trace: bool,

    /// Increase log verbosity. Repeatable.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn daemon_cli(&self) -> snapfind_daemon::Cli {
        snapfind_daemon::Cli {
            host: self.host.clone(),
            port: self.port,
            settings: self.settings.clone(),
            test: self.test,
            trace: self.trace,
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the daemon in the foreground (default if no subcommand given).
    Run,
    /// Report whether the daemon is reachable and what it's indexed.
    Status,
    /// Ask a running daemon to exit.
    Stop,
    /// Stop the current daemon, if any, then start a fresh one.
    Restart,
    /// Print usage.
    Help,
}

fn main() {
    let args = Args::parse();
    let daemon_cli = args.daemon_cli();
    let command = args.command.unwrap_or(Command::Run);

    let code = match run(command, daemon_cli) {
        Ok(()) => 0,
        Err(e) => {
            error!("{e:#}");
            eprintln!("snapfind: {e:#}");
            255
        }
    };
    std::process::exit(code);
}

fn run(command: Command, daemon_args: snapfind_daemon::Cli) -> anyhow::Result<()> {
    let config = DaemonConfig::from_args(&daemon_args)?;
    logging::init_with_verbosity(config.verbose, config.trace).ok();

    match command {
        Command::Run => snapfind_daemon::serve(config),
        Command::Status => cmd_status(&config),
        Command::Stop => cmd_stop(&config),
        Command::Restart => cmd_restart(config),
        Command::Help => {
            use clap::CommandFactory;
            Args::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn client_for(config: &DaemonConfig) -> DaemonClient {
    DaemonClient::new(config.host.clone(), config.port)
}

fn cmd_status(config: &DaemonConfig) -> anyhow::Result<()> {
    let client = client_for(config);
    let resp = client.get("/status")?;
    let status: IndexStatusResponse = expect_json(&resp)?;
    println!(
        "status={:?} has_index={} is_up_to_date={} dirs={}/{} entries={}",
        status.status, status.has_index, status.is_up_to_date, status.ready_dir_count, status.dir_count, status.total_entries
    );
    Ok(())
}

fn cmd_stop(config: &DaemonConfig) -> anyhow::Result<()> {
    let client = client_for(config);
    let resp = client.post_empty("/exit")?;
    let _: StatusOk = expect_json(&resp)?;
    println!("snapfindd stopped");
    Ok(())
}

fn cmd_restart(config: DaemonConfig) -> anyhow::Result<()> {
    let client = client_for(&config);
    match client.post_empty("/exit") {
        Ok(resp) => {
            let _: anyhow::Result<StatusOk> = expect_json(&resp);
        }
        Err(e) => {
            log::debug!("no daemon was running to stop ({e}); starting fresh");
        }
    }
    // Give the old listener a moment to release the port before rebinding.
    std::thread::sleep(std::time::Duration::from_millis(200));
    snapfind_daemon::serve(config)
}
