//! autovars CLI
//!
//! Resolves an inventory document and its `group_vars` chain and prints the
//! result.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use context::RunContext;
use error::{CliError, Result};

/// Environment variable holding the log filter when not verbose.
const LOG_ENV: &str = "AUTOVARS_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Some(cmd) => {
            let cwd = std::env::current_dir()?;
            let ctx = RunContext::from_args(&cli.resolver, &cwd)?;
            execute_command(&ctx, cmd)
        }
        None => {
            // No command provided - show help hint
            println!("{} inventory variable resolver", "autovars".green().bold());
            println!();
            println!("Run {} for available commands.", "autovars --help".cyan());
            Ok(())
        }
    }
}

/// Logs go to stderr so command output stays machine-readable.
fn init_tracing(verbose: bool) -> Result<()> {
    let installed = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    installed.map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn execute_command(ctx: &RunContext<autovars_fs::OsFileSource>, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List { inventory, yaml } => {
            let loaded = ctx.load(&ctx.locate(&inventory)?)?;
            commands::run_list(&loaded, yaml)
        }
        Commands::Host { inventory, host } => {
            let loaded = ctx.load(&ctx.locate(&inventory)?)?;
            commands::run_host(&loaded, &host)
        }
        Commands::Graph { inventory } => {
            let loaded = ctx.load(&ctx.locate(&inventory)?)?;
            commands::run_graph(&loaded)
        }
        Commands::Explain { inventory, json } => {
            let loaded = ctx.load(&ctx.locate(&inventory)?)?;
            commands::run_explain(&loaded, json)
        }
    }
}
