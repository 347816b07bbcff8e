//! # Template Hub CLI
//!
//! Browse, inspect and publish video-editing templates.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (file + env + defaults).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                          |
//! |------|----------------------------------|
//! |  0   | Success                          |
//! |  1   | Remote, internal or system error |
//! |  2   | User / input error               |
//! |  3   | Template not found               |
//! |  4   | Configuration error              |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod terminal;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything else, including tracing init.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too.
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) if cli.global.demo => cfg.without_remote(),
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            return handle_error(
                CliError::ConfigError {
                    message: format!("{e:#}"),
                    source: None,
                },
                cli.global.verbose > 0,
            );
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, output).await {
        Ok(()) => {
            info!("tphub completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
async fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::List(cmd) => commands::list::execute(cmd, cli.global, config, output).await,
        Commands::Show(cmd) => commands::show::execute(cmd, cli.global, config, output).await,
        Commands::Publish(cmd) => {
            commands::publish::execute(cmd, cli.global, config, output).await
        }
        Commands::Slug(cmd) => commands::slug::execute(cmd, output),
        Commands::Init(cmd) => commands::init::execute(cmd, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // Written to stderr so it shows even when stdout is redirected.
    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
