//! Tracing subscriber setup for the `tphub` binary.
//!
//! Core and adapters only emit events; this is the single place a subscriber
//! is installed. `RUST_LOG` replaces the flag-derived filter entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

/// Crates whose events reach the terminal without `RUST_LOG`.
const TARGETS: [&str; 3] = ["tphub", "tphub_core", "tphub_adapters"];

/// Install the global subscriber. Call once, before any event fires.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(derive_level(args))));

    let json = args.output_format == OutputFormat::Json;
    let ansi = !args.no_color && std::io::stderr().is_terminal();

    // Exactly one of the two layers is present.
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// `quiet` wins over any `-v` count.
fn derive_level(args: &GlobalArgs) -> &'static str {
    match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}

fn directives(level: &str) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            demo: false,
            output_format: OutputFormat::Plain,
        }
    }

    #[test]
    fn verbosity_ladder() {
        let levels: Vec<_> = (0..=4).map(|v| derive_level(&args(v, false))).collect();
        assert_eq!(levels, ["warn", "info", "debug", "trace", "trace"]);
    }

    #[test]
    fn quiet_only_shows_errors() {
        assert_eq!(derive_level(&args(0, true)), "error");
        assert_eq!(derive_level(&args(2, true)), "error");
    }

    #[test]
    fn every_workspace_crate_gets_a_directive() {
        assert_eq!(
            directives("debug"),
            "tphub=debug,tphub_core=debug,tphub_adapters=debug"
        );
    }
}
