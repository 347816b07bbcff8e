//! Flags shared by every `tphub` subcommand.

use std::path::PathBuf;

use clap::{Args, builder::FalseyValueParser};

/// Global arguments, flattened into [`super::Cli`].
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log verbosity: `-v` requests and refreshes, `-vv` queries and decoded
    /// rows, `-vvv` everything.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print results and errors"
    )]
    pub quiet: bool,

    /// Honours `NO_COLOR` (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read configuration from FILE instead of the default location"
    )]
    pub config: Option<PathBuf>,

    /// Ignore `remote.url` and browse the built-in sample catalog.
    #[arg(
        long = "demo",
        global = true,
        env = "TPHUB_DEMO",
        value_parser = FalseyValueParser::new(),
        help = "Use the built-in sample catalog instead of the remote service"
    )]
    pub demo: bool,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Presentation of messages and logs"
    )]
    pub output_format: OutputFormat,
}

/// How messages and logs are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` when piped.
    #[default]
    Auto,
    /// Colors, spinners and screen refreshes.
    Human,
    /// No ANSI codes, no spinners.
    Plain,
    /// JSON payloads and JSON log lines.
    Json,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        global: GlobalArgs,
    }

    #[test]
    fn boolean_env_vars_accept_conventional_values() {
        // SAFETY: only this test reads these variables.
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("TPHUB_DEMO", "yes");
        }
        let parsed = Harness::try_parse_from(["tphub"]);
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::remove_var("TPHUB_DEMO");
        }

        let global = parsed.unwrap().global;
        assert!(global.no_color);
        assert!(global.demo);
    }

    #[test]
    fn flags_work_without_env() {
        let global = Harness::try_parse_from(["tphub", "--no-color", "--demo"])
            .unwrap()
            .global;
        assert!(global.no_color);
        assert!(global.demo);
    }
}
