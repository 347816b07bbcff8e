//! Output management and formatting.

use std::{
    io::{self, IsTerminal},
    time::Duration,
};

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Command payload (listing rows, slugs, paths). Printed even in quiet
    /// mode, since it is the thing the user asked for.
    pub fn data(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(msg)
    }

    /// Pretty-printed JSON document on stdout.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&rendered)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Dimmed secondary text, used for labels and counters.
    pub fn muted(&self, text: &str) -> String {
        if self.no_color {
            text.to_owned()
        } else {
            text.dimmed().to_string()
        }
    }

    /// Clear the screen between watch refreshes. No-op when not on a TTY.
    pub fn clear(&self) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Human && self.term.is_term() {
            self.term.clear_screen()?;
        }
        Ok(())
    }

    /// Spinner for a remote round trip. Only shown for human output, so
    /// piped and JSON output stay clean.
    pub fn spinner(&self, msg: &str) -> Option<ProgressBar> {
        if self.quiet || self.resolved_format != OutputFormat::Human {
            return None;
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

/// Stop a spinner started by [`OutputManager::spinner`].
pub fn finish(spinner: Option<ProgressBar>) {
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
}

/// Pad or truncate `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text:<width$}")
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('\u{2026}'); // …
        cut
    }
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::AppConfig;

    fn make_manager(quiet: bool, no_color: bool, output_format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            demo: false,
            output_format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.is_quiet());
    }

    #[test]
    fn error_not_suppressed_in_quiet_mode() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn plain_output_never_colors() {
        let out = make_manager(false, false, OutputFormat::Plain);
        assert!(!out.supports_color());
        assert_eq!(out.muted("label"), "label");
    }

    #[test]
    fn human_output_honours_no_color() {
        assert!(make_manager(false, false, OutputFormat::Human).supports_color());
        assert!(!make_manager(false, true, OutputFormat::Human).supports_color());
    }

    #[test]
    fn spinner_only_for_human_output() {
        assert!(make_manager(false, true, OutputFormat::Plain).spinner("x").is_none());
        assert!(make_manager(false, true, OutputFormat::Json).spinner("x").is_none());
        assert!(make_manager(true, true, OutputFormat::Human).spinner("x").is_none());

        let bar = make_manager(false, true, OutputFormat::Human).spinner("loading");
        assert!(bar.is_some());
        finish(bar);
    }

    #[test]
    fn format_accessor_returns_resolved() {
        let out = make_manager(false, false, OutputFormat::Json);
        assert_eq!(out.format(), OutputFormat::Json);
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc\u{2026}");
        assert_eq!(fit("", 0), "");
    }

    #[test]
    fn csv_fields_are_quoted_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
