//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "tphub",
    bin_name = "tphub",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f3ac} Browse and publish video-editing templates",
    long_about = "Template Hub lists published editing templates, shows their \
                  details and opens them in the matching editor. Operators can \
                  publish new templates from the command line.",
    after_help = "EXAMPLES:\n\
        \x20 tphub list --limit 12\n\
        \x20 tphub list --watch --interval 30\n\
        \x20 tphub show 42 --open\n\
        \x20 tphub publish --title \"Viral Phonk Intro\" --tags \"phonk, viral\" ...\n\
        \x20 tphub completions bash > /usr/share/bash-completion/completions/tphub",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List published templates.
    #[command(
        visible_alias = "ls",
        about = "List published templates",
        after_help = "EXAMPLES:\n\
            \x20 tphub list\n\
            \x20 tphub list --limit 6 --format json\n\
            \x20 tphub list --watch"
    )]
    List(ListArgs),

    /// Show one template.
    #[command(
        about = "Show template details",
        after_help = "EXAMPLES:\n\
            \x20 tphub show 42\n\
            \x20 tphub show 42 --format json\n\
            \x20 tphub show 42 --open"
    )]
    Show(ShowArgs),

    /// Publish a new template.
    #[command(
        about = "Publish a new template",
        after_help = "EXAMPLES:\n\
            \x20 tphub publish --title \"Viral Phonk Intro\" \\\n\
            \x20     --description \"Hard-hitting intro\" \\\n\
            \x20     --thumbnail-url https://cdn.example.com/1.jpg \\\n\
            \x20     --video-url https://cdn.example.com/1.mp4 \\\n\
            \x20     --editor-url https://www.capcut.com/t/abc \\\n\
            \x20     --tags \"phonk, viral, intro\" --yes"
    )]
    Publish(PublishArgs),

    /// Print the slug a title publishes under.
    #[command(about = "Generate a URL slug from a title")]
    Slug(SlugArgs),

    /// Initialise a configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 tphub init           # default location\n\
            \x20 tphub init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 tphub completions bash > ~/.local/share/bash-completion/completions/tphub\n\
            \x20 tphub completions zsh  > ~/.zfunc/_tphub\n\
            \x20 tphub completions fish > ~/.config/fish/completions/tphub.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the active configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 tphub config get remote.url\n\
            \x20 tphub config list\n\
            \x20 tphub config path"
    )]
    Config(ConfigCommands),
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `tphub list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Maximum number of templates (overrides `listing.limit`).
    #[arg(short = 'n', long = "limit", value_name = "N", help = "Maximum number of templates")]
    pub limit: Option<usize>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    /// Keep running and re-render on every refresh.
    #[arg(short = 'w', long = "watch", help = "Refresh periodically until Ctrl-C")]
    pub watch: bool,

    /// Refresh interval in seconds (overrides `listing.poll_interval_secs`).
    #[arg(
        long = "interval",
        value_name = "SECS",
        requires = "watch",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Refresh interval in seconds"
    )]
    pub interval: Option<u64>,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One title per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── show ──────────────────────────────────────────────────────────────────────

/// Arguments for `tphub show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Template id.
    #[arg(value_name = "ID", help = "Template id")]
    pub id: String,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: ShowFormat,

    /// Start the preview video.
    #[arg(long = "preview", help = "Play the preview video")]
    pub preview: bool,

    /// Open the template in its editor.
    #[arg(long = "open", help = "Open the editor link in a browser")]
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Human,
    Json,
}

// ── publish ───────────────────────────────────────────────────────────────────

/// Arguments for `tphub publish`.
#[derive(Debug, Args)]
pub struct PublishArgs {
    #[arg(long = "title", value_name = "TEXT", help = "Template title")]
    pub title: Option<String>,

    #[arg(long = "description", value_name = "TEXT", help = "Template description")]
    pub description: Option<String>,

    #[arg(long = "thumbnail-url", value_name = "URL", help = "Thumbnail image URL")]
    pub thumbnail_url: Option<String>,

    #[arg(long = "video-url", value_name = "URL", help = "Preview video URL")]
    pub video_url: Option<String>,

    #[arg(
        long = "editor-url",
        visible_alias = "capcut-url",
        value_name = "URL",
        help = "Link that opens the template in its editor"
    )]
    pub editor_url: Option<String>,

    /// Duration in seconds (1-300).
    #[arg(
        long = "duration",
        value_name = "SECS",
        allow_negative_numbers = true,
        help = "Duration in seconds (1-300, default 15)"
    )]
    pub duration: Option<String>,

    /// Comma-separated tags.
    #[arg(long = "tags", value_name = "LIST", help = "Comma-separated tags, e.g. \"phonk, viral, intro\"")]
    pub tags: Option<String>,

    /// Editor tag (capcut, vn, aftereffects).
    #[arg(long = "editor", value_name = "EDITOR", help = "Editor: capcut, vn or aftereffects")]
    pub editor: Option<String>,

    /// How the editor foreign key is filled (overrides `admin.editor_key`).
    #[arg(long = "editor-key", value_enum, value_name = "MODE", help = "Editor key: lookup or null")]
    pub editor_key: Option<EditorKeyMode>,

    /// Validate and print the row without writing anything.
    #[arg(long = "dry-run", help = "Show what would be published without writing")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and publish immediately")]
    pub yes: bool,
}

/// Editor foreign-key mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKeyMode {
    /// Look the editor row up by slug.
    #[default]
    Lookup,
    /// Insert with a null editor key.
    Null,
}

// ── slug ──────────────────────────────────────────────────────────────────────

/// Arguments for `tphub slug`.
#[derive(Debug, Args)]
pub struct SlugArgs {
    /// Title to convert. Multiple words are joined with spaces.
    #[arg(value_name = "TITLE", required = true, num_args = 1.., help = "Template title")]
    pub title: Vec<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `tphub init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `tphub completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `tphub config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `listing.poll_interval_secs`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_list_with_limit() {
        let cli = Cli::parse_from(["tphub", "list", "--limit", "6", "--format", "json"]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.limit, Some(6));
                assert_eq!(args.format, ListFormat::Json);
                assert!(!args.watch);
            }
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn interval_requires_watch() {
        let result = Cli::try_parse_from(["tphub", "list", "--interval", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn interval_must_be_positive() {
        let result = Cli::try_parse_from(["tphub", "list", "--watch", "--interval", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn capcut_url_alias() {
        let cli = Cli::parse_from(["tphub", "publish", "--capcut-url", "https://c/1"]);
        if let Commands::Publish(args) = cli.command {
            assert_eq!(args.editor_url.as_deref(), Some("https://c/1"));
        } else {
            panic!("expected Publish command");
        }
    }

    #[test]
    fn editor_key_mode_parses() {
        let cli = Cli::parse_from(["tphub", "publish", "--editor-key", "null"]);
        if let Commands::Publish(args) = cli.command {
            assert_eq!(args.editor_key, Some(EditorKeyMode::Null));
        } else {
            panic!("expected Publish command");
        }
    }

    #[test]
    fn slug_joins_words() {
        let cli = Cli::parse_from(["tphub", "slug", "Viral", "Phonk", "Intro"]);
        if let Commands::Slug(args) = cli.command {
            assert_eq!(args.title.join(" "), "Viral Phonk Intro");
        } else {
            panic!("expected Slug command");
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["tphub", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
