//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `TPHUB_<SECTION>__<KEY>`, e.g.
//!    `TPHUB_REMOTE__URL`, `TPHUB_LISTING__POLL_INTERVAL_SECS`
//! 3. Config file: `--config FILE`, else the platform default path
//! 4. Built-in defaults (always present)

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tphub_core::application::{DEFAULT_EDITOR_SLUG, EditorKeyPolicy, ReadSource};

use crate::cli::EditorKeyMode;

const ENV_PREFIX: &str = "TPHUB";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote data service connection.
    pub remote: RemoteConfig,
    /// Listing behaviour.
    pub listing: ListingConfig,
    /// Publishing behaviour.
    pub admin: AdminConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Project URL. Unset means the in-memory demo catalog.
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// No timeout when unset.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub poll_interval_secs: u64,
    pub limit: Option<usize>,
    /// Show the sample catalog when the first fetch fails.
    pub sample_fallback: bool,
    pub source: ReadSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub editor_key: EditorKeyMode,
    pub editor_slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            listing: ListingConfig {
                poll_interval_secs: 30,
                limit: None,
                sample_fallback: true,
                source: ReadSource::Table,
            },
            admin: AdminConfig {
                editor_key: EditorKeyMode::Lookup,
                editor_slug: DEFAULT_EDITOR_SLUG.into(),
            },
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("encoding built-in defaults")?;

        let file = match config_file {
            Some(path) => File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(true),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("reading configuration sources")?;

        let config: Self = settings
            .try_deserialize()
            .context("invalid configuration values")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.listing.poll_interval_secs == 0 {
            anyhow::bail!("listing.poll_interval_secs must be at least 1");
        }
        if self.remote.request_timeout_secs == Some(0) {
            anyhow::bail!("remote.request_timeout_secs must be at least 1 when set");
        }
        if self.admin.editor_slug.trim().is_empty() {
            anyhow::bail!("admin.editor_slug cannot be empty");
        }
        Ok(())
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.tphub.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tphub", "tphub")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".tphub.toml"))
    }

    /// Remote URL, if one is configured and non-blank.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Same configuration, pointed at the demo catalog.
    pub fn without_remote(mut self) -> Self {
        self.remote.url = None;
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.remote.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.listing.poll_interval_secs)
    }

    /// Editor-key policy, with `mode` (from the command line) taking
    /// precedence over the configured one.
    pub fn editor_policy(&self, mode: Option<EditorKeyMode>) -> EditorKeyPolicy {
        match mode.unwrap_or(self.admin.editor_key) {
            EditorKeyMode::Lookup => EditorKeyPolicy::LookupBySlug(self.admin.editor_slug.clone()),
            EditorKeyMode::Null => EditorKeyPolicy::Null,
        }
    }
}
