//! `tphub config`: inspect configuration values.

use tphub_core::application::ReadSource;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.data(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let mut shown = config;
            if shown.remote.api_key.is_some() {
                shown.remote.api_key = Some(REDACTED.into());
            }
            let serialised =
                toml::to_string_pretty(&shown).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.data(&serialised)?;
        }

        ConfigCommands::Path => {
            output.data(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

const REDACTED: &str = "********";

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    fn opt<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    match key {
        "remote.url" => Ok(opt(&config.remote.url)),
        "remote.api_key" => Ok(config
            .remote
            .api_key
            .as_ref()
            .map(|_| REDACTED.to_string())
            .unwrap_or_default()),
        "remote.request_timeout_secs" => Ok(opt(&config.remote.request_timeout_secs)),
        "listing.poll_interval_secs" => Ok(config.listing.poll_interval_secs.to_string()),
        "listing.limit" => Ok(opt(&config.listing.limit)),
        "listing.sample_fallback" => Ok(config.listing.sample_fallback.to_string()),
        "listing.source" => Ok(match config.listing.source {
            ReadSource::Table => "table".to_string(),
            ReadSource::DetailsView => "details_view".to_string(),
        }),
        "admin.editor_key" => Ok(format!("{:?}", config.admin.editor_key).to_lowercase()),
        "admin.editor_slug" => Ok(config.admin.editor_slug.clone()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "listing.poll_interval_secs").unwrap(), "30");
        assert_eq!(get_config_value(&cfg, "admin.editor_slug").unwrap(), "capcut");
        assert_eq!(get_config_value(&cfg, "admin.editor_key").unwrap(), "lookup");
        assert_eq!(get_config_value(&cfg, "listing.source").unwrap(), "table");
    }

    #[test]
    fn unset_values_print_empty() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "remote.url").unwrap(), "");
        assert_eq!(get_config_value(&cfg, "listing.limit").unwrap(), "");
    }

    #[test]
    fn api_key_is_never_echoed() {
        let mut cfg = AppConfig::default();
        cfg.remote.api_key = Some("secret-anon-key".into());
        assert_eq!(get_config_value(&cfg, "remote.api_key").unwrap(), REDACTED);
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
