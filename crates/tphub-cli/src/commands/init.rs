//! `tphub init`: create a default configuration file.

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Write the built-in defaults to the default config path.
pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let config_path = AppConfig::config_path();

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let toml = render_defaults()?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }

    std::fs::write(&config_path, &toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    output.info("Set remote.url and remote.api_key to leave the demo catalog")?;

    Ok(())
}

fn render_defaults() -> CliResult<String> {
    toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        source: Some(Box::new(e)),
    })
}
