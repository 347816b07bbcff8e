//! Implementation of the `tphub list` command.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use tphub_adapters::sample_catalog;
use tphub_core::{
    application::{ApplicationError, ListingState, ListingView},
    domain::{TemplateSummary, format_count},
};

use crate::{
    cli::{ListArgs, ListFormat, global::GlobalArgs},
    commands::{backend, repository},
    config::AppConfig,
    error::{CliError, CliResult},
    output::{self, OutputManager, csv_field, fit},
};

/// Execute the `tphub list` command.
///
/// Without `--watch` this is a single refresh. With it, the listing view is
/// mounted and re-rendered on every state change until Ctrl-C.
#[instrument(skip_all, fields(watch = args.watch))]
pub async fn execute(
    args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let backend = backend(&config)?;
    let view = Arc::new(build_view(&args, &config, repository(&backend, &config)));

    if args.watch {
        watch(args, &config, view, &output).await
    } else {
        let spinner = output.spinner("Loading templates...");
        let state = view.refresh().await;
        output::finish(spinner);

        if let ListingState::Failed(message) = &state {
            return Err(CliError::Core(
                ApplicationError::Fetch {
                    message: message.clone(),
                }
                .into(),
            ));
        }
        render(&state, args.format, &output)
    }
}

fn build_view(
    args: &ListArgs,
    config: &AppConfig,
    repository: tphub_core::application::TemplateRepository,
) -> ListingView {
    let mut view = ListingView::new(repository);
    if let Some(limit) = args.limit.or(config.listing.limit) {
        view = view.with_limit(limit);
    }
    if config.listing.sample_fallback {
        view = view.with_sample_fallback(sample_catalog::summaries());
    }
    view
}

async fn watch(
    args: ListArgs,
    config: &AppConfig,
    view: Arc<ListingView>,
    output: &OutputManager,
) -> CliResult<()> {
    let every = args
        .interval
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| config.poll_interval());

    info!(interval_secs = every.as_secs(), "Watching listing");
    let mut handle = view.mount(every);
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            changed = handle.changed() => {
                let Some(state) = changed else { break };
                if state.is_loading() {
                    continue;
                }
                output.clear()?;
                if let ListingState::Failed(message) = &state {
                    output.error(&format!("Error loading templates: {message}"))?;
                } else {
                    render(&state, args.format, output)?;
                }
                output.print(&output.muted(&format!(
                    "Refreshing every {}s. Press Ctrl-C to stop.",
                    every.as_secs()
                )))?;
            }
            _ = &mut interrupted => {
                debug!("Interrupted");
                break;
            }
        }
    }

    handle.unmount();
    Ok(())
}

fn render(state: &ListingState, format: ListFormat, output: &OutputManager) -> CliResult<()> {
    let templates = state.templates();

    match format {
        ListFormat::Table => {
            if matches!(state, ListingState::Empty) {
                output.info("No templates published yet")?;
                return Ok(());
            }
            output.header(&format!("Templates ({})", templates.len()))?;
            output.data(&output.muted(&format!(
                "  {:<6} {:<32} {:<16} {:>10} {:>8}",
                "ID", "TITLE", "EDITOR", "DOWNLOADS", "LIKES"
            )))?;
            for t in templates {
                output.data(&table_row(t))?;
            }
        }

        // JSON must be parseable even in non-TTY pipes, so it bypasses the
        // quiet check.
        ListFormat::Json => output.json(templates)?,

        ListFormat::List => {
            for t in templates {
                output.data(&t.title)?;
            }
        }

        ListFormat::Csv => {
            output.data("id,title,editor,editor_name,thumbnail_url,downloads,likes")?;
            for t in templates {
                output.data(&csv_row(t))?;
            }
        }
    }

    Ok(())
}

fn table_row(t: &TemplateSummary) -> String {
    format!(
        "  {} {} {} {:>10} {:>8}",
        fit(t.id.as_str(), 6),
        fit(&t.title, 32),
        fit(&t.editor_name, 16),
        format_count(t.downloads),
        format_count(t.likes),
    )
}

fn csv_row(t: &TemplateSummary) -> String {
    [
        csv_field(t.id.as_str()),
        csv_field(&t.title),
        t.editor.as_str().to_string(),
        csv_field(&t.editor_name),
        csv_field(&t.thumbnail_url),
        t.downloads.to_string(),
        t.likes.to_string(),
    ]
    .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tphub_core::domain::Editor;

    fn summary() -> TemplateSummary {
        TemplateSummary::new("7", "Glitch, Logo Reveal", Editor::AfterEffects, "thumb.jpg", 4820, 312)
    }

    #[test]
    fn table_row_formats_counts() {
        let row = table_row(&summary());
        assert!(row.contains("After Effects"));
        assert!(row.contains("4,820"));
        assert!(row.contains("312"));
    }

    #[test]
    fn csv_row_quotes_commas() {
        assert_eq!(
            csv_row(&summary()),
            "7,\"Glitch, Logo Reveal\",aftereffects,After Effects,thumb.jpg,4820,312"
        );
    }

    #[test]
    fn limit_flag_wins_over_config() {
        let mut config = AppConfig::default();
        config.listing.limit = Some(3);
        let args = ListArgs {
            limit: Some(5),
            format: ListFormat::Table,
            watch: false,
            interval: None,
        };
        let backend = backend(&config).unwrap();
        let view = build_view(&args, &config, repository(&backend, &config));
        assert_eq!(view.limit(), Some(5));
    }

    #[test]
    fn config_limit_applies_without_flag() {
        let mut config = AppConfig::default();
        config.listing.limit = Some(3);
        let args = ListArgs {
            limit: None,
            format: ListFormat::Table,
            watch: false,
            interval: None,
        };
        let backend = backend(&config).unwrap();
        let view = build_view(&args, &config, repository(&backend, &config));
        assert_eq!(view.limit(), Some(3));
    }

    #[tokio::test]
    async fn demo_listing_loads_sample_catalog() {
        let config = AppConfig::default();
        let args = ListArgs {
            limit: None,
            format: ListFormat::Json,
            watch: false,
            interval: None,
        };
        let backend = backend(&config).unwrap();
        let view = build_view(&args, &config, repository(&backend, &config));
        let state = view.refresh().await;
        assert!(matches!(state, ListingState::Loaded(_)));
        assert!(!state.templates().is_empty());
    }
}
