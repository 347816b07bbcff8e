//! `tphub show`: the detail view for one template.

use tracing::instrument;

use tphub_core::application::{DetailCard, DetailState, DetailView};

use crate::{
    cli::{ShowArgs, ShowFormat, global::GlobalArgs},
    commands::{backend, repository},
    config::AppConfig,
    error::{CliError, CliResult},
    output::{self, OutputManager},
    terminal::{BrowserOpener, TerminalPlayer},
};

#[instrument(skip_all, fields(id = %args.id))]
pub async fn execute(
    args: ShowArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let backend = backend(&config)?;
    let mut view = DetailView::new(
        repository(&backend, &config),
        Box::new(TerminalPlayer::new()),
        Box::new(BrowserOpener),
    );

    let spinner = output.spinner("Loading template...");
    let state = view.load(&args.id).await;
    output::finish(spinner);

    if let DetailState::NotFound { id } = state {
        return Err(CliError::TemplateNotFound { id: id.clone() });
    }

    let Some(card) = view.card() else {
        return Err(CliError::TemplateNotFound { id: args.id });
    };

    match args.format {
        ShowFormat::Json => output.json(&card)?,
        ShowFormat::Human => render(&card, &output)?,
    }

    if args.preview {
        if card.has_preview {
            view.toggle_preview();
            if view.is_playing() {
                output.info(&format!("Playing preview: {}", card.media_url))?;
            }
        } else {
            output.warning("This template has no preview video")?;
        }
    }

    if args.open {
        if view.download()? {
            output.success(&format!("{} opened in your browser", card.cta_label))?;
        } else {
            output.warning("This template has no editor link")?;
        }
    }

    Ok(())
}

fn render(card: &DetailCard, output: &OutputManager) -> CliResult<()> {
    output.header(&card.title)?;
    output.data(&format!(
        "  {} {}   {} {}   {} {}",
        output.muted("Editor:"),
        card.editor_name,
        output.muted("Duration:"),
        card.duration,
        output.muted("Downloads:"),
        card.downloads,
    ))?;
    output.data(&format!("  {} {}", output.muted("Likes:"), card.likes))?;

    if let Some(description) = card.description.as_deref().filter(|d| !d.trim().is_empty()) {
        output.data("")?;
        output.data(&format!("  {description}"))?;
    }

    if !card.tags.is_empty() {
        let tags: Vec<String> = card.tags.iter().map(|t| format!("#{t}")).collect();
        output.data("")?;
        output.data(&format!("  {}", tags.join(" ")))?;
    }

    output.data("")?;
    let media_label = if card.has_preview { "Preview:" } else { "Thumbnail:" };
    output.data(&format!("  {} {}", output.muted(media_label), card.media_url))?;

    match card.editor_url.as_deref() {
        Some(url) => output.data(&format!("  {} {url}", output.muted(&format!("{}:", card.cta_label))))?,
        None => output.data(&format!("  {}", output.muted("No editor link available")))?,
    }

    Ok(())
}
