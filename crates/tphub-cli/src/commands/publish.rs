//! Implementation of the `tphub publish` command.
//!
//! Responsibility: copy flags into the admin form, confirm, submit and
//! report. Validation and the write sequence live in `tphub-core`.

use std::io::IsTerminal as _;

use tracing::{debug, info, instrument};

use tphub_core::{
    application::{AdminForm, EditorKeyPolicy, SubmitReceipt},
    domain::{DraftField, TemplateDraft},
};

use crate::{
    cli::{PublishArgs, global::GlobalArgs},
    commands::backend,
    config::AppConfig,
    error::{CliError, CliResult},
    output::{self, OutputManager},
};

/// Execute the `tphub publish` command.
///
/// 1. Fill the form from flags, prompting for missing required fields on a TTY
/// 2. Validate
/// 3. Early-exit if `--dry-run`
/// 4. Confirm unless `--yes` or `--quiet`
/// 5. Submit (editor lookup, insert, tag upserts)
#[instrument(skip_all)]
pub async fn execute(
    args: PublishArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let backend = backend(&config)?;
    let policy = config.editor_policy(args.editor_key);
    let mut form = AdminForm::new(backend.service, policy);

    fill(&mut form, &args)?;
    if !global.quiet && !args.yes && std::io::stdin().is_terminal() {
        prompt_missing(&mut form)?;
    }
    form.draft().validate().map_err(|e| CliError::Core(e.into()))?;

    debug!(slug = %form.generate_slug(), policy = ?form.policy(), "Draft ready");

    if args.dry_run {
        output.info("Dry run: nothing was written")?;
        output.json(&form.draft().to_row(None))?;
        return Ok(());
    }

    if !global.quiet && !args.yes {
        show_draft(form.draft(), form.policy(), &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    if backend.demo {
        output.warning("No remote.url configured: publishing to the demo catalog, which is not saved")?;
    }

    let spinner = output.spinner("Publishing template...");
    let result = form.submit().await;
    output::finish(spinner);
    let receipt = result?;

    info!(slug = %receipt.slug, tags = receipt.tags.len(), "Template published");
    report(&receipt, &output)
}

/// Copy every flag that was given into the form, in form order.
fn fill(form: &mut AdminForm, args: &PublishArgs) -> CliResult<()> {
    let fields = [
        (DraftField::Title, &args.title),
        (DraftField::Description, &args.description),
        (DraftField::ThumbnailUrl, &args.thumbnail_url),
        (DraftField::VideoUrl, &args.video_url),
        (DraftField::EditorUrl, &args.editor_url),
        (DraftField::Duration, &args.duration),
        (DraftField::Tags, &args.tags),
        (DraftField::Editor, &args.editor),
    ];

    for (field, value) in fields {
        if let Some(value) = value {
            form.set(field, value)?;
        }
    }
    Ok(())
}

const REQUIRED: [(DraftField, &str); 5] = [
    (DraftField::Title, "Title"),
    (DraftField::Description, "Description"),
    (DraftField::ThumbnailUrl, "Thumbnail URL"),
    (DraftField::VideoUrl, "Preview video URL"),
    (DraftField::EditorUrl, "Editor link"),
];

fn is_blank(draft: &TemplateDraft, field: DraftField) -> bool {
    let value = match field {
        DraftField::Title => &draft.title,
        DraftField::Description => &draft.description,
        DraftField::ThumbnailUrl => &draft.thumbnail_url,
        DraftField::VideoUrl => &draft.video_url,
        DraftField::EditorUrl => &draft.editor_url,
        _ => return false,
    };
    value.trim().is_empty()
}

#[cfg(feature = "interactive")]
fn prompt_missing(form: &mut AdminForm) -> CliResult<()> {
    for (field, label) in REQUIRED {
        if !is_blank(form.draft(), field) {
            continue;
        }
        let value: String = dialoguer::Input::new()
            .with_prompt(label)
            .interact_text()
            .map_err(|e| CliError::IoError {
                message: format!("failed to read {field}"),
                source: std::io::Error::other(e),
            })?;
        form.set(field, &value)?;
    }
    Ok(())
}

/// Without the `interactive` feature missing fields are reported by
/// validation instead.
#[cfg(not(feature = "interactive"))]
fn prompt_missing(form: &mut AdminForm) -> CliResult<()> {
    let missing: Vec<&str> = REQUIRED
        .iter()
        .filter(|(field, _)| is_blank(form.draft(), *field))
        .map(|(_, label)| *label)
        .collect();
    if !missing.is_empty() {
        debug!(?missing, "Required fields not given");
    }
    Ok(())
}

fn show_draft(
    draft: &TemplateDraft,
    policy: &EditorKeyPolicy,
    out: &OutputManager,
) -> CliResult<()> {
    let editor_key = match policy {
        EditorKeyPolicy::LookupBySlug(slug) => format!("lookup '{slug}'"),
        EditorKeyPolicy::Null => "null".to_string(),
    };
    let tags = draft.tag_names();

    out.header("New template")?;
    out.print(&format!("  Title:      {}", draft.title))?;
    out.print(&format!("  Slug:       {}", draft.slug()))?;
    out.print(&format!("  Editor:     {}", draft.editor.metadata().display_name))?;
    out.print(&format!("  Duration:   {}s", draft.duration_seconds))?;
    out.print(&format!(
        "  Tags:       {}",
        if tags.is_empty() { "(none)".to_string() } else { tags.join(", ") }
    ))?;
    out.print(&format!("  Editor key: {editor_key}"))?;
    out.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Publish this template?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Publish this template? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

fn report(receipt: &SubmitReceipt, out: &OutputManager) -> CliResult<()> {
    if out.format() == crate::cli::OutputFormat::Json {
        out.json(receipt)?;
        return Ok(());
    }

    match &receipt.template_id {
        Some(id) => out.success(&format!("Template '{}' published with id {id}", receipt.slug))?,
        None => out.success(&format!("Template '{}' published", receipt.slug))?,
    }
    if !receipt.tags.is_empty() {
        out.print(&format!("  Tags: {}", receipt.tags.join(", ")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tphub_adapters::InMemoryDataService;
    use tphub_core::domain::Editor;

    fn args() -> PublishArgs {
        PublishArgs {
            title: Some("Viral Phonk Intro!!".into()),
            description: Some("Hard-hitting intro".into()),
            thumbnail_url: Some("https://cdn/1.jpg".into()),
            video_url: Some("https://cdn/1.mp4".into()),
            editor_url: Some("https://www.capcut.com/t/abc".into()),
            duration: Some("20".into()),
            tags: Some("phonk, viral".into()),
            editor: Some("vn".into()),
            editor_key: None,
            dry_run: false,
            yes: true,
        }
    }

    fn form() -> AdminForm {
        AdminForm::new(Arc::new(InMemoryDataService::new()), EditorKeyPolicy::Null)
    }

    #[test]
    fn fill_copies_every_flag() {
        let mut form = form();
        fill(&mut form, &args()).unwrap();

        let draft = form.draft();
        assert_eq!(draft.title, "Viral Phonk Intro!!");
        assert_eq!(draft.duration_seconds, 20);
        assert_eq!(draft.editor, Editor::Vn);
        assert_eq!(draft.tag_names(), vec!["phonk", "viral"]);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn fill_rejects_non_numeric_duration() {
        let mut form = form();
        let mut bad = args();
        bad.duration = Some("fast".into());
        let err = fill(&mut form, &bad).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn blank_required_fields_are_detected() {
        let mut form = form();
        let mut partial = args();
        partial.video_url = None;
        fill(&mut form, &partial).unwrap();

        let missing: Vec<_> = REQUIRED
            .iter()
            .filter(|(field, _)| is_blank(form.draft(), *field))
            .map(|(field, _)| *field)
            .collect();
        assert_eq!(missing, vec![DraftField::VideoUrl]);
    }

    #[test]
    fn missing_flags_fail_validation() {
        let mut form = form();
        let mut partial = args();
        partial.editor_url = None;
        fill(&mut form, &partial).unwrap();
        assert!(form.draft().validate().is_err());
    }
}
