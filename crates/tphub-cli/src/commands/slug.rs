//! `tphub slug`: print the slug a title publishes under.

use tphub_core::domain::generate_slug;

use crate::{
    cli::SlugArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: SlugArgs, output: OutputManager) -> CliResult<()> {
    let title = args.title.join(" ");
    let slug = generate_slug(&title);

    if slug.is_empty() {
        return Err(CliError::InvalidInput {
            message: format!("'{title}' has no letters or digits to build a slug from"),
            source: None,
        });
    }

    output.data(&slug)?;
    Ok(())
}
