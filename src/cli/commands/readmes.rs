//! `readmes` command handler

use crate::cli::args::ReadmesArgs;
use crate::cli::commands::Context;
use crate::error::Y1ThemesError;
use crate::site::readme::update_readmes;

/// Execute `readmes`.
///
/// # Errors
///
/// Returns a site error if the site root cannot be listed.
pub fn run(ctx: &Context, args: &ReadmesArgs) -> Result<(), Y1ThemesError> {
    let mut site = ctx.site.clone();
    if let Some(template) = &args.template {
        site.template_theme.clone_from(template);
    }

    let report = update_readmes(&ctx.root, &site, args.create)?;
    for folder in &report.updated {
        ctx.status(format!("Updated {folder}/README.md"));
    }
    for folder in &report.created {
        ctx.status(format!("Created {folder}/README.md"));
    }
    for folder in &report.failed {
        ctx.status(format!("Failed to write {folder}/README.md"));
    }
    ctx.status(format!(
        "{} updated, {} created, {} without README skipped, {} failed",
        report.updated.len(),
        report.created.len(),
        report.skipped.len(),
        report.failed.len()
    ));
    Ok(())
}
