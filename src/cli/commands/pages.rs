//! `pages` command handlers
//!
//! Generates per-theme landing pages from the built-in template, or carries
//! the template theme's page layout over the others.

use crate::cli::args::{PagesGenerateArgs, PagesRefreshArgs};
use crate::cli::commands::Context;
use crate::error::Y1ThemesError;
use crate::site::{refresh_pages, write_index_page, write_theme_pages};
use crate::theme::manifest::Manifest;

/// Writes every theme page, and the gallery page when `index` is set.
pub(crate) fn generate_pages(
    ctx: &Context,
    manifest: &Manifest,
    index: bool,
) -> Result<(), Y1ThemesError> {
    let report = write_theme_pages(&ctx.root, manifest, &ctx.site)?;
    for (folder, images) in &report.written {
        ctx.status(format!("Generated index.html for {folder} with {images} images"));
    }
    for folder in &report.failed {
        ctx.status(format!("Failed to generate index.html for {folder}"));
    }

    if index {
        let cards = write_index_page(&ctx.root, manifest, &ctx.site)?;
        ctx.status(format!("Generated gallery index.html with {cards} themes"));
    }

    ctx.status(format!(
        "Generated {} page(s), {} failed",
        report.written.len(),
        report.failed.len()
    ));
    Ok(())
}

/// Execute `pages generate`.
///
/// # Errors
///
/// Returns a manifest error if `themes.json` cannot be read and a site
/// error if the site URL is unusable or the gallery page cannot be written.
pub fn generate(ctx: &Context, args: &PagesGenerateArgs) -> Result<(), Y1ThemesError> {
    let manifest = Manifest::load(&ctx.manifest_path())?;
    generate_pages(ctx, &manifest, args.index)
}

/// Execute `pages refresh`.
///
/// # Errors
///
/// Returns a manifest error if `themes.json` cannot be parsed and a site
/// error if the template theme has no `index.html`.
pub fn refresh(ctx: &Context, args: &PagesRefreshArgs) -> Result<(), Y1ThemesError> {
    let template = args.template.as_deref().unwrap_or(&ctx.site.template_theme);
    let manifest = Manifest::load_or_default(&ctx.manifest_path())?;
    let report = refresh_pages(&ctx.root, &manifest, &ctx.site, template, |n| {
        ctx.site.is_excluded(n)
    })?;

    for folder in &report.updated {
        ctx.status(format!("Updated {folder}/index.html"));
    }
    for folder in &report.failed {
        ctx.status(format!("Failed to update {folder}/index.html"));
    }
    ctx.status(format!(
        "Refreshed {} page(s) from {template}, {} failed",
        report.updated.len(),
        report.failed.len()
    ));
    Ok(())
}
