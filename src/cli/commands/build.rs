//! `build` command handler
//!
//! Runs the usual publish sequence in one go: manifest sync, page
//! generation and the sitemap.

use crate::cli::args::BuildArgs;
use crate::cli::commands::Context;
use crate::cli::commands::manifest::sync_manifest;
use crate::cli::commands::pages::generate_pages;
use crate::cli::commands::sitemap::write_site_sitemap;
use crate::error::Y1ThemesError;

/// Execute `build`.
///
/// # Errors
///
/// Returns the first fatal error from any step; per-theme failures are
/// reported and do not stop the build.
pub fn run(ctx: &Context, args: &BuildArgs) -> Result<(), Y1ThemesError> {
    let (manifest, _) = sync_manifest(ctx, args.keep_missing)?;
    let path = ctx.manifest_path();
    if manifest.save(&path)? {
        ctx.status(format!("Updated {}", path.display()));
    }

    generate_pages(ctx, &manifest, args.index)?;
    write_site_sitemap(ctx, &manifest, None)?;
    tracing::info!(themes = manifest.themes.len(), "build complete");
    Ok(())
}
