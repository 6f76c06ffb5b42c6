//! `sitemap` command handler

use crate::cli::args::SitemapArgs;
use crate::cli::commands::Context;
use crate::error::Y1ThemesError;
use crate::site::sitemap::{SITEMAP_FILE, render_sitemap, write_sitemap};
use crate::theme::manifest::Manifest;

/// Renders and writes the sitemap for `manifest`.
pub(crate) fn write_site_sitemap(
    ctx: &Context,
    manifest: &Manifest,
    output: Option<&std::path::Path>,
) -> Result<(), Y1ThemesError> {
    let path = output.map_or_else(|| ctx.root.join(SITEMAP_FILE), std::path::Path::to_path_buf);
    let today = chrono::Local::now().date_naive();
    let xml = render_sitemap(&ctx.site.site_url, manifest.folders(), today)?;
    write_sitemap(&path, &xml)?;
    ctx.status(format!(
        "Wrote {} with {} theme URL(s)",
        path.display(),
        xml.matches("<url>").count().saturating_sub(1)
    ));
    Ok(())
}

/// Execute `sitemap`.
///
/// # Errors
///
/// Returns a manifest error if `themes.json` cannot be read and a site
/// error if the sitemap cannot be rendered or written.
pub fn run(ctx: &Context, args: &SitemapArgs) -> Result<(), Y1ThemesError> {
    let manifest = Manifest::load(&ctx.manifest_path())?;
    write_site_sitemap(ctx, &manifest, args.output.as_deref())
}
