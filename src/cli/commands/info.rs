//! `info` command handler
//!
//! Shows a theme's resolved details from the local checkout or, with
//! `--remote`, from the published site.

use std::fmt::Write as _;

use crate::cli::args::{InfoArgs, OutputFormat};
use crate::cli::commands::Context;
use crate::error::{ManifestError, Y1ThemesError};
use crate::remote::{GitHubContents, RemoteCatalog};
use crate::theme::config::ThemeConfig;
use crate::theme::manifest::Manifest;
use crate::theme::resolve::{ThemeDetails, resolve_details, suggest_folder};

fn unknown_folder<'a>(folder: &str, known: impl IntoIterator<Item = &'a str>) -> Y1ThemesError {
    let mut message = format!("unknown theme '{folder}'");
    if let Some(hint) = suggest_folder(folder, known) {
        let _ = write!(message, " (did you mean '{hint}'?)");
    }
    Y1ThemesError::Usage(message)
}

fn local_details(ctx: &Context, folder: &str) -> Result<ThemeDetails, Y1ThemesError> {
    let manifest = Manifest::load_or_default(&ctx.manifest_path())?;
    let dir = ctx.root.join(folder);
    if !dir.is_dir() {
        let folders = ctx.theme_folders()?;
        return Err(unknown_folder(folder, folders.iter().map(|f| f.name.as_str())));
    }
    let config = ThemeConfig::load(&dir)?;
    Ok(resolve_details(folder, manifest.find(folder), config.as_ref()))
}

async fn remote_details(ctx: &Context, folder: &str) -> Result<ThemeDetails, Y1ThemesError> {
    let source = GitHubContents::new(&ctx.site)?;
    let mut catalog = RemoteCatalog::new(&source, &ctx.site);
    let manifest = catalog.manifest().await?;
    if manifest.find(folder).is_none() && catalog.config(folder).await?.is_none() {
        return Err(unknown_folder(folder, manifest.folders()));
    }
    let details = catalog.details(folder).await;
    tracing::debug!(cached = catalog.cached(), "remote lookups done");
    Ok(details)
}

/// Execute `info`.
///
/// # Errors
///
/// Returns a usage error for an unknown theme, a config error if its
/// `config.json` is malformed, or a remote error when `--remote` cannot
/// reach the published site.
pub async fn run(ctx: &Context, args: &InfoArgs) -> Result<(), Y1ThemesError> {
    let details = if args.remote {
        remote_details(ctx, &args.folder).await?
    } else {
        local_details(ctx, &args.folder)?
    };

    match args.format {
        OutputFormat::Human => {
            println!("Folder:      {}", details.folder);
            println!("Name:        {}", details.name);
            println!("Author:      {}", details.author);
            if let Some(url) = &details.author_url {
                println!("Author URL:  {url}");
            }
            println!("Description: {}", details.description);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&details).map_err(ManifestError::from)?;
            println!("{json}");
        }
    }
    Ok(())
}
