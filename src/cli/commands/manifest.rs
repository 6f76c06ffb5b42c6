//! `manifest` command handlers
//!
//! Keeps `themes.json` in line with the theme folders and prints its
//! resolved contents.

use crate::cli::args::{ManifestListArgs, ManifestSyncArgs, OutputFormat};
use crate::cli::commands::Context;
use crate::error::{ManifestError, Y1ThemesError};
use crate::theme::config::ThemeConfig;
use crate::theme::manifest::{Manifest, SyncOptions, SyncReport};
use crate::theme::resolve::{ThemeDetails, resolve_details};

/// Syncs the manifest and prints what changed.
pub(crate) fn sync_manifest(
    ctx: &Context,
    keep_missing: bool,
) -> Result<(Manifest, SyncReport), Y1ThemesError> {
    let path = ctx.manifest_path();
    let mut manifest = Manifest::load_or_default(&path)?;
    let folders = ctx.theme_folders()?;
    let report = manifest.sync(&ctx.root, &folders, SyncOptions { keep_missing });

    for folder in &report.added {
        ctx.status(format!("Added {folder}"));
    }
    for folder in &report.removed_missing {
        ctx.status(format!("Removed {folder} (folder not found)"));
    }
    for folder in &report.removed_duplicates {
        ctx.status(format!("Removed duplicate entry for {folder}"));
    }
    Ok((manifest, report))
}

/// Execute `manifest sync`.
///
/// # Errors
///
/// Returns a manifest error if `themes.json` cannot be read or written, and
/// [`Y1ThemesError::ValidationFailed`] under `--check` when it would change.
pub fn sync(ctx: &Context, args: &ManifestSyncArgs) -> Result<(), Y1ThemesError> {
    let (manifest, report) = sync_manifest(ctx, args.keep_missing)?;
    let changes =
        report.added.len() + report.removed_missing.len() + report.removed_duplicates.len();
    let path = ctx.manifest_path();

    if args.check {
        if changes > 0 {
            ctx.status(format!("{} is out of date ({changes} change(s))", path.display()));
            return Err(Y1ThemesError::ValidationFailed(changes));
        }
        if manifest.needs_write(&path)? {
            ctx.status(format!("{} is not in canonical format", path.display()));
            return Err(Y1ThemesError::ValidationFailed(1));
        }
        ctx.status(format!("{} is up to date", path.display()));
        return Ok(());
    }

    if manifest.save(&path)? {
        tracing::info!(path = %path.display(), themes = manifest.themes.len(), "manifest written");
    }
    ctx.status(format!(
        "{} lists {} theme(s), {changes} change(s)",
        path.display(),
        manifest.themes.len()
    ));
    Ok(())
}

fn resolved(ctx: &Context, manifest: &Manifest) -> Vec<ThemeDetails> {
    manifest
        .themes
        .iter()
        .map(|entry| {
            let config = ThemeConfig::load(&ctx.root.join(&entry.folder)).unwrap_or_else(|e| {
                tracing::warn!(folder = %entry.folder, error = %e, "ignoring unreadable config");
                None
            });
            resolve_details(&entry.folder, Some(entry), config.as_ref())
        })
        .collect()
}

/// Execute `manifest list`.
///
/// # Errors
///
/// Returns a manifest error if `themes.json` cannot be read.
pub fn list(ctx: &Context, args: &ManifestListArgs) -> Result<(), Y1ThemesError> {
    let manifest = Manifest::load(&ctx.manifest_path())?;
    let details = resolved(ctx, &manifest);

    match args.format {
        OutputFormat::Human => {
            for d in &details {
                println!("{:<24} {} by {}", d.folder, d.name, d.author);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&details).map_err(ManifestError::from)?;
            println!("{json}");
        }
    }
    Ok(())
}
