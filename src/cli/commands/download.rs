//! `download` command handler

use crate::cli::args::DownloadArgs;
use crate::cli::commands::Context;
use crate::cli::commands::install::print_skipped;
use crate::error::Y1ThemesError;
use crate::remote::{GitHubContents, check_folder, default_zip_name, download_zip};

/// Execute `download`.
///
/// # Errors
///
/// Returns a remote error if the folder name is unsafe, the theme cannot be
/// listed or the archive cannot be written.
pub async fn run(ctx: &Context, args: &DownloadArgs) -> Result<(), Y1ThemesError> {
    check_folder(&args.folder)?;
    let out = args
        .output
        .clone()
        .unwrap_or_else(|| default_zip_name(&args.folder).into());

    let source = GitHubContents::new(&ctx.site)?;
    ctx.status(format!("Downloading {}", args.folder));
    let report = download_zip(&source, &args.folder, &out).await?;

    print_skipped(ctx, &report);
    ctx.status(format!(
        "Wrote {} with {} of {} file(s)",
        out.display(),
        report.written.len(),
        report.total()
    ));
    Ok(())
}
