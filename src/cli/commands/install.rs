//! `install` command handler

use crate::cli::args::InstallArgs;
use crate::cli::commands::Context;
use crate::error::Y1ThemesError;
use crate::remote::{GitHubContents, TransferReport, install_theme};

pub(crate) fn print_skipped(ctx: &Context, report: &TransferReport) {
    for (path, reason) in &report.skipped {
        ctx.status(format!("Skipped {path}: {reason}"));
    }
}

/// Execute `install`.
///
/// # Errors
///
/// Returns a usage error if the destination is not a directory and a
/// remote error if the theme cannot be listed.
pub async fn run(ctx: &Context, args: &InstallArgs) -> Result<(), Y1ThemesError> {
    if !args.dest.is_dir() {
        return Err(Y1ThemesError::Usage(format!(
            "destination {} is not a directory",
            args.dest.display()
        )));
    }

    let source = GitHubContents::new(&ctx.site)?;
    ctx.status(format!("Installing {} into {}", args.folder, args.dest.display()));
    let report = install_theme(&source, &args.folder, &args.dest).await?;

    print_skipped(ctx, &report);
    ctx.status(format!(
        "Installed {}: {} of {} file(s) written",
        args.folder,
        report.written.len(),
        report.total()
    ));
    Ok(())
}
