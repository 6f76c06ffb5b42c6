//! `screenshots` command handler

use crate::cli::args::ScreenshotsArgs;
use crate::cli::commands::Context;
use crate::error::Y1ThemesError;
use crate::site::screenshots::optimize_screenshots;

/// Execute `screenshots`.
///
/// # Errors
///
/// Returns a site error if the manifest cannot be updated.
pub fn run(ctx: &Context, args: &ScreenshotsArgs) -> Result<(), Y1ThemesError> {
    let report = optimize_screenshots(&ctx.root, &ctx.manifest_path(), args.quality, args.dry_run)?;
    let verb = if args.dry_run { "Would convert" } else { "Converted" };

    let mut saved = 0_u64;
    for c in &report.converted {
        saved += c.png_size - c.jpeg_size;
        ctx.status(format!(
            "{verb} {} -> {} ({} -> {} bytes, {:.1}% smaller)",
            c.png.display(),
            c.jpeg.display(),
            c.png_size,
            c.jpeg_size,
            c.reduction_percent()
        ));
    }
    for png in &report.not_smaller {
        ctx.status(format!("Kept {} (JPEG not smaller)", png.display()));
    }
    for png in &report.failed {
        ctx.status(format!("Failed to convert {}", png.display()));
    }
    for file in &report.updated_files {
        ctx.status(format!("Updated references in {}", file.display()));
    }
    for png in &report.kept_png {
        ctx.status(format!("Kept {} (a reference could not be updated)", png.display()));
    }
    ctx.status(format!(
        "{verb} {} screenshot(s), {saved} bytes saved, {} failed",
        report.converted.len(),
        report.failed.len()
    ));
    Ok(())
}
