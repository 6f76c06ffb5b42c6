//! `stats` command handler
//!
//! Creates the empty per-theme files that release downloads are counted by.

use crate::cli::args::StatsArgs;
use crate::cli::commands::Context;
use crate::error::Y1ThemesError;
use crate::site::stats::write_stat_files;

/// Execute `stats`.
///
/// # Errors
///
/// Returns a site error if the root cannot be listed or a file cannot be
/// created.
pub fn run(ctx: &Context, args: &StatsArgs) -> Result<(), Y1ThemesError> {
    let out_dir = if args.output.is_absolute() {
        args.output.clone()
    } else {
        ctx.root.join(&args.output)
    };

    let created = write_stat_files(&ctx.root, &out_dir, |n| {
        ctx.site.is_excluded(n) || out_dir.file_name().is_some_and(|o| o == n)
    })?;
    for name in &created {
        ctx.status(format!("Created {name}"));
    }
    ctx.status(format!("Created {} stat file(s) in {}", created.len(), out_dir.display()));
    Ok(())
}
