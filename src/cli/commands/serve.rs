//! `serve` command handler

use crate::cli::args::ServeArgs;
use crate::cli::commands::Context;
use crate::error::Y1ThemesError;
use crate::preview::{parse_bind_addr, serve};

/// Execute `serve`.
///
/// # Errors
///
/// Returns a usage error for a malformed bind address and an I/O error if
/// it cannot be bound.
pub async fn run(ctx: &Context, args: &ServeArgs) -> Result<(), Y1ThemesError> {
    let addr = parse_bind_addr(&args.bind)?;
    serve(&ctx.root, addr).await
}
