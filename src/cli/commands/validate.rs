//! `validate` command handler

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::cli::commands::Context;
use crate::error::{ManifestError, Y1ThemesError};
use crate::theme::manifest::Manifest;
use crate::validate::{failing_count, validate_site};

/// Execute `validate`.
///
/// # Errors
///
/// Returns a manifest error if `themes.json` cannot be read, or
/// [`Y1ThemesError::ValidationFailed`] if any error (or, with `--strict`,
/// any warning) is found.
pub fn run(ctx: &Context, args: &ValidateArgs) -> Result<(), Y1ThemesError> {
    let manifest = Manifest::load(&ctx.manifest_path())?;
    let issues = validate_site(&ctx.root, &manifest, &ctx.site);
    let failing = failing_count(&issues, args.strict);

    match args.format {
        OutputFormat::Human => {
            for issue in &issues {
                println!("{issue}");
            }
            if issues.is_empty() {
                ctx.status(format!("{} theme(s) OK", manifest.themes.len()));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": failing == 0,
                "themes": manifest.themes.len(),
                "issues": issues,
            });
            let text = serde_json::to_string_pretty(&json).map_err(ManifestError::from)?;
            println!("{text}");
        }
    }

    if failing > 0 {
        return Err(Y1ThemesError::ValidationFailed(failing));
    }
    Ok(())
}
