//! `version` command handler
//!
//! Prints the tool version along with the built-in site defaults it falls
//! back to when no `themes-site.yaml` is present.

use serde_json::json;

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::config::SiteConfig;

/// Print version information.
pub fn run(args: &VersionArgs) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let site = SiteConfig::default();

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version}");
            println!("site:       {}", site.site_url);
            println!("repository: {}", site.repository.web_url());
            println!("manifest:   {}", site.manifest.display());
        }
        OutputFormat::Json => {
            let info = json!({
                "name": name,
                "version": version,
                "siteUrl": site.site_url,
                "repository": site.repository.web_url(),
                "branch": site.repository.branch,
                "manifest": site.manifest.display().to_string(),
            });
            println!("{info}");
        }
    }
}
