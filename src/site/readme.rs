//! Theme README generation.
//!
//! Every theme folder carries a README explaining how to update it. The
//! template theme gets the longer "how to create themes" guide instead.

use std::path::Path;

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::site::template::{TemplateVars, render};
use crate::theme::scan::discover_themes;

/// README file name inside a theme folder.
pub const README_FILE: &str = "README.md";

/// README for ordinary themes.
pub const UPDATE_README: &str = include_str!("templates/readme_update.md");

/// README for the template theme.
pub const TEMPLATE_README: &str = include_str!("templates/readme_template.md");

/// Outcome of [`update_readmes`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadmeReport {
    /// Folders whose README was rewritten.
    pub updated: Vec<String>,
    /// Folders that had no README and got one.
    pub created: Vec<String>,
    /// Folders without a README that were left alone.
    pub skipped: Vec<String>,
    /// Folders whose README could not be written.
    pub failed: Vec<String>,
}

/// Renders the README for `folder`.
#[must_use]
pub fn render_readme(folder: &str, site: &SiteConfig) -> String {
    let template = if folder == site.template_theme {
        TEMPLATE_README
    } else {
        UPDATE_README
    };

    let mut vars = TemplateVars::new();
    vars.insert("site_url", site.site_url.trim_end_matches('/').to_string());
    vars.insert("repo_url", site.repository.web_url());
    vars.insert("template_theme", site.template_theme.clone());
    vars.insert("manifest", site.manifest.display().to_string());
    render(template, &vars)
}

/// Rewrites the README of every theme folder.
///
/// Folders without a README are skipped unless `create_missing` is set.
///
/// # Errors
///
/// Returns `SiteError::Write` if the site root cannot be listed.
pub fn update_readmes(
    root: &Path,
    site: &SiteConfig,
    create_missing: bool,
) -> Result<ReadmeReport, SiteError> {
    let folders = discover_themes(root, |n| site.is_excluded(n)).map_err(|source| {
        SiteError::Write {
            path: root.to_path_buf(),
            source,
        }
    })?;

    let mut report = ReadmeReport::default();
    for folder in folders {
        let path = folder.path.join(README_FILE);
        let exists = path.is_file();
        if !exists && !create_missing {
            tracing::debug!(folder = %folder.name, "no README, skipping");
            report.skipped.push(folder.name);
            continue;
        }

        match std::fs::write(&path, render_readme(&folder.name, site)) {
            Ok(()) if exists => report.updated.push(folder.name),
            Ok(()) => report.created.push(folder.name),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to write README");
                report.failed.push(folder.name);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_template_theme_gets_creation_guide() {
        let site = SiteConfig::default();
        let readme = render_readme("MelodyMuncher", &site);
        assert!(readme.starts_with("# How to Create Themes"));
        assert!(readme.contains("https://themes.innioasis.app/MelodyMuncher"));
        assert!(!readme.contains("{{"));

        let other = render_readme("XFiles", &site);
        assert!(other.starts_with("# How to Update or Edit This Theme"));
        assert!(other.contains("https://github.com/y1-community/InnioasisY1Themes"));
        assert!(other.contains("> themes.json (root)"));
    }

    #[test]
    fn test_update_readmes_skips_missing_unless_create() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("XFiles")).unwrap();
        fs::write(root.path().join("XFiles").join(README_FILE), "old").unwrap();
        fs::create_dir(root.path().join("Retro")).unwrap();
        let site = SiteConfig::default();

        let report = update_readmes(root.path(), &site, false).unwrap();
        assert_eq!(report.updated, vec!["XFiles".to_string()]);
        assert_eq!(report.skipped, vec!["Retro".to_string()]);
        assert!(!root.path().join("Retro").join(README_FILE).exists());

        let report = update_readmes(root.path(), &site, true).unwrap();
        assert_eq!(report.created, vec!["Retro".to_string()]);
        assert!(root.path().join("Retro").join(README_FILE).is_file());
    }
}
