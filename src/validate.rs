//! Site consistency checks.
//!
//! Compares the manifest with the theme folders on disk and inspects each
//! theme's `config.json`. Nothing is modified.

use std::collections::HashSet;
use std::path::Path;

use crate::config::SiteConfig;
use crate::error::{Severity, ValidationIssue};
use crate::theme::config::{CONFIG_FILE, ThemeConfig, is_valid_color};
use crate::theme::manifest::Manifest;
use crate::theme::scan::{discover_themes, has_cover_image, preferred_variant};

fn issue(path: impl Into<String>, message: impl Into<String>, severity: Severity) -> ValidationIssue {
    ValidationIssue {
        path: path.into(),
        message: message.into(),
        severity,
    }
}

/// Checks the site under `root` against `manifest`.
///
/// Errors:
/// - a folder listed more than once
/// - a listed folder missing on disk
/// - a `config.json` that is not valid JSON
///
/// Warnings:
/// - a folder with a cover image that is not listed
/// - a color value that is not `#rgb`, `#rrggbb` or `#aarrggbb`
/// - a config-referenced image missing from the folder
#[must_use]
pub fn validate_site(root: &Path, manifest: &Manifest, site: &SiteConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let manifest_path = site.manifest.display().to_string();

    let mut seen = HashSet::new();
    for entry in &manifest.themes {
        if !seen.insert(entry.folder.as_str()) {
            issues.push(issue(
                &manifest_path,
                format!("theme '{}' is listed more than once", entry.folder),
                Severity::Error,
            ));
        }
        if entry.folder.trim().is_empty() || !root.join(&entry.folder).is_dir() {
            issues.push(issue(
                &manifest_path,
                format!("theme folder '{}' does not exist", entry.folder),
                Severity::Error,
            ));
        }
    }

    let folders = match discover_themes(root, |n| site.is_excluded(n)) {
        Ok(folders) => folders,
        Err(e) => {
            issues.push(issue(
                root.display().to_string(),
                format!("cannot list site root: {e}"),
                Severity::Error,
            ));
            return issues;
        }
    };

    for folder in &folders {
        if has_cover_image(&folder.path) && !seen.contains(folder.name.as_str()) {
            issues.push(issue(
                &folder.name,
                format!("theme has a cover image but is not in {manifest_path}"),
                Severity::Warning,
            ));
        }

        let config_path = format!("{}/{CONFIG_FILE}", folder.name);
        let config = match ThemeConfig::load(&folder.path) {
            Ok(Some(config)) => config,
            Ok(None) => continue,
            Err(e) => {
                issues.push(issue(&config_path, e.to_string(), Severity::Error));
                continue;
            }
        };

        for (key, value) in config.colors() {
            if !is_valid_color(&value) {
                issues.push(issue(
                    format!("{config_path}#{key}"),
                    format!("'{value}' is not a hex color"),
                    Severity::Warning,
                ));
            }
        }

        for image in config.image_files() {
            let resolved = preferred_variant(&folder.path, &image);
            if !folder.path.join(&resolved).is_file() {
                issues.push(issue(
                    &config_path,
                    format!("referenced image '{image}' is missing"),
                    Severity::Warning,
                ));
            }
        }
    }

    issues
}

/// Number of issues that fail validation; with `strict`, warnings count.
#[must_use]
pub fn failing_count(issues: &[ValidationIssue], strict: bool) -> usize {
    issues
        .iter()
        .filter(|i| strict || i.severity == Severity::Error)
        .count()
}
