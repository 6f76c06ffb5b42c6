//! Propagates the template theme's page to every other theme.
//!
//! After the template theme's `index.html` is edited by hand, its layout is
//! carried over to the other themes' pages. Per-theme content sits between
//! `<!-- theme:NAME -->` and `<!-- /theme:NAME -->` markers; those regions
//! are filled from a fresh render of each target theme, so a refreshed page
//! keeps its own title, links, gallery and carousel.

use std::path::Path;

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::site::page::{PAGE_FILE, PageImages, render_theme_page};
use crate::theme::config::ThemeConfig;
use crate::theme::manifest::Manifest;
use crate::theme::resolve::resolve_details;
use crate::theme::scan::theme_folders_with;

const REGION_OPEN: &str = "<!-- theme:";
const MARKER_END: &str = " -->";

/// Outcome of [`refresh_pages`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// Folders whose page was replaced.
    pub updated: Vec<String>,
    /// Folders whose page could not be written.
    pub failed: Vec<String>,
}

fn region_body<'a>(html: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("{REGION_OPEN}{name}{MARKER_END}");
    let close = format!("<!-- /theme:{name}{MARKER_END}");
    let start = html.find(&open)? + open.len();
    let len = html[start..].find(&close)?;
    Some(&html[start..start + len])
}

/// Replaces every marked region of `layout` with the same region of
/// `rendered`.
///
/// Returns `None` if `layout` has no regions, a region is unterminated, or
/// `rendered` lacks one of them.
#[must_use]
pub fn splice_regions(layout: &str, rendered: &str) -> Option<String> {
    let mut out = String::with_capacity(layout.len());
    let mut rest = layout;
    let mut spliced = 0usize;

    while let Some(pos) = rest.find(REGION_OPEN) {
        let name_start = pos + REGION_OPEN.len();
        let name_len = rest[name_start..].find(MARKER_END)?;
        let name = &rest[name_start..name_start + name_len];
        let body_start = name_start + name_len + MARKER_END.len();
        let close = format!("<!-- /theme:{name}{MARKER_END}");
        let body_len = rest[body_start..].find(&close)?;

        out.push_str(&rest[..body_start]);
        out.push_str(region_body(rendered, name)?);
        out.push_str(&close);
        rest = &rest[body_start + body_len + close.len()..];
        spliced += 1;
    }
    out.push_str(rest);
    (spliced > 0).then_some(out)
}

fn render_for(
    root: &Path,
    folder: &str,
    manifest: &Manifest,
    site: &SiteConfig,
) -> Result<String, SiteError> {
    let dir = root.join(folder);
    let config = ThemeConfig::load(&dir).unwrap_or_else(|e| {
        tracing::warn!(folder, error = %e, "ignoring unreadable config");
        None
    });
    let details = resolve_details(folder, manifest.find(folder), config.as_ref());
    let images = PageImages::collect(&dir, config.as_ref());
    render_theme_page(&details, &images, site)
}

/// Carries `{template_folder}/index.html` over every other theme page.
///
/// Only folders that already have an `index.html` are touched. Marked
/// regions are re-rendered from each folder's own manifest entry, config
/// and images. A template page without markers predates them, so the
/// folder gets the built-in page instead.
///
/// # Errors
///
/// Returns `SiteError::MissingTemplate` if the template page does not exist,
/// `SiteError::InvalidSiteUrl` if the site URL is unusable and
/// `SiteError::Write` if the site root cannot be listed.
pub fn refresh_pages(
    root: &Path,
    manifest: &Manifest,
    site: &SiteConfig,
    template_folder: &str,
    is_excluded: impl Fn(&str) -> bool,
) -> Result<RefreshReport, SiteError> {
    let template_path = root.join(template_folder).join(PAGE_FILE);
    let layout = std::fs::read_to_string(&template_path)
        .map_err(|_| SiteError::MissingTemplate(template_path.clone()))?;
    tracing::debug!(path = %template_path.display(), bytes = layout.len(), "loaded template page");

    let folders = theme_folders_with(root, is_excluded, &[PAGE_FILE]).map_err(|source| {
        SiteError::Write {
            path: root.to_path_buf(),
            source,
        }
    })?;

    let mut report = RefreshReport::default();
    for folder in folders.into_iter().filter(|f| f.name != template_folder) {
        let rendered = match render_for(root, &folder.name, manifest, site) {
            Ok(html) => html,
            Err(e @ SiteError::InvalidSiteUrl(_)) => return Err(e),
            Err(e) => {
                tracing::error!(folder = %folder.name, error = %e, "failed to render theme page");
                report.failed.push(folder.name);
                continue;
            }
        };
        let page = splice_regions(&layout, &rendered).unwrap_or_else(|| {
            tracing::warn!(folder = %folder.name, "template page has no theme regions, using built-in page");
            rendered
        });

        let target = folder.path.join(PAGE_FILE);
        match std::fs::write(&target, page) {
            Ok(()) => {
                tracing::info!(folder = %folder.name, "refreshed theme page");
                report.updated.push(folder.name);
            }
            Err(e) => {
                tracing::error!(folder = %folder.name, error = %e, "failed to refresh theme page");
                report.failed.push(folder.name);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::manifest::ThemeEntry;
    use std::fs;

    fn page(root: &Path, folder: &str, content: &str) {
        fs::create_dir_all(root.join(folder)).unwrap();
        fs::write(root.join(folder).join(PAGE_FILE), content).unwrap();
    }

    fn manifest() -> Manifest {
        let mut melody = ThemeEntry::new("MelodyMuncher");
        melody.name = Some("Melody Muncher".to_string());
        let mut xfiles = ThemeEntry::new("XFiles");
        xfiles.name = Some("The X Files".to_string());
        Manifest {
            themes: vec![melody, xfiles],
            ..Manifest::default()
        }
    }

    fn rendered_page(root: &Path, folder: &str, manifest: &Manifest, site: &SiteConfig) -> String {
        render_for(root, folder, manifest, site).unwrap()
    }

    #[test]
    fn test_splice_keeps_layout_and_swaps_regions() {
        let layout = "<b>new</b><!-- theme:a -->A1<!-- /theme:a --> mid <!-- theme:b -->B1<!-- /theme:b -->";
        let rendered = "old<!-- theme:b -->B2<!-- /theme:b --><!-- theme:a -->A2<!-- /theme:a -->";
        assert_eq!(
            splice_regions(layout, rendered).unwrap(),
            "<b>new</b><!-- theme:a -->A2<!-- /theme:a --> mid <!-- theme:b -->B2<!-- /theme:b -->"
        );
    }

    #[test]
    fn test_splice_rejects_unmarked_or_mismatched_pages() {
        assert!(splice_regions("<p>plain</p>", "<!-- theme:a -->x<!-- /theme:a -->").is_none());
        assert!(splice_regions("<!-- theme:a -->open", "<!-- theme:a -->x<!-- /theme:a -->").is_none());
        assert!(splice_regions("<!-- theme:c -->x<!-- /theme:c -->", "<!-- theme:a -->x<!-- /theme:a -->").is_none());
    }

    #[test]
    fn test_refreshed_page_keeps_its_own_theme_data() {
        let root = tempfile::tempdir().unwrap();
        let site = SiteConfig::default();
        let manifest = manifest();

        fs::create_dir_all(root.path().join("MelodyMuncher")).unwrap();
        fs::write(root.path().join("MelodyMuncher/mm_bg.png"), b"png").unwrap();
        fs::write(
            root.path().join("MelodyMuncher/config.json"),
            r#"{"itemConfig": {"background": "mm_bg.png"}}"#,
        )
        .unwrap();
        let template = rendered_page(root.path(), "MelodyMuncher", &manifest, &site)
            .replace("Back to All Themes", "Back to the Gallery");
        page(root.path(), "MelodyMuncher", &template);
        page(root.path(), "XFiles", "old page");
        page(root.path(), "creators", "not a theme");
        fs::create_dir(root.path().join("NoPage")).unwrap();

        let report =
            refresh_pages(root.path(), &manifest, &site, "MelodyMuncher", |n| n == "creators").unwrap();

        assert_eq!(report.updated, vec!["XFiles".to_string()]);
        assert!(report.failed.is_empty());

        let xfiles = fs::read_to_string(root.path().join("XFiles").join(PAGE_FILE)).unwrap();
        assert!(xfiles.contains("Back to the Gallery"));
        assert!(xfiles.contains("const BAKED_FOLDER = \"XFiles\";"));
        assert!(xfiles.contains("const CAROUSEL_IMAGES = [];"));
        assert!(xfiles.contains("<title>The X Files - "));
        assert!(xfiles.contains(&crate::site::page::page_url(&site.site_url, "XFiles").unwrap()));
        assert!(!xfiles.contains("mm_bg.png"));
        assert!(!xfiles.contains("Melody Muncher"));
        assert!(!xfiles.contains("MelodyMuncher"));

        assert_eq!(
            fs::read_to_string(root.path().join("creators").join(PAGE_FILE)).unwrap(),
            "not a theme"
        );
        assert!(!root.path().join("NoPage").join(PAGE_FILE).exists());
    }

    #[test]
    fn test_unmarked_template_falls_back_to_built_in_page() {
        let root = tempfile::tempdir().unwrap();
        let site = SiteConfig::default();
        page(root.path(), "MelodyMuncher", "<p>hand made</p>");
        page(root.path(), "XFiles", "old page");

        let report =
            refresh_pages(root.path(), &Manifest::default(), &site, "MelodyMuncher", |_| false).unwrap();

        assert_eq!(report.updated, vec!["XFiles".to_string()]);
        let xfiles = fs::read_to_string(root.path().join("XFiles").join(PAGE_FILE)).unwrap();
        assert!(!xfiles.contains("hand made"));
        assert!(xfiles.contains("const BAKED_FOLDER = \"XFiles\";"));
    }

    #[test]
    fn test_missing_template() {
        let root = tempfile::tempdir().unwrap();
        let err = refresh_pages(root.path(), &Manifest::default(), &SiteConfig::default(), "MelodyMuncher", |_| false)
            .unwrap_err();
        assert!(matches!(err, SiteError::MissingTemplate(_)));
    }
}
