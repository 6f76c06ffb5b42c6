//! Per-theme landing pages.
//!
//! Every manifest theme gets `{folder}/index.html`. The server-side render
//! bakes in the resolved details and the static gallery; the embedded
//! script re-reads `themes.json` and `config.json` at load time so a theme
//! author can change their details without regenerating the page.

use std::path::Path;

use url::Url;

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::site::template::{TemplateVars, escape_html, js_string, js_string_array, render};
use crate::theme::config::ThemeConfig;
use crate::theme::manifest::Manifest;
use crate::theme::resolve::{ThemeDetails, resolve_details};
use crate::theme::scan::{cover_image, gallery_images, preferred_variant};

/// The per-theme page template.
pub const THEME_PAGE_TEMPLATE: &str = include_str!("templates/theme_page.html");

/// File name of generated pages.
pub const PAGE_FILE: &str = "index.html";

/// Shown in place of the gallery when a theme has no cover or screenshot.
pub const NO_PREVIEW_HTML: &str = "<p>No preview images available.</p>";

/// Outcome of [`write_theme_pages`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// `(folder, gallery image count)` for each page written.
    pub written: Vec<(String, usize)>,
    /// Folders whose page could not be written.
    pub failed: Vec<String>,
}

/// Returns `true` if `folder` is usable as a single path segment.
#[must_use]
pub fn is_safe_folder_name(folder: &str) -> bool {
    !folder.is_empty()
        && folder != "."
        && folder != ".."
        && !folder.contains(['/', '\\'])
}

/// Public URL of a theme's page: the site URL with `folder` appended as one
/// percent-encoded path segment.
///
/// # Errors
///
/// Returns `SiteError::InvalidSiteUrl` if `site_url` cannot carry a path.
pub fn page_url(site_url: &str, folder: &str) -> Result<String, SiteError> {
    let mut url =
        Url::parse(site_url).map_err(|_| SiteError::InvalidSiteUrl(site_url.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| SiteError::InvalidSiteUrl(site_url.to_string()))?
        .pop_if_empty()
        .push(folder);
    Ok(url.to_string())
}

/// Renders the static gallery block.
#[must_use]
pub fn render_gallery(images: &[String], name: &str) -> String {
    if images.is_empty() {
        return NO_PREVIEW_HTML.to_string();
    }

    let alt = escape_html(name);
    let mut html = String::from("<div class=\"gallery\">");
    for image in images {
        let src = escape_html(image);
        html.push_str(&format!(
            "\n            <div class=\"gallery-item\">\n                \
             <img src=\"{src}\" alt=\"{alt}\" class=\"screenshot\" loading=\"lazy\">\n                \
             <div class=\"image-label\">{src}</div>\n            </div>"
        ));
    }
    html.push_str("\n        </div>");
    html
}

fn author_html(details: &ThemeDetails) -> String {
    let author = escape_html(&details.author);
    match details
        .author_url
        .as_deref()
        .filter(|u| u.starts_with("https://") || u.starts_with("http://"))
    {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{author}</a>",
            escape_html(url)
        ),
        None => author,
    }
}

/// Inputs for one theme page beyond its resolved details.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageImages {
    /// Cover and screenshot files for the static gallery.
    pub gallery: Vec<String>,
    /// Config-referenced images for the carousel, device variants preferred.
    pub carousel: Vec<String>,
    /// Cover image, used for link previews.
    pub cover: Option<String>,
}

impl PageImages {
    /// Collects the images of the theme folder at `dir`.
    #[must_use]
    pub fn collect(dir: &Path, config: Option<&ThemeConfig>) -> Self {
        let carousel = config
            .map(ThemeConfig::image_files)
            .unwrap_or_default()
            .into_iter()
            .map(|f| preferred_variant(dir, &f))
            .filter(|f| dir.join(f).is_file())
            .collect();
        Self {
            gallery: gallery_images(dir),
            carousel,
            cover: cover_image(dir),
        }
    }
}

/// Renders a theme's `index.html`.
///
/// # Errors
///
/// Returns `SiteError::InvalidSiteUrl` if the page URL cannot be built.
pub fn render_theme_page(
    details: &ThemeDetails,
    images: &PageImages,
    site: &SiteConfig,
) -> Result<String, SiteError> {
    let url = page_url(&site.site_url, &details.folder)?;
    let cover_url = match &images.cover {
        Some(cover) => format!("{url}/{cover}"),
        None => String::new(),
    };
    let listing = site.contents_url("");
    let contents_api = format!("{}/", listing.split('?').next().unwrap_or_default());

    let mut vars = TemplateVars::new();
    vars.insert("name", escape_html(&details.name));
    vars.insert("author_html", author_html(details));
    vars.insert("description", escape_html(&details.description));
    vars.insert("gallery", render_gallery(&images.gallery, &details.name));
    vars.insert("folder_js", js_string(&details.folder));
    vars.insert("name_js", js_string(&details.name));
    vars.insert("contents_api_js", js_string(&contents_api));
    vars.insert("ref_js", js_string(&site.repository.branch));
    vars.insert("carousel_js", js_string_array(&images.carousel));
    vars.insert("page_url", escape_html(&url));
    vars.insert("cover_url", escape_html(&cover_url));
    vars.insert("site_title", escape_html(&site.title));
    vars.insert("site_title_js", js_string(&site.title));

    Ok(render(THEME_PAGE_TEMPLATE, &vars))
}

fn write_page(root: &Path, folder: &str, content: &str) -> Result<(), SiteError> {
    let dir = root.join(folder);
    std::fs::create_dir_all(&dir).map_err(|source| SiteError::Write {
        path: dir.clone(),
        source,
    })?;
    let path = dir.join(PAGE_FILE);
    std::fs::write(&path, content).map_err(|source| SiteError::Write { path, source })
}

/// Writes `{folder}/index.html` for every manifest theme.
///
/// Missing folders are created. A theme that fails is logged and counted;
/// the remaining themes are still written.
///
/// # Errors
///
/// Returns `SiteError::InvalidSiteUrl` if the site URL is unusable, since
/// every page would fail the same way.
pub fn write_theme_pages(
    root: &Path,
    manifest: &Manifest,
    site: &SiteConfig,
) -> Result<PageReport, SiteError> {
    page_url(&site.site_url, "")?;

    let mut report = PageReport::default();
    for entry in &manifest.themes {
        let folder = entry.folder.as_str();
        if !is_safe_folder_name(folder) {
            tracing::warn!(folder, "skipping manifest entry with unusable folder name");
            report.failed.push(folder.to_string());
            continue;
        }

        let dir = root.join(folder);
        let config = match ThemeConfig::load(&dir) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(folder, error = %e, "ignoring unreadable config");
                None
            }
        };
        let details = resolve_details(folder, Some(entry), config.as_ref());
        let images = PageImages::collect(&dir, config.as_ref());

        match render_theme_page(&details, &images, site).and_then(|html| write_page(root, folder, &html)) {
            Ok(()) => {
                tracing::info!(folder, images = images.gallery.len(), "generated theme page");
                report.written.push((folder.to_string(), images.gallery.len()));
            }
            Err(e) => {
                tracing::error!(folder, error = %e, "failed to generate theme page");
                report.failed.push(folder.to_string());
            }
        }
    }
    Ok(report)
}
