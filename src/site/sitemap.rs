//! XML sitemap generation.
//!
//! The sitemap lists the site root followed by one URL per unique theme
//! folder, in manifest order.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::SiteError;
use crate::site::page::page_url;
use crate::site::template::escape_xml;

/// Default sitemap file name.
pub const SITEMAP_FILE: &str = "sitemap.xml";

const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Renders the sitemap for `folders`.
///
/// Duplicate folders produce a single entry.
///
/// # Errors
///
/// Returns `SiteError::InvalidSiteUrl` if `site_url` cannot carry a path.
pub fn render_sitemap<'a>(
    site_url: &str,
    folders: impl IntoIterator<Item = &'a str>,
    lastmod: NaiveDate,
) -> Result<String, SiteError> {
    let lastmod = lastmod.format("%Y-%m-%d").to_string();
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{XMLNS}\">");

    push_url(&mut xml, &page_url(site_url, "")?, &lastmod, "1.0");

    let mut seen = HashSet::new();
    for folder in folders {
        if !seen.insert(folder) {
            continue;
        }
        push_url(&mut xml, &page_url(site_url, folder)?, &lastmod, "0.8");
    }

    xml.push_str("</urlset>\n");
    Ok(xml)
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str, priority: &str) {
    let _ = write!(
        xml,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    \
         <changefreq>weekly</changefreq>\n    <priority>{priority}</priority>\n  </url>\n",
        escape_xml(loc)
    );
}

/// Writes the sitemap to `path`.
///
/// # Errors
///
/// Returns `SiteError::Write` if the file cannot be written.
pub fn write_sitemap(path: &Path, xml: &str) -> Result<(), SiteError> {
    std::fs::write(path, xml).map_err(|source| SiteError::Write {
        path: path.to_path_buf(),
        source,
    })
}
