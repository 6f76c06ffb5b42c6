//! Root gallery page generation.
//!
//! Generates `{root}/index.html`, a card per manifest theme with a
//! client-side search filter.

use std::path::Path;

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::site::template::{TemplateVars, escape_html, render};
use crate::theme::config::ThemeConfig;
use crate::theme::manifest::Manifest;
use crate::theme::resolve::{ThemeDetails, resolve_details};
use crate::theme::scan::cover_image;

/// The root gallery page template.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// A theme card on the root page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCard {
    /// Resolved display details.
    pub details: ThemeDetails,
    /// Cover file name inside the theme folder.
    pub cover: Option<String>,
}

/// Builds the cards for every manifest theme, in manifest order.
#[must_use]
pub fn collect_cards(root: &Path, manifest: &Manifest) -> Vec<IndexCard> {
    manifest
        .themes
        .iter()
        .map(|entry| {
            let dir = root.join(&entry.folder);
            let config = ThemeConfig::load(&dir).ok().flatten();
            IndexCard {
                details: resolve_details(&entry.folder, Some(entry), config.as_ref()),
                cover: cover_image(&dir),
            }
        })
        .collect()
}

/// Render a single card.
fn render_card(card: &IndexCard) -> String {
    let d = &card.details;
    let href = escape_html(&format!("{}/", d.folder));
    let name = escape_html(&d.name);
    let search = escape_html(&format!("{} {} {}", d.name, d.author, d.description).to_lowercase());

    let image = card.cover.as_ref().map_or_else(
        || "<div class=\"no-cover\">No preview</div>".to_string(),
        |cover| {
            format!(
                "<img src=\"{}\" alt=\"{name}\" loading=\"lazy\">",
                escape_html(&format!("{}/{cover}", d.folder))
            )
        },
    );

    // Cards are links already, so the author stays plain text.
    format!(
        "        <a class=\"card\" href=\"{href}\" data-search=\"{search}\">\n            \
         {image}\n            <div class=\"body\">\n                <h2>{name}</h2>\n                \
         <div class=\"author\">by {}</div>\n                <div class=\"description\">{}</div>\n            \
         </div>\n        </a>",
        escape_html(&d.author),
        escape_html(&d.description),
    )
}

/// Generate the root gallery page.
#[must_use]
pub fn render_index_page(cards: &[IndexCard], site: &SiteConfig) -> String {
    let rendered: Vec<String> = cards.iter().map(render_card).collect();

    let mut vars = TemplateVars::new();
    vars.insert("site_title", escape_html(&site.title));
    vars.insert("site_url", escape_html(site.site_url.trim_end_matches('/')));
    vars.insert("theme_count", cards.len().to_string());
    vars.insert("cards", rendered.join("\n"));
    vars.insert("template_theme", escape_html(&site.template_theme));
    vars.insert("repo_url", escape_html(&site.repository.web_url()));
    render(INDEX_TEMPLATE, &vars)
}

/// Writes `{root}/index.html`.
///
/// # Errors
///
/// Returns `SiteError::Write` if the page cannot be written.
pub fn write_index_page(root: &Path, manifest: &Manifest, site: &SiteConfig) -> Result<usize, SiteError> {
    let cards = collect_cards(root, manifest);
    let path = root.join("index.html");
    std::fs::write(&path, render_index_page(&cards, site))
        .map_err(|source| SiteError::Write { path, source })?;
    Ok(cards.len())
}
