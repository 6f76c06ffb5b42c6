//! Theme detail resolution.
//!
//! A theme's displayed name, author and description come from the first
//! source that has them: its own `config.json`, then the shared manifest
//! entry, then a default derived from the folder name.

use serde::Serialize;

use crate::theme::config::ThemeConfig;
use crate::theme::manifest::ThemeEntry;

/// Author shown when no source names one.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Resolved display details for a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDetails {
    /// Folder name.
    pub folder: String,
    /// Display name.
    pub name: String,
    /// Author display name.
    pub author: String,
    /// Link to the author's page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    /// Description.
    pub description: String,
}

/// Default description for a theme without one.
#[must_use]
pub fn default_description(name: &str) -> String {
    format!("Y1 Theme: {name}")
}

/// Resolves display details through config > manifest > defaults.
#[must_use]
pub fn resolve_details(
    folder: &str,
    entry: Option<&ThemeEntry>,
    config: Option<&ThemeConfig>,
) -> ThemeDetails {
    let info = config.map(ThemeConfig::info).unwrap_or_default();
    let pick = |from_config: Option<String>, from_entry: Option<&String>| {
        from_config.or_else(|| {
            from_entry
                .filter(|s| !s.trim().is_empty())
                .cloned()
        })
    };

    let name = pick(info.title, entry.and_then(|e| e.name.as_ref()))
        .unwrap_or_else(|| folder.to_string());
    let author = pick(info.author, entry.and_then(|e| e.author.as_ref()))
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
    let author_url = pick(info.author_url, entry.and_then(|e| e.author_url.as_ref()));
    let description = pick(info.description, entry.and_then(|e| e.description.as_ref()))
        .unwrap_or_else(|| default_description(&name));

    ThemeDetails {
        folder: folder.to_string(),
        name,
        author,
        author_url,
        description,
    }
}

/// Suggests the closest known folder name for a mistyped one.
///
/// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
/// Comparison is case-insensitive.
#[must_use]
pub fn suggest_folder<'a>(
    input: &str,
    known: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let needle = input.to_lowercase();
    known
        .into_iter()
        .map(|k| (k, strsim::damerau_levenshtein(&needle, &k.to_lowercase())))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn entry() -> ThemeEntry {
        ThemeEntry {
            folder: "XFiles".to_string(),
            name: Some("The X Files".to_string()),
            author: Some("manifest author".to_string()),
            author_url: Some("https://manifest.example".to_string()),
            description: Some("From the manifest".to_string()),
            extra: serde_json::Map::new(),
        }
    }

    fn config(json: &str) -> ThemeConfig {
        ThemeConfig::from_json(json, Path::new("config.json")).unwrap()
    }

    #[test]
    fn test_defaults_only() {
        let d = resolve_details("Plain", None, None);
        assert_eq!(d.name, "Plain");
        assert_eq!(d.author, DEFAULT_AUTHOR);
        assert_eq!(d.author_url, None);
        assert_eq!(d.description, "Y1 Theme: Plain");
    }

    #[test]
    fn test_manifest_over_defaults() {
        let e = entry();
        let d = resolve_details("XFiles", Some(&e), None);
        assert_eq!(d.name, "The X Files");
        assert_eq!(d.author, "manifest author");
        assert_eq!(d.description, "From the manifest");
    }

    #[test]
    fn test_config_over_manifest() {
        let e = entry();
        let c = config(r#"{"theme_info": {"author": "config author"}}"#);
        let d = resolve_details("XFiles", Some(&e), Some(&c));
        assert_eq!(d.author, "config author");
        assert_eq!(d.name, "The X Files");
        assert_eq!(d.author_url.as_deref(), Some("https://manifest.example"));
    }

    #[test]
    fn test_default_description_uses_resolved_name() {
        let c = config(r#"{"name": "Neon"}"#);
        let d = resolve_details("neon_v2", None, Some(&c));
        assert_eq!(d.description, "Y1 Theme: Neon");
    }

    #[test]
    fn test_blank_manifest_values_fall_through() {
        let mut e = entry();
        e.author = Some("  ".to_string());
        let d = resolve_details("XFiles", Some(&e), None);
        assert_eq!(d.author, DEFAULT_AUTHOR);
    }

    #[test]
    fn test_suggest_folder() {
        let known = ["MelodyMuncher", "XFiles", "Retro"];
        assert_eq!(
            suggest_folder("melodymunchr", known).as_deref(),
            Some("MelodyMuncher")
        );
        assert_eq!(suggest_folder("xfile", known).as_deref(), Some("XFiles"));
        assert_eq!(suggest_folder("Completely different", known), None);
    }
}
