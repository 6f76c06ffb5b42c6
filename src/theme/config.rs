//! Per-theme `config.json`.
//!
//! The file is loosely typed: a few well-known keys carry display metadata,
//! and free-form sections (`itemConfig`, `menuConfig`, `dialogConfig`)
//! assign colors, image files and feature toggles. Unknown keys are kept
//! as-is.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// File name of the per-theme configuration.
pub const CONFIG_FILE: &str = "config.json";

/// Extensions treated as theme images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Display metadata block (`theme_info`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInfo {
    /// Theme title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Link to the author's page.
    #[serde(
        default,
        rename = "authorUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_url: Option<String>,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A theme's `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Structured metadata block used by newer themes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_info: Option<ThemeInfo>,

    /// Flat display name used by older themes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Flat title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Flat author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Flat author URL.
    #[serde(
        default,
        rename = "authorUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_url: Option<String>,

    /// Flat description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Colors and images for list items.
    #[serde(
        default,
        rename = "itemConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_config: Option<Value>,

    /// Colors and images for menus.
    #[serde(
        default,
        rename = "menuConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub menu_config: Option<Value>,

    /// Colors and images for dialogs.
    #[serde(
        default,
        rename = "dialogConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub dialog_config: Option<Value>,

    /// Every other key.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ThemeConfig {
    /// Parses a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not a JSON object.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads `{folder}/config.json`. An absent file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file exists but cannot be read and
    /// `ConfigError::Parse` if it is not valid JSON.
    pub fn load(folder: &Path) -> Result<Option<Self>, ConfigError> {
        let path = folder.join(CONFIG_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        Self::from_json(&text, &path).map(Some)
    }

    /// Display metadata with `theme_info` taking priority over flat keys.
    #[must_use]
    pub fn info(&self) -> ThemeInfo {
        let nested = self.theme_info.clone().unwrap_or_default();
        ThemeInfo {
            title: non_empty(nested.title)
                .or_else(|| non_empty(self.name.clone()))
                .or_else(|| non_empty(self.title.clone())),
            author: non_empty(nested.author).or_else(|| non_empty(self.author.clone())),
            author_url: non_empty(nested.author_url)
                .or_else(|| non_empty(self.author_url.clone())),
            description: non_empty(nested.description)
                .or_else(|| non_empty(self.description.clone())),
        }
    }

    /// Image file names referenced anywhere in the config, first-seen order.
    #[must_use]
    pub fn image_files(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        self.walk(&mut |_, value| {
            if let Value::String(s) = value {
                let name = s.trim().trim_start_matches("./");
                if is_image_name(name) && !out.iter().any(|o| o == name) {
                    out.push(name.to_string());
                }
            }
        });
        out
    }

    /// `(json path, value)` for every string that looks like a color.
    #[must_use]
    pub fn colors(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.walk(&mut |path, value| {
            if let Value::String(s) = value {
                let looks_like_color =
                    s.starts_with('#') || path.to_ascii_lowercase().ends_with("color");
                if looks_like_color {
                    out.push((path.to_string(), s.clone()));
                }
            }
        });
        out
    }

    /// `(json path, flag)` for every boolean toggle.
    #[must_use]
    pub fn feature_flags(&self) -> Vec<(String, bool)> {
        let mut out = Vec::new();
        self.walk(&mut |path, value| {
            if let Value::Bool(b) = value {
                out.push((path.to_string(), *b));
            }
        });
        out
    }

    /// Visits every scalar in the free-form sections and unknown keys.
    fn walk(&self, visit: &mut dyn FnMut(&str, &Value)) {
        for (key, section) in [
            ("itemConfig", self.item_config.as_ref()),
            ("menuConfig", self.menu_config.as_ref()),
            ("dialogConfig", self.dialog_config.as_ref()),
        ] {
            if let Some(section) = section {
                walk_value(key, section, visit);
            }
        }
        for (key, value) in &self.extra {
            walk_value(key, value, visit);
        }
    }
}

fn walk_value(path: &str, value: &Value, visit: &mut dyn FnMut(&str, &Value)) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                walk_value(&format!("{path}.{key}"), child, visit);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk_value(&format!("{path}[{i}]"), child, visit);
            }
        }
        scalar => visit(path, scalar),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Returns `true` if `name` has an image extension (case-insensitive).
#[must_use]
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Returns `true` for `#rgb`, `#rrggbb` and `#aarrggbb`.
#[must_use]
pub fn is_valid_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r##"{
        "theme_info": {
            "title": "Melody Muncher",
            "author": "sipped",
            "authorUrl": "https://sipped.org",
            "description": "Starter theme"
        },
        "itemConfig": {
            "itemTextColor": "#ffffff",
            "itemSelectedBackground": "1.png",
            "rightArrow": "./2.png"
        },
        "menuConfig": {
            "menuBackground": "menu_bg.JPG",
            "showIcons": true,
            "accent": "#12ab"
        },
        "dialogConfig": {
            "dialogBackground": "1.png",
            "dialogTextColor": "#000"
        },
        "fontFile": "font.ttf"
    }"##;

    fn parse(text: &str) -> ThemeConfig {
        ThemeConfig::from_json(text, Path::new("config.json")).unwrap()
    }

    #[test]
    fn test_info_from_theme_info() {
        let info = parse(NESTED).info();
        assert_eq!(info.title.as_deref(), Some("Melody Muncher"));
        assert_eq!(info.author.as_deref(), Some("sipped"));
        assert_eq!(info.author_url.as_deref(), Some("https://sipped.org"));
        assert_eq!(info.description.as_deref(), Some("Starter theme"));
    }

    #[test]
    fn test_info_from_flat_keys() {
        let info = parse(r#"{"name": "XFiles", "author": "Mulder", "description": ""}"#).info();
        assert_eq!(info.title.as_deref(), Some("XFiles"));
        assert_eq!(info.author.as_deref(), Some("Mulder"));
        assert_eq!(info.description, None);
    }

    #[test]
    fn test_theme_info_wins_over_flat() {
        let info =
            parse(r#"{"author": "flat", "theme_info": {"author": "nested"}}"#).info();
        assert_eq!(info.author.as_deref(), Some("nested"));
    }

    #[test]
    fn test_image_files_dedup_and_order() {
        let images = parse(NESTED).image_files();
        assert_eq!(images, vec!["1.png", "2.png", "menu_bg.JPG"]);
    }

    #[test]
    fn test_colors() {
        let colors = parse(NESTED).colors();
        assert!(colors.contains(&("itemConfig.itemTextColor".to_string(), "#ffffff".to_string())));
        assert!(colors.contains(&("menuConfig.accent".to_string(), "#12ab".to_string())));
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_feature_flags() {
        let flags = parse(NESTED).feature_flags();
        assert_eq!(flags, vec![("menuConfig.showIcons".to_string(), true)]);
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let config = parse(NESTED);
        assert_eq!(config.extra.get("fontFile"), Some(&Value::from("font.ttf")));
        let round = serde_json::to_value(&config).unwrap();
        assert_eq!(round["fontFile"], "font.ttf");
        assert_eq!(round["itemConfig"]["rightArrow"], "./2.png");
    }

    #[test]
    fn test_invalid_json() {
        let result = ThemeConfig::from_json("{not json", Path::new("X/config.json"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ThemeConfig::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), NESTED).unwrap();
        let config = ThemeConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.info().title.as_deref(), Some("Melody Muncher"));
    }

    #[test]
    fn test_is_valid_color() {
        assert!(is_valid_color("#fff"));
        assert!(is_valid_color("#A0b1C2"));
        assert!(is_valid_color("#80ffffff"));
        assert!(!is_valid_color("#12ab"));
        assert!(!is_valid_color("ffffff"));
        assert!(!is_valid_color("#gggggg"));
    }

    #[test]
    fn test_is_image_name() {
        assert!(is_image_name("cover.PNG"));
        assert!(is_image_name("a/b.jpeg"));
        assert!(!is_image_name("font.ttf"));
        assert!(!is_image_name("png"));
    }
}
