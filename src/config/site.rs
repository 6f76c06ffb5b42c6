//! `themes-site.yaml` schema and loader.
//!
//! Every field is optional; defaults describe the public Y1 theme gallery.
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default name of the site configuration file inside the site root.
pub const SITE_CONFIG_FILE: &str = "themes-site.yaml";

/// Repository hosting the theme folders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// GitHub owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Branch the site is built from.
    pub branch: String,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            owner: "y1-community".to_string(),
            name: "InnioasisY1Themes".to_string(),
            branch: "main".to_string(),
        }
    }
}

impl Repository {
    /// Browser URL of the repository.
    #[must_use]
    pub fn web_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

/// Site-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public URL the site is served from.
    pub site_url: String,

    /// Human-readable site title used in generated pages.
    pub title: String,

    /// Repository hosting the theme files.
    pub repository: Repository,

    /// Base URL of the contents listing API.
    pub api_base: String,

    /// Base URL for raw file downloads (manifest and configs).
    pub raw_base: String,

    /// Manifest file name, relative to the site root.
    pub manifest: PathBuf,

    /// Theme whose `index.html` and README act as templates for the rest.
    pub template_theme: String,

    /// Top-level directories that are never themes.
    pub exclude_dirs: Vec<String>,

    /// Per-request timeout for remote calls, e.g. `"30s"`.
    #[serde(with = "humantime_serde_compat")]
    pub request_timeout: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: "https://themes.innioasis.app".to_string(),
            title: "Innioasis Y1 Themes".to_string(),
            repository: Repository::default(),
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            manifest: PathBuf::from("themes.json"),
            template_theme: "MelodyMuncher".to_string(),
            exclude_dirs: ["creators", "docs", "__pycache__", "node_modules", "target"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl SiteConfig {
    /// URL of the contents listing for `path` in the configured repository.
    #[must_use]
    pub fn contents_url(&self, path: &str) -> String {
        let repo = &self.repository;
        let base = repo_url(
            &self.api_base,
            &["repos", &repo.owner, &repo.name, "contents"],
            path,
        );
        format!("{base}?ref={}", repo.branch)
    }

    /// Raw download URL for a file in the configured repository.
    #[must_use]
    pub fn raw_url(&self, path: &str) -> String {
        let repo = &self.repository;
        repo_url(&self.raw_base, &[&repo.owner, &repo.name, &repo.branch], path)
    }

    /// Returns `true` if a top-level directory name is excluded from theme scans.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        name.starts_with('.') || self.exclude_dirs.iter().any(|d| d == name)
    }

    /// Checks values the generators rely on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `site_url` or `api_base` is
    /// not an absolute http(s) URL, or `template_theme` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("site_url", &self.site_url),
            ("api_base", &self.api_base),
            ("raw_base", &self.raw_base),
        ] {
            let ok = url::Url::parse(value)
                .is_ok_and(|u| matches!(u.scheme(), "http" | "https"));
            if !ok {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    expected: "an absolute http(s) URL".to_string(),
                });
            }
        }
        if self.template_theme.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "template_theme".to_string(),
                value: self.template_theme.clone(),
                expected: "a theme folder name".to_string(),
            });
        }
        Ok(())
    }
}

/// `base` followed by `prefix` and the `/`-separated parts of `path`, each
/// percent-encoded as one path segment.
fn repo_url(base: &str, prefix: &[&str], path: &str) -> String {
    let parts = path.split('/').filter(|s| !s.is_empty());
    let Ok(mut url) = url::Url::parse(base) else {
        let rest: Vec<&str> = prefix.iter().copied().chain(parts).collect();
        return format!("{}/{}", base.trim_end_matches('/'), rest.join("/"));
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(prefix).extend(parts);
    }
    url.into()
}

/// Loads the site configuration.
///
/// With an explicit `path` the file must exist. Without one,
/// `{root}/themes-site.yaml` is used when present and defaults otherwise.
///
/// # Errors
///
/// Returns `ConfigError::Io` if an explicit file cannot be read,
/// `ConfigError::Parse` on malformed YAML, and `ConfigError::InvalidValue`
/// if the loaded values fail [`SiteConfig::validate`].
pub fn load_site_config(root: &Path, path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let candidate = path.map_or_else(|| root.join(SITE_CONFIG_FILE), Path::to_path_buf);

    if path.is_none() && !candidate.exists() {
        tracing::debug!(path = %candidate.display(), "no site config, using defaults");
        return Ok(SiteConfig::default());
    }

    let content = std::fs::read_to_string(&candidate).map_err(|source| ConfigError::Io {
        path: candidate.clone(),
        source,
    })?;

    let config: SiteConfig = if content.trim().is_empty() {
        SiteConfig::default()
    } else {
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: candidate.clone(),
            message: e.to_string(),
        })?
    };

    config.validate()?;
    tracing::debug!(path = %candidate.display(), "loaded site config");
    Ok(config)
}

/// Deserializes `humantime` strings such as `"30s"` or `"2m"`.
mod humantime_serde_compat {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
