//! The shared theme manifest (`themes.json`).
//!
//! A JSON object whose `themes` array lists every published theme with its
//! display metadata. The manifest generator ([`Manifest::sync`]) keeps it in
//! line with the theme folders on disk: every folder with a cover image
//! appears exactly once, and no entry points at a folder that is gone.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ManifestError;
use crate::theme::config::ThemeConfig;
use crate::theme::resolve::resolve_details;
use crate::theme::scan::{ThemeFolder, has_cover_image};

/// One theme record in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeEntry {
    /// Folder name; the manifest key.
    pub folder: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

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

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Fields this tool does not model (e.g. `screenshot`), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ThemeEntry {
    /// A bare entry for `folder`.
    #[must_use]
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: None,
            author: None,
            author_url: None,
            description: None,
            extra: Map::new(),
        }
    }
}

/// The manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Theme records in display order.
    #[serde(default)]
    pub themes: Vec<ThemeEntry>,

    /// Other top-level keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for [`Manifest::sync`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Keep entries whose folder no longer exists on disk.
    pub keep_missing: bool,
}

/// What [`Manifest::sync`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Folders appended as new entries.
    pub added: Vec<String>,
    /// Entries dropped because their folder is gone.
    pub removed_missing: Vec<String>,
    /// Later duplicate entries dropped.
    pub removed_duplicates: Vec<String>,
}

impl SyncReport {
    /// Returns `true` if the sync changed nothing.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed_missing.is_empty() && self.removed_duplicates.is_empty()
    }
}

impl Manifest {
    /// Parses manifest JSON.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Parse` if the text is not a manifest object.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ManifestError> {
        serde_json::from_str(text).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::NotFound` if the file is absent,
    /// `ManifestError::Io` if it cannot be read, and `ManifestError::Parse`
    /// if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&text, path)
    }

    /// Like [`load`](Self::load) but an absent file is an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Io` or `ManifestError::Parse` as `load` does.
    pub fn load_or_default(path: &Path) -> Result<Self, ManifestError> {
        match Self::load(path) {
            Err(ManifestError::NotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Serializes with 4-space indentation and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        let mut text = String::from_utf8(buf).unwrap_or_default();
        text.push('\n');
        Ok(text)
    }

    /// Returns `true` if [`save`](Self::save) would write `path`, either
    /// because the entries differ or because the file is formatted
    /// differently.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Json` if serialization fails.
    pub fn needs_write(&self, path: &Path) -> Result<bool, ManifestError> {
        Ok(differs_from_file(&self.to_json()?, path))
    }

    /// Writes the manifest to `path`. Returns `false` when the file already
    /// held identical content and was left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Io` if writing fails.
    pub fn save(&self, path: &Path) -> Result<bool, ManifestError> {
        let text = self.to_json()?;
        if !differs_from_file(&text, path) {
            return Ok(false);
        }
        std::fs::write(path, text).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    /// Finds the entry for `folder`.
    #[must_use]
    pub fn find(&self, folder: &str) -> Option<&ThemeEntry> {
        self.themes.iter().find(|t| t.folder == folder)
    }

    /// Folder names in manifest order.
    #[must_use]
    pub fn folders(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.folder.as_str()).collect()
    }

    /// Drops later entries that repeat a folder. Returns the dropped folders.
    pub fn dedupe(&mut self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut removed = Vec::new();
        self.themes.retain(|t| {
            if seen.insert(t.folder.clone()) {
                true
            } else {
                removed.push(t.folder.clone());
                false
            }
        });
        removed
    }

    /// Brings the manifest in line with the theme folders under `root`.
    ///
    /// `folders` are the candidate theme folders (see
    /// [`discover_themes`](crate::theme::scan::discover_themes)); those with a
    /// cover image and no entry are appended in the given order, with details
    /// taken from their `config.json` when present. Existing entries keep
    /// their position and content.
    pub fn sync(&mut self, root: &Path, folders: &[ThemeFolder], options: SyncOptions) -> SyncReport {
        let mut report = SyncReport {
            removed_duplicates: self.dedupe(),
            ..SyncReport::default()
        };

        if !options.keep_missing {
            self.themes.retain(|t| {
                let exists = !t.folder.is_empty() && root.join(&t.folder).is_dir();
                if !exists {
                    tracing::warn!(folder = %t.folder, "manifest entry has no folder, removing");
                    report.removed_missing.push(t.folder.clone());
                }
                exists
            });
        }

        let known: HashSet<String> = self.themes.iter().map(|t| t.folder.clone()).collect();
        for folder in folders {
            if known.contains(&folder.name) || !has_cover_image(&folder.path) {
                continue;
            }

            let config = match ThemeConfig::load(&folder.path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(folder = %folder.name, error = %e, "ignoring unreadable config");
                    None
                }
            };
            let details = resolve_details(&folder.name, None, config.as_ref());

            tracing::info!(folder = %folder.name, "adding theme to manifest");
            self.themes.push(ThemeEntry {
                folder: folder.name.clone(),
                name: Some(details.name),
                author: Some(details.author),
                author_url: details.author_url,
                description: Some(details.description),
                extra: Map::new(),
            });
            report.added.push(folder.name.clone());
        }

        report
    }
}

fn differs_from_file(text: &str, path: &Path) -> bool {
    !std::fs::read_to_string(path).is_ok_and(|existing| existing == text)
}
