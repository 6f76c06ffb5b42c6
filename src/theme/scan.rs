//! Theme folder discovery by naming convention.
//!
//! A theme is an immediate subdirectory of the site root. Its cover image
//! (`cover.png`, `Cover.JPG`, ...) is what makes it show up in the manifest,
//! and `cover`/`screenshot` images form the static gallery on its page.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::theme::config::is_image_name;

/// Image stems shown in a theme page's static gallery.
pub const GALLERY_STEMS: &[&str] = &["cover", "screenshot"];

/// A theme directory under the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeFolder {
    /// Folder name (also the theme's URL segment and manifest key).
    pub name: String,
    /// Absolute or root-relative path to the folder.
    pub path: PathBuf,
}

/// Lists candidate theme folders under `root`, sorted by name.
///
/// Hidden directories and names rejected by `is_excluded` are skipped.
///
/// # Errors
///
/// Returns an I/O error if `root` cannot be read.
pub fn discover_themes(
    root: &Path,
    is_excluded: impl Fn(&str) -> bool,
) -> std::io::Result<Vec<ThemeFolder>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 folder name");
            continue;
        };
        if name.starts_with('.') || is_excluded(&name) {
            continue;
        }
        folders.push(ThemeFolder {
            name,
            path: entry.path(),
        });
    }
    folders.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(folders)
}

/// Keeps only folders that contain at least one of `markers`.
#[must_use]
pub fn with_any_file(folders: Vec<ThemeFolder>, markers: &[&str]) -> Vec<ThemeFolder> {
    folders
        .into_iter()
        .filter(|f| markers.iter().any(|m| f.path.join(m).is_file()))
        .collect()
}

/// Theme folders under `root` that contain any of `markers`.
///
/// # Errors
///
/// Returns an I/O error if `root` cannot be read.
pub fn theme_folders_with(
    root: &Path,
    is_excluded: impl Fn(&str) -> bool,
    markers: &[&str],
) -> std::io::Result<Vec<ThemeFolder>> {
    Ok(with_any_file(discover_themes(root, is_excluded)?, markers))
}

/// File names directly inside `folder`, sorted. Unreadable folders yield none.
#[must_use]
pub fn file_names(folder: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(folder) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|e| e.file_name().to_str().map(ToString::to_string))
        .collect();
    names.sort();
    names
}

fn lower_stem(name: &str) -> Option<String> {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
}

/// Returns `true` if `folder` contains a cover image.
#[must_use]
pub fn has_cover_image(folder: &Path) -> bool {
    file_names(folder)
        .iter()
        .any(|n| is_image_name(n) && lower_stem(n).as_deref() == Some("cover"))
}

/// Cover and screenshot images in `folder`, sorted, one per lowercase name.
#[must_use]
pub fn gallery_images(folder: &Path) -> Vec<String> {
    let mut seen = HashSet::new();
    file_names(folder)
        .into_iter()
        .filter(|n| is_image_name(n))
        .filter(|n| lower_stem(n).is_some_and(|s| GALLERY_STEMS.contains(&s.as_str())))
        .filter(|n| seen.insert(n.to_ascii_lowercase()))
        .collect()
}

/// The first cover image in `folder`, if any.
#[must_use]
pub fn cover_image(folder: &Path) -> Option<String> {
    gallery_images(folder)
        .into_iter()
        .find(|n| lower_stem(n).as_deref() == Some("cover"))
}

/// Picks the device-specific variant of `file` when one exists.
///
/// `1_YS.png` takes priority over `1.png`; among several suffixed variants
/// the lexicographically first wins. Falls back to `file` itself.
#[must_use]
pub fn preferred_variant(folder: &Path, file: &str) -> String {
    let path = Path::new(file);
    let (Some(stem), Some(ext)) = (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) else {
        return file.to_string();
    };
    let prefix = format!("{stem}_");
    let dir = folder.join(path.parent().unwrap_or_else(|| Path::new("")));

    file_names(&dir)
        .into_iter()
        .find(|n| {
            Path::new(n).extension().and_then(|e| e.to_str()) == Some(ext)
                && Path::new(n)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| s.starts_with(&prefix) && s.len() > prefix.len())
        })
        .map_or_else(
            || file.to_string(),
            |variant| match path.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(parent) => format!("{}/{variant}", parent.display()),
                None => variant,
            },
        )
}
