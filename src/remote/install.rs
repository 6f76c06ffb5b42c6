//! Installing a theme onto local storage.
//!
//! Mirrors the page's "Install on Y1" button: list the theme folder, then
//! fetch and write each file in turn. A file that fails is skipped.

use std::path::{Component, Path, PathBuf};

use crate::error::RemoteError;
use crate::remote::listing::{ContentSource, RemoteFile, list_recursive};

/// Outcome of a theme transfer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Relative paths transferred.
    pub written: Vec<String>,
    /// Relative paths skipped, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl TransferReport {
    /// Total files seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len()
    }
}

/// Returns `true` if the `/`-separated `relative` path stays below whatever
/// it is joined onto.
#[must_use]
pub fn is_safe_relative(relative: &str) -> bool {
    !relative.is_empty()
        && !relative.contains('\\')
        && Path::new(relative)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// Joins a `/`-separated remote path onto `base`, refusing anything that
/// would escape it.
#[must_use]
pub fn safe_join(base: &Path, relative: &str) -> Option<PathBuf> {
    is_safe_relative(relative).then(|| base.join(relative))
}

/// Fails unless `folder` is a single safe path segment.
///
/// # Errors
///
/// Returns `RemoteError::InvalidResponse` naming the folder.
pub fn check_folder(folder: &str) -> Result<(), RemoteError> {
    if is_safe_relative(folder) && !folder.contains('/') {
        return Ok(());
    }
    Err(RemoteError::InvalidResponse {
        url: folder.to_string(),
        message: "folder name is not a single path segment".to_string(),
    })
}

/// Lists `folder` and fails when it holds no files.
pub(crate) async fn list_theme<S: ContentSource + ?Sized>(
    source: &S,
    folder: &str,
) -> Result<Vec<RemoteFile>, RemoteError> {
    let files = list_recursive(source, folder).await?;
    if files.is_empty() {
        return Err(RemoteError::EmptyTheme(folder.to_string()));
    }
    tracing::info!(folder, files = files.len(), "listed remote theme");
    Ok(files)
}

async fn write_file(path: &Path, body: &[u8]) -> Result<(), RemoteError> {
    let io_err = |source: std::io::Error| RemoteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, body).await.map_err(io_err)
}

/// Installs remote theme `folder` into `dest/{folder}`.
///
/// Files are fetched and written one at a time, creating directories as
/// needed. Per-file failures are recorded in the report.
///
/// # Errors
///
/// Returns a `RemoteError` if the top-level listing fails or the theme has
/// no files.
pub async fn install_theme<S: ContentSource + ?Sized>(
    source: &S,
    folder: &str,
    dest: &Path,
) -> Result<TransferReport, RemoteError> {
    check_folder(folder)?;
    let files = list_theme(source, folder).await?;
    let theme_dir = dest.join(folder);

    let mut report = TransferReport::default();
    for file in files {
        let Some(target) = safe_join(&theme_dir, &file.relative_path) else {
            tracing::warn!(path = %file.relative_path, "refusing unsafe path");
            report
                .skipped
                .push((file.relative_path, "unsafe path".to_string()));
            continue;
        };

        let result = match source.fetch(&file.download_url).await {
            Ok(body) => write_file(&target, &body).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                tracing::debug!(path = %target.display(), "installed file");
                report.written.push(file.relative_path);
            }
            Err(e) => {
                tracing::warn!(path = %file.relative_path, error = %e, "skipping file");
                report.skipped.push((file.relative_path, e.to_string()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::listing::tests::MemorySource;

    #[test]
    fn test_safe_join() {
        let base = Path::new("/dest");
        assert_eq!(safe_join(base, "a/b.png"), Some(PathBuf::from("/dest/a/b.png")));
        assert_eq!(safe_join(base, "../x"), None);
        assert_eq!(safe_join(base, "/etc/passwd"), None);
        assert_eq!(safe_join(base, ""), None);
        assert_eq!(safe_join(base, "..\\x"), None);
        assert!(check_folder("Neon Dreams").is_ok());
        assert!(check_folder("a/b").is_err());
    }

    #[tokio::test]
    async fn test_install_writes_tree_and_skips_failures() {
        let mut source = MemorySource::default();
        source.file("XFiles", "cover.png", b"cover");
        source.dir("XFiles", "fonts");
        source.file("XFiles/fonts", "font.ttf", b"font");
        source.file("XFiles", "gone.png", b"gone");
        source.files.remove("https://raw.example/XFiles/gone.png");

        let dest = tempfile::tempdir().unwrap();
        let report = install_theme(&source, "XFiles", dest.path()).await.unwrap();

        assert_eq!(report.written, vec!["cover.png", "fonts/font.ttf"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "gone.png");
        assert_eq!(report.total(), 3);
        assert_eq!(
            std::fs::read(dest.path().join("XFiles/fonts/font.ttf")).unwrap(),
            b"font"
        );
        assert!(!dest.path().join("XFiles/gone.png").exists());
    }

    #[tokio::test]
    async fn test_empty_theme_is_error() {
        let mut source = MemorySource::default();
        source.listings.insert("Empty".to_string(), Vec::new());
        let dest = tempfile::tempdir().unwrap();
        let err = install_theme(&source, "Empty", dest.path()).await.unwrap_err();
        assert!(matches!(err, RemoteError::EmptyTheme(_)));
    }
}
