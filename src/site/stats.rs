//! Release download-tracking files.
//!
//! One empty `{folder}_stat` file per theme, uploaded as release assets so
//! their download counts can be shown on the site.

use std::path::{Path, PathBuf};

use crate::error::SiteError;
use crate::site::page::PAGE_FILE;
use crate::theme::config::CONFIG_FILE;
use crate::theme::scan::theme_folders_with;

/// Suffix appended to each folder name.
pub const STAT_SUFFIX: &str = "_stat";

/// Creates `{out_dir}/{folder}_stat` for every theme folder with an
/// `index.html` or `config.json`. Returns the created file names, sorted.
///
/// # Errors
///
/// Returns `SiteError::Write` if the root cannot be listed or a file cannot
/// be created.
pub fn write_stat_files(
    root: &Path,
    out_dir: &Path,
    is_excluded: impl Fn(&str) -> bool,
) -> Result<Vec<String>, SiteError> {
    let write_err = |path: PathBuf| move |source: std::io::Error| SiteError::Write { path, source };

    let folders = theme_folders_with(root, is_excluded, &[PAGE_FILE, CONFIG_FILE])
        .map_err(write_err(root.to_path_buf()))?;
    std::fs::create_dir_all(out_dir).map_err(write_err(out_dir.to_path_buf()))?;

    let mut created = Vec::with_capacity(folders.len());
    for folder in folders {
        let name = format!("{}{STAT_SUFFIX}", folder.name);
        let path = out_dir.join(&name);
        std::fs::write(&path, b"").map_err(write_err(path.clone()))?;
        tracing::debug!(file = %name, "created stat file");
        created.push(name);
    }
    Ok(created)
}
