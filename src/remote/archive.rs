//! Packing a remote theme into a ZIP.
//!
//! Mirrors the page's "Download ZIP" button: every file is fetched in turn
//! and added under `{folder}/` in an in-memory archive, which is written
//! out once complete.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::RemoteError;
use crate::remote::install::{TransferReport, check_folder, is_safe_relative, list_theme};
use crate::remote::listing::ContentSource;

/// Default archive name for `folder`.
#[must_use]
pub fn default_zip_name(folder: &str) -> String {
    format!("{folder}.zip")
}

fn archive_err(e: impl std::fmt::Display) -> RemoteError {
    RemoteError::Archive(e.to_string())
}

/// Fetches every file of `folder` into a ZIP held in memory.
///
/// # Errors
///
/// Returns a `RemoteError` if `folder` is not a single path segment, the
/// listing fails, the theme has no files or the archive cannot be built.
pub async fn pack_theme<S: ContentSource + ?Sized>(
    source: &S,
    folder: &str,
) -> Result<(Vec<u8>, TransferReport), RemoteError> {
    check_folder(folder)?;
    let files = list_theme(source, folder).await?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut report = TransferReport::default();
    for file in files {
        if !is_safe_relative(&file.relative_path) {
            tracing::warn!(path = %file.relative_path, "refusing unsafe path");
            report
                .skipped
                .push((file.relative_path, "unsafe path".to_string()));
            continue;
        }
        let body = match source.fetch(&file.download_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(path = %file.relative_path, error = %e, "skipping file");
                report.skipped.push((file.relative_path, e.to_string()));
                continue;
            }
        };

        zip.start_file(format!("{folder}/{}", file.relative_path), options)
            .map_err(archive_err)?;
        zip.write_all(&body).map_err(archive_err)?;
        report.written.push(file.relative_path);
    }

    let bytes = zip.finish().map_err(archive_err)?.into_inner();
    Ok((bytes, report))
}

/// Downloads theme `folder` as a ZIP written to `out`.
///
/// # Errors
///
/// Returns a `RemoteError` if packing fails or `out` cannot be written.
pub async fn download_zip<S: ContentSource + ?Sized>(
    source: &S,
    folder: &str,
    out: &Path,
) -> Result<TransferReport, RemoteError> {
    let (bytes, report) = pack_theme(source, folder).await?;
    tokio::fs::write(out, &bytes)
        .await
        .map_err(|source| RemoteError::Io {
            path: out.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %out.display(), bytes = bytes.len(), "wrote theme archive");
    Ok(report)
}
