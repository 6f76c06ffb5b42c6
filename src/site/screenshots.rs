//! Screenshot PNG to JPEG conversion.
//!
//! Large `*screenshot*.png` files are re-encoded as JPEG (alpha flattened
//! onto white). A conversion is kept only when the JPEG is smaller; the
//! manifest `screenshot` fields and every page that links the PNG are then
//! pointed at the JPEG, and the PNG is removed once nothing still links it.

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use regex::Regex;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::SiteError;
use crate::site::page::PAGE_FILE;
use crate::theme::manifest::Manifest;

/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 85;

/// A screenshot whose JPEG encoding is smaller than the PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Source PNG.
    pub png: PathBuf,
    /// Target JPEG (same stem, `.jpg`).
    pub jpeg: PathBuf,
    /// PNG size in bytes.
    pub png_size: u64,
    /// JPEG size in bytes.
    pub jpeg_size: u64,
}

impl Conversion {
    /// Size reduction as a percentage of the PNG size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reduction_percent(&self) -> f64 {
        if self.png_size == 0 {
            return 0.0;
        }
        (self.png_size - self.jpeg_size) as f64 * 100.0 / self.png_size as f64
    }
}

/// Outcome of [`optimize_screenshots`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScreenshotReport {
    /// Screenshots converted (or, in a dry run, that would be).
    pub converted: Vec<Conversion>,
    /// Screenshots left as PNG because the JPEG was not smaller.
    pub not_smaller: Vec<PathBuf>,
    /// Screenshots that could not be decoded or encoded.
    pub failed: Vec<PathBuf>,
    /// Manifest and page files whose references changed.
    pub updated_files: Vec<PathBuf>,
    /// Converted PNGs left in place because a file referencing them could
    /// not be updated.
    pub kept_png: Vec<PathBuf>,
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(|n| n.starts_with('.'))
}

fn walk_visible(root: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
}

/// Every file under `root` whose lowercase name contains `screenshot` and
/// ends in `.png`. Hidden directories are skipped.
#[must_use]
pub fn find_screenshot_pngs(root: &Path) -> Vec<PathBuf> {
    walk_visible(root)
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_lowercase();
            name.contains("screenshot") && name.ends_with(".png")
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn blend_on_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u16::from(channel), u16::from(alpha));
    let mixed = (c * a + 255 * (255 - a) + 127) / 255;
    u8::try_from(mixed).unwrap_or(u8::MAX)
}

/// Flattens transparency onto a white background.
#[must_use]
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        out.put_pixel(
            x,
            y,
            Rgb([blend_on_white(r, a), blend_on_white(g, a), blend_on_white(b, a)]),
        );
    }
    out
}

/// Decodes `png` and encodes it as JPEG in memory.
///
/// # Errors
///
/// Returns `SiteError::Image` if decoding or encoding fails.
pub fn encode_jpeg(png: &Path, quality: u8) -> Result<Vec<u8>, SiteError> {
    let image_err = |e: image::ImageError| SiteError::Image {
        path: png.to_path_buf(),
        message: e.to_string(),
    };

    let decoded = image::open(png).map_err(image_err)?;
    let flat = flatten_onto_white(&decoded);

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode_image(&flat)
        .map_err(image_err)?;
    Ok(buf)
}

/// Converts one screenshot, writing the JPEG next to it only when smaller.
///
/// Returns `None` when the JPEG would not be smaller. With `dry_run` nothing
/// is written.
///
/// # Errors
///
/// Returns `SiteError::Image` if the image cannot be converted and
/// `SiteError::Write` if the JPEG cannot be written.
pub fn convert_to_jpeg(
    png: &Path,
    quality: u8,
    dry_run: bool,
) -> Result<Option<Conversion>, SiteError> {
    let png_size = std::fs::metadata(png)
        .map_err(|source| SiteError::Write {
            path: png.to_path_buf(),
            source,
        })?
        .len();
    let bytes = encode_jpeg(png, quality)?;
    let jpeg_size = bytes.len() as u64;
    if jpeg_size >= png_size {
        return Ok(None);
    }

    let jpeg = png.with_extension("jpg");
    if !dry_run {
        std::fs::write(&jpeg, &bytes).map_err(|source| SiteError::Write {
            path: jpeg.clone(),
            source,
        })?;
    }
    Ok(Some(Conversion {
        png: png.to_path_buf(),
        jpeg,
        png_size,
        jpeg_size,
    }))
}

/// Replaces references to `png_name` with `jpg_name`.
///
/// A match must not be preceded by a file-name character, so
/// `my_screenshot.png` is untouched when rewriting `screenshot.png`.
#[must_use]
pub fn rewrite_references(content: &str, png_name: &str, jpg_name: &str) -> String {
    if png_name.is_empty() || !content.contains(png_name) {
        return content.to_string();
    }
    let pattern = format!(r"(^|[^A-Za-z0-9_.\-]){}", regex::escape(png_name));
    match Regex::new(&pattern) {
        Ok(re) => re
            .replace_all(content, |caps: &regex::Captures| format!("{}{jpg_name}", &caps[1]))
            .into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "cannot build reference pattern");
            content.to_string()
        }
    }
}

/// `path` relative to `base` with `/` separators, if `path` is under `base`.
fn relative_url(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Result of rewriting references in one kind of file.
#[derive(Debug, Default)]
struct ReferenceUpdate {
    /// Files rewritten.
    updated: Vec<PathBuf>,
    /// PNGs that may still be referenced by a file that was not rewritten.
    stale: Vec<PathBuf>,
}

/// Rewrites manifest `screenshot` fields. An unreadable manifest leaves
/// every conversion stale.
fn update_manifest(
    root: &Path,
    manifest_path: &Path,
    conversions: &[Conversion],
    dry_run: bool,
) -> Result<ReferenceUpdate, SiteError> {
    let mut update = ReferenceUpdate::default();
    if !manifest_path.is_file() {
        return Ok(update);
    }
    let mut manifest = match Manifest::load(manifest_path) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "cannot update manifest screenshot references");
            update.stale = conversions.iter().map(|c| c.png.clone()).collect();
            return Ok(update);
        }
    };

    let mut changed = false;
    for entry in &mut manifest.themes {
        let Some(Value::String(shot)) = entry.extra.get_mut("screenshot") else {
            continue;
        };
        for c in conversions {
            let (Some(from), Some(to)) = (relative_url(&c.png, root), relative_url(&c.jpeg, root))
            else {
                continue;
            };
            let rewritten = rewrite_references(shot, &from, &to);
            if rewritten != *shot {
                *shot = rewritten;
                changed = true;
            }
        }
    }

    if changed && !dry_run {
        manifest.save(manifest_path).map_err(|e| SiteError::Write {
            path: manifest_path.to_path_buf(),
            source: std::io::Error::other(e.to_string()),
        })?;
    }
    if changed {
        update.updated.push(manifest_path.to_path_buf());
    }
    Ok(update)
}

/// Points every page at the converted JPEGs.
///
/// Each `index.html` is rewritten for the screenshots under its own
/// directory, using the path relative to that page. A page that cannot be
/// read or written leaves those screenshots stale.
fn update_pages(root: &Path, conversions: &[Conversion], dry_run: bool) -> ReferenceUpdate {
    let mut update = ReferenceUpdate::default();
    for page in walk_visible(root).filter(|e| e.file_name() == PAGE_FILE) {
        let page = page.into_path();
        let Some(dir) = page.parent() else { continue };
        let reachable: Vec<(&Conversion, String, String)> = conversions
            .iter()
            .filter_map(|c| Some((c, relative_url(&c.png, dir)?, relative_url(&c.jpeg, dir)?)))
            .collect();
        if reachable.is_empty() {
            continue;
        }

        let Ok(original) = std::fs::read_to_string(&page) else {
            tracing::warn!(path = %page.display(), "cannot read page, skipping");
            update.stale.extend(reachable.iter().map(|(c, _, _)| c.png.clone()));
            continue;
        };

        let mut content = original.clone();
        let mut touched = Vec::new();
        for (c, from, to) in &reachable {
            let rewritten = rewrite_references(&content, from, to);
            if rewritten != content {
                touched.push(c.png.clone());
                content = rewritten;
            }
        }
        if touched.is_empty() {
            continue;
        }
        if !dry_run {
            if let Err(e) = std::fs::write(&page, content) {
                tracing::error!(path = %page.display(), error = %e, "failed to update page");
                update.stale.extend(touched);
                continue;
            }
        }
        update.updated.push(page);
    }
    update
}

/// Converts every screenshot PNG under `root` and rewrites references.
///
/// # Errors
///
/// Returns `SiteError::Write` if the manifest cannot be saved. Per-image
/// failures are reported in [`ScreenshotReport::failed`].
pub fn optimize_screenshots(
    root: &Path,
    manifest_path: &Path,
    quality: u8,
    dry_run: bool,
) -> Result<ScreenshotReport, SiteError> {
    let mut report = ScreenshotReport::default();

    for png in find_screenshot_pngs(root) {
        match convert_to_jpeg(&png, quality, dry_run) {
            Ok(Some(conversion)) => {
                tracing::info!(
                    png = %png.display(),
                    before = conversion.png_size,
                    after = conversion.jpeg_size,
                    "converted screenshot"
                );
                report.converted.push(conversion);
            }
            Ok(None) => {
                tracing::debug!(png = %png.display(), "JPEG not smaller, keeping PNG");
                report.not_smaller.push(png);
            }
            Err(e) => {
                tracing::error!(error = %e, "screenshot conversion failed");
                report.failed.push(png);
            }
        }
    }

    if report.converted.is_empty() {
        return Ok(report);
    }

    let manifest = update_manifest(root, manifest_path, &report.converted, dry_run)?;
    let pages = update_pages(root, &report.converted, dry_run);
    report.updated_files.extend(manifest.updated);
    report.updated_files.extend(pages.updated);

    for c in &report.converted {
        if manifest.stale.contains(&c.png) || pages.stale.contains(&c.png) {
            tracing::warn!(path = %c.png.display(), "keeping PNG, a reference could not be updated");
            report.kept_png.push(c.png.clone());
        } else if !dry_run {
            if let Err(e) = std::fs::remove_file(&c.png) {
                tracing::warn!(path = %c.png.display(), error = %e, "could not remove PNG");
            }
        }
    }
    Ok(report)
}
