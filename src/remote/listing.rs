//! Remote folder listing.
//!
//! Theme files are served from the GitHub contents API: `GET
//! /repos/{owner}/{repo}/contents/{path}?ref={branch}` returns one JSON
//! object per directory entry with its type and a raw download URL.

use std::time::Duration;

use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SiteConfig;
use crate::error::RemoteError;

/// Default `User-Agent` for remote requests.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Largest single file accepted from the remote (64 MB).
pub const MAX_FILE_SIZE: usize = 64 * 1024 * 1024;

/// Type of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
    /// Symbolic link
    Symlink,
    /// Git submodule
    Submodule,
    /// Anything else the API reports
    #[serde(other)]
    Other,
}

/// One entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    /// Entry name.
    pub name: String,
    /// Repository-relative path.
    pub path: String,
    /// Entry type.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Raw download URL (files only).
    #[serde(default)]
    pub download_url: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

/// A file found by [`list_recursive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Path relative to the listed theme folder, `/`-separated.
    pub relative_path: String,
    /// Raw download URL.
    pub download_url: String,
    /// Size in bytes, when reported.
    pub size: Option<u64>,
}

/// A remote file tree that can be listed and downloaded from.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Lists the directory at repository path `path`.
    async fn list(&self, path: &str) -> Result<Vec<ContentEntry>, RemoteError>;

    /// Downloads `url`.
    async fn fetch(&self, url: &str) -> Result<Bytes, RemoteError>;
}

/// GitHub contents API client.
#[derive(Debug, Clone)]
pub struct GitHubContents {
    client: reqwest::Client,
    site: SiteConfig,
}

impl GitHubContents {
    /// Creates a client for the repository named in `site`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Network` if the HTTP client cannot be built.
    pub fn new(site: &SiteConfig) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_http_client(site.request_timeout)?,
            site: site.clone(),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, RemoteError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RemoteError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Builds the HTTP client used for remote calls.
///
/// # Errors
///
/// Returns `RemoteError::Network` if the client cannot be built.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, RemoteError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
    );
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| RemoteError::Network {
            url: String::new(),
            message: format!("failed to build HTTP client: {e}"),
        })
}

#[async_trait::async_trait]
impl ContentSource for GitHubContents {
    async fn list(&self, path: &str) -> Result<Vec<ContentEntry>, RemoteError> {
        let url = self.site.contents_url(path);
        debug!(url = %url, "listing remote folder");

        let body = self.get(&url).await?.bytes().await.map_err(|e| RemoteError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        parse_listing(&url, &body)
    }

    async fn fetch(&self, url: &str) -> Result<Bytes, RemoteError> {
        debug!(url, "downloading remote file");
        let bytes = self.get(url).await?.bytes().await.map_err(|e| RemoteError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(RemoteError::InvalidResponse {
                url: url.to_string(),
                message: format!("body exceeds {MAX_FILE_SIZE} byte limit"),
            });
        }
        Ok(bytes)
    }
}

/// Parses a contents API response.
///
/// A file path yields a single object instead of an array; that is not a
/// folder listing and is rejected.
///
/// # Errors
///
/// Returns `RemoteError::InvalidResponse` if `body` is not a JSON array of
/// entries.
pub fn parse_listing(url: &str, body: &[u8]) -> Result<Vec<ContentEntry>, RemoteError> {
    serde_json::from_slice(body).map_err(|e| RemoteError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Lists every file under `folder`, depth-first in listing order.
///
/// Directories are listed as they are reached, so a directory's files
/// appear where the directory appeared. A nested directory that fails to
/// list is logged and skipped; files without a download URL are skipped.
///
/// # Errors
///
/// Returns the error of the top-level listing.
pub async fn list_recursive<S: ContentSource + ?Sized>(
    source: &S,
    folder: &str,
) -> Result<Vec<RemoteFile>, RemoteError> {
    let folder = folder.trim_matches('/');
    let top = source.list(folder).await?;

    let mut files = Vec::new();
    let mut stack = vec![(top.into_iter(), String::new())];

    while let Some((entries, prefix)) = stack.last_mut() {
        let Some(entry) = entries.next() else {
            stack.pop();
            continue;
        };
        let relative_path = format!("{prefix}{}", entry.name);

        match entry.kind {
            EntryKind::File => match entry.download_url {
                Some(download_url) => files.push(RemoteFile {
                    relative_path,
                    download_url,
                    size: entry.size,
                }),
                None => warn!(path = %entry.path, "file has no download URL, skipping"),
            },
            EntryKind::Dir => match source.list(&entry.path).await {
                Ok(nested) => stack.push((nested.into_iter(), format!("{relative_path}/"))),
                Err(e) => warn!(path = %entry.path, error = %e, "cannot list folder, skipping"),
            },
            EntryKind::Symlink | EntryKind::Submodule | EntryKind::Other => {
                debug!(path = %entry.path, kind = ?entry.kind, "skipping non-file entry");
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory source keyed by listing path and download URL.
    #[derive(Default)]
    pub(crate) struct MemorySource {
        pub listings: HashMap<String, Vec<ContentEntry>>,
        pub files: HashMap<String, Bytes>,
    }

    impl MemorySource {
        pub fn file(&mut self, dir: &str, name: &str, body: &[u8]) {
            let path = format!("{dir}/{name}");
            let url = format!("https://raw.example/{path}");
            self.listings.entry(dir.to_string()).or_default().push(ContentEntry {
                name: name.to_string(),
                path,
                kind: EntryKind::File,
                download_url: Some(url.clone()),
                size: Some(body.len() as u64),
            });
            self.files.insert(url, Bytes::copy_from_slice(body));
        }

        pub fn dir(&mut self, dir: &str, name: &str) {
            let path = format!("{dir}/{name}");
            self.listings.entry(dir.to_string()).or_default().push(ContentEntry {
                name: name.to_string(),
                path: path.clone(),
                kind: EntryKind::Dir,
                download_url: None,
                size: None,
            });
            self.listings.entry(path).or_default();
        }
    }

    #[async_trait::async_trait]
    impl ContentSource for MemorySource {
        async fn list(&self, path: &str) -> Result<Vec<ContentEntry>, RemoteError> {
            self.listings
                .get(path)
                .cloned()
                .ok_or_else(|| RemoteError::HttpStatus {
                    url: path.to_string(),
                    status: 404,
                })
        }

        async fn fetch(&self, url: &str) -> Result<Bytes, RemoteError> {
            self.files.get(url).cloned().ok_or_else(|| RemoteError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[test]
    fn test_parse_listing() {
        let body = br#"[
            {"name": "cover.png", "path": "XFiles/cover.png", "type": "file",
             "size": 10, "download_url": "https://raw.example/XFiles/cover.png"},
            {"name": "fonts", "path": "XFiles/fonts", "type": "dir", "download_url": null},
            {"name": "weird", "path": "XFiles/weird", "type": "gitlink"}
        ]"#;
        let entries = parse_listing("u", body).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[0].size, Some(10));
        assert_eq!(entries[1].kind, EntryKind::Dir);
        assert_eq!(entries[1].download_url, None);
        assert_eq!(entries[2].kind, EntryKind::Other);
    }

    #[test]
    fn test_parse_listing_rejects_single_file() {
        let body = br#"{"name": "cover.png", "path": "XFiles/cover.png", "type": "file"}"#;
        assert!(matches!(
            parse_listing("u", body),
            Err(RemoteError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_recursive_depth_first() {
        let mut source = MemorySource::default();
        source.file("XFiles", "a.png", b"a");
        source.dir("XFiles", "fonts");
        source.file("XFiles/fonts", "font.ttf", b"f");
        source.dir("XFiles/fonts", "deep");
        source.file("XFiles/fonts/deep", "x.txt", b"x");
        source.file("XFiles", "z.json", b"{}");

        let files = list_recursive(&source, "XFiles").await.unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a.png", "fonts/font.ttf", "fonts/deep/x.txt", "z.json"]);
    }

    #[tokio::test]
    async fn test_nested_failure_is_skipped() {
        let mut source = MemorySource::default();
        source.file("XFiles", "a.png", b"a");
        source.dir("XFiles", "broken");
        source.listings.remove("XFiles/broken");
        source.file("XFiles", "b.png", b"b");

        let files = list_recursive(&source, "XFiles").await.unwrap();
        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn test_top_level_failure_is_error() {
        let source = MemorySource::default();
        assert!(list_recursive(&source, "Missing").await.is_err());
    }

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("y1-themes/"));
    }
}
