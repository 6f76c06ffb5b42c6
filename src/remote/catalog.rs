//! Remote theme metadata.
//!
//! Reads the published manifest and theme configs over raw download URLs
//! and resolves details with the same override chain as the generators.

use std::collections::HashMap;

use bytes::Bytes;

use crate::config::SiteConfig;
use crate::error::RemoteError;
use crate::remote::listing::ContentSource;
use crate::theme::config::{CONFIG_FILE, ThemeConfig};
use crate::theme::manifest::Manifest;
use crate::theme::resolve::{ThemeDetails, resolve_details};

/// Remote manifest and config reader with a per-file cache.
///
/// Entries are keyed by repository-relative file name and never evicted.
pub struct RemoteCatalog<'a, S: ContentSource + ?Sized> {
    source: &'a S,
    site: &'a SiteConfig,
    cache: HashMap<String, Bytes>,
}

impl<'a, S: ContentSource + ?Sized> RemoteCatalog<'a, S> {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new(source: &'a S, site: &'a SiteConfig) -> Self {
        Self {
            source,
            site,
            cache: HashMap::new(),
        }
    }

    /// Number of cached files.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    async fn file(&mut self, name: &str) -> Result<Bytes, RemoteError> {
        if let Some(hit) = self.cache.get(name) {
            tracing::trace!(file = name, "remote cache hit");
            return Ok(hit.clone());
        }
        let body = self.source.fetch(&self.site.raw_url(name)).await?;
        self.cache.insert(name.to_string(), body.clone());
        Ok(body)
    }

    /// The published manifest.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if it cannot be fetched or parsed.
    pub async fn manifest(&mut self) -> Result<Manifest, RemoteError> {
        let name = self.site.manifest.to_string_lossy().replace('\\', "/");
        let body = self.file(&name).await?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::InvalidResponse {
            url: self.site.raw_url(&name),
            message: e.to_string(),
        })
    }

    /// A theme's published `config.json`; `None` if it has none.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` on failures other than 404, or if the config
    /// is not valid JSON.
    pub async fn config(&mut self, folder: &str) -> Result<Option<ThemeConfig>, RemoteError> {
        let name = format!("{folder}/{CONFIG_FILE}");
        let body = match self.file(&name).await {
            Ok(body) => body,
            Err(RemoteError::HttpStatus { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| RemoteError::InvalidResponse {
                url: self.site.raw_url(&name),
                message: e.to_string(),
            })
    }

    /// Resolves a theme's details from the published manifest and config.
    ///
    /// Either source failing is logged and treated as absent.
    pub async fn details(&mut self, folder: &str) -> ThemeDetails {
        let manifest = match self.manifest().await {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = %e, "remote manifest unavailable");
                None
            }
        };
        let config = match self.config(folder).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(folder, error = %e, "remote config unavailable");
                None
            }
        };
        let entry = manifest.as_ref().and_then(|m| m.find(folder));
        resolve_details(folder, entry, config.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::listing::tests::MemorySource;

    fn source(site: &SiteConfig) -> MemorySource {
        let mut s = MemorySource::default();
        s.files.insert(
            site.raw_url("themes.json"),
            Bytes::from_static(
                br#"{"themes": [{"folder": "XFiles", "name": "The X Files", "author": "Mulder"}]}"#,
            ),
        );
        s.files.insert(
            site.raw_url("XFiles/config.json"),
            Bytes::from_static(br#"{"theme_info": {"author": "Scully"}}"#),
        );
        s
    }

    #[tokio::test]
    async fn test_details_override_chain() {
        let site = SiteConfig::default();
        let src = source(&site);
        let mut catalog = RemoteCatalog::new(&src, &site);

        let d = catalog.details("XFiles").await;
        assert_eq!(d.name, "The X Files");
        assert_eq!(d.author, "Scully");
        assert_eq!(d.description, "Y1 Theme: The X Files");
    }

    #[tokio::test]
    async fn test_cache_is_reused() {
        let site = SiteConfig::default();
        let src = source(&site);
        let mut catalog = RemoteCatalog::new(&src, &site);

        catalog.details("XFiles").await;
        assert_eq!(catalog.cached(), 2);
        catalog.details("XFiles").await;
        assert_eq!(catalog.cached(), 2);
    }

    #[tokio::test]
    async fn test_missing_config_is_none() {
        let site = SiteConfig::default();
        let src = source(&site);
        let mut catalog = RemoteCatalog::new(&src, &site);

        assert!(catalog.config("Retro").await.unwrap().is_none());
        let d = catalog.details("Retro").await;
        assert_eq!(d.name, "Retro");
        assert_eq!(d.author, "Unknown");
    }
}
