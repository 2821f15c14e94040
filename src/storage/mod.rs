//! Local cache of library scans
//!
//! Each scanned library is written to `<root>/storage/<key>.json`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::plex::LibraryScanResult;

/// A library known to the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryIdentity {
    pub key: String,
    /// `None` when the cache file could not be parsed
    pub library_name: Option<String>,
}

/// Source of cached scan data
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// All cached libraries, sorted by key
    async fn libraries(&self) -> Result<Vec<LibraryIdentity>>;

    /// Cached scan for `key`; `None` when missing or unreadable
    async fn library_data(&self, key: &str) -> Option<LibraryScanResult>;

    /// Write a scan, returning the file path
    async fn save_library(&self, key: &str, data: &LibraryScanResult) -> Result<PathBuf>;
}

/// Stores scans as JSON files in a directory
#[derive(Debug, Clone)]
pub struct StorageClient {
    dir: PathBuf,
}

impl StorageClient {
    /// Storage under `<root>/storage`
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join("storage"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn library_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    async fn read_library(&self, path: &Path) -> Result<LibraryScanResult> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))
    }
}

#[async_trait]
impl LibraryStore for StorageClient {
    async fn libraries(&self) -> Result<Vec<LibraryIdentity>> {
        if !self.dir.exists() {
            debug!("No storage directory at {:?}", self.dir);
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to list {:?}", self.dir))?;

        let mut libraries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let library_name = match self.read_library(&path).await {
                Ok(data) => Some(data.library_name),
                Err(e) => {
                    warn!("Listing {} without a name, cache file is unreadable: {:#}", key, e);
                    None
                }
            };
            libraries.push(LibraryIdentity {
                key: key.to_string(),
                library_name,
            });
        }

        libraries.sort_by(|a, b| a.key.cmp(&b.key));
        debug!("Found {} cached libraries", libraries.len());
        Ok(libraries)
    }

    async fn library_data(&self, key: &str) -> Option<LibraryScanResult> {
        let path = self.library_path(key);
        if !path.exists() {
            return None;
        }
        match self.read_library(&path).await {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Failed to read library data: {:#}", e);
                None
            }
        }
    }

    async fn save_library(&self, key: &str, data: &LibraryScanResult) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create storage directory {:?}", self.dir))?;

        let path = self.library_path(key);
        let contents = serde_json::to_string(data).context("Failed to serialize library data")?;
        fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to save library data to {:?}", path))?;

        debug!("Saved library {} to {}", key, path.display());
        Ok(path)
    }
}
