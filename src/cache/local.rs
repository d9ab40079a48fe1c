//! Directory-backed cache store
//!
//! Layout under the cache root:
//!
//! ```text
//! <root>/<key>/manifest.json   key, cached paths, creation time
//! <root>/<key>/0/              copy of the first cached path
//! <root>/.staging-<key>-<pid>/ save in progress
//! ```
//!
//! Saves are staged and renamed into place, so a visible entry is always
//! complete. A restore that fails midway removes what it wrote.

use crate::cache::key::CacheKey;
use crate::cache::store::{CachePaths, CacheStore};
use crate::error::{SetupError, SetupResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MANIFEST_FILE: &str = "manifest.json";

/// Metadata stored next to a cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheManifest {
    pub key: String,
    pub paths: Vec<PathBuf>,
    pub created_at: DateTime<Utc>,
}

/// Cache store keeping entries in a local directory
#[derive(Debug, Clone)]
pub struct LocalCacheStore {
    root: PathBuf,
}

impl LocalCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    fn staging_dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!(".staging-{}-{}", key, std::process::id()))
    }

    fn read_manifest(entry: &Path) -> io::Result<Option<CacheManifest>> {
        let path = entry.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn restore_blocking(&self, paths: &CachePaths, key: &CacheKey) -> Option<CacheKey> {
        let entry = self.entry_dir(key);
        let manifest = match Self::read_manifest(&entry) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                debug!("No cache entry for {}", key);
                return None;
            }
            Err(e) => {
                warn!("Ignoring unreadable cache manifest for {}: {}", key, e);
                return None;
            }
        };

        let targets = paths.all();
        if manifest.paths != targets {
            warn!(
                "Cache entry {} was saved for {:?}, not {:?}; treating as miss",
                key, manifest.paths, targets
            );
            return None;
        }

        for (index, target) in targets.iter().enumerate() {
            let result =
                remove_path(target).and_then(|_| copy_tree(&entry.join(index.to_string()), target));
            if let Err(e) = result {
                warn!("Restoring {} failed: {}; discarding partial restore", target.display(), e);
                for written in &targets[..=index] {
                    if let Err(e) = remove_path(written) {
                        warn!("Failed to remove {}: {}", written.display(), e);
                    }
                }
                return None;
            }
        }

        info!(
            "Restored cache {} (saved {})",
            key,
            manifest.created_at.to_rfc3339()
        );
        Some(CacheKey::from_raw(manifest.key))
    }

    fn save_blocking(&self, paths: &CachePaths, key: &CacheKey) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;

        let staging = self.staging_dir(key);
        remove_path(&staging)?;
        fs::create_dir_all(&staging)?;

        let result = (|| {
            let targets = paths.all();
            for (index, source) in targets.iter().enumerate() {
                if !source.exists() {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("{} does not exist", source.display()),
                    ));
                }
                copy_tree(source, &staging.join(index.to_string()))?;
            }

            let manifest = CacheManifest {
                key: key.to_string(),
                paths: targets,
                created_at: Utc::now(),
            };
            let json = serde_json::to_string_pretty(&manifest)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            fs::write(staging.join(MANIFEST_FILE), json)?;

            let entry = self.entry_dir(key);
            remove_path(&entry)?;
            fs::rename(&staging, &entry)
        })();

        if result.is_err() {
            if let Err(e) = remove_path(&staging) {
                warn!("Failed to remove staging dir {}: {}", staging.display(), e);
            }
        }
        result
    }
}

#[async_trait]
impl CacheStore for LocalCacheStore {
    async fn restore(&self, paths: &CachePaths, key: &CacheKey) -> Option<CacheKey> {
        let store = self.clone();
        let paths = paths.clone();
        let key = key.clone();

        match tokio::task::spawn_blocking(move || store.restore_blocking(&paths, &key)).await {
            Ok(restored) => restored,
            Err(e) => {
                warn!("Cache restore task failed: {}", e);
                None
            }
        }
    }

    async fn save(&self, paths: &CachePaths, key: &CacheKey) -> SetupResult<()> {
        let store = self.clone();
        let owned_paths = paths.clone();
        let owned_key = key.clone();

        let result =
            tokio::task::spawn_blocking(move || store.save_blocking(&owned_paths, &owned_key))
                .await
                .map_err(|e| SetupError::CacheSave {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;

        result.map_err(|e| SetupError::CacheSave {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        info!("Saved cache {} to {}", key, self.root.display());
        Ok(())
    }
}

/// Remove a file or directory tree; missing paths are fine
fn remove_path(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Recursively copy `src` to `dst`, preserving symlinks on Unix
fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(src)?;

    if meta.file_type().is_symlink() {
        return copy_symlink(src, dst);
    }

    if !meta.is_dir() {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
        return Ok(());
    }

    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        copy_tree(&src.canonicalize()?, dst)
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}
