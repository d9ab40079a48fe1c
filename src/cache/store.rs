//! Cache store abstraction

use crate::cache::key::CacheKey;
use crate::error::SetupResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// The filesystem locations that make up one cache unit.
///
/// The compiler is built inside its checkout, so the checkout directory
/// carries both the sources and the build artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    checkout: PathBuf,
}

impl CachePaths {
    pub fn new(checkout: impl Into<PathBuf>) -> Self {
        Self {
            checkout: checkout.into(),
        }
    }

    pub fn checkout(&self) -> &Path {
        &self.checkout
    }

    /// Every path in the unit, in a stable order
    pub fn all(&self) -> Vec<PathBuf> {
        vec![self.checkout.clone()]
    }
}

/// Storage for cache units, keyed by [`CacheKey`]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Restore all paths for `key`. Returns the key that was restored, or
    /// `None` on a miss. Store failures are reported as a miss.
    async fn restore(&self, paths: &CachePaths, key: &CacheKey) -> Option<CacheKey>;

    /// Save all paths under `key`, replacing any existing entry
    async fn save(&self, paths: &CachePaths, key: &CacheKey) -> SetupResult<()>;
}
