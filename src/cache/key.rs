//! Cache key composition
//!
//! A key fingerprints everything that decides whether a cached build can be
//! reused: repository, compiler version, build type and host OS. Same inputs
//! give the same key on every run.

use crate::config::Inputs;
use crate::toolchain::Platform;
use sha2::{Digest, Sha256};
use std::fmt;

/// Prefix shared by every key this tool writes
pub const KEY_PREFIX: &str = "setup-odin";

/// Opaque cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a run
    pub fn compose(inputs: &Inputs, platform: &Platform) -> Self {
        let mut hasher = Sha256::new();
        for field in [
            inputs.repository(),
            inputs.odin_version(),
            inputs.build_type().as_str(),
            platform.id(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();

        // First 16 hex characters (8 bytes)
        Self(format!(
            "{}-{}-{}",
            KEY_PREFIX,
            platform.id(),
            hex::encode(&digest[..8])
        ))
    }

    /// Wrap a key read back from persisted state
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
