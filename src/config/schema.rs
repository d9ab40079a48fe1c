//! Configuration schema for setup-odin
//!
//! An optional `setup-odin.toml` overrides the built-in defaults. Action
//! inputs and CLI flags take precedence over both.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default upstream repository for the compiler sources
pub const DEFAULT_REPOSITORY: &str = "https://github.com/odin-lang/Odin";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain selection
    pub inputs: InputsConfig,

    /// Filesystem locations
    pub paths: PathsConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// Toolchain selection, mirrors the action inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    /// Git URL of the compiler repository
    pub repository: String,

    /// Branch or tag to build
    pub odin_version: String,

    /// LLVM major version the compiler links against
    pub llvm_version: String,

    /// Profile passed to the build script
    pub build_type: String,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            odin_version: "master".to_string(),
            llvm_version: "17".to_string(),
            build_type: "release".to_string(),
        }
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where the compiler is checked out and built
    pub checkout: PathBuf,

    /// Homebrew `opt` prefix used to locate versioned LLVM on macOS
    pub homebrew_opt: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            checkout: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("odin"),
            homebrew_opt: PathBuf::from("/usr/local/opt"),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Reuse a previously built checkout when it is still current
    pub enabled: bool,

    /// Root of the local cache store
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("setup-odin"),
        }
    }
}
