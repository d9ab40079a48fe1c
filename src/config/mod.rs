//! Configuration management for setup-odin

mod inputs;
pub mod schema;

pub use inputs::{parse_bool_input, BuildType, Inputs};
pub use schema::Config;

use crate::error::{SetupError, SetupResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Name of the project-local configuration file
pub const LOCAL_CONFIG_FILE: &str = "setup-odin.toml";

/// Values supplied on the command line or through action inputs.
///
/// `None` means "not given", so the file or default value applies.
#[derive(Debug, Clone, Default)]
pub struct InputOverrides {
    pub repository: Option<String>,
    pub odin_version: Option<String>,
    pub llvm_version: Option<String>,
    pub build_type: Option<String>,
    pub cache: Option<String>,
}

/// Configuration manager
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a config manager that only uses defaults and overrides
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a config manager reading a specific file
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// Find `setup-odin.toml` in the given directory
    pub fn find_local_config(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(LOCAL_CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }

    /// Load configuration; a missing file yields defaults only when no
    /// explicit path was requested.
    pub async fn load(&self) -> SetupResult<Config> {
        match &self.config_path {
            None => {
                debug!("No config file, using defaults");
                Ok(Config::default())
            }
            Some(path) => self.load_from_file(path).await,
        }
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> SetupResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SetupError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| SetupError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Merge overrides on top of the loaded configuration into run inputs
    pub fn resolve(config: &Config, overrides: &InputOverrides) -> SetupResult<Inputs> {
        let pick = |given: &Option<String>, fallback: &str| -> String {
            given
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        let cache_check = match overrides.cache.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(value) => parse_bool_input("cache", value)?,
            None => config.cache.enabled,
        };

        let inputs = Inputs::new(
            pick(&overrides.repository, &config.inputs.repository),
            pick(&overrides.odin_version, &config.inputs.odin_version),
            pick(&overrides.llvm_version, &config.inputs.llvm_version),
            BuildType::new(pick(&overrides.build_type, &config.inputs.build_type)),
            cache_check,
        )?;

        debug!("Resolved inputs: {:?}", inputs);
        Ok(inputs)
    }

    /// Get the config file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
