//! Resolved, immutable run inputs

use crate::error::{SetupError, SetupResult};
use std::fmt;

/// Build profile handed to the compiler's build script as its first argument.
///
/// Values are opaque: `debug`, `release` and `release-native` are the common
/// ones, but anything the script accepts is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildType(String);

impl BuildType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a run needs to know about which toolchain to provision.
///
/// Built once by [`ConfigManager::resolve`](super::ConfigManager::resolve)
/// and shared read-only for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    repository: String,
    odin_version: String,
    llvm_version: String,
    build_type: BuildType,
    cache_check: bool,
}

impl Inputs {
    /// Validate and assemble inputs. Blank text fields are rejected.
    pub fn new(
        repository: impl Into<String>,
        odin_version: impl Into<String>,
        llvm_version: impl Into<String>,
        build_type: BuildType,
        cache_check: bool,
    ) -> SetupResult<Self> {
        let inputs = Self {
            repository: repository.into().trim().to_string(),
            odin_version: odin_version.into().trim().to_string(),
            llvm_version: llvm_version.into().trim().to_string(),
            build_type: BuildType::new(build_type.as_str().trim()),
            cache_check,
        };

        for (name, value) in [
            ("repository", inputs.repository.as_str()),
            ("odin-version", inputs.odin_version.as_str()),
            ("llvm-version", inputs.llvm_version.as_str()),
            ("build-type", inputs.build_type.as_str()),
        ] {
            if value.is_empty() {
                return Err(SetupError::input(name, "must not be empty"));
            }
        }

        Ok(inputs)
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn odin_version(&self) -> &str {
        &self.odin_version
    }

    pub fn llvm_version(&self) -> &str {
        &self.llvm_version
    }

    pub fn build_type(&self) -> &BuildType {
        &self.build_type
    }

    pub fn cache_check(&self) -> bool {
        self.cache_check
    }
}

/// Parse a boolean the way action inputs are written (`true`, `False`, ...)
pub fn parse_bool_input(name: &str, value: &str) -> SetupResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(SetupError::input(
            name,
            format!("expected true or false, got '{}'", other),
        )),
    }
}
