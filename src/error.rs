//! Error types for setup-odin
//!
//! All modules use `SetupResult<T>` as their return type. Every variant is
//! fatal for the run: there is no retry or partial-success path.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for setup-odin operations
pub type SetupResult<T> = Result<T, SetupError>;

/// All errors that can occur while provisioning the toolchain
#[derive(Error, Debug)]
pub enum SetupError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid input '{name}': {reason}")]
    InputInvalid { name: String, reason: String },

    // Platform errors
    #[error("Unsupported platform: {0}. setup-odin supports Linux, macOS and Windows.")]
    UnsupportedPlatform(String),

    // Repository errors
    #[error(
        "git clone of '{version}' exited with code {code}; \
         the version may not exist in {repository}"
    )]
    VersionNotFound {
        repository: String,
        version: String,
        code: i32,
    },

    #[error("git pull of '{version}' in {path} exited with code {code}")]
    Sync {
        path: PathBuf,
        version: String,
        code: i32,
    },

    // Dependency errors
    #[error("Installing {package} with {manager} exited with code {code}")]
    DependencyInstall {
        manager: String,
        package: String,
        code: i32,
    },

    // Build errors
    #[error("Building Odin ({build_type}) exited with code {code}")]
    Build { build_type: String, code: i32 },

    // Cache errors
    #[error("Failed to save cache {key}: {reason}")]
    CacheSave { key: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process terminated by signal: {0}")]
    ProcessSignaled(String),

    /// Already surfaced through the output reporter
    #[error("{0}")]
    Reported(String),
}

impl SetupError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create an invalid input error
    pub fn input(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputInvalid {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::VersionNotFound { .. } => {
                Some("Check that odin-version names an existing branch or tag")
            }
            Self::UnsupportedPlatform(_) => Some("Run on a Linux, macOS or Windows runner"),
            Self::DependencyInstall { .. } => {
                Some("Check that llvm-version is packaged for this runner image")
            }
            Self::Sync { .. } => Some("Disable the cache with cache: false to force a fresh clone"),
            _ => None,
        }
    }
}
