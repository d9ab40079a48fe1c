//! Execution path handling
//!
//! The search path is an explicit value passed to every spawned process
//! rather than a mutation of this process's environment.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered list of directories searched for executables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPath {
    dirs: Vec<PathBuf>,
}

impl ExecutionPath {
    /// An empty path
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot of the current process `PATH`
    pub fn from_env() -> Self {
        let dirs = env::var_os("PATH")
            .map(|value| env::split_paths(&value).collect())
            .unwrap_or_default();
        Self { dirs }
    }

    /// Put a directory in front of the search order. Adding a directory
    /// that is already present is a no-op.
    pub fn prepend(&mut self, dir: impl Into<PathBuf>) -> bool {
        let dir = dir.into();
        if self.dirs.contains(&dir) {
            return false;
        }
        self.dirs.insert(0, dir);
        true
    }

    /// Prepend every directory in `additions`, keeping their relative order
    pub fn extend_front(&mut self, additions: &[PathBuf]) {
        for dir in additions.iter().rev() {
            self.prepend(dir.clone());
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Joined value for a child's `PATH`, or `None` when empty or a
    /// directory contains the platform separator.
    pub fn to_env_value(&self) -> Option<String> {
        if self.dirs.is_empty() {
            return None;
        }
        env::join_paths(&self.dirs)
            .ok()
            .map(|joined: OsString| joined.to_string_lossy().into_owned())
    }
}

/// Looks up executables by name
pub trait WhichResolver: Send + Sync {
    fn resolve(&self, binary: &str, path: &ExecutionPath) -> Option<PathBuf>;
}

/// Resolver that scans the directories of an [`ExecutionPath`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl PathResolver {
    fn candidates(binary: &str) -> Vec<String> {
        if cfg!(windows) && Path::new(binary).extension().is_none() {
            vec![format!("{}.exe", binary), format!("{}.cmd", binary)]
        } else {
            vec![binary.to_string()]
        }
    }

    #[cfg(unix)]
    fn is_executable(path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_executable(path: &Path) -> bool {
        path.is_file()
    }
}

impl WhichResolver for PathResolver {
    fn resolve(&self, binary: &str, path: &ExecutionPath) -> Option<PathBuf> {
        let names = Self::candidates(binary);
        let found = path
            .dirs()
            .iter()
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .find(|candidate| Self::is_executable(candidate));

        debug!("which {}: {:?}", binary, found);
        found
    }
}
