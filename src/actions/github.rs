//! GitHub Actions reporter
//!
//! Outputs, state and path additions are appended to the files named by
//! `GITHUB_OUTPUT`, `GITHUB_STATE` and `GITHUB_PATH`. Outside of Actions
//! those variables are unset and values are only logged.

use super::OutputReporter;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Reporter for the GitHub Actions runner
#[derive(Debug, Clone, Default)]
pub struct GithubReporter {
    output_file: Option<PathBuf>,
    state_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
}

impl GithubReporter {
    /// Pick up the file-command paths from the environment
    pub fn from_env() -> Self {
        let file = |name: &str| env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            output_file: file("GITHUB_OUTPUT"),
            state_file: file("GITHUB_STATE"),
            path_file: file("GITHUB_PATH"),
        }
    }

    /// Reporter writing to explicit files
    pub fn with_files(
        output_file: Option<PathBuf>,
        state_file: Option<PathBuf>,
        path_file: Option<PathBuf>,
    ) -> Self {
        Self {
            output_file,
            state_file,
            path_file,
        }
    }

    /// Whether any file command is available, i.e. we run inside Actions
    pub fn is_actions(&self) -> bool {
        self.output_file.is_some() || self.state_file.is_some() || self.path_file.is_some()
    }

    fn append(file: &Path, content: &str) -> io::Result<()> {
        let mut handle = OpenOptions::new().create(true).append(true).open(file)?;
        handle.write_all(content.as_bytes())?;
        handle.flush()
    }

    fn key_value(name: &str, value: &str) -> String {
        if !value.contains('\n') && !value.contains('\r') {
            return format!("{}={}\n", name, value);
        }

        let mut delimiter = format!("ghadelimiter_{}", std::process::id());
        while value.contains(&delimiter) {
            delimiter.push('_');
        }
        format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
    }

    fn write_key_value(&self, file: Option<&Path>, kind: &str, name: &str, value: &str) {
        match file {
            Some(file) => {
                if let Err(e) = Self::append(file, &Self::key_value(name, value)) {
                    warn!("Failed to write {} {}: {}", kind, name, e);
                }
            }
            None => info!("{} {}={}", kind, name, value),
        }
    }
}

/// Escape data for a workflow command (`::error::...`)
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Read state saved by the main step; the runner exposes it to the post
/// step as `STATE_<name>`.
pub fn state_from_env(name: &str) -> Option<String> {
    env::var(format!("STATE_{}", name))
        .ok()
        .filter(|v| !v.is_empty())
}

impl OutputReporter for GithubReporter {
    fn set_output(&self, name: &str, value: &str) {
        self.write_key_value(self.output_file.as_deref(), "output", name, value);
    }

    fn save_state(&self, name: &str, value: &str) {
        self.write_key_value(self.state_file.as_deref(), "state", name, value);
    }

    fn add_path(&self, dir: &Path) {
        match &self.path_file {
            Some(file) => {
                let line = format!("{}\n", dir.display());
                if let Err(e) = Self::append(file, &line) {
                    warn!("Failed to add {} to PATH: {}", dir.display(), e);
                }
            }
            None => info!("Add to PATH: {}", dir.display()),
        }
        debug!("Added path {}", dir.display());
    }

    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warning(&self, message: &str) {
        if self.is_actions() {
            println!("::warning::{}", escape_data(message));
        } else {
            warn!("{}", message);
        }
    }

    fn set_failed(&self, message: &str) {
        if self.is_actions() {
            println!("::error::{}", escape_data(message));
        } else {
            eprintln!("{}", message);
        }
    }
}
