//! External process execution
//!
//! Everything that spawns a program goes through [`ProcessRunner`] so the
//! orchestration logic can be exercised without touching git, package
//! managers or build scripts.

mod path;
mod system;

pub use path::{ExecutionPath, PathResolver, WhichResolver};
pub use system::SystemRunner;

use crate::error::SetupResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A program invocation: program, arguments, working directory and extra
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Run with `PATH` set to the given execution path
    pub fn with_path(self, path: &ExecutionPath) -> Self {
        match path.to_env_value() {
            Some(value) => self.env("PATH", value),
            None => self,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit code and captured output of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs external programs
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command with inherited stdio and return its exit code
    async fn exec(&self, command: &CommandSpec) -> SetupResult<i32>;

    /// Run a command capturing stdout and stderr
    async fn exec_output(&self, command: &CommandSpec) -> SetupResult<ProcessOutput>;
}
