//! Git operations on the compiler checkout

use crate::error::{SetupError, SetupResult};
use crate::process::{CommandSpec, ProcessRunner};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// What `git pull` prints when nothing was fetched. Only consulted when
/// `HEAD` cannot be resolved around the pull; the wording differs between
/// git releases and locales.
pub const ALREADY_UP_TO_DATE: &str = "Already up to date.";

/// Clones and updates the checkout at a fixed path
pub struct RepositorySync<'a> {
    runner: &'a dyn ProcessRunner,
    checkout: PathBuf,
}

impl<'a> RepositorySync<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, checkout: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            checkout: checkout.into(),
        }
    }

    /// Remove whatever is at the checkout path (e.g. a partial restore)
    pub async fn clear_checkout(&self) -> SetupResult<()> {
        match fs::symlink_metadata(&self.checkout).await {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&self.checkout).await,
            Ok(_) => fs::remove_file(&self.checkout).await,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
        .map_err(|e| SetupError::io(format!("removing {}", self.checkout.display()), e))
    }

    /// Shallow, single-branch, tag-free clone of `version`
    pub async fn clone_fresh(&self, repository: &str, version: &str) -> SetupResult<()> {
        if let Some(parent) = self.checkout.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SetupError::io(format!("creating {}", parent.display()), e))?;
        }

        info!("Cloning {} at {} into {}", repository, version, self.checkout.display());

        let clone = CommandSpec::new("git").args([
            "clone",
            "--depth",
            "1",
            "--single-branch",
            "--no-tags",
            "--branch",
            version,
            repository,
        ])
        .arg(self.checkout.to_string_lossy());

        let code = self.runner.exec(&clone).await?;
        if code != 0 {
            return Err(SetupError::VersionNotFound {
                repository: repository.to_string(),
                version: version.to_string(),
                code,
            });
        }

        Ok(())
    }

    /// Pull `version` into the existing checkout. Returns `true` when
    /// nothing new was fetched.
    pub async fn sync_to_latest(&self, version: &str) -> SetupResult<bool> {
        let before = self.head().await?;

        let pull = CommandSpec::new("git")
            .args(["pull", "--ff-only", "origin", version])
            .cwd(&self.checkout);
        let output = self.runner.exec_output(&pull).await?;

        for line in output.stdout.lines().chain(output.stderr.lines()) {
            info!("git: {}", line);
        }

        if !output.success() {
            return Err(SetupError::Sync {
                path: self.checkout.clone(),
                version: version.to_string(),
                code: output.code,
            });
        }

        let after = self.head().await?;
        let current = match (before, after) {
            (Some(before), Some(after)) => {
                debug!("HEAD before pull {}, after {}", before, after);
                before == after
            }
            _ => output.stdout.contains(ALREADY_UP_TO_DATE),
        };

        Ok(current)
    }

    /// Commit id of `HEAD`, if git can resolve it
    async fn head(&self) -> SetupResult<Option<String>> {
        let rev_parse = CommandSpec::new("git")
            .args(["rev-parse", "HEAD"])
            .cwd(&self.checkout);
        let output = self.runner.exec_output(&rev_parse).await?;

        let head = output.stdout.trim();
        if output.success() && !head.is_empty() {
            Ok(Some(head.to_string()))
        } else {
            Ok(None)
        }
    }
}
