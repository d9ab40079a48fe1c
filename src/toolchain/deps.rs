//! LLVM installation per host platform

use crate::error::{SetupError, SetupResult};
use crate::process::{CommandSpec, ExecutionPath, ProcessRunner, WhichResolver};
use crate::toolchain::Platform;
use std::path::PathBuf;
use tracing::{debug, info};

/// Installs the LLVM release the compiler links against
pub struct DependencyInstaller<'a> {
    runner: &'a dyn ProcessRunner,
    resolver: &'a dyn WhichResolver,
    homebrew_opt: PathBuf,
}

impl<'a> DependencyInstaller<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        resolver: &'a dyn WhichResolver,
        homebrew_opt: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            resolver,
            homebrew_opt: homebrew_opt.into(),
        }
    }

    /// Make LLVM `llvm_version` available.
    ///
    /// Works on a copy of `path` and returns the directories that have to
    /// be prepended to it for later commands.
    pub async fn install(
        &self,
        platform: &Platform,
        llvm_version: &str,
        path: &ExecutionPath,
    ) -> SetupResult<Vec<PathBuf>> {
        match platform {
            Platform::MacOS => self.install_homebrew(llvm_version, path).await,
            Platform::Linux => self.install_apt(llvm_version, path).await,
            Platform::Windows => {
                debug!("LLVM is bundled with the sources on Windows");
                Ok(Vec::new())
            }
            Platform::Unsupported(os) => Err(SetupError::UnsupportedPlatform(os.clone())),
        }
    }

    async fn install_homebrew(
        &self,
        llvm_version: &str,
        path: &ExecutionPath,
    ) -> SetupResult<Vec<PathBuf>> {
        let formula = format!("llvm@{}", llvm_version);
        let bin = self.homebrew_opt.join(&formula).join("bin");

        let mut path = path.clone();
        path.prepend(bin.clone());

        info!("Installing {} with Homebrew", formula);
        let brew = CommandSpec::new("brew")
            .args(["install", formula.as_str()])
            .with_path(&path);
        let code = self.runner.exec(&brew).await?;
        if code != 0 {
            return Err(SetupError::DependencyInstall {
                manager: "brew".to_string(),
                package: formula,
                code,
            });
        }

        Ok(vec![bin])
    }

    async fn install_apt(
        &self,
        llvm_version: &str,
        path: &ExecutionPath,
    ) -> SetupResult<Vec<PathBuf>> {
        let probe = format!("llvm-config-{}", llvm_version);
        if let Some(found) = self.resolver.resolve(&probe, path) {
            info!("LLVM {} already installed at {}", llvm_version, found.display());
            return Ok(Vec::new());
        }

        let packages = [
            format!("llvm-{}", llvm_version),
            format!("clang-{}", llvm_version),
        ];
        info!("Installing {} with apt", packages.join(" "));

        let apt = CommandSpec::new("sudo")
            .args(["apt-get", "install", "-y"])
            .args(packages.iter().cloned())
            .with_path(path);
        let code = self.runner.exec(&apt).await?;
        if code != 0 {
            return Err(SetupError::DependencyInstall {
                manager: "apt-get".to_string(),
                package: packages.join(" "),
                code,
            });
        }

        Ok(Vec::new())
    }
}
