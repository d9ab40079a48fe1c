//! Build orchestration
//!
//! One run moves through these states:
//!
//! ```text
//! START -> RESTORING | CLONING -> CONFIRMED_HIT | REBUILDING -> BUILDING -> DONE | FAILED
//! ```
//!
//! Obtaining the sources (restore + validate, or clone) and installing LLVM
//! run concurrently and are both awaited before anything else happens.

use crate::actions::{state, OutputReporter, OUTPUT_CACHE_HIT};
use crate::cache::{CacheKey, CachePaths, CacheStore};
use crate::config::{BuildType, Inputs};
use crate::error::{SetupError, SetupResult};
use crate::process::{CommandSpec, ExecutionPath, ProcessRunner, WhichResolver};
use crate::toolchain::deps::DependencyInstaller;
use crate::toolchain::repo::RepositorySync;
use crate::toolchain::Platform;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Terminal result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Cached build is current, nothing was built
    CacheHitFresh,
    /// Cached checkout was outdated, pulled and rebuilt
    CacheHitStaleRebuilt,
    /// No usable cache entry, cloned and built
    CacheMissRebuilt,
    /// Caching disabled, cloned and built
    CacheDisabledRebuilt,
    /// The run stopped at a fatal error
    Failed(String),
}

impl BuildOutcome {
    /// Only a confirmed hit counts as a cache hit
    pub fn cache_hit(&self) -> bool {
        matches!(self, BuildOutcome::CacheHitFresh)
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, BuildOutcome::Failed(_))
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::CacheHitFresh => write!(f, "cache hit, up to date"),
            BuildOutcome::CacheHitStaleRebuilt => write!(f, "cache hit, stale, rebuilt"),
            BuildOutcome::CacheMissRebuilt => write!(f, "cache miss, rebuilt"),
            BuildOutcome::CacheDisabledRebuilt => write!(f, "cache disabled, rebuilt"),
            BuildOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// How the checkout was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sources {
    ConfirmedHit,
    StaleHit,
    Miss,
    Disabled,
}

/// Host-specific settings for a run
#[derive(Debug, Clone)]
pub struct HostSettings {
    pub platform: Platform,
    pub paths: CachePaths,
    pub homebrew_opt: PathBuf,
    pub execution_path: ExecutionPath,
}

/// Coordinates cache validation, cloning, LLVM installation and the build
pub struct BuildOrchestrator<'a> {
    runner: &'a dyn ProcessRunner,
    resolver: &'a dyn WhichResolver,
    store: &'a dyn CacheStore,
    reporter: &'a dyn OutputReporter,
    host: HostSettings,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        resolver: &'a dyn WhichResolver,
        store: &'a dyn CacheStore,
        reporter: &'a dyn OutputReporter,
        host: HostSettings,
    ) -> Self {
        Self {
            runner,
            resolver,
            store,
            reporter,
            host,
        }
    }

    /// Run to completion, reporting a failure through the reporter
    pub async fn run(&self, inputs: &Inputs) -> BuildOutcome {
        match self.execute(inputs).await {
            Ok(outcome) => {
                info!("Odin ready: {}", outcome);
                outcome
            }
            Err(e) => {
                let message = e.to_string();
                error!("{}", message);
                self.reporter.set_failed(&message);
                if let Some(hint) = e.hint() {
                    self.reporter.info(&format!("Hint: {}", hint));
                }
                BuildOutcome::Failed(message)
            }
        }
    }

    /// Run to completion, returning the first fatal error
    pub async fn execute(&self, inputs: &Inputs) -> SetupResult<BuildOutcome> {
        // Nothing is restored, cloned or installed on a host we cannot build for
        if !self.host.platform.is_supported() {
            return Err(SetupError::UnsupportedPlatform(
                self.host.platform.id().to_string(),
            ));
        }

        let key = CacheKey::compose(inputs, &self.host.platform);
        let repo = RepositorySync::new(self.runner, self.host.paths.checkout());
        let installer =
            DependencyInstaller::new(self.runner, self.resolver, self.host.homebrew_opt.clone());

        info!(
            "Provisioning Odin {} ({}) from {} on {}",
            inputs.odin_version(),
            inputs.build_type(),
            inputs.repository(),
            self.host.platform
        );

        let (sources, dependencies) = tokio::join!(
            self.obtain_sources(inputs, &key, &repo),
            installer.install(
                &self.host.platform,
                inputs.llvm_version(),
                &self.host.execution_path
            ),
        );
        let sources = sources?;

        let outcome = match sources {
            Sources::ConfirmedHit => {
                // The build is skipped, so a broken LLVM install does not matter here
                let added = match dependencies {
                    Ok(added) => added,
                    Err(e) => {
                        warn!("Ignoring LLVM install failure on cache hit: {}", e);
                        self.reporter
                            .warning(&format!("LLVM install failed, cached build used: {}", e));
                        Vec::new()
                    }
                };
                self.publish_paths(&added);
                BuildOutcome::CacheHitFresh
            }
            rebuild => {
                let added = dependencies?;
                let mut path = self.host.execution_path.clone();
                path.extend_front(&added);

                self.build(inputs.build_type(), &path).await?;
                self.publish_paths(&added);

                match rebuild {
                    Sources::StaleHit => BuildOutcome::CacheHitStaleRebuilt,
                    Sources::Miss => BuildOutcome::CacheMissRebuilt,
                    _ => BuildOutcome::CacheDisabledRebuilt,
                }
            }
        };

        self.report(inputs, &key, &outcome);
        Ok(outcome)
    }

    /// RESTORING or CLONING
    async fn obtain_sources(
        &self,
        inputs: &Inputs,
        key: &CacheKey,
        repo: &RepositorySync<'_>,
    ) -> SetupResult<Sources> {
        if !inputs.cache_check() {
            info!("Cache disabled, cloning {}", inputs.odin_version());
            repo.clear_checkout().await?;
            repo.clone_fresh(inputs.repository(), inputs.odin_version()).await?;
            return Ok(Sources::Disabled);
        }

        info!("Restoring cache {}", key);
        match self.store.restore(&self.host.paths, key).await {
            Some(restored) if &restored == key => {
                debug!("Restored {}, checking for upstream changes", restored);
                if repo.sync_to_latest(inputs.odin_version()).await? {
                    info!("Cached checkout is current");
                    Ok(Sources::ConfirmedHit)
                } else {
                    info!("Cached checkout was outdated, rebuilding");
                    Ok(Sources::StaleHit)
                }
            }
            restored => {
                match restored {
                    Some(other) => info!("Restored {} does not match {}, cloning", other, key),
                    None => info!("No cache entry for {}, cloning", key),
                }
                repo.clear_checkout().await?;
                repo.clone_fresh(inputs.repository(), inputs.odin_version()).await?;
                Ok(Sources::Miss)
            }
        }
    }

    /// BUILDING
    async fn build(&self, build_type: &BuildType, path: &ExecutionPath) -> SetupResult<()> {
        let command = build_command(&self.host.platform, build_type)?
            .cwd(self.host.paths.checkout())
            .with_path(path);

        info!("Building Odin: {}", command);
        let code = self.runner.exec(&command).await?;
        if code != 0 {
            return Err(SetupError::Build {
                build_type: build_type.to_string(),
                code,
            });
        }
        Ok(())
    }

    fn publish_paths(&self, added: &[PathBuf]) {
        for dir in added {
            self.reporter.add_path(dir);
        }
        self.reporter.add_path(self.host.paths.checkout());
    }

    fn report(&self, inputs: &Inputs, key: &CacheKey, outcome: &BuildOutcome) {
        let hit = outcome.cache_hit().to_string();
        self.reporter.set_output(OUTPUT_CACHE_HIT, &hit);
        self.reporter.save_state(state::CACHE_HIT, &hit);
        self.reporter
            .save_state(state::CACHE_ENABLED, &inputs.cache_check().to_string());
        self.reporter.save_state(state::CACHE_KEY, key.as_str());
    }
}

/// The repository's own build script for this platform
pub fn build_command(platform: &Platform, build_type: &BuildType) -> SetupResult<CommandSpec> {
    match platform {
        Platform::Linux | Platform::MacOS => {
            Ok(CommandSpec::new("./build_odin.sh").arg(build_type.as_str()))
        }
        Platform::Windows => Ok(CommandSpec::new("cmd")
            .args(["/C", "build.bat"])
            .arg(build_type.as_str())),
        Platform::Unsupported(os) => Err(SetupError::UnsupportedPlatform(os.clone())),
    }
}
