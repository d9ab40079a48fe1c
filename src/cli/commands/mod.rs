//! CLI command implementations

pub mod key;
pub mod post;
pub mod run;

pub use key::execute as key;
pub use post::execute as post;
pub use run::execute as run;

use crate::cache::{CachePaths, LocalCacheStore};
use crate::cli::args::PathArgs;
use crate::config::Config;
use crate::process::ExecutionPath;
use crate::toolchain::{HostSettings, Platform};

/// Checkout location: flag, then config
fn cache_paths(config: &Config, paths: &PathArgs) -> CachePaths {
    CachePaths::new(
        paths
            .checkout
            .clone()
            .unwrap_or_else(|| config.paths.checkout.clone()),
    )
}

/// Cache store rooted at the flag or configured directory
fn cache_store(config: &Config, paths: &PathArgs) -> LocalCacheStore {
    LocalCacheStore::new(
        paths
            .cache_dir
            .clone()
            .unwrap_or_else(|| config.cache.dir.clone()),
    )
}

fn host_settings(config: &Config, paths: &PathArgs) -> HostSettings {
    HostSettings {
        platform: Platform::detect(),
        paths: cache_paths(config, paths),
        homebrew_opt: config.paths.homebrew_opt.clone(),
        execution_path: ExecutionPath::from_env(),
    }
}
