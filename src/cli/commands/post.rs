//! Post command - save the cache after the job's main step

use super::{cache_paths, cache_store};
use crate::actions::{GithubReporter, OutputReporter};
use crate::cli::args::PostArgs;
use crate::config::Config;
use crate::error::SetupResult;
use crate::toolchain::{save_cache, PostState};
use tracing::debug;

/// Execute the post command. A failed save is a warning, never a job failure.
pub async fn execute(args: PostArgs, config: &Config) -> SetupResult<()> {
    let reporter = GithubReporter::from_env();
    let state = PostState::from_env();
    debug!("Post state: {:?}", state);

    let paths = cache_paths(config, &args.paths);
    let store = cache_store(config, &args.paths);

    match save_cache(&store, &paths, &state).await {
        Ok(true) => reporter.info(&format!("Cache saved to {}", store.root().display())),
        Ok(false) => {}
        Err(e) => reporter.warning(&e.to_string()),
    }

    Ok(())
}
