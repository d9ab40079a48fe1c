//! Run command - provision the toolchain

use super::{cache_store, host_settings};
use crate::actions::{GithubReporter, OutputReporter};
use crate::cache::CacheKey;
use crate::cli::args::RunArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{SetupError, SetupResult};
use crate::process::{PathResolver, SystemRunner};
use crate::toolchain::{save_cache, BuildOrchestrator, BuildOutcome, PostState};
use tracing::debug;

/// Execute the run command
pub async fn execute(args: RunArgs, config: &Config) -> SetupResult<()> {
    let reporter = GithubReporter::from_env();

    let inputs = match ConfigManager::resolve(config, &args.inputs.overrides()) {
        Ok(inputs) => inputs,
        Err(e) => {
            reporter.set_failed(&e.to_string());
            return Err(SetupError::Reported(e.to_string()));
        }
    };

    let host = host_settings(config, &args.paths);
    let store = cache_store(config, &args.paths);
    debug!("Host: {:?}, cache root: {}", host, store.root().display());

    let runner = SystemRunner::new();
    let resolver = PathResolver;
    let orchestrator =
        BuildOrchestrator::new(&runner, &resolver, &store, &reporter, host.clone());

    let outcome = orchestrator.run(&inputs).await;
    if let BuildOutcome::Failed(reason) = &outcome {
        return Err(SetupError::Reported(reason.clone()));
    }

    if args.save_cache {
        let key = CacheKey::compose(&inputs, &host.platform);
        let state = PostState::from_outcome(&outcome, inputs.cache_check(), key);
        if let Err(e) = save_cache(&store, &host.paths, &state).await {
            reporter.warning(&e.to_string());
        }
    }

    Ok(())
}
