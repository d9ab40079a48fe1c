//! Key command - print the cache key

use crate::cache::CacheKey;
use crate::cli::args::KeyArgs;
use crate::config::{Config, ConfigManager};
use crate::error::SetupResult;
use crate::toolchain::Platform;

/// Execute the key command
pub async fn execute(args: KeyArgs, config: &Config) -> SetupResult<()> {
    let inputs = ConfigManager::resolve(config, &args.inputs.overrides())?;
    let platform = args
        .os
        .as_deref()
        .map(Platform::from_os)
        .unwrap_or_else(Platform::detect);

    println!("{}", CacheKey::compose(&inputs, &platform));
    Ok(())
}
