//! Post step: persist the checkout after a rebuild

use crate::actions::{state, state_from_env};
use crate::cache::{CacheKey, CachePaths, CacheStore};
use crate::config::parse_bool_input;
use crate::error::SetupResult;
use crate::toolchain::BuildOutcome;
use tracing::{debug, info};

/// What the main step left behind for the post step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostState {
    pub enabled: bool,
    pub cache_hit: bool,
    pub key: Option<CacheKey>,
}

impl PostState {
    /// Read the state saved by the main step. A missing key means the main
    /// step did not finish.
    pub fn from_env() -> Self {
        let flag = |name: &str| {
            state_from_env(name)
                .and_then(|v| parse_bool_input(name, &v).ok())
                .unwrap_or(false)
        };

        Self {
            enabled: flag(state::CACHE_ENABLED),
            cache_hit: flag(state::CACHE_HIT),
            key: state_from_env(state::CACHE_KEY).map(CacheKey::from_raw),
        }
    }

    /// State equivalent to what a finished run reports
    pub fn from_outcome(outcome: &BuildOutcome, enabled: bool, key: CacheKey) -> Self {
        Self {
            enabled,
            cache_hit: outcome.cache_hit(),
            key: outcome.is_success().then_some(key),
        }
    }

    /// Key to save under, if saving is warranted
    pub fn save_key(&self) -> Option<&CacheKey> {
        if !self.enabled {
            debug!("Cache disabled, not saving");
            return None;
        }
        if self.cache_hit {
            debug!("Confirmed cache hit, nothing new to save");
            return None;
        }
        self.key.as_ref()
    }
}

/// Save the checkout when the run rebuilt it. Returns whether anything was
/// written.
pub async fn save_cache(
    store: &dyn CacheStore,
    paths: &CachePaths,
    state: &PostState,
) -> SetupResult<bool> {
    let Some(key) = state.save_key() else {
        info!("Skipping cache save");
        return Ok(false);
    };

    info!("Saving {} as {}", paths.checkout().display(), key);
    store.save(paths, key).await?;
    Ok(true)
}
