//! Result and state reporting to the CI host
//!
//! [`OutputReporter`] is the single sink for outputs, persisted state, path
//! additions and failures. [`GithubReporter`] speaks the GitHub Actions
//! file-command protocol.

mod github;

pub use github::{state_from_env, GithubReporter};

use std::path::Path;

/// Output name reporting whether a confirmed cache hit skipped the build
pub const OUTPUT_CACHE_HIT: &str = "cache-hit";

/// State names handed from the main step to the post step
pub mod state {
    pub const CACHE_HIT: &str = "cache-hit";
    pub const CACHE_KEY: &str = "cache-key";
    pub const CACHE_ENABLED: &str = "cache-enabled";
}

/// Sink for everything a run reports back to the CI host
pub trait OutputReporter: Send + Sync {
    /// Set a step output
    fn set_output(&self, name: &str, value: &str);

    /// Persist a value for the post step
    fn save_state(&self, name: &str, value: &str);

    /// Make a directory visible on `PATH` for later steps
    fn add_path(&self, dir: &Path);

    /// Informational log line
    fn info(&self, message: &str);

    /// Non-fatal problem worth surfacing in the run summary
    fn warning(&self, message: &str);

    /// Mark the step as failed
    fn set_failed(&self, message: &str);
}
