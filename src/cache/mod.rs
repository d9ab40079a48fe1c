//! Build cache
//!
//! A cache unit is the compiler checkout together with its build output,
//! stored under a key derived from the inputs that affect binary
//! compatibility. A key match alone does not make an entry trustworthy:
//! branch names move, so the orchestrator confirms a restored checkout is
//! still current before skipping the build.
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | Miss | No entry for the key, fresh clone |
//! | Stale hit | Entry found, upstream moved, rebuild in place |
//! | Confirmed hit | Entry found and current, no build |

pub mod key;
pub mod local;
pub mod store;

pub use key::CacheKey;
pub use local::{CacheManifest, LocalCacheStore};
pub use store::{CachePaths, CacheStore};
