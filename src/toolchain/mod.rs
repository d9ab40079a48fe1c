//! Toolchain provisioning
//!
//! - [`RepositorySync`]: clone and update the compiler checkout
//! - [`DependencyInstaller`]: install LLVM per platform
//! - [`BuildOrchestrator`]: decide between cached and fresh sources, build
//! - [`post`]: save the checkout for the next run

mod deps;
mod orchestrator;
mod platform;
pub mod post;
mod repo;

pub use deps::DependencyInstaller;
pub use orchestrator::{build_command, BuildOrchestrator, BuildOutcome, HostSettings};
pub use platform::Platform;
pub use post::{save_cache, PostState};
pub use repo::{RepositorySync, ALREADY_UP_TO_DATE};
