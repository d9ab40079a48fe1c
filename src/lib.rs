//! setup-odin - Odin toolchain provisioning for CI
//!
//! Restores or clones the compiler sources, installs the matching LLVM and
//! builds the compiler only when a cached build cannot be confirmed current.

pub mod actions;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod process;
pub mod toolchain;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{SetupError, SetupResult};
