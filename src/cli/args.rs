//! CLI argument definitions using clap derive

use crate::config::InputOverrides;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// setup-odin - Provision the Odin compiler on CI runners
///
/// Clones or restores the compiler sources, installs the matching LLVM and
/// builds the compiler only when the cached build is out of date.
#[derive(Parser, Debug)]
#[command(name = "setup-odin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SETUP_ODIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local setup-odin.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the toolchain (main action step)
    Run(RunArgs),

    /// Save the build cache (post action step)
    Post(PostArgs),

    /// Print the cache key for the resolved inputs
    Key(KeyArgs),
}

/// Toolchain selection. Each flag also reads the matching action input.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Git URL of the compiler repository
    #[arg(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// Branch or tag to build
    #[arg(long, env = "INPUT_ODIN-VERSION")]
    pub odin_version: Option<String>,

    /// LLVM major version to install
    #[arg(long, env = "INPUT_LLVM-VERSION")]
    pub llvm_version: Option<String>,

    /// Profile passed to the build script (debug, release, ...)
    #[arg(long, env = "INPUT_BUILD-TYPE")]
    pub build_type: Option<String>,

    /// Reuse a cached build when it is still current (true/false)
    #[arg(long, env = "INPUT_CACHE")]
    pub cache: Option<String>,
}

impl InputArgs {
    pub fn overrides(&self) -> InputOverrides {
        InputOverrides {
            repository: self.repository.clone(),
            odin_version: self.odin_version.clone(),
            llvm_version: self.llvm_version.clone(),
            build_type: self.build_type.clone(),
            cache: self.cache.clone(),
        }
    }
}

/// Filesystem locations
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Directory to check out and build the compiler in
    #[arg(long, env = "SETUP_ODIN_CHECKOUT")]
    pub checkout: Option<PathBuf>,

    /// Root directory of the local cache store
    #[arg(long, env = "SETUP_ODIN_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Save the cache right after a rebuild instead of in a post step
    #[arg(long)]
    pub save_cache: bool,
}

/// Arguments for the post command
#[derive(Parser, Debug)]
pub struct PostArgs {
    #[command(flatten)]
    pub paths: PathArgs,
}

/// Arguments for the key command
#[derive(Parser, Debug)]
pub struct KeyArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Compute the key for another OS (linux, macos, windows)
    #[arg(long)]
    pub os: Option<String>,
}
