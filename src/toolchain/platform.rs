//! Host platform detection

use std::fmt;

/// Host operating system family.
///
/// Each supported family has its own way of providing LLVM and building the
/// compiler; anything else is carried as `Unsupported` with its OS name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux - LLVM from apt
    Linux,
    /// macOS - LLVM from Homebrew
    MacOS,
    /// Windows - LLVM ships with the compiler sources
    Windows,
    /// Anything else
    Unsupported(String),
}

impl Platform {
    /// Detect the current platform
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOS,
            "windows" => Platform::Windows,
            other => Platform::Unsupported(other.to_string()),
        }
    }

    /// Stable lowercase identifier, used in cache keys
    pub fn id(&self) -> &str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOS => "macos",
            Platform::Windows => "windows",
            Platform::Unsupported(os) => os,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported(_))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "Linux"),
            Platform::MacOS => write!(f, "macOS"),
            Platform::Windows => write!(f, "Windows"),
            Platform::Unsupported(os) => write!(f, "{}", os),
        }
    }
}
