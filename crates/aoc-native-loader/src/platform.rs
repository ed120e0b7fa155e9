//! Platform detection.
//!
//! Turns the raw OS and CPU architecture names reported by the environment
//! into a [`PlatformTag`]. The raw strings are treated as untrusted free-form
//! text.
//!
//! # Matching policies
//!
//! | Policy       | Unknown arch on Linux/macOS | Unknown arch on Windows |
//! |--------------|-----------------------------|-------------------------|
//! | `Strict`     | rejected                    | rejected                |
//! | `Permissive` | treated as `x86_64`         | treated as `x86_64`     |
//!
//! `Strict` is the default. `Permissive` reproduces the legacy behaviour where
//! only the exact string `"aarch64"` selects ARM on Linux/macOS; it can pick a
//! binary the CPU cannot run. Windows on ARM is rejected under both policies
//! because no such artifact is produced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InitError};

/// How architecture names are matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Exact match against the known names; anything else is unsupported.
    #[default]
    Strict,
    /// Legacy fallback to `x86_64` for unknown names.
    Permissive,
}

impl MatchPolicy {
    /// Lower-case name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            MatchPolicy::Strict => "strict",
            MatchPolicy::Permissive => "permissive",
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(MatchPolicy::Strict),
            "permissive" => Ok(MatchPolicy::Permissive),
            _ => Err(ConfigError::InvalidMatchPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported operating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux
    Linux,
    /// macOS
    Macos,
    /// Windows
    Windows,
}

impl Os {
    /// Canonical lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Macos => "macos",
            Os::Windows => "windows",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        // "darwin" contains "win", so macOS is checked before Windows.
        if name.contains("nux") {
            Some(Os::Linux)
        } else if name.contains("mac") || name.contains("darwin") {
            Some(Os::Macos)
        } else if name.contains("win") {
            Some(Os::Windows)
        } else {
            None
        }
    }
}

/// Supported CPU architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit x86
    X86_64,
    /// 64-bit ARM
    Aarch64,
}

impl Arch {
    /// Canonical name, as used in artifact filenames.
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        }
    }

    fn from_name_strict(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "x86-64" | "x86_64" | "amd64" | "x64" => Some(Arch::X86_64),
            "arm-v8" | "arm64" | "aarch64" => Some(Arch::Aarch64),
            _ => None,
        }
    }

    fn from_name(name: &str, os: Os, policy: MatchPolicy) -> Option<Self> {
        match (policy, os) {
            (MatchPolicy::Strict, _) => Self::from_name_strict(name),
            (MatchPolicy::Permissive, Os::Windows) => {
                Some(Self::from_name_strict(name).unwrap_or(Arch::X86_64))
            }
            (MatchPolicy::Permissive, Os::Linux | Os::Macos) => {
                if name == "aarch64" {
                    Some(Arch::Aarch64)
                } else {
                    Some(Arch::X86_64)
                }
            }
        }
    }
}

/// Canonical (OS, architecture) pair selecting the native artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformTag {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl PlatformTag {
    /// Resolve raw OS and architecture names under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::UnsupportedPlatform`] when the OS is unknown, the
    /// architecture is unknown under `policy`, or the pair is Windows on ARM.
    ///
    /// # Example
    ///
    /// ```
    /// use aoc_native_loader::platform::{Arch, MatchPolicy, Os, PlatformTag};
    ///
    /// let tag = PlatformTag::resolve("Mac OS X", "arm64", MatchPolicy::Strict)?;
    /// assert_eq!((tag.os, tag.arch), (Os::Macos, Arch::Aarch64));
    /// assert!(PlatformTag::resolve("plan9", "x86_64", MatchPolicy::Strict).is_err());
    /// # Ok::<(), aoc_native_loader::InitError>(())
    /// ```
    pub fn resolve(os_name: &str, arch_name: &str, policy: MatchPolicy) -> Result<Self, InitError> {
        let unsupported = || InitError::unsupported(os_name, arch_name);

        let os = Os::from_name(os_name).ok_or_else(unsupported)?;
        let arch = Arch::from_name(arch_name, os, policy).ok_or_else(unsupported)?;
        if os == Os::Windows && arch == Arch::Aarch64 {
            return Err(unsupported());
        }

        tracing::debug!(
            os = os_name,
            arch = arch_name,
            %policy,
            platform = %PlatformTag { os, arch },
            "Resolved platform"
        );
        Ok(Self { os, arch })
    }

    /// Resolve the platform this process was compiled for.
    ///
    /// # Errors
    ///
    /// See [`PlatformTag::resolve`].
    pub fn current(policy: MatchPolicy) -> Result<Self, InitError> {
        Self::resolve(std::env::consts::OS, std::env::consts::ARCH, policy)
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.as_str(), self.arch.as_str())
    }
}

/// Raw platform names, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlatform {
    /// OS name, e.g. `"linux"` or `"Mac OS X"`.
    pub os: String,
    /// Architecture name, e.g. `"x86_64"` or `"amd64"`.
    pub arch: String,
}

impl RawPlatform {
    /// Names for an arbitrary platform.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Names of the platform this process was compiled for.
    pub fn host() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Resolve under `policy`.
    ///
    /// # Errors
    ///
    /// See [`PlatformTag::resolve`].
    pub fn resolve(&self, policy: MatchPolicy) -> Result<PlatformTag, InitError> {
        PlatformTag::resolve(&self.os, &self.arch, policy)
    }
}

impl Default for RawPlatform {
    fn default() -> Self {
        Self::host()
    }
}
