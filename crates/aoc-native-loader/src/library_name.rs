//! Artifact filename synthesis.
//!
//! Naming grammar shared with the packaging step:
//!
//! ```text
//! [lib]<base_name>[_<arch>]<.so|.dylib|.dll>
//! ```
//!
//! | Platform        | Filename                        |
//! |-----------------|---------------------------------|
//! | linux/x86_64    | `lib<base>_x86_64.so`           |
//! | linux/aarch64   | `lib<base>_aarch64.so`          |
//! | macos/x86_64    | `lib<base>_x86_64.dylib`        |
//! | macos/aarch64   | `lib<base>_aarch64.dylib`       |
//! | windows/x86_64  | `<base>.dll`                    |

use std::fmt;

use crate::platform::{Os, PlatformTag};

/// The parts of an artifact filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryIdentity {
    /// Library base name, e.g. `advent_of_code_java`.
    pub base_name: String,
    /// `lib` on POSIX platforms, empty on Windows.
    pub prefix: &'static str,
    /// Extension including the dot.
    pub suffix: &'static str,
    /// `_x86_64` / `_aarch64` on POSIX platforms, empty on Windows.
    pub arch_suffix: String,
}

impl LibraryIdentity {
    /// Derive the identity for `base_name` on `tag`.
    pub fn new(base_name: &str, tag: PlatformTag) -> Self {
        let (prefix, suffix, arch_suffix) = match tag.os {
            Os::Linux => ("lib", ".so", format!("_{}", tag.arch.as_str())),
            Os::Macos => ("lib", ".dylib", format!("_{}", tag.arch.as_str())),
            Os::Windows => ("", ".dll", String::new()),
        };
        Self {
            base_name: base_name.to_owned(),
            prefix,
            suffix,
            arch_suffix,
        }
    }

    /// Full artifact filename.
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LibraryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.prefix, self.base_name, self.arch_suffix, self.suffix
        )
    }
}

/// Filename of the artifact for `base_name` on `tag`.
///
/// # Example
///
/// ```
/// use aoc_native_loader::library_name::build_filename;
/// use aoc_native_loader::platform::{MatchPolicy, PlatformTag};
///
/// let tag = PlatformTag::resolve("linux", "amd64", MatchPolicy::Strict)?;
/// assert_eq!(build_filename("advent_of_code_java", tag), "libadvent_of_code_java_x86_64.so");
/// # Ok::<(), aoc_native_loader::InitError>(())
/// ```
pub fn build_filename(base_name: &str, tag: PlatformTag) -> String {
    LibraryIdentity::new(base_name, tag).filename()
}
