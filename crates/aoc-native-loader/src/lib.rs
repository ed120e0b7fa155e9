//! Binding to the precompiled native Advent of Code solver.
//!
//! The solver ships as one shared library per supported platform, packaged
//! inside the host binary. This crate picks the right artifact, copies it to
//! disk, loads it exactly once per process and calls it:
//!
//! - Platform detection with a named [`MatchPolicy`]
//! - Deterministic artifact naming (`[lib]<base>[_<arch>]<.so|.dylib|.dll>`)
//! - Extraction to a uniquely named temp file, removed on drop or at exit
//! - ABI version checking of the loaded library
//! - A blocking one-time load barrier with a recorded failure
//!
//! # Supported platforms
//!
//! | OS      | x86_64 | aarch64 |
//! |---------|--------|---------|
//! | Linux   | yes    | yes     |
//! | macOS   | yes    | yes     |
//! | Windows | yes    | no      |
//!
//! # Failure model
//!
//! Load failures ([`InitError`]) are recorded once and returned unchanged to
//! every later caller; the load is never retried. Call failures
//! ([`SolveFailure`]) are scoped to one call and never change the load state.
//!
//! # Security Considerations
//!
//! The loaded library runs with full process privileges and is NOT sandboxed.
//! Artifacts are trusted to the same degree as the binary that embeds them.
//!
//! # Example
//!
//! ```rust,no_run
//! use aoc_native_loader::{EmbeddedResources, LoaderConfig, NativeSolver};
//!
//! let solver = NativeSolver::builder()
//!     .config(LoaderConfig::strict())
//!     .resources(EmbeddedResources::empty())
//!     .build();
//!
//! match solver.invoke(2019, 1, 1, "14") {
//!     Ok(answer) => println!("{answer}"),
//!     Err(failure) => eprintln!("{failure}"),
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod boundary;
mod cleanup;
pub mod config;
pub mod error;
pub mod extract;
pub mod global;
pub mod library_name;
pub mod loader;
pub mod platform;
pub mod prelude;
pub mod resources;

pub use boundary::{LoadState, NativeSolver, NativeSolverBuilder};
pub use config::LoaderConfig;
pub use error::{ConfigError, ErrorCategory, FailureKind, InitError, NativeCallResult, SolveFailure};
pub use extract::{ResourceExtractor, TempResource};
pub use global::{ensure_loaded, global, install_global, invoke};
pub use library_name::{LibraryIdentity, build_filename};
pub use loader::{DynamicLoader, LoadedModule, ModuleLoader};
pub use platform::{Arch, MatchPolicy, Os, PlatformTag, RawPlatform};
pub use resources::{DirectoryResources, EmbeddedResource, EmbeddedResources, ResourceSource};
