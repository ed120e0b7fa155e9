//! Convenience re-exports for common types.

pub use crate::boundary::{LoadState, NativeSolver, NativeSolverBuilder};
pub use crate::config::LoaderConfig;
pub use crate::error::{
    ConfigError, ErrorCategory, FailureKind, InitError, NativeCallResult, SolveFailure,
};
pub use crate::global::{ensure_loaded, global, install_global, invoke};
pub use crate::loader::{DynamicLoader, LoadedModule, ModuleLoader};
pub use crate::platform::{MatchPolicy, PlatformTag, RawPlatform};
pub use crate::resources::{
    DirectoryResources, EmbeddedResource, EmbeddedResources, ResourceSource,
};
