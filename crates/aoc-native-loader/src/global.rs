//! The process-wide solver.
//!
//! A binary with embedded artifacts installs its own [`NativeSolver`] at
//! startup. Otherwise the first use builds one from
//! [`LoaderConfig::from_env_lenient`], which can only find artifacts through
//! `AOC_NATIVE_RESOURCE_DIR`.

use std::sync::OnceLock;

use crate::boundary::NativeSolver;
use crate::config::LoaderConfig;
use crate::error::{InitError, NativeCallResult};

static GLOBAL: OnceLock<NativeSolver> = OnceLock::new();

/// Make `solver` the process-wide solver.
///
/// # Errors
///
/// Hands `solver` back if a global solver already exists, whether installed
/// or created on first use.
pub fn install_global(solver: NativeSolver) -> Result<(), NativeSolver> {
    GLOBAL.set(solver)
}

/// The process-wide solver, created from the environment on first use.
///
/// Invalid `AOC_NATIVE_*` values are logged and keep their defaults.
pub fn global() -> &'static NativeSolver {
    GLOBAL.get_or_init(|| {
        let (config, errors) = LoaderConfig::from_env_lenient();
        for error in &errors {
            tracing::warn!(%error, "Ignoring invalid loader environment variable");
        }
        NativeSolver::new(config)
    })
}

/// [`NativeSolver::ensure_loaded`] on the process-wide solver.
///
/// # Errors
///
/// See [`NativeSolver::ensure_loaded`].
pub fn ensure_loaded() -> Result<(), InitError> {
    global().ensure_loaded()
}

/// [`NativeSolver::invoke`] on the process-wide solver.
pub fn invoke(year: i32, day: i32, part: i32, input: &str) -> NativeCallResult {
    global().invoke(year, day, part, input)
}
