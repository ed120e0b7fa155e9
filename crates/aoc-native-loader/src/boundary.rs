//! The call surface and its one-time load barrier.
//!
//! # Load sequence
//!
//! ```text
//! RawPlatform ──resolve──▶ PlatformTag ──build_filename──▶ artifact name
//!      ──materialize──▶ TempResource ──ModuleLoader::load──▶ LoadedModule
//! ```
//!
//! The sequence runs at most once per [`NativeSolver`]. The first caller of
//! [`NativeSolver::ensure_loaded`] runs it; concurrent callers block until
//! the state settles. Both terminal outcomes are kept for the solver's
//! lifetime: a failed load is never retried.
//!
//! # Thread safety of calls
//!
//! Once loaded, [`NativeSolver::invoke`] reads the module without locking and
//! may call into it from several threads at once. The module must tolerate
//! that; this crate does not serialize calls.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use aoc_native_abi::panic_message;
use parking_lot::{Condvar, Mutex};

use crate::config::LoaderConfig;
use crate::error::{InitError, NativeCallResult, SolveFailure};
use crate::extract::ResourceExtractor;
use crate::library_name::build_filename;
use crate::loader::{DynamicLoader, LoadedModule, ModuleLoader};
use crate::platform::RawPlatform;
use crate::resources::{DirectoryResources, EmbeddedResources, ResourceSource};

/// Where a [`NativeSolver`] is in its load sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nobody has asked for the module yet.
    Uninitialized,
    /// One thread is running the load sequence.
    Loading,
    /// The module is loaded and callable.
    Loaded,
    /// The load sequence failed; the error is returned to every caller.
    Failed(InitError),
}

impl LoadState {
    /// Whether the state can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed(_))
    }
}

/// Binds the packaged solver module and calls it.
pub struct NativeSolver {
    config: LoaderConfig,
    platform: RawPlatform,
    extractor: ResourceExtractor,
    loader: Box<dyn ModuleLoader>,
    state: Mutex<LoadState>,
    settled: Condvar,
    module: OnceLock<LoadedModule>,
}

impl NativeSolver {
    /// Start building a solver.
    pub fn builder() -> NativeSolverBuilder {
        NativeSolverBuilder::default()
    }

    /// A solver for `config` on the host platform.
    ///
    /// Artifacts come from `config.resource_dir` when set; otherwise nothing
    /// is available to load. Binaries with embedded artifacts use
    /// [`NativeSolverBuilder::resources`].
    pub fn new(config: LoaderConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// The configuration in use.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Snapshot of the load state.
    pub fn load_state(&self) -> LoadState {
        self.state.lock().clone()
    }

    /// Artifact filename for this solver's platform and base name.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::UnsupportedPlatform`] when the platform does not
    /// resolve under the configured policy.
    pub fn library_name(&self) -> Result<String, InitError> {
        let tag = self.platform.resolve(self.config.match_policy)?;
        Ok(build_filename(&self.config.base_name, tag))
    }

    /// The loaded module, if loading has succeeded.
    pub fn module(&self) -> Option<&LoadedModule> {
        self.module.get()
    }

    /// Run the load sequence unless it has already run.
    ///
    /// Blocks while another thread is loading. Idempotent once the state is
    /// terminal: later calls return the recorded outcome without side effects.
    ///
    /// # Errors
    ///
    /// Returns the [`InitError`] that ended the load sequence, the same value
    /// on every call.
    pub fn ensure_loaded(&self) -> Result<(), InitError> {
        self.loaded().map(|_| ())
    }

    /// Solve one puzzle part, loading the module first if needed.
    ///
    /// Failures reported by the module leave the load state untouched, so the
    /// next call is unaffected.
    pub fn invoke(&self, year: i32, day: i32, part: i32, input: &str) -> NativeCallResult {
        let module = self
            .loaded()
            .map_err(|error| SolveFailure::unavailable(&error))?;
        module.call(year, day, part, input)
    }

    fn loaded(&self) -> Result<&LoadedModule, InitError> {
        if let Some(module) = self.module.get() {
            return Ok(module);
        }

        let mut state = self.state.lock();
        loop {
            match &*state {
                LoadState::Uninitialized => break,
                LoadState::Loading => {}
                LoadState::Loaded => {
                    return self
                        .module
                        .get()
                        .ok_or_else(|| pipeline_failure("module missing after load"));
                }
                LoadState::Failed(error) => return Err(error.clone()),
            }
            self.settled.wait(&mut state);
        }
        *state = LoadState::Loading;
        drop(state);

        // A panic must still settle the state or waiters would block forever.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline()))
            .unwrap_or_else(|payload| {
                Err(pipeline_failure(format!(
                    "load sequence panicked: {}",
                    panic_message(&*payload)
                )))
            });

        let mut state = self.state.lock();
        let result = match outcome {
            Ok(module) => {
                let module = self.module.get_or_init(|| module);
                *state = LoadState::Loaded;
                Ok(module)
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    category = %error.category(),
                    "Native solver unavailable"
                );
                *state = LoadState::Failed(error.clone());
                Err(error)
            }
        };
        drop(state);
        self.settled.notify_all();
        result
    }

    fn run_pipeline(&self) -> Result<LoadedModule, InitError> {
        let tag = self.platform.resolve(self.config.match_policy)?;
        let name = build_filename(&self.config.base_name, tag);
        let artifact = self.extractor.materialize(&name)?;
        let mut module = self.loader.load(artifact.path())?;
        module.attach_artifact(artifact);

        tracing::info!(
            platform = %tag,
            library = %name,
            abi_version = module.abi_version(),
            "Native solver ready"
        );
        Ok(module)
    }
}

fn pipeline_failure(reason: impl fmt::Display) -> InitError {
    InitError::load(Path::new("<load sequence>"), reason)
}

impl fmt::Debug for NativeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeSolver")
            .field("config", &self.config)
            .field("platform", &self.platform)
            .field("extractor", &self.extractor)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

/// Builder for [`NativeSolver`].
///
/// Every part defaults to production behaviour: host platform, system temp
/// directory, [`DynamicLoader`], and artifacts from the configured resource
/// directory.
#[derive(Default)]
pub struct NativeSolverBuilder {
    config: LoaderConfig,
    platform: Option<RawPlatform>,
    resources: Option<Arc<dyn ResourceSource>>,
    loader: Option<Box<dyn ModuleLoader>>,
    temp_dir: Option<PathBuf>,
}

impl NativeSolverBuilder {
    /// Use `config`.
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve the artifact for `platform` instead of the host.
    pub fn platform(mut self, platform: RawPlatform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Read artifacts from `resources`, overriding `resource_dir`.
    pub fn resources(mut self, resources: impl ResourceSource + 'static) -> Self {
        self.resources = Some(Arc::new(resources));
        self
    }

    /// Read artifacts from a shared source.
    pub fn resource_source(mut self, resources: Arc<dyn ResourceSource>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Load artifacts with `loader`.
    pub fn loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Extract artifacts into `dir`.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Build the solver. Nothing is loaded until first use.
    pub fn build(self) -> NativeSolver {
        let resources: Arc<dyn ResourceSource> = match (self.resources, &self.config.resource_dir) {
            (Some(resources), _) => resources,
            (None, Some(dir)) => Arc::new(DirectoryResources::new(dir)),
            (None, None) => Arc::new(EmbeddedResources::empty()),
        };

        let mut extractor =
            ResourceExtractor::new(resources).with_prefix(self.config.temp_prefix.clone());
        if let Some(dir) = self.temp_dir {
            extractor = extractor.with_temp_dir(dir);
        }

        NativeSolver {
            config: self.config,
            platform: self.platform.unwrap_or_default(),
            extractor,
            loader: self.loader.unwrap_or_else(|| Box::new(DynamicLoader)),
            state: Mutex::new(LoadState::Uninitialized),
            settled: Condvar::new(),
            module: OnceLock::new(),
        }
    }
}
