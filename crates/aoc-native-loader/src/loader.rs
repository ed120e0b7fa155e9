//! Dynamic loading of the solver module and calls across the C ABI.

#![expect(unsafe_code, reason = "loads a shared library and calls its C entry points")]

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use aoc_native_abi::{
    ABI_VERSION_SYMBOL, AbiCheckResult, AbiVersionFn, EntryPoints, FREE_OUTPUT_SYMBOL, FreeOutputFn,
    SOLVE_SYMBOL, SolveFn, SolveOutput, SolveStatus, check_abi_compatibility, panic_message,
};
use libloading::{Library, Symbol};

use crate::error::{FailureKind, InitError, NativeCallResult, SolveFailure};
use crate::extract::TempResource;

/// Turns an artifact on disk into callable entry points.
///
/// [`DynamicLoader`] is the production implementation; tests substitute
/// loaders that count calls or hand out in-process modules.
pub trait ModuleLoader: Send + Sync {
    /// Load the module at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::LoadFailure`] when the artifact is missing, is not
    /// a loadable library for this process, lacks an entry point, or reports
    /// an incompatible ABI version.
    fn load(&self, path: &Path) -> Result<LoadedModule, InitError>;
}

/// Loads shared libraries with the platform's dynamic linker.
#[derive(Debug, Default, Clone, Copy)]
pub struct DynamicLoader;

impl ModuleLoader for DynamicLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule, InitError> {
        if !path.is_file() {
            return Err(InitError::load(path, "no such file"));
        }

        // SAFETY: loading runs the library's initializers. The artifact ships
        // with this binary and is trusted to the same degree.
        let library = unsafe { Library::new(path) }.map_err(|e| InitError::load(path, e))?;
        let entry_points = resolve_entry_points(&library).map_err(|e| InitError::load(path, e))?;
        check_version(&entry_points, path)?;

        tracing::info!(
            path = %path.display(),
            abi_version = entry_points.abi_version,
            "Native solver loaded successfully"
        );

        Ok(LoadedModule {
            entry_points,
            path: Some(path.to_path_buf()),
            _library: Some(library),
            artifact: None,
        })
    }
}

/// Look up `name` in `library`.
///
/// # Safety
///
/// `T` must be the type the symbol was exported with.
unsafe fn symbol<'lib, T>(library: &'lib Library, name: &[u8]) -> Result<Symbol<'lib, T>, String> {
    // SAFETY: the type contract is forwarded to the caller.
    unsafe { library.get(name) }
        .map_err(|e| format!("missing entry point {}: {e}", String::from_utf8_lossy(name)))
}

fn resolve_entry_points(library: &Library) -> Result<EntryPoints, String> {
    // SAFETY: `AbiVersionFn` is the exported signature of this symbol.
    let abi_version = unsafe { symbol::<AbiVersionFn>(library, ABI_VERSION_SYMBOL.as_slice()) }?;
    // SAFETY: `SolveFn` is the exported signature of this symbol.
    let solve = unsafe { symbol::<SolveFn>(library, SOLVE_SYMBOL.as_slice()) }?;
    // SAFETY: `FreeOutputFn` is the exported signature of this symbol.
    let free_output = unsafe { symbol::<FreeOutputFn>(library, FREE_OUTPUT_SYMBOL.as_slice()) }?;

    // SAFETY: takes no arguments and has no preconditions.
    let version = unsafe { abi_version() };

    Ok(EntryPoints {
        abi_version: version,
        solve: *solve,
        free_output: *free_output,
    })
}

fn check_version(entry_points: &EntryPoints, path: &Path) -> Result<(), InitError> {
    match check_abi_compatibility(entry_points.abi_version) {
        AbiCheckResult::Compatible => Ok(()),
        AbiCheckResult::Mismatch { expected, actual } => Err(InitError::load(
            path,
            format!("ABI version mismatch: expected {expected}, got {actual}"),
        )),
    }
}

/// A solver module ready to be called.
///
/// Keeps the library mapped for as long as it lives. The entry points are
/// plain function pointers into that mapping.
pub struct LoadedModule {
    entry_points: EntryPoints,
    path: Option<PathBuf>,
    // Unmapped before the artifact below is deleted.
    _library: Option<Library>,
    artifact: Option<TempResource>,
}

impl LoadedModule {
    /// Wrap entry points compiled into this process.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::LoadFailure`] when the reported ABI version is not
    /// supported.
    pub fn in_process(entry_points: EntryPoints) -> Result<Self, InitError> {
        check_version(&entry_points, Path::new("<in-process>"))?;
        Ok(Self {
            entry_points,
            path: None,
            _library: None,
            artifact: None,
        })
    }

    /// Tie the extracted artifact's lifetime to this module.
    pub(crate) fn attach_artifact(&mut self, artifact: TempResource) {
        self.artifact = Some(artifact);
    }

    /// Path the library was loaded from, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// ABI version reported by the module.
    pub fn abi_version(&self) -> u32 {
        self.entry_points.abi_version
    }

    /// Call the module's solve entry point.
    ///
    /// A Rust panic unwinding out of the module is caught and reported as
    /// [`FailureKind::NativePanic`]; the payload of such a call is not freed.
    pub fn call(&self, year: i32, day: i32, part: i32, input: &str) -> NativeCallResult {
        let EntryPoints {
            solve, free_output, ..
        } = self.entry_points;

        tracing::trace!(year, day, part, input_len = input.len(), "Calling native solver");

        let mut out = SolveOutput::empty();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: `input` is valid for `input.len()` bytes for the whole
            // call and `out` is a live, initialized `SolveOutput`.
            unsafe { solve(year, day, part, input.as_ptr(), input.len(), &mut out) }
        }));

        let code = match outcome {
            Ok(code) => code,
            Err(payload) => {
                tracing::warn!(year, day, part, "Native solver unwound across the ABI");
                return Err(SolveFailure::new(
                    FailureKind::NativePanic,
                    format!("Native solver panicked: {}", panic_message(&*payload)),
                ));
            }
        };

        let payload = read_payload(&out);
        // SAFETY: `out` was filled by this module's solve call and is released once.
        unsafe { free_output(&mut out) };

        map_status(code, payload?)
    }
}

impl fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModule")
            .field("abi_version", &self.entry_points.abi_version)
            .field("path", &self.path)
            .field("artifact", &self.artifact)
            .finish_non_exhaustive()
    }
}

fn protocol(message: impl Into<String>) -> SolveFailure {
    SolveFailure::new(FailureKind::Protocol, message)
}

fn read_payload(out: &SolveOutput) -> Result<String, SolveFailure> {
    if out.data.is_null() {
        return if out.len == 0 {
            Ok(String::new())
        } else {
            Err(protocol(format!(
                "Native solver returned a null payload of {} bytes",
                out.len
            )))
        };
    }
    if out.len > isize::MAX.unsigned_abs() {
        return Err(protocol(format!(
            "Native solver returned an oversized payload of {} bytes",
            out.len
        )));
    }

    // SAFETY: the module guarantees `data` points to `len` initialized bytes
    // until the output is released, and `len` fits in `isize`.
    let bytes = unsafe { std::slice::from_raw_parts(out.data, out.len) };
    String::from_utf8(bytes.to_vec())
        .map_err(|e| protocol(format!("Native solver returned invalid UTF-8: {e}")))
}

fn map_status(code: i32, payload: String) -> NativeCallResult {
    let kind = match SolveStatus::from_code(code) {
        Some(SolveStatus::Ok) => return Ok(payload),
        Some(SolveStatus::InvalidArguments) => FailureKind::InvalidArguments,
        Some(SolveStatus::InvalidInput) => FailureKind::InvalidInput,
        Some(SolveStatus::Panic) => FailureKind::NativePanic,
        Some(SolveStatus::NullPointer | SolveStatus::InvalidUtf8) => FailureKind::Protocol,
        None => {
            return Err(protocol(format!(
                "Native solver returned unknown status code {code}"
            )));
        }
    };

    let message = if payload.is_empty() {
        kind.to_string()
    } else {
        payload
    };
    Err(SolveFailure::new(kind, message))
}
