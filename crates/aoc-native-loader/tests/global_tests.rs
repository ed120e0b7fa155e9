//! The process-wide solver. Kept in its own test binary so the global is
//! installed exactly once.

use std::path::Path;

use aoc_native_loader::{
    EmbeddedResource, EmbeddedResources, InitError, LoadState, LoadedModule, ModuleLoader,
    NativeSolver, RawPlatform,
};
use aoc_test_helpers::prelude::*;

static ARTIFACTS: [EmbeddedResource; 1] = [EmbeddedResource {
    name: "solver.dll",
    bytes: b"MZ placeholder",
}];

struct InProcess;

impl ModuleLoader for InProcess {
    fn load(&self, _path: &Path) -> Result<LoadedModule, InitError> {
        LoadedModule::in_process(fuel_module())
    }
}

#[test]
fn test_installed_global_serves_free_functions() -> TestResult {
    let scratch = tempfile::tempdir()?;
    let solver = NativeSolver::builder()
        .config(aoc_native_loader::LoaderConfig::strict().with_base_name("solver"))
        .platform(RawPlatform::new("windows", "x86_64"))
        .resources(EmbeddedResources::new(&ARTIFACTS))
        .loader(InProcess)
        .temp_dir(scratch.path())
        .build();

    must(aoc_native_loader::install_global(solver));
    assert_eq!(aoc_native_loader::global().load_state(), LoadState::Uninitialized);

    aoc_native_loader::ensure_loaded()?;
    assert_eq!(aoc_native_loader::invoke(2019, 1, 1, "14"), Ok("2".to_owned()));

    let second = NativeSolver::builder().build();
    let rejected = must_err(aoc_native_loader::install_global(second));
    assert_eq!(rejected.load_state(), LoadState::Uninitialized);
    assert_eq!(aoc_native_loader::global().load_state(), LoadState::Loaded);
    Ok(())
}
