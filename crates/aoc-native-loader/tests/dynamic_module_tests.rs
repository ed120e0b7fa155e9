//! Loading a real shared library built from `aoc-test-module`.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};

use aoc_native_abi::SOLVER_ABI_VERSION;
use aoc_native_loader::config::DEFAULT_BASE_NAME;
use aoc_native_loader::{
    DynamicLoader, FailureKind, LoadState, LoaderConfig, MatchPolicy, ModuleLoader, NativeSolver,
    PlatformTag, build_filename,
};
use aoc_test_helpers::prelude::*;

/// Most recently built `aoc_test_module` shared library next to this test
/// binary, in `target/<profile>/deps` or `target/<profile>`.
fn find_test_module() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let deps = exe.parent()?;
    let prefix = format!("{DLL_PREFIX}aoc_test_module");

    [Some(deps), deps.parent()]
        .into_iter()
        .flatten()
        .filter_map(|dir| fs::read_dir(dir).ok())
        .flatten()
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.starts_with(&prefix) && name.ends_with(DLL_SUFFIX)
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

fn test_module() -> PathBuf {
    must_some(
        find_test_module(),
        "aoc-test-module shared library not found next to the test binary",
    )
}

/// Copy the built module into `dir` under the name the loader expects.
fn stage_module(dir: &Path, tag: PlatformTag) -> TestResult {
    fs::copy(test_module(), dir.join(build_filename(DEFAULT_BASE_NAME, tag)))?;
    Ok(())
}

#[test]
fn test_dynamic_loader_loads_real_module() -> TestResult {
    let path = test_module();
    let module = DynamicLoader.load(&path)?;

    assert_eq!(module.abi_version(), SOLVER_ABI_VERSION);
    assert_eq!(module.path(), Some(path.as_path()));
    assert_eq!(module.call(2019, 1, 1, "14"), Ok("2".to_owned()));
    assert_eq!(module.call(2019, 1, 2, "100756"), Ok("50346".to_owned()));
    Ok(())
}

#[test]
fn test_end_to_end_through_resource_dir() -> TestResult {
    let Ok(tag) = PlatformTag::current(MatchPolicy::Strict) else {
        return Ok(());
    };
    let artifacts = tempfile::tempdir()?;
    let scratch = tempfile::tempdir()?;
    stage_module(artifacts.path(), tag)?;

    let solver = NativeSolver::builder()
        .config(LoaderConfig::strict().with_resource_dir(artifacts.path()))
        .temp_dir(scratch.path())
        .build();

    solver.ensure_loaded()?;
    assert_eq!(solver.load_state(), LoadState::Loaded);

    let loaded_from = must_some(
        solver.module().and_then(|module| module.path()),
        "loaded module has a path",
    );
    assert!(loaded_from.starts_with(scratch.path()));
    assert!(loaded_from.is_file());

    assert_eq!(solver.invoke(2019, 1, 1, "14"), Ok("2".to_owned()));

    let bad_day = must_err(solver.invoke(2019, -1, 1, "14"));
    assert_eq!(bad_day.kind(), FailureKind::InvalidArguments);
    assert_eq!(bad_day.message(), "Invalid day -1 - must be 1-25");

    let bad_input = must_err(solver.invoke(2019, 1, 1, "hello"));
    assert_eq!(bad_input.kind(), FailureKind::InvalidInput);

    assert_eq!(solver.invoke(2019, 1, 2, "1969"), Ok("966".to_owned()));
    assert_eq!(solver.load_state(), LoadState::Loaded);

    drop(solver);
    assert_eq!(fs::read_dir(scratch.path())?.count(), 0);
    Ok(())
}
