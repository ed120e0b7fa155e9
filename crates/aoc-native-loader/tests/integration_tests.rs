//! Integration tests for the load sequence and the call surface.

use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use aoc_native_abi::EntryPoints;
use aoc_native_loader::{
    DynamicLoader, EmbeddedResource, EmbeddedResources, FailureKind, InitError, LoadState,
    LoadedModule, LoaderConfig, MatchPolicy, ModuleLoader, NativeSolver, PlatformTag, RawPlatform,
    ResourceSource, build_filename,
};
use aoc_test_helpers::prelude::*;

const LINUX_ARTIFACT: &str = "libadvent_of_code_native_x86_64.so";

static ARTIFACTS: [EmbeddedResource; 1] = [EmbeddedResource {
    name: LINUX_ARTIFACT,
    bytes: b"\x7fELF placeholder",
}];

/// Counts lookups against the wrapped source.
struct CountingSource {
    inner: EmbeddedResources,
    opens: Arc<AtomicUsize>,
}

impl ResourceSource for CountingSource {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.inner.open(name)
    }
}

/// Counts loads and hands out an in-process module.
struct CountingLoader {
    module: fn() -> EntryPoints,
    loads: Arc<AtomicUsize>,
    delay: Duration,
}

impl ModuleLoader for CountingLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule, InitError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        assert!(path.is_file(), "artifact must be on disk before load");
        std::thread::sleep(self.delay);
        LoadedModule::in_process((self.module)())
    }
}

struct Harness {
    solver: NativeSolver,
    opens: Arc<AtomicUsize>,
    loads: Arc<AtomicUsize>,
    _scratch: tempfile::TempDir,
}

impl Harness {
    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

fn harness(
    platform: RawPlatform,
    artifacts: EmbeddedResources,
    module: fn() -> EntryPoints,
) -> Harness {
    let opens = Arc::new(AtomicUsize::new(0));
    let loads = Arc::new(AtomicUsize::new(0));
    let scratch = must(tempfile::tempdir());

    let solver = NativeSolver::builder()
        .platform(platform)
        .resources(CountingSource {
            inner: artifacts,
            opens: Arc::clone(&opens),
        })
        .loader(CountingLoader {
            module,
            loads: Arc::clone(&loads),
            delay: Duration::from_millis(20),
        })
        .temp_dir(scratch.path())
        .build();

    Harness {
        solver,
        opens,
        loads,
        _scratch: scratch,
    }
}

fn linux_fuel() -> Harness {
    harness(
        RawPlatform::new("linux", "x86_64"),
        EmbeddedResources::new(&ARTIFACTS),
        fuel_module,
    )
}

#[test]
fn test_filename_matrix_from_raw_names() -> TestResult {
    let cases = [
        ("linux", "x86_64", "libadvent_of_code_java_x86_64.so"),
        ("Linux", "aarch64", "libadvent_of_code_java_aarch64.so"),
        ("Mac OS X", "x86_64", "libadvent_of_code_java_x86_64.dylib"),
        ("darwin", "arm64", "libadvent_of_code_java_aarch64.dylib"),
        ("Windows 10", "amd64", "advent_of_code_java.dll"),
    ];
    for (os, arch, expected) in cases {
        let tag = PlatformTag::resolve(os, arch, MatchPolicy::Strict)?;
        assert_eq!(build_filename("advent_of_code_java", tag), expected);
    }
    Ok(())
}

#[test]
fn test_unsupported_os_never_extracts() {
    let h = harness(
        RawPlatform::new("plan9", "x86_64"),
        EmbeddedResources::new(&ARTIFACTS),
        fuel_module,
    );

    let expected = InitError::UnsupportedPlatform {
        os: "plan9".to_owned(),
        arch: "x86_64".to_owned(),
    };
    assert_eq!(h.solver.ensure_loaded(), Err(expected.clone()));
    assert_eq!(h.solver.ensure_loaded(), Err(expected.clone()));
    assert_eq!(h.solver.load_state(), LoadState::Failed(expected));
    assert_eq!(h.opens(), 0);
    assert_eq!(h.loads(), 0);
}

#[test]
fn test_windows_arm_unsupported() {
    for policy in [MatchPolicy::Strict, MatchPolicy::Permissive] {
        assert_eq!(
            PlatformTag::resolve("windows", "aarch64", policy),
            Err(InitError::UnsupportedPlatform {
                os: "windows".to_owned(),
                arch: "aarch64".to_owned(),
            })
        );
    }
}

#[test]
fn test_concurrent_first_use_loads_once() {
    let h = linux_fuel();

    let outcomes: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| h.solver.ensure_loaded()))
            .collect();
        handles.into_iter().map(|handle| must(handle.join())).collect()
    });

    assert!(outcomes.iter().all(|outcome| *outcome == Ok(())));
    assert_eq!(h.opens(), 1);
    assert_eq!(h.loads(), 1);

    for _ in 0..5 {
        assert_eq!(h.solver.ensure_loaded(), Ok(()));
    }
    assert_eq!(h.opens(), 1);
    assert_eq!(h.loads(), 1);
}

#[test]
fn test_concurrent_first_use_shares_failure() {
    let h = harness(
        RawPlatform::new("linux", "x86_64"),
        EmbeddedResources::empty(),
        fuel_module,
    );

    let outcomes: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| h.solver.ensure_loaded()))
            .collect();
        handles.into_iter().map(|handle| must(handle.join())).collect()
    });

    let expected = Err(InitError::ResourceNotFound {
        name: LINUX_ARTIFACT.to_owned(),
        origin: "embedded resources (0 entries)".to_owned(),
    });
    assert!(outcomes.iter().all(|outcome| *outcome == expected));
    assert_eq!(h.opens(), 1);
    assert_eq!(h.loads(), 0);
}

#[test]
fn test_concurrent_invoke_after_load() {
    let h = linux_fuel();

    std::thread::scope(|scope| {
        for mass in [12_u32, 14, 1969, 100_756] {
            let solver = &h.solver;
            scope.spawn(move || {
                let expected = (mass / 3 - 2).to_string();
                assert_eq!(solver.invoke(2019, 1, 1, &mass.to_string()), Ok(expected));
            });
        }
    });
    assert_eq!(h.loads(), 1);
}

#[test]
fn test_invoke_success() {
    let h = linux_fuel();
    assert_eq!(h.solver.invoke(2019, 1, 1, "14"), Ok("2".to_owned()));
    assert_eq!(h.solver.invoke(2019, 1, 2, "100756"), Ok("50346".to_owned()));
}

#[test]
fn test_invoke_invalid_day() {
    let h = linux_fuel();
    let failure = must_err(h.solver.invoke(2019, -1, 1, "14"));
    assert_eq!(failure.kind(), FailureKind::InvalidArguments);
    assert_eq!(failure.message(), "Invalid day -1 - must be 1-25");
}

#[test]
fn test_invoke_malformed_input() {
    let h = linux_fuel();
    let failure = must_err(h.solver.invoke(2019, 1, 1, "hello"));
    assert_eq!(failure.kind(), FailureKind::InvalidInput);
    assert!(failure.message().starts_with("Parse error at line 1"));
}

#[test]
fn test_solve_failure_is_call_scoped() {
    let h = linux_fuel();

    must_err(h.solver.invoke(2019, 1, 3, "14"));
    must_err(h.solver.invoke(2019, 1, 1, "hello"));
    assert_eq!(h.solver.load_state(), LoadState::Loaded);

    assert_eq!(h.solver.invoke(2019, 1, 1, "14"), Ok("2".to_owned()));
    assert_eq!(h.loads(), 1);
}

#[test]
fn test_native_panic_is_contained() {
    let h = harness(
        RawPlatform::new("linux", "x86_64"),
        EmbeddedResources::new(&ARTIFACTS),
        panicking_module,
    );

    let failure = must_err(h.solver.invoke(2019, 1, 1, "14"));
    assert_eq!(failure.kind(), FailureKind::NativePanic);
    assert_eq!(h.solver.load_state(), LoadState::Loaded);
}

#[test]
fn test_unavailable_after_failed_load() {
    let h = harness(
        RawPlatform::new("linux", "x86_64"),
        EmbeddedResources::new(&ARTIFACTS),
        version_mismatch_module,
    );

    let error = must_err(h.solver.ensure_loaded());
    assert!(matches!(error, InitError::LoadFailure { ref reason, .. } if reason.starts_with("ABI version mismatch")));

    let failure = must_err(h.solver.invoke(2019, 1, 1, "14"));
    assert_eq!(failure.kind(), FailureKind::Unavailable);
    assert_eq!(failure.message(), error.to_string());
    assert_eq!(h.loads(), 1);
}

#[test]
fn test_dynamic_loader_rejects_placeholder_artifact() -> TestResult {
    let scratch = tempfile::tempdir()?;
    let solver = NativeSolver::builder()
        .platform(RawPlatform::new("linux", "x86_64"))
        .resources(EmbeddedResources::new(&ARTIFACTS))
        .loader(DynamicLoader)
        .temp_dir(scratch.path())
        .build();

    let error = must_err(solver.ensure_loaded());
    assert!(matches!(error, InitError::LoadFailure { .. }));
    // The extracted file goes away with the failed attempt.
    assert_eq!(std::fs::read_dir(scratch.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_unwritable_temp_dir_is_io_failure() -> TestResult {
    let scratch = tempfile::tempdir()?;
    let solver = NativeSolver::builder()
        .platform(RawPlatform::new("linux", "x86_64"))
        .resources(EmbeddedResources::new(&ARTIFACTS))
        .temp_dir(scratch.path().join("missing"))
        .build();

    let error = must_err(solver.ensure_loaded());
    assert!(matches!(error, InitError::IoFailure { .. }));
    Ok(())
}

#[test]
fn test_permissive_policy_selects_legacy_artifact() {
    let solver = NativeSolver::builder()
        .config(LoaderConfig::permissive())
        .platform(RawPlatform::new("linux", "riscv64"))
        .build();
    assert_eq!(solver.library_name(), Ok(LINUX_ARTIFACT.to_owned()));

    let strict = NativeSolver::builder()
        .platform(RawPlatform::new("linux", "riscv64"))
        .build();
    assert!(matches!(
        strict.library_name(),
        Err(InitError::UnsupportedPlatform { .. })
    ));
}

#[test]
fn test_config_deserializes_with_defaults() -> TestResult {
    let config: LoaderConfig = serde_json::from_str(r#"{ "match_policy": "permissive" }"#)?;
    assert_eq!(config, LoaderConfig::permissive());

    let json = serde_json::to_value(LoaderConfig::strict())?;
    assert_eq!(json["match_policy"], "strict");
    assert_eq!(json["base_name"], "advent_of_code_native");
    Ok(())
}

#[test]
fn test_init_error_messages() {
    let errors = [
        InitError::UnsupportedPlatform {
            os: "plan9".to_owned(),
            arch: "x86_64".to_owned(),
        },
        InitError::ResourceNotFound {
            name: LINUX_ARTIFACT.to_owned(),
            origin: "embedded resources (0 entries)".to_owned(),
        },
        InitError::IoFailure {
            context: format!("copying {LINUX_ARTIFACT}"),
            reason: "No space left on device".to_owned(),
        },
        InitError::LoadFailure {
            path: std::path::PathBuf::from("/tmp/aoc-native-x1.so"),
            reason: "ABI version mismatch: expected 1, got 2".to_owned(),
        },
    ];
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(messages.join("\n"), @r#"
    Unsupported platform: os="plan9", arch="x86_64"
    No library named libadvent_of_code_native_x86_64.so in embedded resources (0 entries)
    I/O failure while copying libadvent_of_code_native_x86_64.so: No space left on device
    Failed to load /tmp/aoc-native-x1.so: ABI version mismatch: expected 1, got 2
    "#);
}
