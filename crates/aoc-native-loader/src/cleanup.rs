//! Best-effort removal of extracted artifacts at process exit.
//!
//! Statics are never dropped, so a module loaded for the lifetime of the
//! process would leave its temp file behind. Paths registered here are removed
//! by an `atexit` hook. Removal may fail (Windows keeps loaded DLLs locked) and
//! errors are ignored: this is hygiene, not correctness.

#![expect(unsafe_code, reason = "registers an atexit hook through libc")]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use parking_lot::{Mutex, const_mutex};

static PENDING: Mutex<Vec<PathBuf>> = const_mutex(Vec::new());
static HOOK: Once = Once::new();

/// Schedule `path` for removal at process exit.
pub(crate) fn register(path: &Path) {
    HOOK.call_once(|| {
        // SAFETY: `remove_pending` is a plain `extern "C"` function with no
        // captured state and stays valid for the whole process.
        let rc = unsafe { libc::atexit(remove_pending) };
        if rc != 0 {
            tracing::warn!(rc, "Failed to register temp file cleanup hook");
        }
    });
    PENDING.lock().push(path.to_path_buf());
}

/// Forget `path`; its owner already removed it.
pub(crate) fn unregister(path: &Path) {
    PENDING.lock().retain(|pending| pending != path);
}

/// Paths currently scheduled for removal.
#[cfg(test)]
pub(crate) fn pending() -> Vec<PathBuf> {
    PENDING.lock().clone()
}

extern "C" fn remove_pending() {
    let paths = std::mem::take(&mut *PENDING.lock());
    remove_paths(&paths);
}

/// Remove `paths`, returning how many were actually deleted.
fn remove_paths(paths: &[PathBuf]) -> usize {
    paths
        .iter()
        .filter(|path| fs::remove_file(path).is_ok())
        .count()
}
