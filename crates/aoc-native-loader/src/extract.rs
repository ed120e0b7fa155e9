//! Materialize a packaged artifact as a fresh file on disk.
//!
//! Every call creates a new, uniquely named temp file so a changed artifact can
//! never be shadowed by a stale copy from an earlier run. The bytes are fully
//! written and synced before [`ResourceExtractor::materialize`] returns.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempPath;

use crate::cleanup;
use crate::error::InitError;
use crate::resources::ResourceSource;

/// Default prefix of extracted artifact filenames.
pub const DEFAULT_TEMP_PREFIX: &str = "aoc-native-";

/// An extracted artifact on disk.
///
/// The file is removed when this value is dropped, and at process exit if it
/// is never dropped. Neither removal is guaranteed.
pub struct TempResource {
    path: TempPath,
    len: u64,
}

impl TempResource {
    fn new(path: TempPath, len: u64) -> Self {
        cleanup::register(&path);
        Self { path, len }
    }

    /// Location of the extracted file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes written.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the artifact was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for TempResource {
    fn drop(&mut self) {
        cleanup::unregister(&self.path);
    }
}

impl fmt::Debug for TempResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TempResource")
            .field("path", &self.path())
            .field("len", &self.len)
            .finish()
    }
}

/// Copies packaged artifacts out of a [`ResourceSource`].
#[derive(Clone)]
pub struct ResourceExtractor {
    source: Arc<dyn ResourceSource>,
    temp_dir: PathBuf,
    prefix: String,
}

impl ResourceExtractor {
    /// Extract from `source` into the system temp directory.
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self {
            source,
            temp_dir: std::env::temp_dir(),
            prefix: DEFAULT_TEMP_PREFIX.to_owned(),
        }
    }

    /// Extract into `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Use `prefix` for extracted filenames.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The source artifacts are read from.
    pub fn source(&self) -> &dyn ResourceSource {
        self.source.as_ref()
    }

    /// Directory extracted files are created in.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Copy the resource named `resource_name` into a fresh temp file.
    ///
    /// The temp file keeps the artifact's extension; Windows appends `.dll`
    /// to extension-less names when loading.
    ///
    /// # Errors
    ///
    /// - [`InitError::ResourceNotFound`] if the source has no such resource.
    /// - [`InitError::IoFailure`] if opening, copying or syncing fails.
    pub fn materialize(&self, resource_name: &str) -> Result<TempResource, InitError> {
        let mut reader = self
            .source
            .open(resource_name)
            .map_err(|e| InitError::io(format!("opening resource {resource_name}"), &e))?
            .ok_or_else(|| InitError::ResourceNotFound {
                name: resource_name.to_owned(),
                origin: self.source.describe(),
            })?;

        let suffix = Path::new(resource_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix(&self.prefix)
            .suffix(&suffix)
            .tempfile_in(&self.temp_dir)
            .map_err(|e| {
                InitError::io(
                    format!("creating temp file in {}", self.temp_dir.display()),
                    &e,
                )
            })?;

        let written = io::copy(&mut reader, &mut file)
            .map_err(|e| InitError::io(format!("copying {resource_name}"), &e))?;
        file.as_file()
            .sync_all()
            .map_err(|e| InitError::io(format!("syncing {resource_name}"), &e))?;

        // Closing the handle here; Windows refuses to load a file open for writing.
        let path = file.into_temp_path();

        tracing::debug!(
            resource = resource_name,
            path = %path.display(),
            bytes = written,
            "Extracted native library"
        );

        Ok(TempResource::new(path, written))
    }
}

impl fmt::Debug for ResourceExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceExtractor")
            .field("source", &self.source.describe())
            .field("temp_dir", &self.temp_dir)
            .field("prefix", &self.prefix)
            .finish()
    }
}
