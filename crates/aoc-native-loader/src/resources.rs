//! Sources of packaged native artifacts.

use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where packaged artifacts are looked up by filename.
pub trait ResourceSource: Send + Sync {
    /// Human-readable description for error messages.
    fn describe(&self) -> String;

    /// Open the resource named `name`.
    ///
    /// Returns `Ok(None)` when no such resource exists.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the resource exists but cannot be opened.
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>>;
}

/// A resource compiled into the binary.
#[derive(Clone, Copy)]
pub struct EmbeddedResource {
    /// Artifact filename.
    pub name: &'static str,
    /// Artifact bytes, usually from `include_bytes!`.
    pub bytes: &'static [u8],
}

impl fmt::Debug for EmbeddedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedResource")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Artifacts compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedResources {
    entries: &'static [EmbeddedResource],
}

impl EmbeddedResources {
    /// Wrap a static table of resources.
    pub const fn new(entries: &'static [EmbeddedResource]) -> Self {
        Self { entries }
    }

    /// A table without any resources.
    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Names of all embedded resources.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }
}

impl ResourceSource for EmbeddedResources {
    fn describe(&self) -> String {
        format!("embedded resources ({} entries)", self.entries.len())
    }

    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(self
            .entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| Box::new(entry.bytes) as Box<dyn Read + '_>))
    }
}

/// Artifacts in a directory on disk, for development builds.
///
/// Only plain filenames are looked up; names with path components are
/// reported as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    /// Look up artifacts in `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory searched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for DirectoryResources {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn open(&self, name: &str) -> io::Result<Option<Box<dyn Read + '_>>> {
        if Path::new(name).file_name() != Some(OsStr::new(name)) {
            return Ok(None);
        }
        match File::open(self.root.join(name)) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: [EmbeddedResource; 2] = [
        EmbeddedResource {
            name: "libsolver_x86_64.so",
            bytes: b"\x7fELF-x86",
        },
        EmbeddedResource {
            name: "solver.dll",
            bytes: b"MZ-dll",
        },
    ];

    fn read_all(source: &dyn ResourceSource, name: &str) -> io::Result<Option<Vec<u8>>> {
        let Some(mut reader) = source.open(name)? else {
            return Ok(None);
        };
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    #[test]
    fn test_embedded_lookup() -> io::Result<()> {
        let source = EmbeddedResources::new(&TABLE);
        assert_eq!(read_all(&source, "solver.dll")?, Some(b"MZ-dll".to_vec()));
        assert_eq!(read_all(&source, "libsolver_aarch64.so")?, None);
        assert_eq!(
            source.names().collect::<Vec<_>>(),
            vec!["libsolver_x86_64.so", "solver.dll"]
        );
        Ok(())
    }

    #[test]
    fn test_empty_table() -> io::Result<()> {
        let source = EmbeddedResources::empty();
        assert_eq!(read_all(&source, "solver.dll")?, None);
        assert_eq!(source.describe(), "embedded resources (0 entries)");
        Ok(())
    }

    #[test]
    fn test_directory_lookup() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("solver.dll"), b"MZ")?;
        let source = DirectoryResources::new(dir.path());

        assert_eq!(read_all(&source, "solver.dll")?, Some(b"MZ".to_vec()));
        assert_eq!(read_all(&source, "missing.dll")?, None);
        Ok(())
    }

    #[test]
    fn test_directory_rejects_path_components() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested)?;
        std::fs::write(dir.path().join("solver.dll"), b"MZ")?;
        let source = DirectoryResources::new(&nested);

        assert_eq!(read_all(&source, "../solver.dll")?, None);
        Ok(())
    }
}
