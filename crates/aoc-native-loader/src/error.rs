//! Error types for native module loading and calls.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of the one-time load sequence.
///
/// Every variant is fatal for the rest of the process: it is recorded once and
/// handed back unchanged to every later caller, so the type is `Clone`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// OS or architecture not in the supported matrix.
    #[error("Unsupported platform: os={os:?}, arch={arch:?}")]
    UnsupportedPlatform {
        /// Raw OS name as reported by the environment.
        os: String,
        /// Raw architecture name as reported by the environment.
        arch: String,
    },

    /// The expected artifact is not among the embedded resources.
    #[error("No library named {name} in {origin}")]
    ResourceNotFound {
        /// Artifact filename that was looked up.
        name: String,
        /// Description of the resource source searched.
        origin: String,
    },

    /// Copying the artifact to disk failed.
    #[error("I/O failure while {context}: {reason}")]
    IoFailure {
        /// What was being done.
        context: String,
        /// Underlying I/O error message.
        reason: String,
    },

    /// The artifact exists but cannot be loaded into this process.
    #[error("Failed to load {}: {reason}", path.display())]
    LoadFailure {
        /// Path handed to the dynamic loader.
        path: PathBuf,
        /// Reason reported by the loader.
        reason: String,
    },
}

impl InitError {
    pub(crate) fn unsupported(os: &str, arch: &str) -> Self {
        Self::UnsupportedPlatform {
            os: os.to_owned(),
            arch: arch.to_owned(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, error: &io::Error) -> Self {
        Self::IoFailure {
            context: context.into(),
            reason: error.to_string(),
        }
    }

    pub(crate) fn load(path: &Path, reason: impl fmt::Display) -> Self {
        Self::LoadFailure {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedPlatform { .. } => ErrorCategory::Platform,
            Self::ResourceNotFound { .. } => ErrorCategory::Resource,
            Self::IoFailure { .. } => ErrorCategory::Io,
            Self::LoadFailure { .. } => ErrorCategory::Load,
        }
    }
}

/// Why a single call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Year, day or part outside the supported range.
    InvalidArguments,
    /// The module rejected the input.
    InvalidInput,
    /// The module panicked while solving.
    NativePanic,
    /// The module broke the ABI contract (unknown status, bad payload).
    Protocol,
    /// The module could not be loaded.
    Unavailable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidArguments => write!(f, "invalid arguments"),
            FailureKind::InvalidInput => write!(f, "invalid input"),
            FailureKind::NativePanic => write!(f, "native panic"),
            FailureKind::Protocol => write!(f, "protocol violation"),
            FailureKind::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// A call-scoped failure. It never changes the load state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SolveFailure {
    kind: FailureKind,
    message: String,
}

impl SolveFailure {
    /// Create a failure of `kind` with a human-readable message.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn unavailable(error: &InitError) -> Self {
        Self::new(FailureKind::Unavailable, error.to_string())
    }

    /// What went wrong.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Message suitable for showing to a user.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self.kind {
            FailureKind::Unavailable => ErrorCategory::Load,
            _ => ErrorCategory::Solve,
        }
    }
}

/// Outcome of one call into the module: the answer, or why there is none.
pub type NativeCallResult = Result<String, SolveFailure>;

/// Invalid loader configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown match policy name.
    #[error("Invalid match policy {0:?}: expected \"strict\" or \"permissive\"")]
    InvalidMatchPolicy(String),

    /// Base name that cannot form an artifact filename.
    #[error("Invalid base name {0:?}: must be non-empty and contain no path separators")]
    InvalidBaseName(String),
}

impl ConfigError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Config
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Platform detection errors
    Platform,
    /// Missing embedded resources
    Resource,
    /// I/O errors
    Io,
    /// Dynamic loading errors
    Load,
    /// Per-call solve errors
    Solve,
    /// Configuration errors
    Config,
}

impl ErrorCategory {
    /// Whether errors of this category end the load sequence for good.
    pub fn is_init_time(self) -> bool {
        matches!(
            self,
            Self::Platform | Self::Resource | Self::Io | Self::Load
        )
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Platform => write!(f, "Platform"),
            ErrorCategory::Resource => write!(f, "Resource"),
            ErrorCategory::Io => write!(f, "IO"),
            ErrorCategory::Load => write!(f, "Load"),
            ErrorCategory::Solve => write!(f, "Solve"),
            ErrorCategory::Config => write!(f, "Config"),
        }
    }
}
