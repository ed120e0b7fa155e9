//! ABI type definitions.
//!
//! Function pointer types for the exported symbols, the output structure
//! filled by `aoc_solve`, and the status codes it returns.

use crate::constants::SOLVER_ABI_VERSION;

/// Signature of `aoc_solver_abi_version`.
pub type AbiVersionFn = unsafe extern "C" fn() -> u32;

/// Signature of `aoc_solve`.
///
/// Arguments are `year`, `day`, `part`, a pointer to `input_len` bytes of
/// UTF-8 input, and the output structure to fill. Declared `C-unwind` so that
/// a panic escaping a Rust-built module reaches the host's unwind guard instead
/// of aborting the process.
pub type SolveFn = unsafe extern "C-unwind" fn(
    year: i32,
    day: i32,
    part: i32,
    input: *const u8,
    input_len: usize,
    out: *mut SolveOutput,
) -> i32;

/// Signature of `aoc_free_output`.
pub type FreeOutputFn = unsafe extern "C" fn(out: *mut SolveOutput);

/// Payload written by `aoc_solve`.
///
/// # Memory Layout
///
/// | Field  | Type       | Meaning                               |
/// |--------|------------|---------------------------------------|
/// | `data` | `*mut u8`  | UTF-8 bytes, owned by the module      |
/// | `len`  | `usize`    | number of bytes at `data`             |
///
/// A null `data` with a zero `len` is an empty payload.
#[repr(C)]
#[derive(Debug)]
pub struct SolveOutput {
    /// Payload bytes, owned by the module until released.
    pub data: *mut u8,
    /// Payload length in bytes.
    pub len: usize,
}

impl SolveOutput {
    /// An output with no payload attached.
    pub const fn empty() -> Self {
        Self {
            data: core::ptr::null_mut(),
            len: 0,
        }
    }

    /// Whether a payload is attached.
    pub fn has_payload(&self) -> bool {
        !self.data.is_null()
    }
}

impl Default for SolveOutput {
    fn default() -> Self {
        Self::empty()
    }
}

/// Status code returned by `aoc_solve`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// The payload is the answer.
    Ok = 0,
    /// Year, day or part outside the supported range.
    InvalidArguments = 1,
    /// The input was rejected: empty, too long, non-ASCII or malformed.
    InvalidInput = 2,
    /// The solver panicked; the payload is the panic message.
    Panic = 3,
    /// A required pointer argument was null.
    NullPointer = 4,
    /// The input bytes were not valid UTF-8.
    InvalidUtf8 = 5,
}

impl SolveStatus {
    /// Numeric code as it crosses the ABI.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Parse a numeric code. Unknown codes yield `None`.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::InvalidArguments),
            2 => Some(Self::InvalidInput),
            3 => Some(Self::Panic),
            4 => Some(Self::NullPointer),
            5 => Some(Self::InvalidUtf8),
            _ => None,
        }
    }
}

/// Resolved entry points of a solver module.
///
/// The pointers are only valid while the library they came from stays
/// loaded; hosts keep both together.
#[derive(Debug, Clone, Copy)]
pub struct EntryPoints {
    /// Value reported by `aoc_solver_abi_version`.
    pub abi_version: u32,
    /// `aoc_solve`.
    pub solve: SolveFn,
    /// `aoc_free_output`.
    pub free_output: FreeOutputFn,
}

/// Result of ABI compatibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiCheckResult {
    /// ABI version matches - module can be used.
    Compatible,
    /// ABI version mismatch - module rejected.
    Mismatch {
        /// Expected ABI version.
        expected: u32,
        /// Version reported by the module.
        actual: u32,
    },
}

/// Check a module's reported ABI version against [`SOLVER_ABI_VERSION`].
///
/// # Example
///
/// ```
/// use aoc_native_abi::{AbiCheckResult, SOLVER_ABI_VERSION, check_abi_compatibility};
///
/// assert_eq!(check_abi_compatibility(SOLVER_ABI_VERSION), AbiCheckResult::Compatible);
/// assert!(matches!(check_abi_compatibility(999), AbiCheckResult::Mismatch { .. }));
/// ```
pub fn check_abi_compatibility(module_abi_version: u32) -> AbiCheckResult {
    if module_abi_version == SOLVER_ABI_VERSION {
        AbiCheckResult::Compatible
    } else {
        AbiCheckResult::Mismatch {
            expected: SOLVER_ABI_VERSION,
            actual: module_abi_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(SolveStatus::Ok.code(), 0);
        assert_eq!(SolveStatus::InvalidArguments.code(), 1);
        assert_eq!(SolveStatus::InvalidInput.code(), 2);
        assert_eq!(SolveStatus::Panic.code(), 3);
        assert_eq!(SolveStatus::NullPointer.code(), 4);
        assert_eq!(SolveStatus::InvalidUtf8.code(), 5);
    }

    #[test]
    fn test_unknown_status_code() {
        assert_eq!(SolveStatus::from_code(-1), None);
        assert_eq!(SolveStatus::from_code(6), None);
    }

    #[test]
    fn test_known_codes_parse_back() {
        for status in [
            SolveStatus::Ok,
            SolveStatus::InvalidArguments,
            SolveStatus::InvalidInput,
            SolveStatus::Panic,
            SolveStatus::NullPointer,
            SolveStatus::InvalidUtf8,
        ] {
            assert_eq!(SolveStatus::from_code(status.code()), Some(status));
        }
    }

    #[test]
    fn test_empty_output_has_no_payload() {
        let out = SolveOutput::default();
        assert!(!out.has_payload());
        assert_eq!(out.len, 0);
    }

    #[test]
    fn test_output_layout_is_two_words() {
        assert_eq!(
            core::mem::size_of::<SolveOutput>(),
            2 * core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_incompatible_version_zero() {
        assert_eq!(
            check_abi_compatibility(0),
            AbiCheckResult::Mismatch {
                expected: SOLVER_ABI_VERSION,
                actual: 0
            }
        );
    }
}
