//! ABI version, symbol names and limits.

/// Solver ABI version reported by `aoc_solver_abi_version`.
///
/// Increment this when making breaking changes to the exported signatures or
/// to the meaning of [`SolveStatus`](crate::SolveStatus) codes.
pub const SOLVER_ABI_VERSION: u32 = 1;

/// Name of the exported ABI version function.
pub const ABI_VERSION_SYMBOL: &[u8; 22] = b"aoc_solver_abi_version";

/// Name of the exported solve function.
pub const SOLVE_SYMBOL: &[u8; 9] = b"aoc_solve";

/// Name of the exported payload release function.
pub const FREE_OUTPUT_SYMBOL: &[u8; 15] = b"aoc_free_output";

/// Largest accepted input, in bytes, after trailing whitespace is trimmed.
pub const MAX_INPUT_LEN: usize = 200_000;

/// Valid problem days.
pub const DAY_RANGE: core::ops::RangeInclusive<i32> = 1..=25;

/// Valid problem parts.
pub const PART_RANGE: core::ops::RangeInclusive<i32> = 1..=2;
