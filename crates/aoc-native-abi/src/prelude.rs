//! Convenience re-exports for common ABI types.
//!
//! # Example
//!
//! ```
//! use aoc_native_abi::prelude::*;
//!
//! assert_eq!(SolveStatus::from_code(0), Some(SolveStatus::Ok));
//! assert_eq!(check_abi_compatibility(SOLVER_ABI_VERSION), AbiCheckResult::Compatible);
//! ```

pub use crate::constants::{
    ABI_VERSION_SYMBOL, FREE_OUTPUT_SYMBOL, MAX_INPUT_LEN, SOLVE_SYMBOL, SOLVER_ABI_VERSION,
};

pub use crate::producer::{Rejection, SolveRequest, SolverFn, validate_request};

pub use crate::types::{
    AbiCheckResult, EntryPoints, FreeOutputFn, SolveFn, SolveOutput, SolveStatus,
    check_abi_compatibility,
};
