//! C ABI contract for the native Advent of Code solver module.
//!
//! This crate defines both sides of the boundary between a host process and a
//! precompiled solver library:
//! - Version handshake (`aoc_solver_abi_version`)
//! - The solve entry point (`aoc_solve`) and its status codes
//! - Ownership of the returned payload (`aoc_free_output`)
//! - Producer helpers for module authors ([`producer`], [`export_solver!`])
//!
//! # Exported symbols
//!
//! | Symbol                   | Signature                                                        |
//! |--------------------------|------------------------------------------------------------------|
//! | `aoc_solver_abi_version` | `extern "C" fn() -> u32`                                         |
//! | `aoc_solve`              | `extern "C-unwind" fn(i32, i32, i32, *const u8, usize, *mut SolveOutput) -> i32` |
//! | `aoc_free_output`        | `extern "C" fn(*mut SolveOutput)`                                |
//!
//! `aoc_solve` returns a [`SolveStatus`] code and fills the [`SolveOutput`]
//! with a UTF-8 payload: the answer on success, a human-readable message
//! otherwise. The payload belongs to the module until the host passes the same
//! `SolveOutput` to `aoc_free_output`.
//!
//! # Thread safety
//!
//! Hosts may call `aoc_solve` from several threads at once. Modules must not
//! keep mutable global state across calls.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod constants;
pub mod prelude;
pub mod producer;
pub mod types;

pub use constants::{
    ABI_VERSION_SYMBOL, FREE_OUTPUT_SYMBOL, MAX_INPUT_LEN, SOLVE_SYMBOL, SOLVER_ABI_VERSION,
};
pub use producer::{
    Rejection, SolveRequest, SolverFn, free_output, panic_message, solve_into, validate_request,
    write_output,
};
pub use types::{
    AbiCheckResult, AbiVersionFn, EntryPoints, FreeOutputFn, SolveFn, SolveOutput, SolveStatus,
    check_abi_compatibility,
};
