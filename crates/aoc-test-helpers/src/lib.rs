//! Shared test utilities for the native solver binding.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`fake_module`] - In-process solver modules speaking the C ABI
//! - [`prelude`] - Convenience re-exports
//!
//! The fake modules let loader tests exercise the whole call path (argument
//! marshalling, status mapping, payload release) without building and
//! packaging a real `cdylib`.

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]

pub mod fake_module;
pub mod must;
pub mod prelude;

pub use fake_module::{
    fuel_module, fuel_solver, invalid_utf8_module, panicking_module, rogue_status_module,
    version_mismatch_module,
};
pub use must::*;
