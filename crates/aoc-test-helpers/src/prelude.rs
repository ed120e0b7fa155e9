//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use aoc_test_helpers::prelude::*;
//! ```

pub use crate::fake_module::{
    ROGUE_STATUS, fuel_module, fuel_solver, invalid_utf8_module, panicking_module,
    rogue_status_module, version_mismatch_module,
};
pub use crate::must::{must, must_err, must_some};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
