//! A real solver module for exercising the dynamic loader.
//!
//! Exports the solver ABI around the 2019 day 1 fuel solver from
//! `aoc-test-helpers`.

aoc_native_abi::export_solver!(aoc_test_helpers::fuel_solver);
