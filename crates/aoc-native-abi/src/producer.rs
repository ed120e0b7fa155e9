//! Helpers for solver module authors.
//!
//! A module crate (built as a `cdylib`) implements the exported symbols with
//! [`export_solver!`](crate::export_solver), which forwards to the functions
//! below. They validate the request, run the solver with panic capture and
//! hand the payload across the boundary.

#![expect(unsafe_code, reason = "raw payload ownership crosses the C ABI")]

use std::any::Any;
use std::panic;

use crate::constants::{DAY_RANGE, MAX_INPUT_LEN, PART_RANGE};
use crate::types::{SolveOutput, SolveStatus};

/// A solver: `(year, day, part, input) -> answer`.
pub type SolverFn = fn(u16, u8, u8, &str) -> Result<String, String>;

/// A validated solve request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveRequest<'a> {
    /// Problem year.
    pub year: u16,
    /// Problem day, 1-25.
    pub day: u8,
    /// Problem part, 1 or 2.
    pub part: u8,
    /// Input with trailing whitespace removed.
    pub input: &'a str,
}

/// Why a request was refused before reaching the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Status reported to the host.
    pub status: SolveStatus,
    /// Human-readable reason.
    pub message: String,
}

impl Rejection {
    fn input(message: impl Into<String>) -> Self {
        Self {
            status: SolveStatus::InvalidInput,
            message: message.into(),
        }
    }

    fn arguments(message: impl Into<String>) -> Self {
        Self {
            status: SolveStatus::InvalidArguments,
            message: message.into(),
        }
    }
}

/// Check raw ABI arguments before they reach a solver.
///
/// Input checks come first (empty, longer than
/// [`MAX_INPUT_LEN`](crate::MAX_INPUT_LEN), non-ASCII), then the day, part and
/// year ranges.
///
/// # Errors
///
/// Returns a [`Rejection`] describing the first failed check.
///
/// # Example
///
/// ```
/// use aoc_native_abi::{SolveStatus, validate_request};
///
/// let request = validate_request(2019, 1, 1, "14\n").map_err(|r| r.message)?;
/// assert_eq!(request.input, "14");
///
/// let rejection = validate_request(2019, -1, 1, "14").err();
/// assert_eq!(rejection.map(|r| r.status), Some(SolveStatus::InvalidArguments));
/// # Ok::<(), String>(())
/// ```
pub fn validate_request(
    year: i32,
    day: i32,
    part: i32,
    input: &str,
) -> Result<SolveRequest<'_>, Rejection> {
    let input = input.trim_end();

    if input.is_empty() {
        return Err(Rejection::input("Empty input"));
    } else if input.len() > MAX_INPUT_LEN {
        return Err(Rejection::input("Too long input"));
    } else if !input.is_ascii() {
        return Err(Rejection::input("Non-ASCII input"));
    }

    let day = u8::try_from(day)
        .ok()
        .filter(|d| DAY_RANGE.contains(&i32::from(*d)))
        .ok_or_else(|| Rejection::arguments(format!("Invalid day {day} - must be 1-25")))?;
    let part = u8::try_from(part)
        .ok()
        .filter(|p| PART_RANGE.contains(&i32::from(*p)))
        .ok_or_else(|| Rejection::arguments(format!("Invalid part {part} - must be 1-2")))?;
    let year = u16::try_from(year)
        .ok()
        .ok_or_else(|| Rejection::arguments(format!("Invalid year {year}")))?;

    Ok(SolveRequest {
        year,
        day,
        part,
        input,
    })
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "solver panicked".to_owned())
}

fn run_solver(solver: SolverFn, year: i32, day: i32, part: i32, input: &str) -> (SolveStatus, String) {
    let request = match validate_request(year, day, part, input) {
        Ok(request) => request,
        Err(rejection) => return (rejection.status, rejection.message),
    };

    match panic::catch_unwind(|| solver(request.year, request.day, request.part, request.input)) {
        Ok(Ok(answer)) => (SolveStatus::Ok, answer),
        Ok(Err(message)) => (SolveStatus::InvalidInput, message),
        Err(payload) => (SolveStatus::Panic, panic_message(payload.as_ref())),
    }
}

/// Run `solver` for raw ABI arguments and write the payload into `out`.
///
/// Returns the [`SolveStatus`] code. This is the body of `aoc_solve`.
///
/// # Safety
///
/// - `input` must be null or point to `input_len` readable bytes that stay
///   valid for the duration of the call.
/// - `out` must be null or valid for writes of a [`SolveOutput`].
pub unsafe fn solve_into(
    solver: SolverFn,
    year: i32,
    day: i32,
    part: i32,
    input: *const u8,
    input_len: usize,
    out: *mut SolveOutput,
) -> i32 {
    if out.is_null() {
        return SolveStatus::NullPointer.code();
    }

    let (status, payload) = if input.is_null() {
        (SolveStatus::NullPointer, "Input is NULL".to_owned())
    } else {
        // SAFETY: the caller guarantees `input` points to `input_len` readable bytes.
        let bytes = unsafe { std::slice::from_raw_parts(input, input_len) };
        match std::str::from_utf8(bytes) {
            Ok(text) => run_solver(solver, year, day, part, text),
            Err(error) => (
                SolveStatus::InvalidUtf8,
                format!("Invalid UTF-8 input: {error}"),
            ),
        }
    };

    // SAFETY: `out` is non-null and the caller guarantees it is valid for writes.
    unsafe { write_output(out, payload) };
    status.code()
}

/// Move `payload` into `out`. Release it later with [`free_output`].
///
/// # Safety
///
/// `out` must be valid for writes. A payload already attached to `out` is
/// overwritten, not released.
pub unsafe fn write_output(out: *mut SolveOutput, payload: String) {
    let bytes = payload.into_bytes().into_boxed_slice();
    let len = bytes.len();
    let data = Box::into_raw(bytes).cast::<u8>();
    // SAFETY: the caller guarantees `out` is valid for writes.
    unsafe { out.write(SolveOutput { data, len }) };
}

/// Release a payload written by [`write_output`] and reset `out`.
///
/// Null `out` and outputs without a payload are ignored.
///
/// # Safety
///
/// `out` must be null or point to a [`SolveOutput`] whose payload was written
/// by [`write_output`] in this module and not released since.
pub unsafe fn free_output(out: *mut SolveOutput) {
    // SAFETY: the caller guarantees `out` is null or valid for reads and writes.
    let Some(output) = (unsafe { out.as_mut() }) else {
        return;
    };
    if output.data.is_null() {
        return;
    }

    let slice = std::ptr::slice_from_raw_parts_mut(output.data, output.len);
    // SAFETY: `data` and `len` come from `Box::<[u8]>::into_raw` in `write_output`.
    drop(unsafe { Box::from_raw(slice) });
    *output = SolveOutput::empty();
}

/// Export the three solver symbols for a `cdylib` module.
///
/// ```ignore
/// fn solve(year: u16, day: u8, part: u8, input: &str) -> Result<String, String> {
///     advent_of_code::solve(year, day, part, input)
/// }
///
/// aoc_native_abi::export_solver!(solve);
/// ```
#[macro_export]
macro_rules! export_solver {
    ($solver:path) => {
        /// Reports the solver ABI version.
        #[unsafe(no_mangle)]
        pub extern "C" fn aoc_solver_abi_version() -> u32 {
            $crate::SOLVER_ABI_VERSION
        }

        /// Solves one problem. See `aoc_native_abi` for the contract.
        ///
        /// # Safety
        ///
        /// `input` must point to `input_len` readable bytes and `out` must be
        /// valid for writes.
        #[unsafe(no_mangle)]
        pub unsafe extern "C-unwind" fn aoc_solve(
            year: i32,
            day: i32,
            part: i32,
            input: *const u8,
            input_len: usize,
            out: *mut $crate::SolveOutput,
        ) -> i32 {
            // SAFETY: the pointer contract is forwarded unchanged from the caller.
            unsafe { $crate::solve_into($solver, year, day, part, input, input_len, out) }
        }

        /// Releases a payload returned by `aoc_solve`.
        ///
        /// # Safety
        ///
        /// `out` must be null or a `SolveOutput` filled by `aoc_solve`.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn aoc_free_output(out: *mut $crate::SolveOutput) {
            // SAFETY: the pointer contract is forwarded unchanged from the caller.
            unsafe { $crate::free_output(out) }
        }
    };
}
