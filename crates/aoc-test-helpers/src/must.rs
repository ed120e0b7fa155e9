//! Unwrap helpers with good error messages.
//!
//! These replace `unwrap()` and `expect()` in test code; `#[track_caller]`
//! points the panic at the test line instead of this module.

use std::fmt::Debug;

/// Unwrap a `Result`, panicking with the error value on `Err`.
///
/// ```rust
/// use aoc_test_helpers::must;
///
/// let value = must(Ok::<_, String>(42));
/// assert_eq!(value, 42);
/// ```
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must: unexpected Err: {e:?}"),
    }
}

/// Unwrap an `Err`, panicking with the success value on `Ok`.
///
/// ```rust
/// use aoc_test_helpers::must_err;
///
/// let error = must_err(Err::<u8, _>("bad"));
/// assert_eq!(error, "bad");
/// ```
///
/// # Panics
///
/// Panics if the result is `Ok`.
#[track_caller]
pub fn must_err<T: Debug, E>(result: Result<T, E>) -> E {
    match result {
        Ok(v) => panic!("must_err: unexpected Ok: {v:?}"),
        Err(e) => e,
    }
}

/// Unwrap an `Option`, panicking with `msg` on `None`.
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}
