//! In-process solver modules speaking the C ABI.
//!
//! Each constructor returns [`EntryPoints`] backed by functions compiled into
//! the test binary, so a host can call them exactly as it would call symbols
//! resolved from a shared library.

use aoc_native_abi::{
    EntryPoints, SOLVER_ABI_VERSION, SolveOutput, free_output, solve_into, write_output,
};

/// Status code outside the ABI's table, returned by [`rogue_status_module`].
pub const ROGUE_STATUS: i32 = 42;

/// 2019 day 1: total fuel for a list of module masses.
///
/// Part 1 charges `mass / 3 - 2` per module, part 2 also fuels the fuel.
/// Any other problem is reported as unsupported.
///
/// # Errors
///
/// Returns a message for unsupported problems and unparsable lines.
pub fn fuel_solver(year: u16, day: u8, part: u8, input: &str) -> Result<String, String> {
    if (year, day) != (2019, 1) {
        return Err(format!("Unsupported year={year}, day={day}, part={part}"));
    }

    let mut total: u32 = 0;
    for (index, line) in input.lines().enumerate() {
        let mass = line
            .parse::<u32>()
            .map_err(|error| format!("Parse error at line {}: {error}", index + 1))?;
        let fuel = if part == 1 {
            (mass / 3).saturating_sub(2)
        } else {
            fuel_for_fuel(mass)
        };
        total = total.saturating_add(fuel);
    }
    Ok(total.to_string())
}

fn fuel_for_fuel(mass: u32) -> u32 {
    match (mass / 3).checked_sub(2) {
        Some(fuel) => fuel + fuel_for_fuel(fuel),
        None => 0,
    }
}

extern "C" fn release(out: *mut SolveOutput) {
    // SAFETY: hosts only pass outputs filled by the solve functions below.
    unsafe { free_output(out) }
}

unsafe extern "C-unwind" fn fuel_solve(
    year: i32,
    day: i32,
    part: i32,
    input: *const u8,
    input_len: usize,
    out: *mut SolveOutput,
) -> i32 {
    // SAFETY: the pointer contract is forwarded unchanged from the caller.
    unsafe { solve_into(fuel_solver, year, day, part, input, input_len, out) }
}

unsafe extern "C-unwind" fn panicking_solve(
    _year: i32,
    day: i32,
    _part: i32,
    _input: *const u8,
    _input_len: usize,
    _out: *mut SolveOutput,
) -> i32 {
    panic!("native solver crashed on day {day}")
}

unsafe extern "C-unwind" fn rogue_status_solve(
    _year: i32,
    _day: i32,
    _part: i32,
    _input: *const u8,
    _input_len: usize,
    out: *mut SolveOutput,
) -> i32 {
    // SAFETY: the caller passes a valid output.
    unsafe { write_output(out, "???".to_owned()) };
    ROGUE_STATUS
}

unsafe extern "C-unwind" fn invalid_utf8_solve(
    _year: i32,
    _day: i32,
    _part: i32,
    _input: *const u8,
    _input_len: usize,
    out: *mut SolveOutput,
) -> i32 {
    let bytes: Box<[u8]> = Box::new([0xc3, 0x28]);
    let len = bytes.len();
    let data = Box::into_raw(bytes).cast::<u8>();
    // SAFETY: the caller passes a valid output; `free_output` releases boxed slices.
    unsafe { out.write(SolveOutput { data, len }) };
    0
}

fn module(solve: aoc_native_abi::SolveFn) -> EntryPoints {
    EntryPoints {
        abi_version: SOLVER_ABI_VERSION,
        solve,
        free_output: release,
    }
}

/// A well-behaved module backed by [`fuel_solver`].
pub fn fuel_module() -> EntryPoints {
    module(fuel_solve)
}

/// A module whose solve function unwinds instead of reporting a status.
pub fn panicking_module() -> EntryPoints {
    module(panicking_solve)
}

/// A module returning [`ROGUE_STATUS`], which no host understands.
pub fn rogue_status_module() -> EntryPoints {
    module(rogue_status_solve)
}

/// A module reporting success with a payload that is not UTF-8.
pub fn invalid_utf8_module() -> EntryPoints {
    module(invalid_utf8_solve)
}

/// The fuel module, but reporting a future ABI version.
pub fn version_mismatch_module() -> EntryPoints {
    EntryPoints {
        abi_version: SOLVER_ABI_VERSION + 1,
        ..fuel_module()
    }
}
