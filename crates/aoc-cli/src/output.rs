//! Output formatting for CLI responses

use anyhow::Error;
use colored::Colorize;

/// Print the answer on its own line.
pub fn print_answer(answer: &str) {
    println!("{answer}");
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}
