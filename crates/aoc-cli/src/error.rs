//! Error types for the aoc-native CLI

use aoc_native_loader::{ConfigError, InitError, SolveFailure};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Solve(#[from] SolveFailure),

    #[error("Native solver unavailable")]
    Unavailable(#[from] InitError),

    #[error("Invalid configuration")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Failed to read input from stdin")]
    Input(#[from] std::io::Error),

    #[error("A native solver is already installed for this process")]
    AlreadyInstalled,
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidConfiguration(_) => 2,
            _ => 1,
        }
    }
}
