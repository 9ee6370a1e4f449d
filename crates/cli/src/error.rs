//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: library error (bad dimensions, bad scale, invalid gradient)
//! - 11: I/O error (PNG write)
//! - 12: input error (bad color, seed, mode name or JSON params)
//! - 13: serialization error

use pixgrid_core::GridError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A grid, gradient or resampling failure.
    Library(GridError),
    /// An I/O error (snapshot encoding or file write).
    Io(String),
    /// A user input error (unparseable color, seed, mode or params).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::UnknownWrapMode(_)
            | GridError::UnknownInterpolationMode(_)
            | GridError::UnknownEasing(_)
            | GridError::InvalidColor(_)
            | GridError::InvalidSeed(_) => CliError::Input(e.to_string()),
            other => CliError::Library(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
