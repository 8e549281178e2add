//! Error types for the cocktail notes CLI.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::{CodecError, WriteError};

/// Errors surfaced by the notes conversion flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// The notes file was not supplied.
    #[error("missing required flag: --notes")]
    MissingNotesPath,
    /// A flag expected a value but none was provided.
    #[error("missing value for {flag}")]
    MissingValue {
        /// Flag that was missing its value.
        flag: &'static str,
    },
    /// An unsupported argument was supplied.
    #[error("unknown argument: {value}")]
    UnknownArgument {
        /// Argument value that was not recognised.
        value: String,
    },
    /// An input file could not be read.
    #[error("failed to read '{path}': {message}")]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
    /// The keyword table or the output could not be serialised.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The output file could not be published.
    #[error(transparent)]
    Write(#[from] WriteError),
}
