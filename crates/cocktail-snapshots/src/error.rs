//! Error types for the cocktail-snapshots crate.
//!
//! Codec failures and file publication failures are kept apart so callers can
//! tell a malformed snapshot from a filesystem problem.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while encoding or decoding snapshot JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A record could not be represented as JSON.
    #[error("failed to encode snapshot: {message}")]
    Encode {
        /// Description of the serialisation failure.
        message: String,
    },

    /// The input is not valid JSON or does not match the record schema.
    #[error("failed to decode snapshot: {message}")]
    Decode {
        /// Description of the parse failure, including line and column.
        message: String,
    },
}

impl CodecError {
    /// Create an encode error with the given message.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Create a decode error with the given message.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Errors raised while publishing a file atomically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The target name is not a single file name.
    #[error("'{path}' is not a plain file name")]
    InvalidName {
        /// Rejected path.
        path: Utf8PathBuf,
    },

    /// The target already exists and overwriting was not permitted.
    #[error("refusing to overwrite existing file '{path}'")]
    AlreadyExists {
        /// Path that already exists.
        path: Utf8PathBuf,
    },

    /// An I/O operation failed.
    #[error("failed to write '{path}': {message}")]
    Io {
        /// Path being written when the failure occurred.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_formats_message() {
        let err = CodecError::decode("missing field `role` at line 3 column 5");
        assert_eq!(
            err.to_string(),
            "failed to decode snapshot: missing field `role` at line 3 column 5"
        );
    }

    #[test]
    fn already_exists_names_the_path() {
        let err = WriteError::AlreadyExists {
            path: Utf8PathBuf::from("users-2024-01-01T00:00:00Z.json"),
        };
        assert_eq!(
            err.to_string(),
            "refusing to overwrite existing file 'users-2024-01-01T00:00:00Z.json'"
        );
    }
}
