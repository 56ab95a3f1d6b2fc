//! Error types for Labelbridge core values
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//! Executor-facing errors (with host error codes) live in the executor crate
//! and are converted from these.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for core values and native collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Field key does not start with a numeric tracking id followed by the separator
    #[error("malformed field key: {key:?}")]
    MalformedKey {
        /// The offending key as received
        key: String,
    },

    /// A host payload (brush, anchor, offset, ...) could not be parsed
    #[error("invalid payload for '{field}': {reason}")]
    InvalidPayload {
        /// Argument name carrying the payload
        field: String,
        /// Parser message
        reason: String,
    },

    /// Mode or overlay JSON could not be turned into a native object
    #[error("deserialization failed: {reason}")]
    Deserialization {
        /// Deserializer message
        reason: String,
    },

    /// Failure reported by the native SDK, passed through verbatim
    #[error("native error [{code}]: {message}")]
    Native {
        /// SDK error code
        code: String,
        /// SDK error message
        message: String,
    },

    /// Invariant violation inside the bridge
    #[error("internal error: {reason}")]
    Internal {
        /// What went wrong
        reason: String,
    },
}

impl Error {
    /// Build an [`Error::InvalidPayload`] for argument `field`.
    pub fn invalid_payload(field: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidPayload {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`Error::Deserialization`].
    pub fn deserialization(reason: impl ToString) -> Self {
        Error::Deserialization {
            reason: reason.to_string(),
        }
    }

    /// Build an [`Error::Native`].
    pub fn native(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Native {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build an [`Error::Internal`].
    pub fn internal(reason: impl Into<String>) -> Self {
        Error::Internal {
            reason: reason.into(),
        }
    }
}
