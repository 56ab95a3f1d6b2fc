//! Error types for command execution.
//!
//! Every rejected command carries one [`Error`]. Errors are:
//! - **Structured**: each variant has typed fields for the details
//! - **Serializable**: they cross the host boundary as JSON
//! - **Coded**: [`Error::code`] is the stable string the host switches on

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Code |
/// |----------|----------|------|
/// | Protocol | `MissingParameter` | `MISSING_PARAMETER` |
/// | Payload | `InvalidPayload` | `INVALID_PAYLOAD` |
/// | Native | `Native` | `NATIVE_ERROR` |
/// | Construction | `Deserialization` | `DESERIALIZATION_ERROR` |
/// | System | `Internal` | `INTERNAL_ERROR` |
///
/// Stale references (a label, field, mode, view or overlay that no longer
/// exists) are not errors: those commands complete with plain success.
///
/// # Example
///
/// ```text
/// match executor_result {
///     Err(Error::MissingParameter { name }) => println!("host forgot {}", name),
///     Err(e) => println!("{}: {}", e.code(), e.message()),
///     Ok(_) => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Protocol Errors ====================
    /// A required argument is absent, empty or of the wrong type
    #[error("missing parameter: {name}")]
    MissingParameter {
        /// Argument name as the host spells it
        name: String,
    },

    // ==================== Payload Errors ====================
    /// An argument is present but its content cannot be parsed
    #[error("invalid payload for '{field}': {reason}")]
    InvalidPayload {
        /// Argument name carrying the payload
        field: String,
        /// Parser message
        reason: String,
    },

    // ==================== Native Errors ====================
    /// The native SDK refused the operation
    #[error("native error [{code}]: {message}")]
    Native {
        /// SDK error code
        code: String,
        /// SDK error message
        message: String,
    },

    // ==================== Construction Errors ====================
    /// A mode or overlay JSON could not be turned into a native object
    #[error("deserialization failed: {reason}")]
    Deserialization {
        /// Deserializer message
        reason: String,
    },

    // ==================== System Errors ====================
    /// Internal error (bug, invariant violation or exhausted main context)
    #[error("internal error: {reason}")]
    Internal {
        /// What went wrong
        reason: String,
    },
}

impl Error {
    /// Stable error code sent to the host.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingParameter { .. } => "MISSING_PARAMETER",
            Error::InvalidPayload { .. } => "INVALID_PAYLOAD",
            Error::Native { .. } => "NATIVE_ERROR",
            Error::Deserialization { .. } => "DESERIALIZATION_ERROR",
            Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Human readable message sent to the host.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Structured details sent to the host, if the variant has any worth
    /// switching on.
    pub fn details(&self) -> Option<Value> {
        match self {
            Error::MissingParameter { name } => Some(json!({ "parameter": name })),
            Error::InvalidPayload { field, .. } => Some(json!({ "field": field })),
            Error::Native { code, .. } => Some(json!({ "nativeCode": code })),
            Error::Deserialization { .. } | Error::Internal { .. } => None,
        }
    }

    /// Build an [`Error::MissingParameter`].
    pub fn missing(name: impl Into<String>) -> Self {
        Error::MissingParameter { name: name.into() }
    }

    /// Build an [`Error::InvalidPayload`].
    pub fn invalid_payload(field: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidPayload {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}
