//! Error conversion from core errors.
//!
//! Core values and native collaborators report [`labelbridge_core::Error`];
//! this module maps them onto the executor's [`Error`] without losing
//! details.

use crate::{Error, Result};

impl From<labelbridge_core::Error> for Error {
    fn from(err: labelbridge_core::Error) -> Self {
        match err {
            // A malformed key reaching a host-facing error means the key was
            // supplied as a payload, not looked up
            labelbridge_core::Error::MalformedKey { key } => Error::InvalidPayload {
                field: "identifier".to_string(),
                reason: format!("malformed field key {:?}", key),
            },
            labelbridge_core::Error::InvalidPayload { field, reason } => {
                Error::InvalidPayload { field, reason }
            }
            labelbridge_core::Error::Deserialization { reason } => Error::Deserialization { reason },
            labelbridge_core::Error::Native { code, message } => Error::Native { code, message },
            labelbridge_core::Error::Internal { reason } => Error::Internal { reason },
        }
    }
}

/// Convert a core result into an executor result.
pub(crate) fn convert_result<T>(r: labelbridge_core::Result<T>) -> Result<T> {
    r.map_err(Error::from)
}
