//! Field key codec
//!
//! The host cannot pass a `(trackingId, fieldName)` pair atomically through
//! every callback, so label fields are addressed with a single opaque string:
//!
//! ```text
//! <trackingId>§<fieldName>
//! ```
//!
//! ## Contract
//!
//! - Encoding writes the decimal tracking id, the separator and the field name
//!   verbatim. No escaping is performed.
//! - Decoding splits on the FIRST separator only. The prefix must parse as an
//!   integer; the remainder (possibly empty, possibly containing further
//!   separators) is the field name.
//!
//! Because a decimal id can never contain `§`, the first separator is always the
//! one written by the encoder, so `decode(encode(id, name)) == (id, name)` holds
//! for every field name, including names that contain the separator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::TrackingId;

/// Reserved separator between tracking id and field name
pub const FIELD_KEY_SEPARATOR: char = '§';

/// Composite key addressing one field of one captured label.
///
/// Keys are compared and hashed by their string form, which is exactly what the
/// host sends back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    /// Encode `(tracking_id, field_name)` into a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelbridge_core::FieldKey;
    ///
    /// let key = FieldKey::encode(7, "expiryDate");
    /// assert_eq!(key.as_str(), "7§expiryDate");
    /// ```
    pub fn encode(tracking_id: TrackingId, field_name: &str) -> Self {
        let mut key = tracking_id.to_string();
        key.push(FIELD_KEY_SEPARATOR);
        key.push_str(field_name);
        FieldKey(key)
    }

    /// Wrap a host-provided identifier after checking it decodes.
    pub fn parse(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        decode(&key)?;
        Ok(FieldKey(key))
    }

    /// Split the key back into `(tracking_id, field_name)`.
    pub fn decode(&self) -> Result<(TrackingId, &str)> {
        decode(&self.0)
    }

    /// Tracking id prefix of the key.
    pub fn tracking_id(&self) -> Result<TrackingId> {
        self.decode().map(|(id, _)| id)
    }

    /// String form, as sent to the host.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning its string form.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decode a raw key string, splitting on the first separator.
pub fn decode(key: &str) -> Result<(TrackingId, &str)> {
    let malformed = || Error::MalformedKey {
        key: key.to_string(),
    };
    let (prefix, field_name) = key.split_once(FIELD_KEY_SEPARATOR).ok_or_else(malformed)?;
    let tracking_id = prefix.parse::<TrackingId>().map_err(|_| malformed())?;
    Ok((tracking_id, field_name))
}
