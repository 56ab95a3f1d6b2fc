//! The host's command envelope and typed access to its argument bag.
//!
//! ```json
//! {"method": "setOffsetForCapturedLabel",
//!  "arguments": {"dataCaptureViewId": 4, "trackingId": 7, "offsetJson": "{...}"}}
//! ```
//!
//! Required accessors fail with [`Error::MissingParameter`] when the argument
//! is absent, `null`, of the wrong type, or (for strings) empty. Optional
//! accessors treat absent and `null` alike but still reject a wrong type with
//! [`Error::InvalidPayload`].

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A command envelope as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Command name
    pub method: String,
    /// Argument bag
    #[serde(default)]
    pub arguments: Arguments,
}

impl MethodCall {
    /// Build a call from a method name and a JSON object of arguments.
    ///
    /// Non-object `arguments` produce an empty bag.
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        MethodCall {
            method: method.into(),
            arguments: Arguments::from(arguments),
        }
    }
}

/// Named arguments of a [`MethodCall`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl From<Value> for Arguments {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Arguments(map),
            _ => Arguments::default(),
        }
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Arguments(map)
    }
}

impl Arguments {
    /// Raw argument value; `null` counts as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Whether the bag carries a non-null `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Required integer argument.
    pub fn required_i64(&self, name: &str) -> Result<i64> {
        self.get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::missing(name))
    }

    /// Required boolean argument.
    pub fn required_bool(&self, name: &str) -> Result<bool> {
        self.get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| Error::missing(name))
    }

    /// Required non-empty string argument.
    pub fn required_str(&self, name: &str) -> Result<String> {
        match self.get(name).and_then(Value::as_str) {
            Some(s) if !s.is_empty() => Ok(s.to_string()),
            _ => Err(Error::missing(name)),
        }
    }

    /// Optional string argument.
    pub fn optional_str(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Error::invalid_payload(
                name,
                format!("expected a string, got {}", other),
            )),
        }
    }

    /// Optional byte argument: a base64 string or an array of byte values.
    pub fn optional_bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(encoded)) => BASE64
                .decode(encoded)
                .map(Some)
                .map_err(|e| Error::invalid_payload(name, format!("invalid base64: {}", e))),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| Error::invalid_payload(name, format!("{} is not a byte", item)))
                })
                .collect::<Result<Vec<u8>>>()
                .map(Some),
            Some(other) => Err(Error::invalid_payload(
                name,
                format!("expected base64 or a byte array, got {}", other),
            )),
        }
    }
}
