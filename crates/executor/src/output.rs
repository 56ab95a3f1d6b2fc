//! Output enum for command execution results.
//!
//! Every successful command produces one [`Output`]. The host maps it onto
//! its own success callback: `Unit` and `Value` complete the call, `Retained`
//! completes it while keeping the callback alive for the events the command
//! registered.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful command execution results.
///
/// # Example
///
/// ```text
/// match output {
///     Output::Unit => host.success(None),
///     Output::Value(v) => host.success(Some(v)),
///     Output::Retained => host.success_and_keep_callback(None),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Success without a payload
    Unit,

    /// Success carrying a value
    Value(Value),

    /// Success; the host keeps the callback for subsequent events
    Retained,
}

impl Output {
    /// Payload sent with the success, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Output::Value(v) => Some(v),
            Output::Unit | Output::Retained => None,
        }
    }

    /// Whether the host should keep the callback.
    pub fn keeps_callback(&self) -> bool {
        matches!(self, Output::Retained)
    }
}
