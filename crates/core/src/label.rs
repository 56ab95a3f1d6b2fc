//! Captured labels and their fields.
//!
//! Both types are immutable values produced by the SDK for one processed
//! frame. They serialize to the JSON representation the host receives in
//! event payloads (`label`, `field`, `fields`).

use serde::{Deserialize, Serialize};

use crate::types::TrackingId;

/// Kind of content a label field recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelFieldType {
    /// Barcode field
    Barcode,
    /// Text field
    Text,
    /// Unrecognized field kind
    Unknown,
}

/// Recognition state of a label field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelFieldState {
    /// Value was read in this frame
    Captured,
    /// Location predicted from tracking, no value yet
    Predicted,
    /// Nothing known yet
    Unknown,
}

/// Decoded barcode content of a barcode field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeData {
    /// Symbology identifier, e.g. `"ean13Upca"`
    pub symbology: String,
    /// Decoded payload
    pub data: Option<String>,
}

/// One recognized field within a label.
///
/// `name` is unique within its owning label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelField {
    /// Field name as configured in the label definition
    pub name: String,
    /// Field content kind
    #[serde(rename = "type")]
    pub field_type: LabelFieldType,
    /// Recognition state
    pub state: LabelFieldState,
    /// Whether the label definition marks the field as required
    #[serde(default)]
    pub is_required: bool,
    /// Recognized text, for text fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Recognized barcode, for barcode fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<BarcodeData>,
}

impl LabelField {
    /// A captured text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        LabelField {
            name: name.into(),
            field_type: LabelFieldType::Text,
            state: LabelFieldState::Captured,
            is_required: false,
            text: Some(value.into()),
            barcode: None,
        }
    }

    /// A captured barcode field.
    pub fn barcode(name: impl Into<String>, symbology: impl Into<String>, data: impl Into<String>) -> Self {
        LabelField {
            name: name.into(),
            field_type: LabelFieldType::Barcode,
            state: LabelFieldState::Captured,
            is_required: false,
            text: None,
            barcode: Some(BarcodeData {
                symbology: symbology.into(),
                data: Some(data.into()),
            }),
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// JSON form used in event payloads.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// A physical label detected in one frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedLabel {
    /// Tracking id, unique within one snapshot
    pub tracking_id: TrackingId,
    /// Label definition name
    pub name: String,
    /// Recognized fields, in SDK order
    pub fields: Vec<LabelField>,
    /// Whether all required fields have been captured
    #[serde(default)]
    pub is_complete: bool,
}

impl CapturedLabel {
    /// Create a label from its fields; completeness is derived from required fields.
    pub fn new(tracking_id: TrackingId, name: impl Into<String>, fields: Vec<LabelField>) -> Self {
        let is_complete = fields
            .iter()
            .filter(|f| f.is_required)
            .all(|f| f.state == LabelFieldState::Captured);
        CapturedLabel {
            tracking_id,
            name: name.into(),
            fields,
            is_complete,
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&LabelField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// JSON form used in event payloads.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
