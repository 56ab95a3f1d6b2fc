//! Lifecycle payloads sent when the host builds modes and overlays.
//!
//! ## Mode JSON
//!
//! ```json
//! {"type": "labelCapture", "modeId": 3, "parentId": 12, "hasListeners": true, "enabled": true, ...}
//! ```
//!
//! Only `type == "labelCapture"` concerns this bridge; other types parse to a
//! value whose [`ModeCreationData::is_label_capture`] is false. A label
//! capture mode without an integer `modeId` is rejected. A missing or `-1`
//! `parentId` means the mode has no parent view.
//!
//! ## Overlay JSON
//!
//! ```json
//! {"type": "labelCaptureBasic", "modeId": 3, "hasListener": true, ...}
//! ```

use labelbridge_core::{Error, ModeId, Result, ViewId};
use serde_json::Value;

/// Mode type handled by this bridge
pub const LABEL_CAPTURE_MODE_TYPE: &str = "labelCapture";

/// Sentinel the host uses for "no id"
const NO_ID: i64 = -1;

fn parse_object(json: &str) -> Result<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::deserialization(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
        Err(e) => Err(Error::deserialization(e)),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn optional_id(map: &serde_json::Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key).and_then(Value::as_i64).filter(|&id| id != NO_ID)
}

fn flag(map: &serde_json::Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Parsed mode creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeCreationData {
    /// The JSON the mode is built from
    pub mode_json: String,
    /// `type` field
    pub mode_type: String,
    /// Mode id; meaningful only for label capture modes
    pub mode_id: ModeId,
    /// View owning the mode
    pub parent_id: Option<ViewId>,
    /// Whether the host already listens for session updates
    pub has_listeners: bool,
    /// Initial enabled state
    pub enabled: bool,
}

impl ModeCreationData {
    /// Parse a mode JSON.
    pub fn from_json(mode_json: &str) -> Result<Self> {
        let map = parse_object(mode_json)?;
        let mode_type = map.get("type").and_then(Value::as_str).unwrap_or_default().to_string();

        if mode_type != LABEL_CAPTURE_MODE_TYPE {
            return Ok(ModeCreationData {
                mode_json: mode_json.to_string(),
                mode_type,
                mode_id: NO_ID,
                parent_id: None,
                has_listeners: false,
                enabled: false,
            });
        }

        let mode_id = optional_id(&map, "modeId")
            .ok_or_else(|| Error::deserialization("label capture mode JSON has no modeId"))?;

        Ok(ModeCreationData {
            mode_json: mode_json.to_string(),
            mode_type,
            mode_id,
            parent_id: optional_id(&map, "parentId"),
            has_listeners: flag(&map, "hasListeners"),
            enabled: flag(&map, "enabled"),
        })
    }

    /// Whether this payload describes a label capture mode.
    pub fn is_label_capture(&self) -> bool {
        self.mode_type == LABEL_CAPTURE_MODE_TYPE
    }
}

/// Read `type` and `modeId` of a mode JSON without full validation.
///
/// Used on removal, where the host sends the same JSON it created the mode
/// with.
pub fn mode_identity(mode_json: &str) -> Option<(String, Option<ModeId>)> {
    let map = parse_object(mode_json).ok()?;
    let mode_type = map.get("type").and_then(Value::as_str).unwrap_or_default().to_string();
    Some((mode_type, optional_id(&map, "modeId")))
}

/// Overlay kinds the bridge knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayType {
    /// `labelCaptureBasic`
    Basic,
    /// `labelCaptureAdvanced`
    Advanced,
    /// `validationFlow`
    ValidationFlow,
    /// `receiptScanning`, built as an adaptive recognition overlay
    ReceiptScanning,
}

impl OverlayType {
    /// Map a host `type` string.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "labelCaptureBasic" => Some(OverlayType::Basic),
            "labelCaptureAdvanced" => Some(OverlayType::Advanced),
            "validationFlow" => Some(OverlayType::ValidationFlow),
            "receiptScanning" => Some(OverlayType::ReceiptScanning),
            _ => None,
        }
    }

    /// Host `type` string.
    pub fn type_name(&self) -> &'static str {
        match self {
            OverlayType::Basic => "labelCaptureBasic",
            OverlayType::Advanced => "labelCaptureAdvanced",
            OverlayType::ValidationFlow => "validationFlow",
            OverlayType::ReceiptScanning => "receiptScanning",
        }
    }
}

/// Parsed overlay creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayCreationData {
    /// The JSON the overlay is built from
    pub overlay_json: String,
    /// Overlay kind; `None` for overlays of other modules
    pub overlay_type: Option<OverlayType>,
    /// Whether to attach the bridge delegate right away
    pub has_listener: bool,
    /// Mode the overlay belongs to, when the view has no parent id
    pub mode_id: Option<ModeId>,
}

impl OverlayCreationData {
    /// Parse an overlay JSON.
    pub fn from_json(overlay_json: &str) -> Result<Self> {
        let map = parse_object(overlay_json)?;
        Ok(OverlayCreationData {
            overlay_json: overlay_json.to_string(),
            overlay_type: map
                .get("type")
                .and_then(Value::as_str)
                .and_then(OverlayType::from_type_name),
            has_listener: flag(&map, "hasListener"),
            mode_id: optional_id(&map, "modeId"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_creation_full() {
        let data = ModeCreationData::from_json(
            r#"{"type":"labelCapture","modeId":3,"parentId":12,"hasListeners":true,"enabled":true}"#,
        )
        .unwrap();
        assert!(data.is_label_capture());
        assert_eq!(data.mode_id, 3);
        assert_eq!(data.parent_id, Some(12));
        assert!(data.has_listeners);
        assert!(data.enabled);
    }

    #[test]
    fn test_mode_creation_defaults() {
        let data = ModeCreationData::from_json(r#"{"type":"labelCapture","modeId":1,"parentId":-1}"#).unwrap();
        assert_eq!(data.parent_id, None);
        assert!(!data.has_listeners);
        assert!(!data.enabled);
    }

    #[test]
    fn test_mode_creation_other_type_is_not_validated() {
        let data = ModeCreationData::from_json(r#"{"type":"barcodeCapture"}"#).unwrap();
        assert!(!data.is_label_capture());
    }

    #[test]
    fn test_mode_creation_requires_mode_id() {
        let err = ModeCreationData::from_json(r#"{"type":"labelCapture"}"#).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn test_mode_creation_rejects_non_object() {
        assert!(ModeCreationData::from_json("[1,2]").is_err());
        assert!(ModeCreationData::from_json("{").is_err());
    }

    #[test]
    fn test_mode_identity() {
        assert_eq!(
            mode_identity(r#"{"type":"labelCapture","modeId":4}"#),
            Some(("labelCapture".to_string(), Some(4)))
        );
        assert_eq!(mode_identity("nope"), None);
    }

    #[test]
    fn test_overlay_creation() {
        let data =
            OverlayCreationData::from_json(r#"{"type":"receiptScanning","modeId":2,"hasListener":true}"#).unwrap();
        assert_eq!(data.overlay_type, Some(OverlayType::ReceiptScanning));
        assert_eq!(data.mode_id, Some(2));
        assert!(data.has_listener);
    }

    #[test]
    fn test_overlay_creation_unknown_type() {
        let data = OverlayCreationData::from_json(r#"{"type":"barcodeBatchBasic"}"#).unwrap();
        assert_eq!(data.overlay_type, None);
        assert_eq!(data.mode_id, None);
        assert!(!data.has_listener);
    }

    #[test]
    fn test_overlay_type_names_round_trip() {
        for ty in [
            OverlayType::Basic,
            OverlayType::Advanced,
            OverlayType::ValidationFlow,
            OverlayType::ReceiptScanning,
        ] {
            assert_eq!(OverlayType::from_type_name(ty.type_name()), Some(ty));
        }
    }
}
