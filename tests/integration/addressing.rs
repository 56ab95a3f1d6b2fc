//! Addressing Tests
//!
//! The host refers to labels by tracking id and to fields by field key
//! (`<trackingId>§<fieldName>`). References resolve against the latest frame
//! only; anything older is silently superseded.

use crate::common::*;
use labelbridge::{FieldKey, Output};
use labelbridge_core::{CapturedLabel, LabelField};
use serde_json::json;

const BRUSH: &str = r##"{"fillColor":"#FF000080","strokeColor":"#FF0000","strokeWidth":2}"##;

/// Bridge with both overlays on view 10; frames are published without
/// waiting for the host.
fn overlay_bridge() -> Bridge {
    let bridge = Bridge::new();
    let view = bridge.view(10, None);
    bridge.construct_mode(1, None);
    bridge.construct_overlay("labelCaptureBasic", 1, &view);
    bridge.construct_overlay("labelCaptureAdvanced", 1, &view);
    bridge
}

fn publish(bridge: &Bridge, frame: i64, labels: Vec<CapturedLabel>) {
    bridge.host.set_listening(false);
    bridge.engine.mode(1).scan(frame, labels);
    bridge.host.set_listening(true);
}

// ============================================================================
// Superseded references
// ============================================================================

#[test]
fn test_label_gone_in_newer_frame_is_a_quiet_success() {
    let bridge = overlay_bridge();
    publish(&bridge, 1, vec![shipping_label(42)]);
    publish(&bridge, 2, vec![shipping_label(43)]);

    let outcome = bridge.call(
        "setLabelCaptureBasicOverlayBrushForLabel",
        json!({ "dataCaptureViewId": 10, "trackingId": 42, "brushJson": BRUSH }),
    );

    assert_eq!(outcome, Ok(Output::Unit));
    assert_eq!(bridge.engine.log.count("basic.brush"), 0);
}

#[test]
fn test_reused_tracking_id_resolves_to_newest_label() {
    let bridge = overlay_bridge();
    publish(&bridge, 1, vec![shipping_label(7)]);
    // Same physical label, expiry date no longer recognized
    publish(
        &bridge,
        2,
        vec![CapturedLabel::new(
            7,
            "shipping",
            vec![LabelField::barcode("barcode", "code128", "PKG-7")],
        )],
    );
    let expiry = FieldKey::encode(7, "expiryDate");
    let barcode = FieldKey::encode(7, "barcode");

    bridge
        .call(
            "setAnchorForCapturedLabelField",
            json!({ "dataCaptureViewId": 10, "identifier": expiry.as_str(), "anchorJson": "bottomLeft" }),
        )
        .unwrap();
    bridge
        .call(
            "setAnchorForCapturedLabelField",
            json!({ "dataCaptureViewId": 10, "identifier": barcode.as_str(), "anchorJson": "bottomLeft" }),
        )
        .unwrap();

    assert_eq!(
        bridge.engine.log.entries().last().map(String::as_str),
        Some("advanced.anchor field=7/barcode bottomLeft")
    );
    assert_eq!(bridge.engine.log.count("advanced.anchor"), 1);
}

#[test]
fn test_malformed_field_keys_are_quiet_successes() {
    let bridge = overlay_bridge();
    publish(&bridge, 1, vec![shipping_label(7)]);

    for identifier in ["expiryDate", "seven§expiryDate", "7§", "7§unknown"] {
        let outcome = bridge.call(
            "setOffsetForCapturedLabelField",
            json!({
                "dataCaptureViewId": 10,
                "identifier": identifier,
                "offsetJson": r#"{"x":{"value":0,"unit":"dip"},"y":{"value":-8,"unit":"dip"}}"#,
            }),
        );
        assert_eq!(outcome, Ok(Output::Unit), "identifier {:?}", identifier);
    }
    assert_eq!(bridge.engine.log.count("advanced.offset"), 0);
}

#[test]
fn test_bad_payload_is_reported_even_for_superseded_label() {
    let bridge = overlay_bridge();
    publish(&bridge, 1, vec![]);

    let err = bridge
        .call(
            "setAnchorForCapturedLabel",
            json!({ "dataCaptureViewId": 10, "trackingId": 42, "anchorJson": "sideways" }),
        )
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_PAYLOAD");
    assert_eq!(err.details(), Some(json!({ "field": "anchorJson" })));
}

// ============================================================================
// Field addressing
// ============================================================================

#[test]
fn test_field_brush_and_view_reach_the_engine() {
    let bridge = overlay_bridge();
    publish(&bridge, 1, vec![shipping_label(7)]);

    bridge
        .call(
            "setLabelCaptureBasicOverlayBrushForFieldOfLabel",
            json!({ "dataCaptureViewId": 10, "trackingId": 7, "fieldName": "expiryDate", "brushJson": BRUSH }),
        )
        .unwrap();
    bridge
        .call(
            "setViewForCapturedLabelFieldFromBytes",
            json!({ "dataCaptureViewId": 10, "identifier": "7§expiryDate", "viewBytes": "PHZpZXc+" }),
        )
        .unwrap();

    let log = bridge.engine.log.entries();
    assert!(log.contains(&"basic.brush field=7/expiryDate fill=#FF000080".to_string()));
    assert!(log.contains(&"advanced.view field=7/expiryDate some=true".to_string()));
}

#[test]
fn test_tap_on_field_view_reports_label_and_field() {
    let bridge = overlay_bridge();
    publish(&bridge, 1, vec![shipping_label(7)]);
    bridge
        .call(
            "setViewForCapturedLabelField",
            json!({ "dataCaptureViewId": 10, "identifier": "7§expiryDate", "viewJson": "{\"text\":\"31 Jan\"}" }),
        )
        .unwrap();

    let view = bridge
        .module
        .view_cache()
        .and_then(|cache| cache.get("7§expiryDate"))
        .expect("view cached under its field key");
    view.tap();

    let tap = bridge.next_event();
    assert_eq!(tap.name, "LabelCaptureAdvancedOverlayListener.didTapOnViewForFieldOfLabel");
    assert_eq!(tap.payload_json("label").unwrap()["trackingId"], json!(7));
    assert_eq!(tap.payload_json("field").unwrap()["name"], json!("expiryDate"));
}
