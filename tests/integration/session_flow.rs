//! Session Flow Tests
//!
//! The Vision Engine thread blocks on every session update until the host
//! answers. These tests play both sides on real threads.

use crate::common::*;
use labelbridge_engine::NativeMode;
use serde_json::json;
use std::thread;
use std::time::Duration;

const SESSION_EVENT: &str = "LabelCaptureListener.didUpdateSession";

fn scanning_bridge() -> Bridge {
    let bridge = Bridge::new();
    let view = bridge.view(10, None);
    bridge.construct_mode(1, None);
    bridge.construct_overlay("labelCaptureAdvanced", 1, &view);
    bridge
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_host_answers_every_frame_in_order() {
    let bridge = scanning_bridge();
    let mode = bridge.engine.mode(1);

    let sdk = thread::spawn(move || {
        (1..=5)
            .map(|frame| mode.scan(frame, vec![shipping_label(frame * 100)]))
            .collect::<Vec<_>>()
    });

    for frame in 1..=5i64 {
        let event = bridge.next_event();
        assert_eq!(event.name, SESSION_EVENT);
        assert_eq!(event.payload["modeId"], json!(1));
        let session = event.payload_json("session").expect("session JSON");
        assert_eq!(session["frameSequenceId"], json!(frame));

        // The frame's label is addressable while the engine waits
        bridge
            .call(
                "setAnchorForCapturedLabel",
                json!({ "dataCaptureViewId": 10, "trackingId": frame * 100, "anchorJson": "topCenter" }),
            )
            .unwrap();

        let keep_scanning = frame < 5;
        bridge
            .call(
                "finishLabelCaptureListenerDidUpdateSession",
                json!({ "modeId": 1, "isEnabled": keep_scanning }),
            )
            .unwrap();
    }

    let answers = sdk.join().unwrap();
    assert_eq!(answers, vec![Some(true), Some(true), Some(true), Some(true), Some(false)]);
    assert_eq!(bridge.engine.log.count("advanced.anchor label="), 5);
    assert!(!bridge.engine.mode(1).is_enabled());
}

#[test]
fn test_frame_handle_lives_until_answer() {
    let bridge = scanning_bridge();
    let mode = bridge.engine.mode(1);
    let sdk = thread::spawn(move || mode.scan(1, vec![shipping_label(1)]));

    let event = bridge.next_event();
    let frame_id = event.payload["frameId"].as_str().unwrap().to_string();
    let frame = bridge.module.frames().get(&frame_id).expect("frame cached");
    assert_eq!((frame.width, frame.height), (1920, 1080));

    bridge
        .call(
            "finishLabelCaptureListenerDidUpdateSession",
            json!({ "modeId": 1, "isEnabled": true }),
        )
        .unwrap();
    sdk.join().unwrap();

    assert!(bridge.module.frames().get(&frame_id).is_none());
}

// ============================================================================
// Backpressure
// ============================================================================

#[test]
fn test_unanswered_update_holds_the_engine() {
    let bridge = scanning_bridge();
    let mode = bridge.engine.mode(1);
    let sdk = thread::spawn(move || {
        let first = mode.scan(1, vec![shipping_label(1)]);
        let second = mode.scan(2, vec![shipping_label(2)]);
        (first, second)
    });

    bridge.next_event();
    // No second event while the first is unanswered
    assert!(bridge.events.recv_timeout(Duration::from_millis(100)).is_err());
    assert!(!sdk.is_finished());

    bridge
        .call(
            "finishLabelCaptureListenerDidUpdateSession",
            json!({ "modeId": 1, "isEnabled": true }),
        )
        .unwrap();
    let second = bridge.next_event();
    assert_eq!(second.payload_json("session").unwrap()["frameSequenceId"], json!(2));
    bridge
        .call(
            "finishLabelCaptureListenerDidUpdateSession",
            json!({ "modeId": 1, "isEnabled": true }),
        )
        .unwrap();

    assert_eq!(sdk.join().unwrap(), (Some(true), Some(true)));
}

#[test]
fn test_silenced_host_does_not_block_the_engine() {
    let bridge = scanning_bridge();
    bridge.host.set_listening(false);

    let answer = bridge.engine.mode(1).scan(1, vec![shipping_label(5)]);

    assert_eq!(answer, Some(true));
    assert!(bridge.events.try_recv().is_err());
    // The snapshot is still the one commands resolve against
    assert!(bridge.module.session().label(5).is_some());
}

#[test]
fn test_disconnected_host_falls_back_to_configured_answer() {
    let config = labelbridge::BridgeConfig {
        continue_on_unacknowledged_emit: false,
        ..labelbridge::BridgeConfig::default()
    };
    let bridge = Bridge::with_config(config);
    bridge.construct_mode(1, None);
    bridge.host.disconnect();

    assert_eq!(bridge.engine.mode(1).scan(1, vec![]), Some(false));
}
