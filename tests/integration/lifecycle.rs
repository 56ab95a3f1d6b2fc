//! Lifecycle Tests
//!
//! Tests behavior across Vision Engine lifecycle events:
//! - Host calls that arrive before their mode is constructed
//! - Overlays addressed through their view's parent
//! - Disposal while the engine thread is blocked
//! - Configuration and logging setup

use crate::common::*;
use labelbridge::logging::init_tracing;
use labelbridge::{BridgeConfig, DataCaptureView, Dispatch, EventScope, MethodCall, Output};
use serde_json::json;
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

// ============================================================================
// Construction order
// ============================================================================

#[test]
fn test_listener_call_waits_for_mode_construction() {
    let bridge = Bridge::new();
    let (tx, rx) = mpsc::channel();

    let dispatch = bridge.executor.dispatch(
        MethodCall::new("addLabelCaptureListener", json!({ "modeId": 5 })),
        Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }),
    );
    assert_eq!(dispatch, Dispatch::Handled);
    assert!(rx.try_recv().is_err(), "answered before the mode exists");
    // Event bookkeeping is done up front
    assert_eq!(
        bridge.executor.callbacks().events(EventScope::Mode(5)),
        vec!["LabelCaptureListener.didUpdateSession"]
    );

    bridge.construct_mode(5, None);

    assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), Ok(Output::Retained));
}

#[test]
fn test_overlay_waits_for_mode_claiming_its_parent() {
    let bridge = Bridge::new();
    let view = bridge.view(20, Some(99));

    bridge.construct_overlay("labelCaptureBasic", 3, &view);
    assert_eq!(bridge.engine.log.count("engine.overlay"), 0);

    bridge.construct_mode(3, Some(99));
    bridge.module.drain_main();

    assert_eq!(bridge.engine.log.count("engine.overlay basic"), 1);
    assert!(view.basic_overlay().is_some());
}

#[test]
fn test_unknown_method_is_left_to_the_host() {
    let bridge = Bridge::new();
    let dispatch = bridge
        .executor
        .dispatch(MethodCall::new("doesNotExist", json!({})), Box::new(|_| {}));

    assert_eq!(dispatch, Dispatch::Unhandled);
    assert!(bridge.engine.log.entries().is_empty());
}

// ============================================================================
// Disposal
// ============================================================================

#[test]
fn test_dispose_context_releases_blocked_engine() {
    let bridge = Bridge::new();
    bridge.construct_mode(1, None);
    let mode = bridge.engine.mode(1);
    let sdk = thread::spawn(move || mode.scan(1, vec![shipping_label(1)]));
    bridge.next_event();

    bridge.module.dispose_context();

    assert_eq!(sdk.join().unwrap(), Some(true));
    assert!(bridge.module.modes().is_empty());
    assert!(bridge.module.frames().is_empty());
    assert_eq!(bridge.engine.log.count("engine.dispose"), 1);

    // A late answer from the host is harmless
    assert_eq!(
        bridge.call(
            "finishLabelCaptureListenerDidUpdateSession",
            json!({ "modeId": 1, "isEnabled": false })
        ),
        Ok(Output::Unit)
    );
}

// ============================================================================
// Mode commands
// ============================================================================

#[test]
fn test_native_failure_is_reported_verbatim() {
    let bridge = Bridge::new();
    bridge.construct_mode(1, None);

    let err = bridge
        .call(
            "updateLabelCaptureFeedback",
            json!({ "modeId": 1, "feedbackJson": r#"{"success":{"sound":"missing"}}"# }),
        )
        .unwrap_err();

    assert_eq!(err.code(), "NATIVE_ERROR");
    assert_eq!(err.details(), Some(json!({ "nativeCode": "SND404" })));
}

#[test]
fn test_validation_flow_listener_is_view_scoped() {
    let bridge = Bridge::new();
    let view = bridge.view(10, None);
    bridge.construct_mode(1, None);
    bridge.construct_overlay("validationFlow", 1, &view);

    let outcome = bridge.call("registerListenerForValidationFlowEvents", json!({ "dataCaptureViewId": 10 }));

    assert_eq!(outcome, Ok(Output::Retained));
    assert!(bridge.engine.validation_flow.lock()[0].delegate.lock().is_some());
    let events = bridge.executor.callbacks().events(EventScope::View(10));
    assert!(events.contains(&"LabelCaptureValidationFlowListener.didCaptureLabelWithFields"));
    assert!(bridge.executor.callbacks().events(EventScope::Mode(1)).is_empty());

    bridge
        .call("unregisterListenerForValidationFlowEvents", json!({ "dataCaptureViewId": 10 }))
        .unwrap();
    assert!(bridge.engine.validation_flow.lock()[0].delegate.lock().is_none());
    assert!(bridge.executor.callbacks().events(EventScope::View(10)).is_empty());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_bridge_built_from_config_file() {
    let dir = TempDir::new().unwrap();
    let defaults = BridgeConfig::write_default_if_missing(dir.path()).unwrap();
    assert_eq!(defaults, BridgeConfig::default());

    let path = dir.path().join(labelbridge_engine::CONFIG_FILE_NAME);
    let tuned = BridgeConfig {
        main_thread_name: "overlay-main".to_string(),
        main_queue_capacity: 8,
        ..defaults
    };
    tuned.write_to_file(&path).unwrap();
    let loaded = BridgeConfig::from_file(&path).unwrap();
    assert_eq!(loaded, tuned);

    init_tracing(&loaded.log_filter);
    // Already installed: later calls are no-ops
    assert!(!init_tracing(&loaded.log_filter));

    let bridge = Bridge::with_config(loaded);
    assert_eq!(bridge.module.config().main_thread_name, "overlay-main");
    bridge.construct_mode(1, None);
    assert_eq!(bridge.module.modes().len(), 1);
}
