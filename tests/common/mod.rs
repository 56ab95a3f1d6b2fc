//! Shared test utilities for the integration suites.
//!
//! A simulated Vision Engine and a simulated host, wired to one bridge.
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use labelbridge::{
    BridgeConfig, DataCaptureView, Dispatch, EmitError, Emitter, Event, Executor, LabelCaptureModule, MethodCall,
    Output, ViewRegistry,
};
use labelbridge_core::{
    Anchor, Brush, CapturedLabel, LabelCaptureSession, LabelField, ModeId, PointWithUnit, TrackingId, ViewId,
};
use labelbridge_engine::{
    AdaptiveRecognitionDelegate, AdaptiveRecognitionOverlay, AdvancedOverlay, AdvancedOverlayDelegate, BasicOverlay,
    BasicOverlayDelegate, FrameData, LabelCaptureDeserializer, LabelCaptureListener, LabelView, NativeMode, Overlay,
    ValidationFlowDelegate, ValidationFlowOverlay,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// Upper bound for anything a test waits on.
pub const TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Native log
// ============================================================================

/// Every call the simulated SDK received, in order.
#[derive(Debug, Default, Clone)]
pub struct NativeLog(Arc<Mutex<Vec<String>>>);

impl NativeLog {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0.lock().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

// ============================================================================
// Simulated host
// ============================================================================

/// Event channel whose receiving end plays the host.
pub struct HostChannel {
    tx: Mutex<Option<mpsc::Sender<Event>>>,
    listening: AtomicBool,
}

impl HostChannel {
    pub fn new() -> (Arc<Self>, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        let channel = HostChannel {
            tx: Mutex::new(Some(tx)),
            listening: AtomicBool::new(true),
        };
        (Arc::new(channel), rx)
    }

    pub fn set_listening(&self, listening: bool) {
        self.listening.store(listening, Ordering::SeqCst);
    }

    /// Simulate the host going away.
    pub fn disconnect(&self) {
        self.tx.lock().take();
    }
}

impl Emitter for HostChannel {
    fn emit(&self, name: &str, payload: Value) -> Result<(), EmitError> {
        let tx = self.tx.lock();
        let tx = tx.as_ref().ok_or(EmitError::Closed)?;
        tx.send(Event {
            name: name.to_string(),
            payload,
        })
        .map_err(|_| EmitError::Closed)
    }

    fn has_listener(&self, _name: &str) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Simulated Vision Engine
// ============================================================================

pub struct SimMode {
    id: ModeId,
    log: NativeLog,
    enabled: AtomicBool,
    listener: Mutex<Option<Arc<dyn LabelCaptureListener>>>,
}

impl SimMode {
    /// Process one frame on the calling thread. `None` when nothing listens.
    pub fn scan(&self, frame: i64, labels: Vec<CapturedLabel>) -> Option<bool> {
        let listener = self.listener.lock().clone()?;
        let keep_going = listener.did_update_session(
            self,
            LabelCaptureSession::new(frame, labels),
            FrameData::new(1920, 1080),
        );
        Some(keep_going)
    }
}

impl NativeMode for SimMode {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.log.record(format!("mode[{}].enabled={}", self.id, enabled));
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn add_listener(&self, listener: Arc<dyn LabelCaptureListener>) {
        *self.listener.lock() = Some(listener);
    }

    fn remove_listener(&self) {
        *self.listener.lock() = None;
    }

    fn apply_settings(&self, settings_json: &str) -> labelbridge_core::Result<()> {
        self.log.record(format!("mode[{}].settings {}", self.id, settings_json));
        Ok(())
    }

    fn update_from_json(&self, _mode_json: &str) -> labelbridge_core::Result<()> {
        self.log.record(format!("mode[{}].update", self.id));
        Ok(())
    }

    fn update_feedback(&self, feedback_json: &str) -> labelbridge_core::Result<()> {
        if feedback_json.contains("\"sound\":\"missing\"") {
            return Err(labelbridge_core::Error::native("SND404", "sound resource not found"));
        }
        self.log.record(format!("mode[{}].feedback", self.id));
        Ok(())
    }
}

pub struct SimBasicOverlay {
    log: NativeLog,
    pub delegate: Mutex<Option<Arc<dyn BasicOverlayDelegate>>>,
}

impl BasicOverlay for SimBasicOverlay {
    fn set_brush_for_label(&self, brush: Brush, label: &CapturedLabel) {
        self.log
            .record(format!("basic.brush label={} fill={}", label.tracking_id, brush.fill_color));
    }

    fn set_brush_for_field(&self, brush: Brush, field: &LabelField, label: &CapturedLabel) {
        self.log.record(format!(
            "basic.brush field={}/{} fill={}",
            label.tracking_id, field.name, brush.fill_color
        ));
    }

    fn label_brush(&self) -> Option<Brush> {
        None
    }

    fn captured_field_brush(&self) -> Option<Brush> {
        None
    }

    fn set_delegate(&self, delegate: Option<Arc<dyn BasicOverlayDelegate>>) {
        *self.delegate.lock() = delegate;
    }
}

pub struct SimAdvancedOverlay {
    log: NativeLog,
    pub delegate: Mutex<Option<Arc<dyn AdvancedOverlayDelegate>>>,
}

impl AdvancedOverlay for SimAdvancedOverlay {
    fn set_view_for_label(&self, view: Option<Arc<LabelView>>, label: &CapturedLabel) {
        self.log
            .record(format!("advanced.view label={} some={}", label.tracking_id, view.is_some()));
    }

    fn set_view_for_field(&self, view: Option<Arc<LabelView>>, field: &LabelField, label: &CapturedLabel) {
        self.log.record(format!(
            "advanced.view field={}/{} some={}",
            label.tracking_id,
            field.name,
            view.is_some()
        ));
    }

    fn set_anchor_for_label(&self, anchor: Anchor, label: &CapturedLabel) {
        self.log
            .record(format!("advanced.anchor label={} {}", label.tracking_id, anchor.as_str()));
    }

    fn set_anchor_for_field(&self, anchor: Anchor, field: &LabelField, label: &CapturedLabel) {
        self.log.record(format!(
            "advanced.anchor field={}/{} {}",
            label.tracking_id,
            field.name,
            anchor.as_str()
        ));
    }

    fn set_offset_for_label(&self, _offset: PointWithUnit, label: &CapturedLabel) {
        self.log.record(format!("advanced.offset label={}", label.tracking_id));
    }

    fn set_offset_for_field(&self, _offset: PointWithUnit, field: &LabelField, label: &CapturedLabel) {
        self.log
            .record(format!("advanced.offset field={}/{}", label.tracking_id, field.name));
    }

    fn clear_tracked_views(&self) {
        self.log.record("advanced.clear");
    }

    fn set_delegate(&self, delegate: Option<Arc<dyn AdvancedOverlayDelegate>>) {
        *self.delegate.lock() = delegate;
    }
}

pub struct SimValidationFlowOverlay {
    pub delegate: Mutex<Option<Arc<dyn ValidationFlowDelegate>>>,
}

impl ValidationFlowOverlay for SimValidationFlowOverlay {
    fn set_delegate(&self, delegate: Option<Arc<dyn ValidationFlowDelegate>>) {
        *self.delegate.lock() = delegate;
    }
}

pub struct SimAdaptiveRecognitionOverlay {
    pub delegate: Mutex<Option<Arc<dyn AdaptiveRecognitionDelegate>>>,
}

impl AdaptiveRecognitionOverlay for SimAdaptiveRecognitionOverlay {
    fn set_delegate(&self, delegate: Option<Arc<dyn AdaptiveRecognitionDelegate>>) {
        *self.delegate.lock() = delegate;
    }
}

/// Vision Engine stand-in: builds modes and overlays from JSON.
#[derive(Default)]
pub struct SimEngine {
    pub log: NativeLog,
    modes: Mutex<HashMap<ModeId, Arc<SimMode>>>,
    pub validation_flow: Mutex<Vec<Arc<SimValidationFlowOverlay>>>,
}

impl SimEngine {
    pub fn mode(&self, mode_id: ModeId) -> Arc<SimMode> {
        Arc::clone(self.modes.lock().get(&mode_id).expect("mode constructed"))
    }
}

impl LabelCaptureDeserializer for SimEngine {
    fn mode(&self, mode_json: &str) -> labelbridge_core::Result<Arc<dyn NativeMode>> {
        let value: Value = serde_json::from_str(mode_json).map_err(labelbridge_core::Error::deserialization)?;
        let id = value["modeId"]
            .as_i64()
            .ok_or_else(|| labelbridge_core::Error::deserialization("modeId"))?;
        let mode = Arc::new(SimMode {
            id,
            log: self.log.clone(),
            enabled: AtomicBool::new(false),
            listener: Mutex::new(None),
        });
        self.modes.lock().insert(id, Arc::clone(&mode));
        self.log.record(format!("engine.mode {}", id));
        Ok(mode)
    }

    fn dispose_mode(&self, _mode: &Arc<dyn NativeMode>) {
        self.log.record("engine.dispose");
    }

    fn basic_overlay(
        &self,
        _overlay_json: &str,
        _mode: &Arc<dyn NativeMode>,
    ) -> labelbridge_core::Result<Arc<dyn BasicOverlay>> {
        self.log.record("engine.overlay basic");
        Ok(Arc::new(SimBasicOverlay {
            log: self.log.clone(),
            delegate: Mutex::new(None),
        }))
    }

    fn advanced_overlay(
        &self,
        _overlay_json: &str,
        _mode: &Arc<dyn NativeMode>,
    ) -> labelbridge_core::Result<Arc<dyn AdvancedOverlay>> {
        self.log.record("engine.overlay advanced");
        Ok(Arc::new(SimAdvancedOverlay {
            log: self.log.clone(),
            delegate: Mutex::new(None),
        }))
    }

    fn validation_flow_overlay(
        &self,
        _overlay_json: &str,
        _mode: &Arc<dyn NativeMode>,
    ) -> labelbridge_core::Result<Arc<dyn ValidationFlowOverlay>> {
        self.log.record("engine.overlay validationFlow");
        let overlay = Arc::new(SimValidationFlowOverlay {
            delegate: Mutex::new(None),
        });
        self.validation_flow.lock().push(Arc::clone(&overlay));
        Ok(overlay)
    }

    fn adaptive_recognition_overlay(
        &self,
        _overlay_json: &str,
        _mode: &Arc<dyn NativeMode>,
    ) -> labelbridge_core::Result<Arc<dyn AdaptiveRecognitionOverlay>> {
        self.log.record("engine.overlay receiptScanning");
        Ok(Arc::new(SimAdaptiveRecognitionOverlay {
            delegate: Mutex::new(None),
        }))
    }
}

/// Host view holding overlays.
pub struct SimView {
    id: ViewId,
    parent: Option<ViewId>,
    overlays: Mutex<Vec<Overlay>>,
}

impl DataCaptureView for SimView {
    fn view_id(&self) -> ViewId {
        self.id
    }

    fn parent_id(&self) -> Option<ViewId> {
        self.parent
    }

    fn add_overlay(&self, overlay: Overlay) {
        self.overlays.lock().push(overlay);
    }

    fn remove_overlay(&self, overlay: &Overlay) {
        self.overlays.lock().retain(|o| !o.same(overlay));
    }

    fn overlays(&self) -> Vec<Overlay> {
        self.overlays.lock().clone()
    }
}

// ============================================================================
// Labels
// ============================================================================

/// A shipping label with a barcode and an expiry date.
pub fn shipping_label(tracking_id: TrackingId) -> CapturedLabel {
    CapturedLabel::new(
        tracking_id,
        "shipping",
        vec![
            LabelField::barcode("barcode", "code128", format!("PKG-{}", tracking_id)).required(),
            LabelField::text("expiryDate", "2027-01-31"),
        ],
    )
}

// ============================================================================
// Bridge - one module, one executor, one simulated engine and host
// ============================================================================

pub struct Bridge {
    pub module: Arc<LabelCaptureModule>,
    pub executor: Executor,
    pub engine: Arc<SimEngine>,
    pub host: Arc<HostChannel>,
    pub events: mpsc::Receiver<Event>,
    pub views: Arc<ViewRegistry>,
}

impl Bridge {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let (host, events) = HostChannel::new();
        let engine = Arc::new(SimEngine::default());
        let views = Arc::new(ViewRegistry::new());
        let module = LabelCaptureModule::new(config, host.clone(), engine.clone(), Arc::clone(&views))
            .expect("bridge module");
        module.on_start();
        Bridge {
            executor: Executor::new(Arc::clone(&module)),
            module,
            engine,
            host,
            events,
            views,
        }
    }

    /// Register a host view and report it to the module.
    pub fn view(&self, id: ViewId, parent: Option<ViewId>) -> Arc<SimView> {
        let view = Arc::new(SimView {
            id,
            parent,
            overlays: Mutex::new(Vec::new()),
        });
        self.views.register(view.clone());
        view
    }

    /// Vision Engine reports a mode constructed.
    pub fn construct_mode(&self, mode_id: ModeId, parent_id: Option<ViewId>) {
        self.module.add_mode(
            &json!({
                "type": "labelCapture",
                "modeId": mode_id,
                "parentId": parent_id,
                "hasListeners": true,
                "enabled": true,
            })
            .to_string(),
        );
    }

    /// Vision Engine reports an overlay constructed on `view`.
    pub fn construct_overlay(&self, kind: &str, mode_id: ModeId, view: &Arc<SimView>) {
        self.module.add_overlay(
            &json!({ "type": kind, "modeId": mode_id, "hasListener": true }).to_string(),
            view.clone(),
        );
        self.module.drain_main();
    }

    /// Dispatch a host call and wait for its answer.
    pub fn call(&self, method: &str, arguments: Value) -> labelbridge::Result<Output> {
        let (tx, rx) = mpsc::channel();
        let dispatch = self.executor.dispatch(
            MethodCall::new(method, arguments),
            Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }),
        );
        assert_eq!(dispatch, Dispatch::Handled, "{} is registered", method);
        rx.recv_timeout(TIMEOUT).expect("host call answered")
    }

    /// Next event the host received.
    pub fn next_event(&self) -> Event {
        self.events.recv_timeout(TIMEOUT).expect("event received")
    }
}
