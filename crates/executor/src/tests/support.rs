//! In-process stand-ins for the Vision Engine used by the scenario tests.
//!
//! Every fake records the native calls it receives as short strings so tests
//! can assert on "what reached the SDK" without mocking frameworks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use labelbridge_core::{
    Anchor, Brush, CapturedLabel, LabelCaptureSession, LabelField, ModeId, PointWithUnit, Result as CoreResult,
    SessionSnapshot, TrackingId, ViewId,
};
use labelbridge_engine::{
    AdaptiveRecognitionDelegate, AdaptiveRecognitionOverlay, AdvancedOverlay, AdvancedOverlayDelegate, BasicOverlay,
    BasicOverlayDelegate, BridgeConfig, DataCaptureView, FrameData, LabelCaptureDeserializer, LabelCaptureListener,
    LabelView, NativeMode, Overlay, ValidationFlowDelegate, ValidationFlowOverlay, ViewRegistry,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::{BufferedEmitter, Dispatch, Executor, LabelCaptureModule, MethodCall, Output, Result};

/// How long a test waits for an answer that should arrive.
pub const ANSWER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
pub struct CallLog(Mutex<Vec<String>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().push(call.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

// =============================================================================
// Native mode
// =============================================================================

pub struct FakeMode {
    pub mode_id: ModeId,
    pub calls: CallLog,
    enabled: AtomicBool,
    listener: Mutex<Option<Arc<dyn LabelCaptureListener>>>,
}

impl FakeMode {
    fn new(mode_id: ModeId) -> Self {
        FakeMode {
            mode_id,
            calls: CallLog::default(),
            enabled: AtomicBool::new(false),
            listener: Mutex::new(None),
        }
    }

    /// Run one frame through the attached listener, as the SDK thread would.
    pub fn process(&self, session: LabelCaptureSession) -> Option<bool> {
        let listener = self.listener.lock().clone()?;
        Some(listener.did_update_session(self, session, FrameData::new(1280, 720)))
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().is_some()
    }
}

impl NativeMode for FakeMode {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn add_listener(&self, listener: Arc<dyn LabelCaptureListener>) {
        *self.listener.lock() = Some(listener);
    }

    fn remove_listener(&self) {
        *self.listener.lock() = None;
    }

    fn apply_settings(&self, settings_json: &str) -> CoreResult<()> {
        self.calls.push(format!("apply_settings({})", settings_json));
        Ok(())
    }

    fn update_from_json(&self, mode_json: &str) -> CoreResult<()> {
        if mode_json.contains("\"broken\"") {
            return Err(labelbridge_core::Error::native("E42", "mode rejected the update"));
        }
        self.calls.push("update_from_json");
        Ok(())
    }

    fn update_feedback(&self, feedback_json: &str) -> CoreResult<()> {
        self.calls.push(format!("update_feedback({})", feedback_json));
        Ok(())
    }
}

// =============================================================================
// Overlays
// =============================================================================

#[derive(Default)]
pub struct FakeBasicOverlay {
    pub calls: CallLog,
    pub delegate: Mutex<Option<Arc<dyn BasicOverlayDelegate>>>,
}

impl BasicOverlay for FakeBasicOverlay {
    fn set_brush_for_label(&self, brush: Brush, label: &CapturedLabel) {
        self.calls
            .push(format!("brush_for_label({}, {})", label.tracking_id, brush.stroke_width));
    }

    fn set_brush_for_field(&self, _brush: Brush, field: &LabelField, label: &CapturedLabel) {
        self.calls
            .push(format!("brush_for_field({}, {})", label.tracking_id, field.name));
    }

    fn label_brush(&self) -> Option<Brush> {
        Some(Brush::transparent())
    }

    fn captured_field_brush(&self) -> Option<Brush> {
        Some(Brush::transparent())
    }

    fn set_delegate(&self, delegate: Option<Arc<dyn BasicOverlayDelegate>>) {
        *self.delegate.lock() = delegate;
    }
}

#[derive(Default)]
pub struct FakeAdvancedOverlay {
    pub calls: CallLog,
    pub views: Mutex<HashMap<String, Option<Arc<LabelView>>>>,
    pub delegate: Mutex<Option<Arc<dyn AdvancedOverlayDelegate>>>,
}

impl AdvancedOverlay for FakeAdvancedOverlay {
    fn set_view_for_label(&self, view: Option<Arc<LabelView>>, label: &CapturedLabel) {
        self.calls.push(format!("view_for_label({})", label.tracking_id));
        self.views.lock().insert(label.tracking_id.to_string(), view);
    }

    fn set_view_for_field(&self, view: Option<Arc<LabelView>>, field: &LabelField, label: &CapturedLabel) {
        self.calls
            .push(format!("view_for_field({}, {})", label.tracking_id, field.name));
        let key = labelbridge_core::FieldKey::encode(label.tracking_id, &field.name);
        self.views.lock().insert(key.into_string(), view);
    }

    fn set_anchor_for_label(&self, anchor: Anchor, label: &CapturedLabel) {
        self.calls
            .push(format!("anchor_for_label({}, {})", label.tracking_id, anchor.as_str()));
    }

    fn set_anchor_for_field(&self, anchor: Anchor, field: &LabelField, label: &CapturedLabel) {
        self.calls.push(format!(
            "anchor_for_field({}, {}, {})",
            label.tracking_id,
            field.name,
            anchor.as_str()
        ));
    }

    fn set_offset_for_label(&self, offset: PointWithUnit, label: &CapturedLabel) {
        self.calls
            .push(format!("offset_for_label({}, {})", label.tracking_id, offset.to_json()));
    }

    fn set_offset_for_field(&self, offset: PointWithUnit, field: &LabelField, label: &CapturedLabel) {
        self.calls.push(format!(
            "offset_for_field({}, {}, {})",
            label.tracking_id,
            field.name,
            offset.to_json()
        ));
    }

    fn clear_tracked_views(&self) {
        self.calls.push("clear_tracked_views");
        self.views.lock().clear();
    }

    fn set_delegate(&self, delegate: Option<Arc<dyn AdvancedOverlayDelegate>>) {
        *self.delegate.lock() = delegate;
    }
}

#[derive(Default)]
pub struct FakeValidationFlowOverlay {
    pub delegate: Mutex<Option<Arc<dyn ValidationFlowDelegate>>>,
}

impl ValidationFlowOverlay for FakeValidationFlowOverlay {
    fn set_delegate(&self, delegate: Option<Arc<dyn ValidationFlowDelegate>>) {
        *self.delegate.lock() = delegate;
    }
}

#[derive(Default)]
pub struct FakeAdaptiveRecognitionOverlay {
    pub delegate: Mutex<Option<Arc<dyn AdaptiveRecognitionDelegate>>>,
}

impl AdaptiveRecognitionOverlay for FakeAdaptiveRecognitionOverlay {
    fn set_delegate(&self, delegate: Option<Arc<dyn AdaptiveRecognitionDelegate>>) {
        *self.delegate.lock() = delegate;
    }
}

// =============================================================================
// View
// =============================================================================

pub struct FakeView {
    id: ViewId,
    parent: Option<ViewId>,
    overlays: Mutex<Vec<Overlay>>,
}

impl FakeView {
    pub fn new(id: ViewId, parent: Option<ViewId>) -> Self {
        FakeView {
            id,
            parent,
            overlays: Mutex::new(Vec::new()),
        }
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.lock().len()
    }
}

impl DataCaptureView for FakeView {
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

// =============================================================================
// Deserializer
// =============================================================================

/// Builds fakes and keeps a handle on everything it built.
#[derive(Default)]
pub struct FakeDeserializer {
    pub calls: CallLog,
    pub modes: Mutex<HashMap<ModeId, Arc<FakeMode>>>,
    pub basic: Mutex<Vec<Arc<FakeBasicOverlay>>>,
    pub advanced: Mutex<Vec<Arc<FakeAdvancedOverlay>>>,
    pub validation_flow: Mutex<Vec<Arc<FakeValidationFlowOverlay>>>,
    pub adaptive_recognition: Mutex<Vec<Arc<FakeAdaptiveRecognitionOverlay>>>,
}

fn parse(json: &str) -> CoreResult<Value> {
    let value: Value = serde_json::from_str(json).map_err(labelbridge_core::Error::deserialization)?;
    if value.get("fail").and_then(Value::as_bool) == Some(true) {
        return Err(labelbridge_core::Error::deserialization("rejected by test"));
    }
    Ok(value)
}

impl FakeDeserializer {
    pub fn mode(&self, mode_id: ModeId) -> Arc<FakeMode> {
        Arc::clone(self.modes.lock().get(&mode_id).expect("mode was built"))
    }

    pub fn last_advanced(&self) -> Arc<FakeAdvancedOverlay> {
        Arc::clone(self.advanced.lock().last().expect("advanced overlay was built"))
    }

    pub fn last_basic(&self) -> Arc<FakeBasicOverlay> {
        Arc::clone(self.basic.lock().last().expect("basic overlay was built"))
    }
}

impl LabelCaptureDeserializer for FakeDeserializer {
    fn mode(&self, mode_json: &str) -> CoreResult<Arc<dyn NativeMode>> {
        let value = parse(mode_json)?;
        let mode_id = value.get("modeId").and_then(Value::as_i64).unwrap_or_default();
        let mode = Arc::new(FakeMode::new(mode_id));
        self.modes.lock().insert(mode_id, Arc::clone(&mode));
        self.calls.push(format!("mode({})", mode_id));
        Ok(mode)
    }

    fn dispose_mode(&self, _mode: &Arc<dyn NativeMode>) {
        self.calls.push("dispose_mode");
    }

    fn basic_overlay(&self, overlay_json: &str, _mode: &Arc<dyn NativeMode>) -> CoreResult<Arc<dyn BasicOverlay>> {
        parse(overlay_json)?;
        let overlay = Arc::new(FakeBasicOverlay::default());
        self.basic.lock().push(Arc::clone(&overlay));
        Ok(overlay)
    }

    fn advanced_overlay(
        &self,
        overlay_json: &str,
        _mode: &Arc<dyn NativeMode>,
    ) -> CoreResult<Arc<dyn AdvancedOverlay>> {
        parse(overlay_json)?;
        let overlay = Arc::new(FakeAdvancedOverlay::default());
        self.advanced.lock().push(Arc::clone(&overlay));
        Ok(overlay)
    }

    fn validation_flow_overlay(
        &self,
        overlay_json: &str,
        _mode: &Arc<dyn NativeMode>,
    ) -> CoreResult<Arc<dyn ValidationFlowOverlay>> {
        parse(overlay_json)?;
        let overlay = Arc::new(FakeValidationFlowOverlay::default());
        self.validation_flow.lock().push(Arc::clone(&overlay));
        Ok(overlay)
    }

    fn adaptive_recognition_overlay(
        &self,
        overlay_json: &str,
        _mode: &Arc<dyn NativeMode>,
    ) -> CoreResult<Arc<dyn AdaptiveRecognitionOverlay>> {
        parse(overlay_json)?;
        let overlay = Arc::new(FakeAdaptiveRecognitionOverlay::default());
        self.adaptive_recognition.lock().push(Arc::clone(&overlay));
        Ok(overlay)
    }
}

// =============================================================================
// Payload builders
// =============================================================================

pub fn mode_json(mode_id: ModeId, parent_id: Option<ViewId>, has_listeners: bool) -> String {
    json!({
        "type": "labelCapture",
        "modeId": mode_id,
        "parentId": parent_id.unwrap_or(-1),
        "hasListeners": has_listeners,
        "enabled": true,
    })
    .to_string()
}

pub fn overlay_json(kind: &str, mode_id: ModeId, has_listener: bool) -> String {
    json!({ "type": kind, "modeId": mode_id, "hasListener": has_listener }).to_string()
}

pub fn label(tracking_id: TrackingId, fields: &[(&str, &str)]) -> CapturedLabel {
    let fields = fields
        .iter()
        .map(|(name, value)| LabelField::text(*name, *value))
        .collect();
    CapturedLabel::new(tracking_id, "shipping label", fields)
}

pub fn session(frame: i64, labels: Vec<CapturedLabel>) -> LabelCaptureSession {
    LabelCaptureSession::new(frame, labels)
}

// =============================================================================
// Harness
// =============================================================================

/// A module wired to fakes, with an executor in front of it.
pub struct Harness {
    pub module: Arc<LabelCaptureModule>,
    pub executor: Executor,
    pub emitter: Arc<BufferedEmitter>,
    pub deserializer: Arc<FakeDeserializer>,
    pub views: Arc<ViewRegistry>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let emitter = Arc::new(BufferedEmitter::new());
        let deserializer = Arc::new(FakeDeserializer::default());
        let views = Arc::new(ViewRegistry::new());
        let module = LabelCaptureModule::new(config, emitter.clone(), deserializer.clone(), Arc::clone(&views))
            .expect("module starts");
        module.on_start();
        Harness {
            executor: Executor::new(Arc::clone(&module)),
            module,
            emitter,
            deserializer,
            views,
        }
    }

    /// Register a data capture view with the host registry.
    pub fn view(&self, view_id: ViewId, parent: Option<ViewId>) -> Arc<FakeView> {
        let view = Arc::new(FakeView::new(view_id, parent));
        self.views.register(view.clone());
        view
    }

    /// A registered mode with one advanced and one basic overlay on view 10.
    pub fn with_overlays(self, mode_id: ModeId) -> Self {
        self.module.add_mode(&mode_json(mode_id, None, true));
        let view = self.view(10, None);
        self.module
            .add_overlay(&overlay_json("labelCaptureAdvanced", mode_id, false), view.clone());
        self.module
            .add_overlay(&overlay_json("labelCaptureBasic", mode_id, false), view);
        self.module.drain_main();
        self
    }

    /// Publish a snapshot directly, bypassing any listener.
    pub fn publish(&self, labels: Vec<CapturedLabel>) {
        self.module
            .session()
            .set(SessionSnapshot::new(session(1, labels)));
    }

    /// Dispatch and hand back the receiving end of the answer.
    pub fn send(&self, method: &str, arguments: Value) -> (Dispatch, mpsc::Receiver<Result<Output>>) {
        let (tx, rx) = mpsc::channel();
        let dispatch = self.executor.dispatch(
            MethodCall::new(method, arguments),
            Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }),
        );
        (dispatch, rx)
    }

    /// Dispatch and wait for the answer.
    pub fn call(&self, method: &str, arguments: Value) -> Result<Output> {
        let (dispatch, rx) = self.send(method, arguments);
        assert_eq!(dispatch, Dispatch::Handled, "{} is registered", method);
        rx.recv_timeout(ANSWER_TIMEOUT).expect("command answered")
    }
}
