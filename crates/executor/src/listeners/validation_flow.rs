//! Validation flow delegate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use labelbridge_core::LabelField;
use labelbridge_engine::{ValidationFlowDelegate, ValidationFlowOverlay};
use serde_json::{json, Value};

use crate::emitter::{Emitter, EmitterExt};
use crate::events::LabelCaptureEvent;

/// Delegate installed on validation flow overlays.
pub struct ValidationFlowListener {
    emitter: Arc<dyn Emitter>,
    enabled: AtomicBool,
}

impl ValidationFlowListener {
    /// Create a disabled listener emitting through `emitter`.
    pub fn new(emitter: Arc<dyn Emitter>) -> Self {
        ValidationFlowListener {
            emitter,
            enabled: AtomicBool::new(false),
        }
    }

    /// Start forwarding validation flow callbacks.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Stop forwarding; callbacks get the neutral answer.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Whether callbacks are forwarded to the host.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn forward(&self, event: LabelCaptureEvent, payload: Value) {
        if self.is_enabled() {
            self.emitter.emit_if_listened(event, payload);
        }
    }
}

impl ValidationFlowDelegate for ValidationFlowListener {
    fn did_capture_label_with_fields(&self, _overlay: &dyn ValidationFlowOverlay, fields: &[LabelField]) {
        let fields: Vec<String> = fields.iter().map(|f| f.to_json().to_string()).collect();
        self.forward(LabelCaptureEvent::DidCaptureLabelWithFields, json!({ "fields": fields }));
    }

    fn did_submit_manual_input(
        &self,
        _overlay: &dyn ValidationFlowOverlay,
        field: &LabelField,
        old_value: Option<&str>,
        new_value: &str,
    ) {
        // The host consumes a one-element list here, same shape as the
        // capture event
        self.forward(
            LabelCaptureEvent::DidSubmitManualInputForField,
            json!({
                "fields": [field.to_json().to_string()],
                "oldValue": old_value,
                "newValue": new_value,
            }),
        );
    }
}
