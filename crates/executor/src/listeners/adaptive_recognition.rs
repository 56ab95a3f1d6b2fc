//! Adaptive recognition (receipt scanning) delegate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use labelbridge_engine::{AdaptiveRecognitionDelegate, AdaptiveRecognitionOverlay};
use serde_json::{json, Value};

use crate::emitter::{Emitter, EmitterExt};
use crate::events::LabelCaptureEvent;

/// Delegate installed on adaptive recognition overlays.
pub struct AdaptiveRecognitionListener {
    emitter: Arc<dyn Emitter>,
    enabled: AtomicBool,
}

impl AdaptiveRecognitionListener {
    /// Create a disabled listener emitting through `emitter`.
    pub fn new(emitter: Arc<dyn Emitter>) -> Self {
        AdaptiveRecognitionListener {
            emitter,
            enabled: AtomicBool::new(false),
        }
    }

    /// Start forwarding adaptive recognition callbacks.
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

impl AdaptiveRecognitionDelegate for AdaptiveRecognitionListener {
    fn did_recognize(&self, _overlay: &dyn AdaptiveRecognitionOverlay, result: &Value) {
        self.forward(LabelCaptureEvent::Recognized, json!({ "result": result.to_string() }));
    }

    fn did_fail(&self, _overlay: &dyn AdaptiveRecognitionOverlay) {
        self.forward(LabelCaptureEvent::RecognitionFailed, json!({}));
    }
}
