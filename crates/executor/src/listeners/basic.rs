//! Basic overlay delegate forwarding brush queries and taps.
//!
//! Brush queries are answered immediately with the overlay's default brush;
//! the host replies asynchronously through the `setLabelCaptureBasicOverlay*`
//! commands.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use labelbridge_core::{Brush, CapturedLabel, LabelField};
use labelbridge_engine::{BasicOverlay, BasicOverlayDelegate};
use serde_json::json;

use crate::emitter::{Emitter, EmitterExt};
use crate::events::LabelCaptureEvent;

/// Delegate installed on basic overlays.
pub struct BasicOverlayListener {
    emitter: Arc<dyn Emitter>,
    enabled: AtomicBool,
}

impl BasicOverlayListener {
    /// Create a disabled listener emitting through `emitter`.
    pub fn new(emitter: Arc<dyn Emitter>) -> Self {
        BasicOverlayListener {
            emitter,
            enabled: AtomicBool::new(false),
        }
    }

    /// Start forwarding basic overlay callbacks.
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
}

impl BasicOverlayDelegate for BasicOverlayListener {
    fn brush_for_field(&self, overlay: &dyn BasicOverlay, field: &LabelField, label: &CapturedLabel) -> Option<Brush> {
        let event = LabelCaptureEvent::BrushForFieldOfLabel;
        if !self.is_enabled() || !self.emitter.has_listener_for(event) {
            return None;
        }
        self.emitter.emit_if_listened(
            event,
            json!({
                "field": field.to_json().to_string(),
                "label": label.to_json().to_string(),
            }),
        );
        overlay.captured_field_brush()
    }

    fn brush_for_label(&self, overlay: &dyn BasicOverlay, label: &CapturedLabel) -> Option<Brush> {
        let event = LabelCaptureEvent::BrushForLabel;
        if !self.is_enabled() || !self.emitter.has_listener_for(event) {
            return None;
        }
        self.emitter
            .emit_if_listened(event, json!({ "label": label.to_json().to_string() }));
        overlay.label_brush()
    }

    fn did_tap_label(&self, _overlay: &dyn BasicOverlay, label: &CapturedLabel) {
        if !self.is_enabled() {
            return;
        }
        self.emitter.emit_if_listened(
            LabelCaptureEvent::DidTapLabel,
            json!({ "label": label.to_json().to_string() }),
        );
    }
}
