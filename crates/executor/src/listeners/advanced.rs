//! Advanced overlay delegate.
//!
//! Every query is forwarded as an event and answered with a neutral value:
//! no view, centered anchor, zero offset. The host then places views through
//! `setViewForCapturedLabel*`, `setAnchorForCapturedLabel*` and
//! `setOffsetForCapturedLabel*`. Field events identify the field by its
//! field key.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use labelbridge_core::{Anchor, CapturedLabel, FieldKey, LabelField, PointWithUnit};
use labelbridge_engine::{AdvancedOverlay, AdvancedOverlayDelegate, LabelView};
use serde_json::{json, Value};

use crate::emitter::{Emitter, EmitterExt};
use crate::events::LabelCaptureEvent;

/// Delegate installed on advanced overlays.
pub struct AdvancedOverlayListener {
    emitter: Arc<dyn Emitter>,
    enabled: AtomicBool,
}

impl AdvancedOverlayListener {
    /// Create a disabled listener emitting through `emitter`.
    pub fn new(emitter: Arc<dyn Emitter>) -> Self {
        AdvancedOverlayListener {
            emitter,
            enabled: AtomicBool::new(false),
        }
    }

    /// Start forwarding advanced overlay callbacks.
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

    fn label_payload(label: &CapturedLabel) -> Value {
        json!({ "label": label.to_json().to_string() })
    }

    fn field_payload(field: &LabelField, label: &CapturedLabel) -> Value {
        json!({
            "field": field.to_json().to_string(),
            "identifier": FieldKey::encode(label.tracking_id, &field.name).into_string(),
        })
    }
}

impl AdvancedOverlayDelegate for AdvancedOverlayListener {
    fn view_for_label(&self, _overlay: &dyn AdvancedOverlay, label: &CapturedLabel) -> Option<Arc<LabelView>> {
        self.forward(LabelCaptureEvent::ViewForLabel, Self::label_payload(label));
        None
    }

    fn anchor_for_label(&self, _overlay: &dyn AdvancedOverlay, label: &CapturedLabel) -> Anchor {
        self.forward(LabelCaptureEvent::AnchorForLabel, Self::label_payload(label));
        Anchor::Center
    }

    fn offset_for_label(&self, _overlay: &dyn AdvancedOverlay, label: &CapturedLabel) -> PointWithUnit {
        self.forward(LabelCaptureEvent::OffsetForLabel, Self::label_payload(label));
        PointWithUnit::ZERO
    }

    fn view_for_field(
        &self,
        _overlay: &dyn AdvancedOverlay,
        field: &LabelField,
        label: &CapturedLabel,
    ) -> Option<Arc<LabelView>> {
        self.forward(
            LabelCaptureEvent::ViewForFieldOfLabel,
            Self::field_payload(field, label),
        );
        None
    }

    fn anchor_for_field(&self, _overlay: &dyn AdvancedOverlay, field: &LabelField, label: &CapturedLabel) -> Anchor {
        self.forward(
            LabelCaptureEvent::AnchorForFieldOfLabel,
            Self::field_payload(field, label),
        );
        Anchor::Center
    }

    fn offset_for_field(
        &self,
        _overlay: &dyn AdvancedOverlay,
        field: &LabelField,
        label: &CapturedLabel,
    ) -> PointWithUnit {
        self.forward(
            LabelCaptureEvent::OffsetForFieldOfLabel,
            Self::field_payload(field, label),
        );
        PointWithUnit::ZERO
    }
}
