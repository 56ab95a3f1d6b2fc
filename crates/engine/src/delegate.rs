//! Callbacks the native SDK invokes on the bridge.
//!
//! Every method is called from an SDK-owned thread. Return values are fed
//! straight back into the SDK's rendering or processing decisions, so
//! implementations must answer without waiting on the host, with one
//! exception: [`LabelCaptureListener::did_update_session`] may block until the
//! host acknowledges the update.

use labelbridge_core::{Anchor, Brush, CapturedLabel, LabelCaptureSession, LabelField, PointWithUnit};
use std::sync::Arc;

use crate::frame::FrameData;
use crate::native::{AdaptiveRecognitionOverlay, AdvancedOverlay, BasicOverlay, NativeMode, ValidationFlowOverlay};
use crate::view::LabelView;

/// Per-frame session listener of a mode.
pub trait LabelCaptureListener: Send + Sync {
    /// A frame was processed.
    ///
    /// Returns whether the mode should keep processing frames. Implementations
    /// apply the decision to `mode` themselves before returning.
    fn did_update_session(&self, mode: &dyn NativeMode, session: LabelCaptureSession, frame: FrameData) -> bool;
}

/// Delegate of a [`BasicOverlay`].
pub trait BasicOverlayDelegate: Send + Sync {
    /// Brush for a field of a label; `None` keeps the SDK default.
    fn brush_for_field(&self, overlay: &dyn BasicOverlay, field: &LabelField, label: &CapturedLabel) -> Option<Brush>;

    /// Brush for a label; `None` keeps the SDK default.
    fn brush_for_label(&self, overlay: &dyn BasicOverlay, label: &CapturedLabel) -> Option<Brush>;

    /// The user tapped a label.
    fn did_tap_label(&self, overlay: &dyn BasicOverlay, label: &CapturedLabel);
}

/// Delegate of an [`AdvancedOverlay`].
pub trait AdvancedOverlayDelegate: Send + Sync {
    /// View for a label.
    fn view_for_label(&self, overlay: &dyn AdvancedOverlay, label: &CapturedLabel) -> Option<Arc<LabelView>>;

    /// Anchor for a label's view.
    fn anchor_for_label(&self, overlay: &dyn AdvancedOverlay, label: &CapturedLabel) -> Anchor;

    /// Offset for a label's view.
    fn offset_for_label(&self, overlay: &dyn AdvancedOverlay, label: &CapturedLabel) -> PointWithUnit;

    /// View for a field of a label.
    fn view_for_field(
        &self,
        overlay: &dyn AdvancedOverlay,
        field: &LabelField,
        label: &CapturedLabel,
    ) -> Option<Arc<LabelView>>;

    /// Anchor for a field's view.
    fn anchor_for_field(&self, overlay: &dyn AdvancedOverlay, field: &LabelField, label: &CapturedLabel) -> Anchor;

    /// Offset for a field's view.
    fn offset_for_field(
        &self,
        overlay: &dyn AdvancedOverlay,
        field: &LabelField,
        label: &CapturedLabel,
    ) -> PointWithUnit;
}

/// Delegate of a [`ValidationFlowOverlay`].
pub trait ValidationFlowDelegate: Send + Sync {
    /// The validation flow finished with these fields.
    fn did_capture_label_with_fields(&self, overlay: &dyn ValidationFlowOverlay, fields: &[LabelField]);

    /// The user corrected a field manually.
    fn did_submit_manual_input(
        &self,
        overlay: &dyn ValidationFlowOverlay,
        field: &LabelField,
        old_value: Option<&str>,
        new_value: &str,
    );
}

/// Delegate of an [`AdaptiveRecognitionOverlay`].
pub trait AdaptiveRecognitionDelegate: Send + Sync {
    /// Recognition succeeded; `result` is the SDK's JSON form of the result.
    fn did_recognize(&self, overlay: &dyn AdaptiveRecognitionOverlay, result: &serde_json::Value);

    /// Recognition failed.
    fn did_fail(&self, overlay: &dyn AdaptiveRecognitionOverlay);
}
