//! Native SDK objects as seen by the bridge.
//!
//! A mode is the SDK's label capture pipeline; overlays draw on top of a data
//! capture view and ask the bridge (through their delegates) how to render
//! each label. Implementations live outside this workspace. Tests use fakes.
//!
//! Overlays are dispatched through [`Overlay`], a closed tagged union: the
//! kind is fixed at construction and every consumer matches on it
//! exhaustively.

use std::fmt;
use std::sync::Arc;

use labelbridge_core::{Anchor, Brush, CapturedLabel, LabelField, PointWithUnit, Result};

use crate::delegate::{
    AdaptiveRecognitionDelegate, AdvancedOverlayDelegate, BasicOverlayDelegate,
    LabelCaptureListener, ValidationFlowDelegate,
};
use crate::view::LabelView;

/// A native label capture mode.
///
/// The SDK calls the attached listener from its processing thread; all other
/// methods are called from the host dispatch thread or the main context.
pub trait NativeMode: Send + Sync {
    /// Whether the mode processes frames
    fn is_enabled(&self) -> bool;

    /// Enable or disable frame processing
    fn set_enabled(&self, enabled: bool);

    /// Attach the session listener
    fn add_listener(&self, listener: Arc<dyn LabelCaptureListener>);

    /// Detach the session listener
    fn remove_listener(&self);

    /// Apply a settings JSON
    fn apply_settings(&self, settings_json: &str) -> Result<()>;

    /// Update mode properties from a mode JSON
    fn update_from_json(&self, mode_json: &str) -> Result<()>;

    /// Replace the feedback configuration
    fn update_feedback(&self, feedback_json: &str) -> Result<()>;
}

/// Overlay highlighting labels and fields with brushes.
pub trait BasicOverlay: Send + Sync {
    /// Brush for one label
    fn set_brush_for_label(&self, brush: Brush, label: &CapturedLabel);

    /// Brush for one field of a label
    fn set_brush_for_field(&self, brush: Brush, field: &LabelField, label: &CapturedLabel);

    /// Default brush for labels
    fn label_brush(&self) -> Option<Brush>;

    /// Default brush for captured fields
    fn captured_field_brush(&self) -> Option<Brush>;

    /// Install or clear the delegate
    fn set_delegate(&self, delegate: Option<Arc<dyn BasicOverlayDelegate>>);
}

/// Overlay placing host-provided views next to labels and fields.
pub trait AdvancedOverlay: Send + Sync {
    /// View for one label; `None` removes it
    fn set_view_for_label(&self, view: Option<Arc<LabelView>>, label: &CapturedLabel);

    /// View for one field; `None` removes it
    fn set_view_for_field(&self, view: Option<Arc<LabelView>>, field: &LabelField, label: &CapturedLabel);

    /// Anchor for a label's view
    fn set_anchor_for_label(&self, anchor: Anchor, label: &CapturedLabel);

    /// Anchor for a field's view
    fn set_anchor_for_field(&self, anchor: Anchor, field: &LabelField, label: &CapturedLabel);

    /// Offset for a label's view
    fn set_offset_for_label(&self, offset: PointWithUnit, label: &CapturedLabel);

    /// Offset for a field's view
    fn set_offset_for_field(&self, offset: PointWithUnit, field: &LabelField, label: &CapturedLabel);

    /// Remove every view placed so far
    fn clear_tracked_views(&self);

    /// Install or clear the delegate
    fn set_delegate(&self, delegate: Option<Arc<dyn AdvancedOverlayDelegate>>);
}

/// Overlay guiding the user through validating captured fields.
pub trait ValidationFlowOverlay: Send + Sync {
    /// Install or clear the delegate
    fn set_delegate(&self, delegate: Option<Arc<dyn ValidationFlowDelegate>>);
}

/// Overlay for adaptive (receipt) recognition.
pub trait AdaptiveRecognitionOverlay: Send + Sync {
    /// Install or clear the delegate
    fn set_delegate(&self, delegate: Option<Arc<dyn AdaptiveRecognitionDelegate>>);
}

/// Kind tag of an [`Overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Brush overlay
    Basic,
    /// View overlay
    Advanced,
    /// Validation flow overlay
    ValidationFlow,
    /// Adaptive recognition overlay
    AdaptiveRecognition,
}

/// An overlay attached to a data capture view.
#[derive(Clone)]
pub enum Overlay {
    /// Brush overlay
    Basic(Arc<dyn BasicOverlay>),
    /// View overlay
    Advanced(Arc<dyn AdvancedOverlay>),
    /// Validation flow overlay
    ValidationFlow(Arc<dyn ValidationFlowOverlay>),
    /// Adaptive recognition overlay
    AdaptiveRecognition(Arc<dyn AdaptiveRecognitionOverlay>),
}

impl Overlay {
    /// Kind tag.
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Basic(_) => OverlayKind::Basic,
            Overlay::Advanced(_) => OverlayKind::Advanced,
            Overlay::ValidationFlow(_) => OverlayKind::ValidationFlow,
            Overlay::AdaptiveRecognition(_) => OverlayKind::AdaptiveRecognition,
        }
    }

    /// Identity comparison: both refer to the same native overlay.
    pub fn same(&self, other: &Overlay) -> bool {
        match (self, other) {
            (Overlay::Basic(a), Overlay::Basic(b)) => Arc::ptr_eq(a, b),
            (Overlay::Advanced(a), Overlay::Advanced(b)) => Arc::ptr_eq(a, b),
            (Overlay::ValidationFlow(a), Overlay::ValidationFlow(b)) => Arc::ptr_eq(a, b),
            (Overlay::AdaptiveRecognition(a), Overlay::AdaptiveRecognition(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The basic overlay, if this is one.
    pub fn as_basic(&self) -> Option<&Arc<dyn BasicOverlay>> {
        match self {
            Overlay::Basic(o) => Some(o),
            _ => None,
        }
    }

    /// The advanced overlay, if this is one.
    pub fn as_advanced(&self) -> Option<&Arc<dyn AdvancedOverlay>> {
        match self {
            Overlay::Advanced(o) => Some(o),
            _ => None,
        }
    }

    /// The validation flow overlay, if this is one.
    pub fn as_validation_flow(&self) -> Option<&Arc<dyn ValidationFlowOverlay>> {
        match self {
            Overlay::ValidationFlow(o) => Some(o),
            _ => None,
        }
    }

    /// The adaptive recognition overlay, if this is one.
    pub fn as_adaptive_recognition(&self) -> Option<&Arc<dyn AdaptiveRecognitionOverlay>> {
        match self {
            Overlay::AdaptiveRecognition(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Overlay").field(&self.kind()).finish()
    }
}
