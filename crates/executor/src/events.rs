//! Names of the events emitted to the host.
//!
//! | Source | Prefix | Events |
//! |--------|--------|--------|
//! | Session listener | `LabelCaptureListener` | 1 |
//! | Basic overlay | `LabelCaptureBasicOverlayListener` | 3 |
//! | Advanced overlay | `LabelCaptureAdvancedOverlayListener` | 7 |
//! | Validation flow | `LabelCaptureValidationFlowListener` | 2 |
//! | Adaptive recognition | `LabelCaptureAdaptiveRecognitionListener` | 2 |

use std::fmt;

/// An event the bridge emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelCaptureEvent {
    // ==================== Session ====================
    /// A frame was processed; the host must acknowledge
    DidUpdateSession,

    // ==================== Basic overlay ====================
    /// Brush query for a field
    BrushForFieldOfLabel,
    /// Brush query for a label
    BrushForLabel,
    /// The user tapped a label
    DidTapLabel,

    // ==================== Advanced overlay ====================
    /// View query for a label
    ViewForLabel,
    /// View query for a field
    ViewForFieldOfLabel,
    /// Anchor query for a label
    AnchorForLabel,
    /// Anchor query for a field
    AnchorForFieldOfLabel,
    /// Offset query for a label
    OffsetForLabel,
    /// Offset query for a field
    OffsetForFieldOfLabel,
    /// The user tapped a host-provided view
    DidTapOnViewForFieldOfLabel,

    // ==================== Validation flow ====================
    /// The validation flow finished
    DidCaptureLabelWithFields,
    /// The user corrected a field
    DidSubmitManualInputForField,

    // ==================== Adaptive recognition ====================
    /// Recognition succeeded
    Recognized,
    /// Recognition failed
    RecognitionFailed,
}

impl LabelCaptureEvent {
    /// Events registered by `addLabelCaptureListener`.
    pub const SESSION: &'static [LabelCaptureEvent] = &[LabelCaptureEvent::DidUpdateSession];

    /// Events registered by `addLabelCaptureBasicOverlayListener`.
    pub const BASIC_OVERLAY: &'static [LabelCaptureEvent] = &[
        LabelCaptureEvent::DidTapLabel,
        LabelCaptureEvent::BrushForLabel,
        LabelCaptureEvent::BrushForFieldOfLabel,
    ];

    /// Events registered by `addLabelCaptureAdvancedOverlayListener`.
    pub const ADVANCED_OVERLAY: &'static [LabelCaptureEvent] = &[
        LabelCaptureEvent::ViewForLabel,
        LabelCaptureEvent::AnchorForLabel,
        LabelCaptureEvent::OffsetForLabel,
        LabelCaptureEvent::ViewForFieldOfLabel,
        LabelCaptureEvent::AnchorForFieldOfLabel,
        LabelCaptureEvent::OffsetForFieldOfLabel,
    ];

    /// Events registered by `registerListenerForValidationFlowEvents`.
    pub const VALIDATION_FLOW: &'static [LabelCaptureEvent] = &[
        LabelCaptureEvent::DidCaptureLabelWithFields,
        LabelCaptureEvent::DidSubmitManualInputForField,
    ];

    /// Events registered by `registerListenerForAdaptiveRecognitionOverlayEvents`.
    pub const ADAPTIVE_RECOGNITION: &'static [LabelCaptureEvent] =
        &[LabelCaptureEvent::Recognized, LabelCaptureEvent::RecognitionFailed];

    /// Wire name.
    pub fn name(&self) -> &'static str {
        match self {
            LabelCaptureEvent::DidUpdateSession => "LabelCaptureListener.didUpdateSession",
            LabelCaptureEvent::BrushForFieldOfLabel => "LabelCaptureBasicOverlayListener.brushForFieldOfLabel",
            LabelCaptureEvent::BrushForLabel => "LabelCaptureBasicOverlayListener.brushForLabel",
            LabelCaptureEvent::DidTapLabel => "LabelCaptureBasicOverlayListener.didTapLabel",
            LabelCaptureEvent::ViewForLabel => "LabelCaptureAdvancedOverlayListener.viewForLabel",
            LabelCaptureEvent::ViewForFieldOfLabel => "LabelCaptureAdvancedOverlayListener.viewForFieldOfLabel",
            LabelCaptureEvent::AnchorForLabel => "LabelCaptureAdvancedOverlayListener.anchorForLabel",
            LabelCaptureEvent::AnchorForFieldOfLabel => "LabelCaptureAdvancedOverlayListener.anchorForFieldOfLabel",
            LabelCaptureEvent::OffsetForLabel => "LabelCaptureAdvancedOverlayListener.offsetForLabel",
            LabelCaptureEvent::OffsetForFieldOfLabel => "LabelCaptureAdvancedOverlayListener.offsetForFieldOfLabel",
            LabelCaptureEvent::DidTapOnViewForFieldOfLabel => {
                "LabelCaptureAdvancedOverlayListener.didTapOnViewForFieldOfLabel"
            }
            LabelCaptureEvent::DidCaptureLabelWithFields => {
                "LabelCaptureValidationFlowListener.didCaptureLabelWithFields"
            }
            LabelCaptureEvent::DidSubmitManualInputForField => {
                "LabelCaptureValidationFlowListener.didSubmitManualInputForField"
            }
            LabelCaptureEvent::Recognized => "LabelCaptureAdaptiveRecognitionListener.recognized",
            LabelCaptureEvent::RecognitionFailed => "LabelCaptureAdaptiveRecognitionListener.failure",
        }
    }
}

impl fmt::Display for LabelCaptureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
