//! Command enum defining every label capture operation the host can invoke.
//!
//! Commands are the typed form of a [`MethodCall`](crate::MethodCall). The
//! [`CommandRegistry`](crate::CommandRegistry) turns a method name and its
//! argument bag into a `Command`, checking required arguments on the way, so
//! that a `Command` always carries everything its handler needs.
//!
//! Commands are:
//! - **Self-contained**: all parameters needed for execution are in the variant
//! - **Serializable**: can be converted to/from JSON for logging and replay
//! - **Pure data**: no closures, no native handles

use labelbridge_core::{ModeId, TrackingId, ViewId};
use serde::{Deserialize, Serialize};

/// A typed host command.
///
/// # Command Categories
///
/// | Category | Count | Addressed by |
/// |----------|-------|--------------|
/// | Mode | 7 | `modeId` |
/// | Advanced overlay | 12 | `dataCaptureViewId` |
/// | Basic overlay | 5 | `dataCaptureViewId` |
/// | Validation flow | 3 | `dataCaptureViewId` |
/// | Adaptive recognition | 3 | `dataCaptureViewId` |
///
/// Field-scoped commands address the field through its field key
/// (`<trackingId>§<fieldName>`), except the basic overlay field brush which
/// takes the tracking id and field name separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Mode (7) ====================
    /// Acknowledge the session update the mode is blocked on.
    FinishDidUpdateSession { mode_id: ModeId, is_enabled: bool },

    /// Start forwarding session updates of a mode.
    /// Returns: `Output::Retained`
    AddListener { mode_id: ModeId },

    /// Stop forwarding session updates of a mode.
    RemoveListener { mode_id: ModeId },

    /// Enable or disable frame processing.
    SetModeEnabledState { mode_id: ModeId, enabled: bool },

    /// Update mode properties from a mode JSON carrying its own `modeId`.
    UpdateMode { mode_id: ModeId, mode_json: String },

    /// Apply a settings JSON to a mode.
    UpdateSettings { mode_id: ModeId, settings_json: String },

    /// Replace a mode's feedback configuration.
    UpdateFeedback { mode_id: ModeId, feedback_json: String },

    // ==================== Advanced overlay (12) ====================
    /// Place (or remove, when `view_json` is absent) a view next to a label.
    SetViewForLabel {
        view_id: ViewId,
        tracking_id: TrackingId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        view_json: Option<String>,
    },

    /// Place (or remove) a view built from encoded bytes next to a label.
    SetViewForLabelFromBytes {
        view_id: ViewId,
        tracking_id: TrackingId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        view_bytes: Option<Vec<u8>>,
    },

    /// Place (or remove) a view next to a field.
    SetViewForField {
        view_id: ViewId,
        identifier: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        view_json: Option<String>,
    },

    /// Place (or remove) a view built from encoded bytes next to a field.
    SetViewForFieldFromBytes {
        view_id: ViewId,
        identifier: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        view_bytes: Option<Vec<u8>>,
    },

    /// Anchor of a label's view.
    SetAnchorForLabel {
        view_id: ViewId,
        tracking_id: TrackingId,
        anchor_json: String,
    },

    /// Anchor of a field's view.
    SetAnchorForField {
        view_id: ViewId,
        identifier: String,
        anchor_json: String,
    },

    /// Offset of a label's view.
    SetOffsetForLabel {
        view_id: ViewId,
        tracking_id: TrackingId,
        offset_json: String,
    },

    /// Offset of a field's view.
    SetOffsetForField {
        view_id: ViewId,
        identifier: String,
        offset_json: String,
    },

    /// Remove every view placed by the advanced overlay.
    ClearLabelViews { view_id: ViewId },

    /// Attach the advanced overlay delegate.
    /// Returns: `Output::Retained`
    AddAdvancedOverlayListener { view_id: ViewId },

    /// Detach the advanced overlay delegate.
    RemoveAdvancedOverlayListener { view_id: ViewId },

    /// Replace the advanced overlay from JSON.
    UpdateAdvancedOverlay { view_id: ViewId, overlay_json: String },

    // ==================== Basic overlay (5) ====================
    /// Attach the basic overlay delegate.
    /// Returns: `Output::Retained`
    AddBasicOverlayListener { view_id: ViewId },

    /// Detach the basic overlay delegate.
    RemoveBasicOverlayListener { view_id: ViewId },

    /// Replace the basic overlay from JSON.
    UpdateBasicOverlay { view_id: ViewId, overlay_json: String },

    /// Brush of one label; absent brush leaves the overlay untouched.
    SetBrushForLabel {
        view_id: ViewId,
        tracking_id: TrackingId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        brush_json: Option<String>,
    },

    /// Brush of one field of a label; absent brush leaves the overlay untouched.
    SetBrushForFieldOfLabel {
        view_id: ViewId,
        tracking_id: TrackingId,
        field_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        brush_json: Option<String>,
    },

    // ==================== Validation flow (3) ====================
    /// Attach the validation flow delegate.
    /// Returns: `Output::Retained`
    RegisterValidationFlowListener { view_id: ViewId },

    /// Detach the validation flow delegate.
    UnregisterValidationFlowListener { view_id: ViewId },

    /// Replace the validation flow overlay from JSON.
    UpdateValidationFlowOverlay { view_id: ViewId, overlay_json: String },

    // ==================== Adaptive recognition (3) ====================
    /// Attach the adaptive recognition delegate.
    /// Returns: `Output::Retained`
    RegisterAdaptiveRecognitionListener { view_id: ViewId },

    /// Detach the adaptive recognition delegate.
    UnregisterAdaptiveRecognitionListener { view_id: ViewId },

    /// Replace the adaptive recognition overlay with new settings.
    ApplyAdaptiveRecognitionSettings { view_id: ViewId, overlay_json: String },
}

impl Command {
    /// Host method name this command is registered under.
    pub fn method(&self) -> &'static str {
        match self {
            Command::FinishDidUpdateSession { .. } => "finishLabelCaptureListenerDidUpdateSession",
            Command::AddListener { .. } => "addLabelCaptureListener",
            Command::RemoveListener { .. } => "removeLabelCaptureListener",
            Command::SetModeEnabledState { .. } => "setLabelCaptureModeEnabledState",
            Command::UpdateMode { .. } => "updateLabelCaptureMode",
            Command::UpdateSettings { .. } => "updateLabelCaptureSettings",
            Command::UpdateFeedback { .. } => "updateLabelCaptureFeedback",
            Command::SetViewForLabel { .. } => "setViewForCapturedLabel",
            Command::SetViewForLabelFromBytes { .. } => "setViewForCapturedLabelFromBytes",
            Command::SetViewForField { .. } => "setViewForCapturedLabelField",
            Command::SetViewForFieldFromBytes { .. } => "setViewForCapturedLabelFieldFromBytes",
            Command::SetAnchorForLabel { .. } => "setAnchorForCapturedLabel",
            Command::SetAnchorForField { .. } => "setAnchorForCapturedLabelField",
            Command::SetOffsetForLabel { .. } => "setOffsetForCapturedLabel",
            Command::SetOffsetForField { .. } => "setOffsetForCapturedLabelField",
            Command::ClearLabelViews { .. } => "clearCapturedLabelViews",
            Command::AddAdvancedOverlayListener { .. } => "addLabelCaptureAdvancedOverlayListener",
            Command::RemoveAdvancedOverlayListener { .. } => "removeLabelCaptureAdvancedOverlayListener",
            Command::UpdateAdvancedOverlay { .. } => "updateLabelCaptureAdvancedOverlay",
            Command::AddBasicOverlayListener { .. } => "addLabelCaptureBasicOverlayListener",
            Command::RemoveBasicOverlayListener { .. } => "removeLabelCaptureBasicOverlayListener",
            Command::UpdateBasicOverlay { .. } => "updateLabelCaptureBasicOverlay",
            Command::SetBrushForLabel { .. } => "setLabelCaptureBasicOverlayBrushForLabel",
            Command::SetBrushForFieldOfLabel { .. } => "setLabelCaptureBasicOverlayBrushForFieldOfLabel",
            Command::RegisterValidationFlowListener { .. } => "registerListenerForValidationFlowEvents",
            Command::UnregisterValidationFlowListener { .. } => "unregisterListenerForValidationFlowEvents",
            Command::UpdateValidationFlowOverlay { .. } => "updateLabelCaptureValidationFlowOverlay",
            Command::RegisterAdaptiveRecognitionListener { .. } => {
                "registerListenerForAdaptiveRecognitionOverlayEvents"
            }
            Command::UnregisterAdaptiveRecognitionListener { .. } => {
                "unregisterListenerForAdaptiveRecognitionOverlayEvents"
            }
            Command::ApplyAdaptiveRecognitionSettings { .. } => "applyLabelCaptureAdaptiveRecognitionSettings",
        }
    }
}
