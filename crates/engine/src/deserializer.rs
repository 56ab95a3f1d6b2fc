//! Construction of native objects from host JSON.

use std::sync::Arc;

use labelbridge_core::Result;

use crate::native::{AdaptiveRecognitionOverlay, AdvancedOverlay, BasicOverlay, NativeMode, ValidationFlowOverlay};

/// Builds native modes and overlays.
///
/// Failures are reported as [`labelbridge_core::Error::Deserialization`] or
/// [`labelbridge_core::Error::Native`].
pub trait LabelCaptureDeserializer: Send + Sync {
    /// Build a mode from its JSON and register it with the capture context.
    fn mode(&self, mode_json: &str) -> Result<Arc<dyn NativeMode>>;

    /// Remove a mode from the capture context.
    fn dispose_mode(&self, mode: &Arc<dyn NativeMode>);

    /// Build a basic overlay bound to `mode`.
    fn basic_overlay(&self, overlay_json: &str, mode: &Arc<dyn NativeMode>) -> Result<Arc<dyn BasicOverlay>>;

    /// Build an advanced overlay bound to `mode`.
    fn advanced_overlay(&self, overlay_json: &str, mode: &Arc<dyn NativeMode>) -> Result<Arc<dyn AdvancedOverlay>>;

    /// Build a validation flow overlay bound to `mode`.
    fn validation_flow_overlay(
        &self,
        overlay_json: &str,
        mode: &Arc<dyn NativeMode>,
    ) -> Result<Arc<dyn ValidationFlowOverlay>>;

    /// Build an adaptive recognition overlay bound to `mode`.
    fn adaptive_recognition_overlay(
        &self,
        overlay_json: &str,
        mode: &Arc<dyn NativeMode>,
    ) -> Result<Arc<dyn AdaptiveRecognitionOverlay>>;
}
