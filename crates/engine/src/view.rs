//! Data capture views and the host views placed by the advanced overlay.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use labelbridge_core::ViewId;
use parking_lot::Mutex;
use tracing::debug;

use crate::native::{
    AdaptiveRecognitionOverlay, AdvancedOverlay, BasicOverlay, Overlay, OverlayKind, ValidationFlowOverlay,
};

// =============================================================================
// Data capture views
// =============================================================================

/// A host data capture view hosting overlays.
pub trait DataCaptureView: Send + Sync {
    /// Id the host addresses the view with
    fn view_id(&self) -> ViewId;

    /// Id of the view owning this one, if any; modes created for it claim
    /// the same parent id
    fn parent_id(&self) -> Option<ViewId>;

    /// Attach an overlay
    fn add_overlay(&self, overlay: Overlay);

    /// Detach an overlay, compared by identity
    fn remove_overlay(&self, overlay: &Overlay);

    /// Attached overlays, in attachment order
    fn overlays(&self) -> Vec<Overlay>;

    /// First attached overlay of `kind`
    fn find_first(&self, kind: OverlayKind) -> Option<Overlay> {
        self.overlays().into_iter().find(|o| o.kind() == kind)
    }

    /// First basic overlay
    fn basic_overlay(&self) -> Option<Arc<dyn BasicOverlay>> {
        self.find_first(OverlayKind::Basic)?.as_basic().cloned()
    }

    /// First advanced overlay
    fn advanced_overlay(&self) -> Option<Arc<dyn AdvancedOverlay>> {
        self.find_first(OverlayKind::Advanced)?.as_advanced().cloned()
    }

    /// First validation flow overlay
    fn validation_flow_overlay(&self) -> Option<Arc<dyn ValidationFlowOverlay>> {
        self.find_first(OverlayKind::ValidationFlow)?
            .as_validation_flow()
            .cloned()
    }

    /// First adaptive recognition overlay
    fn adaptive_recognition_overlay(&self) -> Option<Arc<dyn AdaptiveRecognitionOverlay>> {
        self.find_first(OverlayKind::AdaptiveRecognition)?
            .as_adaptive_recognition()
            .cloned()
    }
}

/// Views known to the bridge, by id.
#[derive(Default)]
pub struct ViewRegistry {
    views: DashMap<ViewId, Arc<dyn DataCaptureView>>,
}

impl ViewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view under its own id, replacing any previous one.
    pub fn register(&self, view: Arc<dyn DataCaptureView>) {
        let view_id = view.view_id();
        debug!(view_id, "registered data capture view");
        self.views.insert(view_id, view);
    }

    /// Forget a view.
    pub fn unregister(&self, view_id: ViewId) -> Option<Arc<dyn DataCaptureView>> {
        self.views.remove(&view_id).map(|(_, view)| view)
    }

    /// View registered under `view_id`.
    pub fn get(&self, view_id: ViewId) -> Option<Arc<dyn DataCaptureView>> {
        self.views.get(&view_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of registered views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether no view is registered.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry").field("views", &self.views.len()).finish()
    }
}

// =============================================================================
// Label views
// =============================================================================

/// Callback run when the user taps a label view.
pub type TapHandler = Arc<dyn Fn() + Send + Sync>;

/// What the host sent to describe a label view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewContent {
    /// Declarative view JSON
    Json(String),
    /// Encoded widget bytes
    Bytes(Vec<u8>),
}

/// A host-provided view placed next to a label or field.
///
/// `identifier` is the tracking id for label views and the field key for
/// field views.
pub struct LabelView {
    identifier: String,
    content: ViewContent,
    on_tap: Mutex<Option<TapHandler>>,
}

impl LabelView {
    /// Wrap host content.
    pub fn new(identifier: impl Into<String>, content: ViewContent) -> Self {
        LabelView {
            identifier: identifier.into(),
            content,
            on_tap: Mutex::new(None),
        }
    }

    /// Label or field identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Host content.
    pub fn content(&self) -> &ViewContent {
        &self.content
    }

    /// Install the tap callback, replacing any previous one.
    pub fn set_tap_handler(&self, handler: TapHandler) {
        *self.on_tap.lock() = Some(handler);
    }

    /// Whether the view reacts to taps.
    pub fn is_interactive(&self) -> bool {
        self.on_tap.lock().is_some()
    }

    /// Called by the SDK when the user taps the view.
    pub fn tap(&self) {
        // Clone out so the handler runs without the lock held
        let handler = self.on_tap.lock().clone();
        if let Some(handler) = handler {
            handler();
        }
    }
}

impl fmt::Debug for LabelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelView")
            .field("identifier", &self.identifier)
            .field("content", &self.content)
            .field("interactive", &self.is_interactive())
            .finish()
    }
}
