//! Host views currently placed by advanced overlays.
//!
//! Keyed by identifier: the tracking id for label views, the field key for
//! field views. The cache exists between `on_start` and `on_stop` of the
//! module. Each published session prunes the views of labels and fields it no
//! longer contains.

use std::sync::Arc;

use dashmap::DashMap;
use labelbridge_core::{SessionSnapshot, TrackingId};
use labelbridge_engine::{LabelView, ViewContent};
use tracing::{debug, trace};

/// Current view per label or field identifier.
#[derive(Debug, Default)]
pub struct AdvancedOverlayViewCache {
    views: DashMap<String, Arc<LabelView>>,
}

impl AdvancedOverlayViewCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `view` for `identifier`, replacing the previous one.
    pub fn insert(&self, identifier: &str, view: Arc<LabelView>) {
        trace!(identifier, "cached label view");
        self.views.insert(identifier.to_string(), view);
    }

    /// Forget the view of `identifier`.
    pub fn remove(&self, identifier: &str) -> Option<Arc<LabelView>> {
        self.views.remove(identifier).map(|(_, view)| view)
    }

    /// View cached for `identifier`.
    pub fn get(&self, identifier: &str) -> Option<Arc<LabelView>> {
        self.views.get(identifier).map(|entry| Arc::clone(entry.value()))
    }

    /// Reuse the cached view of `identifier` when it was built from the same
    /// bytes, otherwise build a new one.
    ///
    /// The returned view is not cached; callers insert it once its tap
    /// handler is installed.
    pub fn get_or_create_from_bytes(&self, identifier: &str, bytes: Vec<u8>) -> Arc<LabelView> {
        if let Some(existing) = self.get(identifier) {
            if matches!(existing.content(), ViewContent::Bytes(cached) if *cached == bytes) {
                return existing;
            }
        }
        Arc::new(LabelView::new(identifier, ViewContent::Bytes(bytes)))
    }

    /// Number of cached views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Forget every view.
    pub fn clear(&self) {
        self.views.clear();
    }

    /// Drop views whose label or field is not in `snapshot`. Returns how many
    /// were dropped.
    pub fn retain_tracked(&self, snapshot: &SessionSnapshot) -> usize {
        let before = self.views.len();
        self.views.retain(|identifier, _| match identifier.parse::<TrackingId>() {
            Ok(tracking_id) => snapshot.label(tracking_id).is_some(),
            Err(_) => snapshot.field(identifier).is_some(),
        });
        let pruned = before.saturating_sub(self.views.len());
        if pruned > 0 {
            debug!(pruned, frame = snapshot.frame_sequence_id(), "pruned views of lost labels");
        }
        pruned
    }
}
