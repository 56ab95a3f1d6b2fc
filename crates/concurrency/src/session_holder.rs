//! Single-slot holder for the latest session snapshot
//!
//! The Vision Engine thread publishes one snapshot per processed frame; command
//! handlers and event bridges read it from the host dispatch thread.
//!
//! ## Contract
//!
//! - `set` replaces the current snapshot unconditionally (last writer wins).
//! - `get` returns the current snapshot or `None` if nothing was ever set or
//!   the holder was reset.
//! - Readers receive an `Arc` to a fully built snapshot. The swap happens
//!   under a lock holding only the pointer, so a torn snapshot is impossible.
//!
//! A reader that fails to find a label or field in the returned snapshot must
//! treat it as "the session has since changed", not as an error.

use std::sync::Arc;

use labelbridge_core::{CapturedLabel, LabelField, SessionSnapshot, TrackingId};
use parking_lot::RwLock;

/// Thread-safe cell with the most recent [`SessionSnapshot`].
#[derive(Debug, Default)]
pub struct SessionHolder {
    current: RwLock<Option<Arc<SessionSnapshot>>>,
}

impl SessionHolder {
    /// Create an empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new snapshot, replacing the previous one.
    pub fn set(&self, snapshot: impl Into<Arc<SessionSnapshot>>) {
        let snapshot = snapshot.into();
        *self.current.write() = Some(snapshot);
    }

    /// Current snapshot, if any.
    pub fn get(&self) -> Option<Arc<SessionSnapshot>> {
        self.current.read().clone()
    }

    /// Drop the current snapshot.
    pub fn reset(&self) {
        *self.current.write() = None;
    }

    /// Whether a snapshot is currently held.
    pub fn is_set(&self) -> bool {
        self.current.read().is_some()
    }

    /// Label with `tracking_id` in the current snapshot.
    pub fn label(&self, tracking_id: TrackingId) -> Option<Arc<CapturedLabel>> {
        self.get()?.label(tracking_id).cloned()
    }

    /// Field addressed by `key` in the current snapshot, with its label.
    pub fn label_and_field(&self, key: &str) -> Option<(Arc<CapturedLabel>, LabelField)> {
        let snapshot = self.get()?;
        let (label, field) = snapshot.label_and_field(key)?;
        Some((Arc::clone(label), field.clone()))
    }

    /// Label owning the field addressed by `key` in the current snapshot.
    pub fn label_by_field_key(&self, key: &str) -> Option<Arc<CapturedLabel>> {
        self.get()?.label_by_field_key(key).cloned()
    }
}
