//! Event subscription bookkeeping.
//!
//! Listener commands declare which events the host should expect afterwards,
//! scoped to the mode or view they address. The bookkeeping happens when the
//! command executes, before the native registration, so it stays consistent
//! even when that registration is deferred on the pending action queue.

use std::collections::BTreeSet;

use dashmap::DashMap;
use labelbridge_core::{ModeId, ViewId};
use tracing::debug;

use crate::events::LabelCaptureEvent;

/// What a set of event registrations is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventScope {
    /// Events of one mode
    Mode(ModeId),
    /// Events of the overlays of one data capture view
    View(ViewId),
}

/// Registered event names per scope.
#[derive(Debug, Default)]
pub struct CallbackRegistry {
    scopes: DashMap<EventScope, BTreeSet<&'static str>>,
}

impl CallbackRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `events` for `scope`.
    pub fn register(&self, scope: EventScope, events: &[LabelCaptureEvent]) {
        let mut names = self.scopes.entry(scope).or_default();
        names.extend(events.iter().map(LabelCaptureEvent::name));
        debug!(?scope, count = names.len(), "registered callback events");
    }

    /// Withdraw `events` from `scope`.
    pub fn unregister(&self, scope: EventScope, events: &[LabelCaptureEvent]) {
        if let Some(mut names) = self.scopes.get_mut(&scope) {
            for event in events {
                names.remove(event.name());
            }
        }
        // Guard released above; removing under it would deadlock the shard
        self.scopes.remove_if(&scope, |_, names| names.is_empty());
        debug!(?scope, "unregistered callback events");
    }

    /// Whether `event` is registered for `scope`.
    pub fn is_registered(&self, scope: EventScope, event: LabelCaptureEvent) -> bool {
        self.scopes
            .get(&scope)
            .map_or(false, |names| names.contains(event.name()))
    }

    /// Event names registered for `scope`, sorted.
    pub fn events(&self, scope: EventScope) -> Vec<&'static str> {
        self.scopes
            .get(&scope)
            .map(|names| names.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drop every registration of `scope`.
    pub fn clear_scope(&self, scope: EventScope) {
        self.scopes.remove(&scope);
    }
}
