//! Mode registry and pending action queue
//!
//! Host commands can arrive before the Vision Engine has finished building the
//! mode they address. Such commands are parked as deferred actions, keyed by
//! the mode id (or by the parent view id for view-owned overlays), and replayed
//! once the mode is registered.
//!
//! ## Invariants
//!
//! - [`ModeRegistry::add_and_drain`] registers a mode, then drains pending
//!   actions keyed by its mode id, then those keyed by its parent id.
//! - Each queued action runs at most once, in arrival order.
//! - A drain detaches the list before running it. An action that re-enqueues
//!   under the same key lands in a fresh list and is not replayed in the same
//!   pass.
//! - Removing a mode, or clearing the registry, discards its queued actions
//!   without running them.
//! - A failing or panicking action is logged and does not stop the remaining
//!   actions of the drain.
//! - At most one mode claims a parent id at a time; a newer claim wins.
//! - [`ModeRegistry::defer_until_registered`] checks and queues under one
//!   lock, so an action racing [`ModeRegistry::add_and_drain`] is either
//!   handed back to run now or replayed by that drain, never stranded.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use labelbridge_core::{ModeId, ViewId};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

/// Error type returned by a deferred action.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// Zero-argument deferred operation.
pub type PendingAction = Box<dyn FnOnce() -> Result<(), ActionError> + Send>;

/// Identity a registry entry exposes.
pub trait Registered: Send + Sync {
    /// Mode id the entry is registered under
    fn mode_id(&self) -> ModeId;
    /// Parent view id owning the mode, if any
    fn parent_id(&self) -> Option<ViewId>;
}

/// Key of a pending action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingKey {
    /// Keyed by mode id
    Mode(ModeId),
    /// Keyed by parent view id
    Parent(ViewId),
}

impl fmt::Display for PendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingKey::Mode(id) => write!(f, "mode:{}", id),
            PendingKey::Parent(id) => write!(f, "parent:{}", id),
        }
    }
}

struct Inner<M> {
    modes: HashMap<ModeId, Arc<M>>,
    parents: HashMap<ViewId, ModeId>,
    pending: HashMap<PendingKey, Vec<PendingAction>>,
}

impl<M> Default for Inner<M> {
    fn default() -> Self {
        Inner {
            modes: HashMap::new(),
            parents: HashMap::new(),
            pending: HashMap::new(),
        }
    }
}

/// Registry of live modes plus the per-key pending action queue.
pub struct ModeRegistry<M> {
    inner: Mutex<Inner<M>>,
}

impl<M: Registered> Default for ModeRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Registered> ModeRegistry<M> {
    /// Create an empty registry.
    pub fn new() -> Self {
        ModeRegistry {
            inner: Mutex::new(Inner::default()),
        }
    }

    // ========================================================================
    // Modes
    // ========================================================================

    /// Register a mode, returning the one it replaced.
    ///
    /// Prefer [`add_and_drain`](Self::add_and_drain); this does not replay
    /// pending actions.
    pub fn add(&self, mode: Arc<M>) -> Option<Arc<M>> {
        let mode_id = mode.mode_id();
        let mut inner = self.inner.lock();
        let replaced = inner.modes.insert(mode_id, Arc::clone(&mode));
        if let Some(old_parent) = replaced.as_ref().and_then(|old| old.parent_id()) {
            if inner.parents.get(&old_parent) == Some(&mode_id) {
                inner.parents.remove(&old_parent);
            }
        }
        if let Some(parent_id) = mode.parent_id() {
            if let Some(previous) = inner.parents.insert(parent_id, mode_id) {
                if previous != mode_id {
                    warn!(parent_id, previous, mode_id, "parent id reassigned to a new mode");
                }
            }
        }
        replaced
    }

    /// Register a mode and replay what was waiting for it.
    ///
    /// Drains pending actions by mode id first, then by parent id. Returns the
    /// number of actions run.
    pub fn add_and_drain(&self, mode: Arc<M>) -> usize {
        let mode_id = mode.mode_id();
        let parent_id = mode.parent_id();
        self.add(mode);
        let mut ran = self.drain(mode_id);
        if let Some(parent_id) = parent_id {
            ran += self.drain_by_parent(parent_id);
        }
        ran
    }

    /// Unregister a mode and discard its pending actions.
    pub fn remove(&self, mode_id: ModeId) -> Option<Arc<M>> {
        let (removed, discarded) = {
            let mut inner = self.inner.lock();
            let discarded = inner.pending.remove(&PendingKey::Mode(mode_id));
            let removed = inner.modes.remove(&mode_id);
            if let Some(parent_id) = removed.as_ref().and_then(|m| m.parent_id()) {
                if inner.parents.get(&parent_id) == Some(&mode_id) {
                    inner.parents.remove(&parent_id);
                }
            }
            (removed, discarded)
        };
        discard(PendingKey::Mode(mode_id), discarded);
        removed
    }

    /// Mode registered under `mode_id`.
    pub fn get(&self, mode_id: ModeId) -> Option<Arc<M>> {
        self.inner.lock().modes.get(&mode_id).cloned()
    }

    /// Mode currently claiming `parent_id`.
    pub fn get_by_parent(&self, parent_id: ViewId) -> Option<Arc<M>> {
        let inner = self.inner.lock();
        let mode_id = inner.parents.get(&parent_id)?;
        inner.modes.get(mode_id).cloned()
    }

    /// Unregister every mode, returning them. Pending actions are kept.
    pub fn remove_all(&self) -> Vec<Arc<M>> {
        let mut inner = self.inner.lock();
        inner.parents.clear();
        inner.modes.drain().map(|(_, mode)| mode).collect()
    }

    /// All registered modes.
    pub fn modes(&self) -> Vec<Arc<M>> {
        self.inner.lock().modes.values().cloned().collect()
    }

    /// Number of registered modes.
    pub fn len(&self) -> usize {
        self.inner.lock().modes.len()
    }

    /// Whether no mode is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().modes.is_empty()
    }

    // ========================================================================
    // Pending actions
    // ========================================================================

    /// Queue an action until `mode_id` is registered.
    pub fn enqueue(&self, mode_id: ModeId, action: PendingAction) {
        self.enqueue_key(PendingKey::Mode(mode_id), action);
    }

    /// Queue an action until a mode claiming `parent_id` is registered.
    pub fn enqueue_by_parent(&self, parent_id: ViewId, action: PendingAction) {
        self.enqueue_key(PendingKey::Parent(parent_id), action);
    }

    /// Queue `action` under `key` unless a mode already satisfies the key.
    ///
    /// Returns the action back when the mode is registered; the caller runs it
    /// right away. Otherwise the action is queued and replayed by the drain of
    /// the registration that satisfies `key`.
    pub fn defer_until_registered(&self, key: PendingKey, action: PendingAction) -> Option<PendingAction> {
        let mut inner = self.inner.lock();
        let registered = match key {
            PendingKey::Mode(mode_id) => inner.modes.contains_key(&mode_id),
            PendingKey::Parent(parent_id) => inner.parents.contains_key(&parent_id),
        };
        if registered {
            return Some(action);
        }
        let queue = inner.pending.entry(key).or_default();
        queue.push(action);
        debug!(%key, depth = queue.len(), "mode not registered, queued pending action");
        None
    }

    /// Run and clear the actions queued for `mode_id`.
    pub fn drain(&self, mode_id: ModeId) -> usize {
        self.drain_key(PendingKey::Mode(mode_id))
    }

    /// Run and clear the actions queued for `parent_id`.
    pub fn drain_by_parent(&self, parent_id: ViewId) -> usize {
        self.drain_key(PendingKey::Parent(parent_id))
    }

    /// Discard the actions queued for `mode_id`.
    pub fn clear(&self, mode_id: ModeId) {
        let discarded = self.inner.lock().pending.remove(&PendingKey::Mode(mode_id));
        discard(PendingKey::Mode(mode_id), discarded);
    }

    /// Discard every queued action.
    pub fn clear_all(&self) {
        let all = std::mem::take(&mut self.inner.lock().pending);
        for (key, actions) in all {
            discard(key, Some(actions));
        }
    }

    /// Number of actions queued under `key`.
    pub fn pending_count(&self, key: PendingKey) -> usize {
        self.inner.lock().pending.get(&key).map_or(0, Vec::len)
    }

    fn enqueue_key(&self, key: PendingKey, action: PendingAction) {
        let mut inner = self.inner.lock();
        let queue = inner.pending.entry(key).or_default();
        queue.push(action);
        debug!(%key, depth = queue.len(), "queued pending action");
    }

    fn drain_key(&self, key: PendingKey) -> usize {
        // Detach under the lock, run outside it: actions may call back into
        // the registry.
        let actions = match self.inner.lock().pending.remove(&key) {
            Some(actions) => actions,
            None => return 0,
        };

        let count = actions.len();
        debug!(%key, count, "draining pending actions");
        for (index, action) in actions.into_iter().enumerate() {
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(action)) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(%key, index, error = %e, "pending action failed");
                }
                Err(panic) => {
                    error!(
                        %key,
                        index,
                        "pending action panicked: {}",
                        panic
                            .downcast_ref::<&str>()
                            .copied()
                            .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
                            .unwrap_or("(non-string panic)")
                    );
                }
            }
        }
        count
    }
}

/// Drop discarded actions outside the registry lock; their captures may
/// complete host calls on drop.
fn discard(key: PendingKey, actions: Option<Vec<PendingAction>>) {
    if let Some(actions) = actions {
        if !actions.is_empty() {
            debug!(%key, count = actions.len(), "discarding pending actions");
        }
        drop(actions);
    }
}
