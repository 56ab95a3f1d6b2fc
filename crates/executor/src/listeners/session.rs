//! Session-update bridge with the blocking host acknowledgement.
//!
//! Per processed frame the SDK calls
//! [`did_update_session`](LabelCaptureListener::did_update_session) on its own
//! thread. The bridge publishes the snapshot, then (when enabled and the host
//! listens) emits `LabelCaptureListener.didUpdateSession` and blocks until the
//! host answers with `finishLabelCaptureListenerDidUpdateSession`. The answer
//! decides whether the mode keeps processing frames.
//!
//! ## Invariants
//!
//! - At most one session update per mode is in flight to the host.
//! - The snapshot is published before anything else, whether or not an event
//!   is emitted.
//! - The frame stays in the frame cache exactly while the callback runs.
//! - [`reset`](SessionListener::reset) and disabling release a blocked
//!   callback, so disposal never deadlocks.
//! - A host that never answers stalls the mode; there is no timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use labelbridge_concurrency::{Rendezvous, SessionHolder};
use labelbridge_core::{LabelCaptureSession, ModeId, SessionSnapshot};
use labelbridge_engine::{FrameCache, FrameData, LabelCaptureListener, NativeMode};
use serde_json::json;
use tracing::{debug, trace, warn};

use crate::emitter::{Emitter, EmitterExt};
use crate::events::LabelCaptureEvent;

/// Called with every snapshot right after it is published.
pub type PublishHook = Box<dyn Fn(&SessionSnapshot) + Send + Sync>;

/// Session listener attached to one native mode.
pub struct SessionListener {
    mode_id: ModeId,
    emitter: Arc<dyn Emitter>,
    session: Arc<SessionHolder>,
    frames: Arc<FrameCache>,
    enabled: AtomicBool,
    disposed: AtomicBool,
    acknowledgement: Rendezvous<bool>,
    unacknowledged_default: bool,
    on_publish: Option<PublishHook>,
}

impl SessionListener {
    /// Create a disabled listener for `mode_id`.
    ///
    /// `unacknowledged_default` is the answer used when the event cannot be
    /// delivered, or when a blocked callback is force-released.
    pub fn new(
        mode_id: ModeId,
        emitter: Arc<dyn Emitter>,
        session: Arc<SessionHolder>,
        frames: Arc<FrameCache>,
        unacknowledged_default: bool,
    ) -> Self {
        SessionListener {
            mode_id,
            emitter,
            session,
            frames,
            enabled: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            acknowledgement: Rendezvous::new(),
            unacknowledged_default,
            on_publish: None,
        }
    }

    /// Run `hook` after each snapshot is published, before any event.
    pub fn with_publish_hook(mut self, hook: PublishHook) -> Self {
        self.on_publish = Some(hook);
        self
    }

    /// Mode this listener reports for.
    pub fn mode_id(&self) -> ModeId {
        self.mode_id
    }

    /// Whether session updates are forwarded to the host.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Start or stop forwarding session updates.
    ///
    /// Disabling releases a callback blocked on an acknowledgement.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if !enabled && self.acknowledgement.release(self.unacknowledged_default) {
            debug!(mode_id = self.mode_id, "released pending session update on disable");
        }
    }

    /// Deliver the host's answer to the session update in flight.
    ///
    /// Returns whether a callback was waiting for it.
    pub fn finish_did_update_session(&self, enabled: bool) -> bool {
        let accepted = self.acknowledgement.send(enabled);
        if !accepted {
            debug!(mode_id = self.mode_id, enabled, "no session update waiting for acknowledgement");
        }
        accepted
    }

    /// Whether a callback is waiting for the host.
    pub fn is_waiting(&self) -> bool {
        self.acknowledgement.is_armed()
    }

    /// Forget the published session and release any blocked callback.
    pub fn reset(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.session.reset();
        if self.acknowledgement.release(self.unacknowledged_default) {
            debug!(mode_id = self.mode_id, "released pending session update on reset");
        }
    }

    fn await_acknowledgement(&self, payload: serde_json::Value) -> bool {
        let event = LabelCaptureEvent::DidUpdateSession;
        // Armed before the emit so an answer racing ahead of the wait is kept
        self.acknowledgement.arm();
        // A disable or reset that ran before the arm found nothing to release
        if self.disposed.load(Ordering::SeqCst) || !self.is_enabled() {
            self.acknowledgement.disarm();
            debug!(mode_id = self.mode_id, "listener disabled before the update went out");
            return self.unacknowledged_default;
        }
        if let Err(e) = self.emitter.emit(event.name(), payload) {
            self.acknowledgement.disarm();
            warn!(mode_id = self.mode_id, error = %e, "session update not delivered");
            return self.unacknowledged_default;
        }
        trace!(mode_id = self.mode_id, "waiting for session update acknowledgement");
        self.acknowledgement.wait().unwrap_or(self.unacknowledged_default)
    }
}

impl LabelCaptureListener for SessionListener {
    fn did_update_session(&self, mode: &dyn NativeMode, session: LabelCaptureSession, frame: FrameData) -> bool {
        let snapshot = Arc::new(SessionSnapshot::new(session));
        self.session.set(Arc::clone(&snapshot));
        if let Some(hook) = &self.on_publish {
            hook(&snapshot);
        }

        if !self.is_enabled() || !self.emitter.has_listener_for(LabelCaptureEvent::DidUpdateSession) {
            return mode.is_enabled();
        }

        let frame = self.frames.insert(frame);
        let payload = json!({
            "session": snapshot.to_json().to_string(),
            "frameId": frame.id(),
            "modeId": self.mode_id,
        });
        let enabled = self.await_acknowledgement(payload);
        drop(frame);

        mode.set_enabled(enabled);
        enabled
    }
}

impl std::fmt::Debug for SessionListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionListener")
            .field("mode_id", &self.mode_id)
            .field("enabled", &self.is_enabled())
            .field("waiting", &self.is_waiting())
            .finish()
    }
}
