//! Registry entry pairing a native mode with its session listener.

use std::fmt;
use std::sync::Arc;

use labelbridge_concurrency::Registered;
use labelbridge_core::{ModeId, Result, ViewId};
use labelbridge_engine::{LabelCaptureDeserializer, LabelCaptureListener, ModeCreationData, NativeMode};
use tracing::debug;

use crate::listeners::SessionListener;

/// A live label capture mode as tracked by the module.
pub struct ModeHandle {
    mode_id: ModeId,
    parent_id: Option<ViewId>,
    native: Arc<dyn NativeMode>,
    listener: Arc<SessionListener>,
}

impl ModeHandle {
    /// Build the native mode from `creation` and wire `listener` into it.
    ///
    /// The listener forwards updates only when the host already listens
    /// (`hasListeners`); the mode's enabled state comes from `enabled`.
    pub fn create(
        deserializer: &dyn LabelCaptureDeserializer,
        creation: &ModeCreationData,
        listener: Arc<SessionListener>,
    ) -> Result<Self> {
        let native = deserializer.mode(&creation.mode_json)?;
        let session_listener: Arc<dyn LabelCaptureListener> = listener.clone();
        native.add_listener(session_listener);
        listener.set_enabled(creation.has_listeners);
        native.set_enabled(creation.enabled);
        Ok(ModeHandle {
            mode_id: creation.mode_id,
            parent_id: creation.parent_id,
            native,
            listener,
        })
    }

    /// The native mode.
    pub fn native(&self) -> &Arc<dyn NativeMode> {
        &self.native
    }

    /// The session listener.
    pub fn listener(&self) -> &Arc<SessionListener> {
        &self.listener
    }

    /// Start forwarding session updates.
    pub fn add_listener(&self) {
        self.listener.set_enabled(true);
    }

    /// Stop forwarding session updates.
    pub fn remove_listener(&self) {
        self.listener.set_enabled(false);
    }

    /// Answer the session update waiting for the host.
    pub fn finish_did_update_session(&self, enabled: bool) -> bool {
        self.listener.finish_did_update_session(enabled)
    }

    /// Whether the native mode processes frames.
    pub fn is_enabled(&self) -> bool {
        self.native.is_enabled()
    }

    /// Enable or disable frame processing.
    pub fn set_enabled(&self, enabled: bool) {
        self.native.set_enabled(enabled);
    }

    /// Apply a settings JSON.
    pub fn apply_settings(&self, settings_json: &str) -> Result<()> {
        self.native.apply_settings(settings_json)
    }

    /// Update mode properties from a mode JSON.
    pub fn update_from_json(&self, mode_json: &str) -> Result<()> {
        self.native.update_from_json(mode_json)
    }

    /// Replace the feedback configuration.
    pub fn update_feedback(&self, feedback_json: &str) -> Result<()> {
        self.native.update_feedback(feedback_json)
    }

    /// Detach from the SDK: reset the listener (releasing a blocked
    /// callback), remove it from the mode, and hand the mode back to the
    /// deserializer.
    pub fn dispose(&self, deserializer: &dyn LabelCaptureDeserializer) {
        self.listener.reset();
        self.native.remove_listener();
        deserializer.dispose_mode(&self.native);
        debug!(mode_id = self.mode_id, "disposed label capture mode");
    }
}

impl Registered for ModeHandle {
    fn mode_id(&self) -> ModeId {
        self.mode_id
    }

    fn parent_id(&self) -> Option<ViewId> {
        self.parent_id
    }
}

impl fmt::Debug for ModeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeHandle")
            .field("mode_id", &self.mode_id)
            .field("parent_id", &self.parent_id)
            .field("listener", &self.listener)
            .finish()
    }
}
