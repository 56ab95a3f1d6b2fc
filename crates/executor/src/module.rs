//! The label capture module: owner of all bridge state.
//!
//! One [`LabelCaptureModule`] is built per host bridge and shared by the
//! [`Executor`](crate::Executor) and the Vision Engine lifecycle callbacks.
//! It owns, explicitly and without process-wide singletons:
//!
//! | State | Type | Written by |
//! |-------|------|------------|
//! | latest session | `SessionHolder` | session listeners |
//! | live modes, pending actions | `ModeRegistry<ModeHandle>` | lifecycle callbacks, commands |
//! | frames exposed to the host | `FrameCache` | session listeners |
//! | overlay and view mutation | `MainContext` | commands, lifecycle callbacks |
//! | placed host views | `AdvancedOverlayViewCache` | view commands |
//!
//! ## Lifecycle
//!
//! The Vision Engine reports construction and teardown through
//! [`add_mode`](LabelCaptureModule::add_mode),
//! [`remove_mode`](LabelCaptureModule::remove_mode),
//! [`remove_all_modes`](LabelCaptureModule::remove_all_modes),
//! [`dispose_context`](LabelCaptureModule::dispose_context) and
//! [`add_overlay`](LabelCaptureModule::add_overlay). No host call is waiting
//! on these, so their failures are logged and otherwise dropped.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use labelbridge_concurrency::{MainContext, MainContextStats, ModeRegistry, PendingAction, PendingKey, SessionHolder};
use labelbridge_core::{ModeId, Result as CoreResult, ViewId};
use labelbridge_engine::{
    mode_identity, BridgeConfig, DataCaptureView, FrameCache, LabelCaptureDeserializer, ModeCreationData, Overlay,
    OverlayCreationData, OverlayType, ViewRegistry, LABEL_CAPTURE_MODE_TYPE,
};
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::emitter::Emitter;
use crate::listeners::{
    AdaptiveRecognitionListener, AdvancedOverlayListener, BasicOverlayListener, SessionListener,
    ValidationFlowListener,
};
use crate::mode::ModeHandle;
use crate::view_cache::AdvancedOverlayViewCache;
use crate::{CommandResult, Error, Output, Result};

/// Shared state and lifecycle of the label capture bridge.
pub struct LabelCaptureModule {
    this: Weak<LabelCaptureModule>,
    config: BridgeConfig,
    emitter: Arc<dyn Emitter>,
    deserializer: Arc<dyn LabelCaptureDeserializer>,
    views: Arc<ViewRegistry>,
    modes: ModeRegistry<ModeHandle>,
    session: Arc<SessionHolder>,
    frames: Arc<FrameCache>,
    main: MainContext,
    view_cache: RwLock<Option<Arc<AdvancedOverlayViewCache>>>,
    basic_listener: Arc<BasicOverlayListener>,
    advanced_listener: Arc<AdvancedOverlayListener>,
    validation_flow_listener: Arc<ValidationFlowListener>,
    adaptive_recognition_listener: Arc<AdaptiveRecognitionListener>,
}

impl LabelCaptureModule {
    /// Build the module and spawn its main context.
    ///
    /// `views` is the host's registry of data capture views; commands address
    /// views through it.
    pub fn new(
        config: BridgeConfig,
        emitter: Arc<dyn Emitter>,
        deserializer: Arc<dyn LabelCaptureDeserializer>,
        views: Arc<ViewRegistry>,
    ) -> CoreResult<Arc<Self>> {
        let main = MainContext::new(config.main_thread_name.clone(), config.main_queue_capacity)
            .map_err(|e| labelbridge_core::Error::internal(format!("failed to spawn main context: {}", e)))?;

        Ok(Arc::new_cyclic(|this| LabelCaptureModule {
            this: this.clone(),
            basic_listener: Arc::new(BasicOverlayListener::new(Arc::clone(&emitter))),
            advanced_listener: Arc::new(AdvancedOverlayListener::new(Arc::clone(&emitter))),
            validation_flow_listener: Arc::new(ValidationFlowListener::new(Arc::clone(&emitter))),
            adaptive_recognition_listener: Arc::new(AdaptiveRecognitionListener::new(Arc::clone(&emitter))),
            config,
            emitter,
            deserializer,
            views,
            modes: ModeRegistry::new(),
            session: Arc::new(SessionHolder::new()),
            frames: Arc::new(FrameCache::new()),
            main,
            view_cache: RwLock::new(None),
        }))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Configuration the module was built with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Event channel to the host.
    pub fn emitter(&self) -> &Arc<dyn Emitter> {
        &self.emitter
    }

    /// Registered data capture views.
    pub fn views(&self) -> &Arc<ViewRegistry> {
        &self.views
    }

    /// Live modes and pending actions.
    pub fn modes(&self) -> &ModeRegistry<ModeHandle> {
        &self.modes
    }

    /// Mode registered under `mode_id`.
    pub fn mode(&self, mode_id: ModeId) -> Option<Arc<ModeHandle>> {
        self.modes.get(mode_id)
    }

    /// Latest session published by any mode.
    pub fn session(&self) -> &Arc<SessionHolder> {
        &self.session
    }

    /// Frames exposed during session updates.
    pub fn frames(&self) -> &Arc<FrameCache> {
        &self.frames
    }

    /// View cache, present between `on_start` and `on_stop`.
    pub fn view_cache(&self) -> Option<Arc<AdvancedOverlayViewCache>> {
        self.view_cache.read().clone()
    }

    /// Main context counters.
    pub fn main_stats(&self) -> MainContextStats {
        self.main.stats()
    }

    /// Block until the main context has run everything queued so far.
    pub fn drain_main(&self) {
        self.main.drain();
    }

    pub(crate) fn weak(&self) -> Weak<LabelCaptureModule> {
        self.this.clone()
    }

    pub(crate) fn view(&self, view_id: ViewId) -> Option<Arc<dyn DataCaptureView>> {
        self.views.get(view_id)
    }

    pub(crate) fn basic_listener(&self) -> Arc<BasicOverlayListener> {
        Arc::clone(&self.basic_listener)
    }

    pub(crate) fn advanced_listener(&self) -> Arc<AdvancedOverlayListener> {
        Arc::clone(&self.advanced_listener)
    }

    pub(crate) fn validation_flow_listener(&self) -> Arc<ValidationFlowListener> {
        Arc::clone(&self.validation_flow_listener)
    }

    pub(crate) fn adaptive_recognition_listener(&self) -> Arc<AdaptiveRecognitionListener> {
        Arc::clone(&self.adaptive_recognition_listener)
    }

    // =========================================================================
    // Start / stop
    // =========================================================================

    /// The host started the module.
    pub fn on_start(&self) {
        *self.view_cache.write() = Some(Arc::new(AdvancedOverlayViewCache::new()));
        info!("label capture module started");
    }

    /// The host stopped the module.
    pub fn on_stop(&self) {
        *self.view_cache.write() = None;
        info!("label capture module stopped");
    }

    // =========================================================================
    // Main context
    // =========================================================================

    /// Run `work` on the main context and answer `result` with its outcome.
    ///
    /// Runs inline when already on the main context. A full or stopped
    /// context rejects the command; a panicking closure is reported as an
    /// internal error.
    pub(crate) fn run_on_main<F>(&self, result: CommandResult, work: F)
    where
        F: FnOnce() -> Result<Output> + Send + 'static,
    {
        if self.main.is_current() {
            result.complete(guarded(work));
            return;
        }
        let slot = Arc::new(parking_lot::Mutex::new(Some(result)));
        let task_slot = Arc::clone(&slot);
        let submitted = self.main.submit(move || {
            let outcome = guarded(work);
            if let Some(result) = task_slot.lock().take() {
                result.complete(outcome);
            }
        });
        if let Err(e) = submitted {
            error!(error = %e, "could not schedule command on main context");
            if let Some(result) = slot.lock().take() {
                result.reject(Error::Internal { reason: e.to_string() });
            }
        }
    }

    /// Run `work` on the main context, inline when already there.
    pub(crate) fn dispatch_main<F>(&self, what: &'static str, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.main.is_current() {
            work();
            return;
        }
        if let Err(e) = self.main.submit(work) {
            error!(error = %e, what, "could not schedule work on main context");
        }
    }

    // =========================================================================
    // Mode lifecycle
    // =========================================================================

    /// The Vision Engine added a mode to the capture context.
    ///
    /// Non label capture modes are ignored. The new mode is registered and
    /// every command that was waiting for it (by mode id, then by parent id)
    /// is replayed.
    pub fn add_mode(&self, mode_json: &str) {
        let creation = match ModeCreationData::from_json(mode_json) {
            Ok(creation) => creation,
            Err(e) => {
                error!(error = %e, "error adding mode to context");
                return;
            }
        };
        if !creation.is_label_capture() {
            debug!(mode_type = %creation.mode_type, "ignoring mode of another module");
            return;
        }

        let module = self.weak();
        let listener = SessionListener::new(
            creation.mode_id,
            Arc::clone(&self.emitter),
            Arc::clone(&self.session),
            Arc::clone(&self.frames),
            self.config.continue_on_unacknowledged_emit,
        )
        .with_publish_hook(Box::new(move |snapshot| {
            if let Some(cache) = module.upgrade().and_then(|module| module.view_cache()) {
                cache.retain_tracked(snapshot);
            }
        }));
        let listener = Arc::new(listener);
        let handle = match ModeHandle::create(self.deserializer.as_ref(), &creation, listener) {
            Ok(handle) => Arc::new(handle),
            Err(e) => {
                error!(mode_id = creation.mode_id, error = %e, "error adding mode to context");
                return;
            }
        };

        if let Some(previous) = self.modes.get(creation.mode_id) {
            warn!(mode_id = creation.mode_id, "mode id reused, disposing the previous mode");
            previous.dispose(self.deserializer.as_ref());
        }

        let replayed = self.modes.add_and_drain(handle);
        info!(
            mode_id = creation.mode_id,
            parent_id = ?creation.parent_id,
            replayed,
            "label capture mode added"
        );
    }

    /// The Vision Engine removed a mode from the capture context.
    ///
    /// Commands still waiting for it are discarded.
    pub fn remove_mode(&self, mode_json: &str) {
        let (mode_type, mode_id) = match mode_identity(mode_json) {
            Some(identity) => identity,
            None => {
                warn!("ignoring removal of a mode with unreadable JSON");
                return;
            }
        };
        if mode_type != LABEL_CAPTURE_MODE_TYPE {
            return;
        }
        let Some(mode_id) = mode_id else {
            return;
        };
        let Some(handle) = self.modes.get(mode_id) else {
            return;
        };
        handle.dispose(self.deserializer.as_ref());
        self.modes.remove(mode_id);
        info!(mode_id, "label capture mode removed");
    }

    /// The Vision Engine removed every mode.
    pub fn remove_all_modes(&self) {
        let modes = self.modes.remove_all();
        for handle in &modes {
            handle.dispose(self.deserializer.as_ref());
        }
        self.modes.clear_all();
        info!(count = modes.len(), "all label capture modes removed");
    }

    /// The Vision Engine disposed the capture context.
    pub fn dispose_context(&self) {
        self.remove_all_modes();
        self.frames.clear();
    }

    // =========================================================================
    // Overlay lifecycle
    // =========================================================================

    /// The Vision Engine added an overlay JSON to `view`.
    ///
    /// The owning mode is looked up by the view's parent id when it has one,
    /// else by the overlay's `modeId`. When the mode does not exist yet the
    /// call is queued under that key and retried once the mode is added.
    pub fn add_overlay(&self, overlay_json: &str, view: Arc<dyn DataCaptureView>) {
        let creation = match OverlayCreationData::from_json(overlay_json) {
            Ok(creation) => creation,
            Err(e) => {
                error!(view_id = view.view_id(), error = %e, "error adding overlay to view");
                return;
            }
        };
        let Some(overlay_type) = creation.overlay_type else {
            return;
        };

        let parent_id = view.parent_id();
        let mode = match parent_id {
            Some(parent_id) => self.modes.get_by_parent(parent_id),
            None => creation.mode_id.and_then(|mode_id| self.modes.get(mode_id)),
        };

        let Some(mode) = mode else {
            self.defer_overlay(creation, parent_id, view);
            return;
        };

        let module = self.weak();
        self.dispatch_main("add overlay", move || {
            if let Some(module) = module.upgrade() {
                module.build_overlay(overlay_type, &creation, &mode, view.as_ref());
            }
        });
    }

    fn defer_overlay(&self, creation: OverlayCreationData, parent_id: Option<ViewId>, view: Arc<dyn DataCaptureView>) {
        let key = match (parent_id, creation.mode_id) {
            (Some(parent_id), _) => PendingKey::Parent(parent_id),
            (None, Some(mode_id)) => PendingKey::Mode(mode_id),
            (None, None) => {
                warn!("overlay names neither a parent view nor a mode, dropping it");
                return;
            }
        };
        let module = self.weak();
        let json = creation.overlay_json;
        let retry: PendingAction = Box::new(move || {
            if let Some(module) = module.upgrade() {
                module.add_overlay(&json, view);
            }
            Ok(())
        });
        match self.modes.defer_until_registered(key, retry) {
            // Registered since the lookup missed
            Some(retry) => {
                if let Err(e) = retry() {
                    error!(%key, error = %e, "error adding overlay to view");
                }
            }
            None => debug!(%key, "mode not ready, deferring overlay"),
        }
    }

    fn build_overlay(
        &self,
        overlay_type: OverlayType,
        creation: &OverlayCreationData,
        mode: &ModeHandle,
        view: &dyn DataCaptureView,
    ) {
        let json = creation.overlay_json.as_str();
        let native = mode.native();
        let built = match overlay_type {
            OverlayType::Basic => self.deserializer.basic_overlay(json, native).map(|overlay| {
                if creation.has_listener {
                    self.basic_listener.enable();
                    overlay.set_delegate(Some(self.basic_listener()));
                }
                Overlay::Basic(overlay)
            }),
            OverlayType::Advanced => self.deserializer.advanced_overlay(json, native).map(|overlay| {
                if creation.has_listener {
                    self.advanced_listener.enable();
                    overlay.set_delegate(Some(self.advanced_listener()));
                }
                Overlay::Advanced(overlay)
            }),
            OverlayType::ValidationFlow => self.deserializer.validation_flow_overlay(json, native).map(|overlay| {
                if creation.has_listener {
                    self.validation_flow_listener.enable();
                    overlay.set_delegate(Some(self.validation_flow_listener()));
                }
                Overlay::ValidationFlow(overlay)
            }),
            OverlayType::ReceiptScanning => self.deserializer.adaptive_recognition_overlay(json, native).map(|overlay| {
                if creation.has_listener {
                    self.adaptive_recognition_listener.enable();
                    overlay.set_delegate(Some(self.adaptive_recognition_listener()));
                }
                Overlay::AdaptiveRecognition(overlay)
            }),
        };

        match built {
            Ok(overlay) => {
                debug!(view_id = view.view_id(), kind = ?overlay.kind(), "overlay added");
                view.add_overlay(overlay);
            }
            Err(e) => {
                error!(
                    view_id = view.view_id(),
                    overlay_type = overlay_type.type_name(),
                    error = %e,
                    "error creating overlay"
                );
            }
        }
    }
}

impl std::fmt::Debug for LabelCaptureModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelCaptureModule")
            .field("modes", &self.modes.len())
            .field("views", &self.views.len())
            .field("session", &self.session.is_set())
            .finish()
    }
}

fn guarded<F>(work: F) -> Result<Output>
where
    F: FnOnce() -> Result<Output>,
{
    catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|_| {
        Err(Error::Internal {
            reason: "main context task panicked".to_string(),
        })
    })
}
