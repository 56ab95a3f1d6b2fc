//! The Executor - single entry point for host method calls.
//!
//! The Executor turns a [`MethodCall`] into a typed [`Command`] through the
//! [`CommandRegistry`], declares the events the command makes the host
//! expect, and dispatches to the appropriate handler.

use std::sync::Arc;

use labelbridge_engine::OverlayKind;
use tracing::{debug, trace};

use crate::callbacks::{CallbackRegistry, EventScope};
use crate::events::LabelCaptureEvent;
use crate::handlers::{adaptive_recognition, advanced_overlay, basic_overlay, mode, replace_overlay, validation_flow};
use crate::result::Responder;
use crate::{Command, CommandRegistry, CommandResult, LabelCaptureModule, MethodCall};

/// Whether a method call was taken by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The method is registered; the responder is (or will be) called
    /// exactly once.
    Handled,
    /// No command is registered under the method name. The responder was
    /// dropped uncalled and the host should route the call elsewhere.
    Unhandled,
}

/// Command dispatcher for one [`LabelCaptureModule`].
///
/// # Example
///
/// ```ignore
/// use labelbridge_executor::{Executor, MethodCall};
/// use serde_json::json;
///
/// let executor = Executor::new(module);
/// let dispatch = executor.dispatch(
///     MethodCall::new("finishLabelCaptureListenerDidUpdateSession", json!({"modeId": 1, "isEnabled": true})),
///     Box::new(|outcome| println!("{:?}", outcome)),
/// );
/// ```
pub struct Executor {
    module: Arc<LabelCaptureModule>,
    commands: CommandRegistry,
    callbacks: Arc<CallbackRegistry>,
}

impl Executor {
    /// Create an executor with the default command table.
    pub fn new(module: Arc<LabelCaptureModule>) -> Self {
        Self::with_commands(module, CommandRegistry::default())
    }

    /// Create an executor with a custom command table.
    pub fn with_commands(module: Arc<LabelCaptureModule>, commands: CommandRegistry) -> Self {
        Executor {
            module,
            commands,
            callbacks: Arc::new(CallbackRegistry::new()),
        }
    }

    /// The module commands operate on.
    pub fn module(&self) -> &Arc<LabelCaptureModule> {
        &self.module
    }

    /// Events the host was told to expect, per mode or view.
    pub fn callbacks(&self) -> &Arc<CallbackRegistry> {
        &self.callbacks
    }

    /// The command table.
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Dispatch a host method call.
    ///
    /// A missing or mistyped required argument answers `MISSING_PARAMETER`
    /// before anything else happens.
    pub fn dispatch(&self, call: MethodCall, responder: Responder) -> Dispatch {
        let Some(constructor) = self.commands.get(&call.method) else {
            debug!(method = %call.method, "unhandled method");
            return Dispatch::Unhandled;
        };
        let result = CommandResult::new(call.method.clone(), Arc::clone(&self.callbacks), responder);
        match constructor(&call.arguments) {
            Ok(command) => self.execute(command, result),
            Err(e) => result.reject(e),
        }
        Dispatch::Handled
    }

    /// Execute a typed command, answering through `result`.
    pub fn execute(&self, cmd: Command, result: CommandResult) {
        trace!(method = cmd.method(), "executing command");
        let m = &self.module;
        match cmd {
            // Mode
            Command::FinishDidUpdateSession { mode_id, is_enabled } => {
                result.complete(mode::finish_did_update_session(m, mode_id, is_enabled));
            }
            Command::AddListener { mode_id } => {
                result.register_callback_for_events(EventScope::Mode(mode_id), LabelCaptureEvent::SESSION);
                mode::add_listener(m, mode_id, result);
            }
            Command::RemoveListener { mode_id } => {
                result.unregister_callback_for_events(EventScope::Mode(mode_id), LabelCaptureEvent::SESSION);
                result.complete(mode::remove_listener(m, mode_id));
            }
            Command::SetModeEnabledState { mode_id, enabled } => {
                result.complete(mode::set_mode_enabled_state(m, mode_id, enabled));
            }
            Command::UpdateMode { mode_id, mode_json } => {
                result.complete(mode::update_mode(m, mode_id, mode_json));
            }
            Command::UpdateSettings { mode_id, settings_json } => {
                result.complete(mode::update_settings(m, mode_id, settings_json));
            }
            Command::UpdateFeedback { mode_id, feedback_json } => {
                mode::update_feedback(m, mode_id, feedback_json, result);
            }

            // Advanced overlay
            Command::SetViewForLabel {
                view_id,
                tracking_id,
                view_json,
            } => advanced_overlay::set_view_for_label(m, view_id, tracking_id, view_json, result),
            Command::SetViewForLabelFromBytes {
                view_id,
                tracking_id,
                view_bytes,
            } => advanced_overlay::set_view_for_label_from_bytes(m, view_id, tracking_id, view_bytes, result),
            Command::SetViewForField {
                view_id,
                identifier,
                view_json,
            } => advanced_overlay::set_view_for_field(m, view_id, identifier, view_json, result),
            Command::SetViewForFieldFromBytes {
                view_id,
                identifier,
                view_bytes,
            } => advanced_overlay::set_view_for_field_from_bytes(m, view_id, identifier, view_bytes, result),
            Command::SetAnchorForLabel {
                view_id,
                tracking_id,
                anchor_json,
            } => advanced_overlay::set_anchor_for_label(m, view_id, tracking_id, &anchor_json, result),
            Command::SetAnchorForField {
                view_id,
                identifier,
                anchor_json,
            } => advanced_overlay::set_anchor_for_field(m, view_id, identifier, &anchor_json, result),
            Command::SetOffsetForLabel {
                view_id,
                tracking_id,
                offset_json,
            } => advanced_overlay::set_offset_for_label(m, view_id, tracking_id, &offset_json, result),
            Command::SetOffsetForField {
                view_id,
                identifier,
                offset_json,
            } => advanced_overlay::set_offset_for_field(m, view_id, identifier, &offset_json, result),
            Command::ClearLabelViews { view_id } => advanced_overlay::clear_label_views(m, view_id, result),
            Command::AddAdvancedOverlayListener { view_id } => {
                result.register_callback_for_events(EventScope::View(view_id), LabelCaptureEvent::ADVANCED_OVERLAY);
                advanced_overlay::set_listener(m, view_id, true, result);
            }
            Command::RemoveAdvancedOverlayListener { view_id } => {
                result.unregister_callback_for_events(EventScope::View(view_id), LabelCaptureEvent::ADVANCED_OVERLAY);
                advanced_overlay::set_listener(m, view_id, false, result);
            }
            Command::UpdateAdvancedOverlay { view_id, overlay_json } => {
                replace_overlay(m, view_id, OverlayKind::Advanced, overlay_json, result);
            }

            // Basic overlay
            Command::AddBasicOverlayListener { view_id } => {
                result.register_callback_for_events(EventScope::View(view_id), LabelCaptureEvent::BASIC_OVERLAY);
                basic_overlay::set_listener(m, view_id, true, result);
            }
            Command::RemoveBasicOverlayListener { view_id } => {
                result.unregister_callback_for_events(EventScope::View(view_id), LabelCaptureEvent::BASIC_OVERLAY);
                basic_overlay::set_listener(m, view_id, false, result);
            }
            Command::UpdateBasicOverlay { view_id, overlay_json } => {
                replace_overlay(m, view_id, OverlayKind::Basic, overlay_json, result);
            }
            Command::SetBrushForLabel {
                view_id,
                tracking_id,
                brush_json,
            } => basic_overlay::set_brush_for_label(m, view_id, tracking_id, brush_json, result),
            Command::SetBrushForFieldOfLabel {
                view_id,
                tracking_id,
                field_name,
                brush_json,
            } => basic_overlay::set_brush_for_field_of_label(m, view_id, tracking_id, field_name, brush_json, result),

            // Validation flow
            Command::RegisterValidationFlowListener { view_id } => {
                result.register_callback_for_events(EventScope::View(view_id), LabelCaptureEvent::VALIDATION_FLOW);
                validation_flow::set_listener(m, view_id, true, result);
            }
            Command::UnregisterValidationFlowListener { view_id } => {
                result.unregister_callback_for_events(EventScope::View(view_id), LabelCaptureEvent::VALIDATION_FLOW);
                validation_flow::set_listener(m, view_id, false, result);
            }
            Command::UpdateValidationFlowOverlay { view_id, overlay_json } => {
                replace_overlay(m, view_id, OverlayKind::ValidationFlow, overlay_json, result);
            }

            // Adaptive recognition
            Command::RegisterAdaptiveRecognitionListener { view_id } => {
                result.register_callback_for_events(EventScope::View(view_id), LabelCaptureEvent::ADAPTIVE_RECOGNITION);
                adaptive_recognition::set_listener(m, view_id, true, result);
            }
            Command::UnregisterAdaptiveRecognitionListener { view_id } => {
                result.unregister_callback_for_events(
                    EventScope::View(view_id),
                    LabelCaptureEvent::ADAPTIVE_RECOGNITION,
                );
                adaptive_recognition::set_listener(m, view_id, false, result);
            }
            Command::ApplyAdaptiveRecognitionSettings { view_id, overlay_json } => {
                replace_overlay(m, view_id, OverlayKind::AdaptiveRecognition, overlay_json, result);
            }
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("module", &self.module)
            .field("commands", &self.commands)
            .finish()
    }
}
