//! Mode command handlers.
//!
//! All of these address a mode by id. An unknown mode is a no-op, except for
//! `addLabelCaptureListener` which waits for the mode to be constructed.

use std::sync::Arc;

use labelbridge_concurrency::{PendingAction, PendingKey};
use labelbridge_core::ModeId;
use tracing::{debug, warn};

use crate::convert::convert_result;
use crate::{CommandResult, LabelCaptureModule, Output, Result};

/// Handle FinishDidUpdateSession: answer the blocked session update.
pub fn finish_did_update_session(
    module: &Arc<LabelCaptureModule>,
    mode_id: ModeId,
    is_enabled: bool,
) -> Result<Output> {
    if let Some(mode) = module.mode(mode_id) {
        if !mode.finish_did_update_session(is_enabled) {
            debug!(mode_id, "no session update was waiting");
        }
    }
    Ok(Output::Unit)
}

/// Handle AddListener.
///
/// When the mode is not constructed yet the command is queued and answered
/// once it is; a queue discarded with its mode answers with plain success.
pub fn add_listener(module: &Arc<LabelCaptureModule>, mode_id: ModeId, result: CommandResult) {
    let weak = module.weak();
    let action: PendingAction = Box::new(move || {
        if let Some(mode) = weak.upgrade().and_then(|module| module.mode(mode_id)) {
            mode.add_listener();
        }
        result.success_keep_callback();
        Ok(())
    });

    match module.modes().defer_until_registered(PendingKey::Mode(mode_id), action) {
        Some(attach) => {
            if let Err(e) = attach() {
                warn!(mode_id, error = %e, "attaching session listener failed");
            }
        }
        None => debug!(mode_id, "mode not ready, deferring listener"),
    }
}

/// Handle RemoveListener.
pub fn remove_listener(module: &Arc<LabelCaptureModule>, mode_id: ModeId) -> Result<Output> {
    if let Some(mode) = module.mode(mode_id) {
        mode.remove_listener();
    }
    Ok(Output::Unit)
}

/// Handle SetModeEnabledState.
pub fn set_mode_enabled_state(module: &Arc<LabelCaptureModule>, mode_id: ModeId, enabled: bool) -> Result<Output> {
    if let Some(mode) = module.mode(mode_id) {
        mode.set_enabled(enabled);
    }
    Ok(Output::Unit)
}

/// Handle UpdateMode.
pub fn update_mode(module: &Arc<LabelCaptureModule>, mode_id: ModeId, mode_json: String) -> Result<Output> {
    if let Some(mode) = module.mode(mode_id) {
        convert_result(mode.update_from_json(&mode_json))?;
    }
    Ok(Output::Unit)
}

/// Handle UpdateSettings.
pub fn update_settings(module: &Arc<LabelCaptureModule>, mode_id: ModeId, settings_json: String) -> Result<Output> {
    if let Some(mode) = module.mode(mode_id) {
        convert_result(mode.apply_settings(&settings_json))?;
    }
    Ok(Output::Unit)
}

/// Handle UpdateFeedback. Feedback drives sound and vibration, so it is
/// applied on the main context.
pub fn update_feedback(
    module: &Arc<LabelCaptureModule>,
    mode_id: ModeId,
    feedback_json: String,
    result: CommandResult,
) {
    let Some(mode) = module.mode(mode_id) else {
        result.success();
        return;
    };
    module.run_on_main(result, move || {
        convert_result(mode.update_feedback(&feedback_json))?;
        Ok(Output::Unit)
    });
}
