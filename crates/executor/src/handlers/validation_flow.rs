//! Validation flow command handlers.

use std::sync::Arc;

use labelbridge_core::ViewId;

use crate::{CommandResult, LabelCaptureModule, Output};

/// Handle RegisterValidationFlowListener and UnregisterValidationFlowListener.
pub fn set_listener(module: &Arc<LabelCaptureModule>, view_id: ViewId, attach: bool, result: CommandResult) {
    let target = Arc::clone(module);
    let listener = module.validation_flow_listener();
    if attach {
        listener.enable();
    } else {
        listener.disable();
    }
    module.run_on_main(result, move || {
        if let Some(overlay) = target.view(view_id).and_then(|view| view.validation_flow_overlay()) {
            if attach {
                overlay.set_delegate(Some(listener));
            } else {
                overlay.set_delegate(None);
            }
        }
        Ok(if attach { Output::Retained } else { Output::Unit })
    });
}
