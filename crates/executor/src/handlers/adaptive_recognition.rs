//! Adaptive recognition (receipt scanning) command handlers.

use std::sync::Arc;

use labelbridge_core::ViewId;

use crate::{CommandResult, LabelCaptureModule, Output};

/// Handle RegisterAdaptiveRecognitionListener and
/// UnregisterAdaptiveRecognitionListener.
pub fn set_listener(module: &Arc<LabelCaptureModule>, view_id: ViewId, attach: bool, result: CommandResult) {
    let target = Arc::clone(module);
    let listener = module.adaptive_recognition_listener();
    if attach {
        listener.enable();
    } else {
        listener.disable();
    }
    module.run_on_main(result, move || {
        let overlay = target
            .view(view_id)
            .and_then(|view| view.adaptive_recognition_overlay());
        if let Some(overlay) = overlay {
            if attach {
                overlay.set_delegate(Some(listener));
            } else {
                overlay.set_delegate(None);
            }
        }
        Ok(if attach { Output::Retained } else { Output::Unit })
    });
}
