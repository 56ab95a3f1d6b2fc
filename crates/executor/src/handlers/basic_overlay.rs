//! Basic overlay command handlers.
//!
//! A brush command without `brushJson` is a no-op: the overlay keeps
//! whatever brush it last had for that label or field.

use std::sync::Arc;

use labelbridge_core::{Brush, TrackingId, ViewId};
use labelbridge_engine::BasicOverlay;
use tracing::debug;

use crate::convert::convert_result;
use crate::{CommandResult, LabelCaptureModule, Output, Result};

fn basic_overlay(module: &LabelCaptureModule, view_id: ViewId) -> Option<Arc<dyn BasicOverlay>> {
    module.view(view_id)?.basic_overlay()
}

fn parse_brush(brush_json: Option<String>) -> Result<Option<Brush>> {
    brush_json
        .map(|json| convert_result(Brush::from_json("brushJson", &json)))
        .transpose()
}

/// Handle SetBrushForLabel.
pub fn set_brush_for_label(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    tracking_id: TrackingId,
    brush_json: Option<String>,
    result: CommandResult,
) {
    let brush = match parse_brush(brush_json) {
        Ok(Some(brush)) => brush,
        Ok(None) => return result.success(),
        Err(e) => return result.reject(e),
    };
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let overlay = basic_overlay(&target, view_id);
        let label = target.session().label(tracking_id);
        match (overlay, label) {
            (Some(overlay), Some(label)) => overlay.set_brush_for_label(brush, &label),
            (_, None) => debug!(tracking_id, "label left the session, brush not applied"),
            (None, Some(_)) => {}
        }
        Ok(Output::Unit)
    });
}

/// Handle SetBrushForFieldOfLabel.
pub fn set_brush_for_field_of_label(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    tracking_id: TrackingId,
    field_name: String,
    brush_json: Option<String>,
    result: CommandResult,
) {
    let brush = match parse_brush(brush_json) {
        Ok(Some(brush)) => brush,
        Ok(None) => return result.success(),
        Err(e) => return result.reject(e),
    };
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let Some(overlay) = basic_overlay(&target, view_id) else {
            return Ok(Output::Unit);
        };
        let Some(label) = target.session().label(tracking_id) else {
            return Ok(Output::Unit);
        };
        if let Some(field) = label.field(&field_name) {
            overlay.set_brush_for_field(brush, field, &label);
        }
        Ok(Output::Unit)
    });
}

/// Handle AddBasicOverlayListener and RemoveBasicOverlayListener.
pub fn set_listener(module: &Arc<LabelCaptureModule>, view_id: ViewId, attach: bool, result: CommandResult) {
    let target = Arc::clone(module);
    let listener = module.basic_listener();
    if attach {
        listener.enable();
    } else {
        listener.disable();
    }
    module.run_on_main(result, move || {
        if let Some(overlay) = basic_overlay(&target, view_id) {
            if attach {
                overlay.set_delegate(Some(listener));
            } else {
                overlay.set_delegate(None);
            }
        }
        Ok(if attach { Output::Retained } else { Output::Unit })
    });
}
