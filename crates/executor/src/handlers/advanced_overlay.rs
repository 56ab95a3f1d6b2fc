//! Advanced overlay command handlers.
//!
//! The advanced overlay places host-provided views next to labels and
//! fields. Views are identified by the tracking id (labels) or the field key
//! (fields); the same identifier keys the module's view cache and is what
//! the tap event reports back.
//!
//! Payloads are parsed before the target is looked up, so a malformed
//! anchor or offset is reported even when its label has already left the
//! session.

use std::sync::Arc;

use labelbridge_core::{Anchor, PointWithUnit, TrackingId, ViewId};
use labelbridge_engine::{AdvancedOverlay, LabelView, ViewContent};
use serde_json::{json, Value};
use tracing::debug;

use crate::convert::convert_result;
use crate::emitter::EmitterExt;
use crate::events::LabelCaptureEvent;
use crate::{CommandResult, LabelCaptureModule, Output};

fn advanced_overlay(module: &LabelCaptureModule, view_id: ViewId) -> Option<Arc<dyn AdvancedOverlay>> {
    module.view(view_id)?.advanced_overlay()
}

/// Wrap host content in a view. Byte views reuse the cached view when the
/// bytes did not change.
fn build_view(module: &LabelCaptureModule, identifier: &str, content: ViewContent) -> Arc<LabelView> {
    match (content, module.view_cache()) {
        (ViewContent::Bytes(bytes), Some(cache)) => cache.get_or_create_from_bytes(identifier, bytes),
        (content, _) => Arc::new(LabelView::new(identifier, content)),
    }
}

/// Wire the tap event into `view` and record it in the view cache; no view
/// drops the cache entry.
fn install_view(module: &LabelCaptureModule, identifier: &str, view: Option<&Arc<LabelView>>, tap_payload: Value) {
    let cache = module.view_cache();
    match view {
        Some(view) => {
            let emitter = Arc::clone(module.emitter());
            view.set_tap_handler(Arc::new(move || {
                emitter.emit_if_listened(LabelCaptureEvent::DidTapOnViewForFieldOfLabel, tap_payload.clone());
            }));
            if let Some(cache) = cache {
                cache.insert(identifier, Arc::clone(view));
            }
        }
        None => {
            if let Some(cache) = cache {
                cache.remove(identifier);
            }
        }
    }
}

// =============================================================================
// Views
// =============================================================================

fn set_label_view(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    tracking_id: TrackingId,
    content: Option<ViewContent>,
    result: CommandResult,
) {
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let Some(overlay) = advanced_overlay(&target, view_id) else {
            return Ok(Output::Unit);
        };
        let Some(label) = target.session().label(tracking_id) else {
            debug!(tracking_id, "label left the session, view not placed");
            return Ok(Output::Unit);
        };
        let identifier = tracking_id.to_string();
        let view = content.map(|content| build_view(&target, &identifier, content));
        install_view(
            &target,
            &identifier,
            view.as_ref(),
            json!({ "label": label.to_json().to_string() }),
        );
        overlay.set_view_for_label(view, &label);
        Ok(Output::Unit)
    });
}

fn set_field_view(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    identifier: String,
    content: Option<ViewContent>,
    result: CommandResult,
) {
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let Some(overlay) = advanced_overlay(&target, view_id) else {
            return Ok(Output::Unit);
        };
        let Some((label, field)) = target.session().label_and_field(&identifier) else {
            debug!(identifier = %identifier, "field left the session, view not placed");
            return Ok(Output::Unit);
        };
        let view = content.map(|content| build_view(&target, &identifier, content));
        install_view(
            &target,
            &identifier,
            view.as_ref(),
            json!({
                "label": label.to_json().to_string(),
                "field": field.to_json().to_string(),
            }),
        );
        overlay.set_view_for_field(view, &field, &label);
        Ok(Output::Unit)
    });
}

/// Handle SetViewForLabel.
pub fn set_view_for_label(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    tracking_id: TrackingId,
    view_json: Option<String>,
    result: CommandResult,
) {
    set_label_view(module, view_id, tracking_id, view_json.map(ViewContent::Json), result);
}

/// Handle SetViewForLabelFromBytes.
pub fn set_view_for_label_from_bytes(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    tracking_id: TrackingId,
    view_bytes: Option<Vec<u8>>,
    result: CommandResult,
) {
    set_label_view(module, view_id, tracking_id, view_bytes.map(ViewContent::Bytes), result);
}

/// Handle SetViewForField.
pub fn set_view_for_field(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    identifier: String,
    view_json: Option<String>,
    result: CommandResult,
) {
    set_field_view(module, view_id, identifier, view_json.map(ViewContent::Json), result);
}

/// Handle SetViewForFieldFromBytes.
pub fn set_view_for_field_from_bytes(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    identifier: String,
    view_bytes: Option<Vec<u8>>,
    result: CommandResult,
) {
    set_field_view(module, view_id, identifier, view_bytes.map(ViewContent::Bytes), result);
}

// =============================================================================
// Anchors and offsets
// =============================================================================

/// Handle SetAnchorForLabel.
pub fn set_anchor_for_label(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    tracking_id: TrackingId,
    anchor_json: &str,
    result: CommandResult,
) {
    let anchor = match convert_result(Anchor::from_json("anchorJson", anchor_json)) {
        Ok(anchor) => anchor,
        Err(e) => return result.reject(e),
    };
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let overlay = advanced_overlay(&target, view_id);
        let label = target.session().label(tracking_id);
        if let (Some(overlay), Some(label)) = (overlay, label) {
            overlay.set_anchor_for_label(anchor, &label);
        }
        Ok(Output::Unit)
    });
}

/// Handle SetAnchorForField.
pub fn set_anchor_for_field(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    identifier: String,
    anchor_json: &str,
    result: CommandResult,
) {
    let anchor = match convert_result(Anchor::from_json("anchorJson", anchor_json)) {
        Ok(anchor) => anchor,
        Err(e) => return result.reject(e),
    };
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let overlay = advanced_overlay(&target, view_id);
        let found = target.session().label_and_field(&identifier);
        if let (Some(overlay), Some((label, field))) = (overlay, found) {
            overlay.set_anchor_for_field(anchor, &field, &label);
        }
        Ok(Output::Unit)
    });
}

/// Handle SetOffsetForLabel.
pub fn set_offset_for_label(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    tracking_id: TrackingId,
    offset_json: &str,
    result: CommandResult,
) {
    let offset = match convert_result(PointWithUnit::from_json("offsetJson", offset_json)) {
        Ok(offset) => offset,
        Err(e) => return result.reject(e),
    };
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let overlay = advanced_overlay(&target, view_id);
        let label = target.session().label(tracking_id);
        if let (Some(overlay), Some(label)) = (overlay, label) {
            overlay.set_offset_for_label(offset, &label);
        }
        Ok(Output::Unit)
    });
}

/// Handle SetOffsetForField.
pub fn set_offset_for_field(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    identifier: String,
    offset_json: &str,
    result: CommandResult,
) {
    let offset = match convert_result(PointWithUnit::from_json("offsetJson", offset_json)) {
        Ok(offset) => offset,
        Err(e) => return result.reject(e),
    };
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let overlay = advanced_overlay(&target, view_id);
        let found = target.session().label_and_field(&identifier);
        if let (Some(overlay), Some((label, field))) = (overlay, found) {
            overlay.set_offset_for_field(offset, &field, &label);
        }
        Ok(Output::Unit)
    });
}

// =============================================================================
// Overlay
// =============================================================================

/// Handle ClearLabelViews.
pub fn clear_label_views(module: &Arc<LabelCaptureModule>, view_id: ViewId, result: CommandResult) {
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        if let Some(overlay) = advanced_overlay(&target, view_id) {
            overlay.clear_tracked_views();
            if let Some(cache) = target.view_cache() {
                cache.clear();
            }
        }
        Ok(Output::Unit)
    });
}

/// Handle AddAdvancedOverlayListener and RemoveAdvancedOverlayListener.
pub fn set_listener(module: &Arc<LabelCaptureModule>, view_id: ViewId, attach: bool, result: CommandResult) {
    let target = Arc::clone(module);
    let listener = module.advanced_listener();
    if attach {
        listener.enable();
    } else {
        listener.disable();
    }
    module.run_on_main(result, move || {
        if let Some(overlay) = advanced_overlay(&target, view_id) {
            if attach {
                overlay.set_delegate(Some(listener));
            } else {
                overlay.set_delegate(None);
            }
        }
        Ok(if attach { Output::Retained } else { Output::Unit })
    });
}
