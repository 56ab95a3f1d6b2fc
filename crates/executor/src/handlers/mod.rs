//! Command handlers organized by addressed component.
//!
//! | Module | Commands | Addressed by |
//! |--------|----------|--------------|
//! | `mode` | 7 | mode id |
//! | `advanced_overlay` | 12 | data capture view id |
//! | `basic_overlay` | 5 | data capture view id |
//! | `validation_flow` | 3 | data capture view id |
//! | `adaptive_recognition` | 3 | data capture view id |
//!
//! Handlers that only read shared state return `Result<Output>`. Handlers
//! that mutate an overlay take the [`CommandResult`](crate::CommandResult)
//! and answer it from the main context. A label, field, mode, view or
//! overlay that cannot be found is a stale reference: the handler succeeds
//! without touching the SDK.

pub mod adaptive_recognition;
pub mod advanced_overlay;
pub mod basic_overlay;
pub mod mode;
pub mod validation_flow;

use std::sync::Arc;

use labelbridge_core::ViewId;
use labelbridge_engine::OverlayKind;
use tracing::debug;

use crate::{CommandResult, LabelCaptureModule, Output};

/// Replace the first overlay of `kind` on `view_id` with one built from
/// `overlay_json`.
///
/// Runs on the main context. The new overlay goes through the same path as
/// one announced by the Vision Engine, so it is bound to the view's mode and
/// gets its delegate when the JSON asks for one.
pub(crate) fn replace_overlay(
    module: &Arc<LabelCaptureModule>,
    view_id: ViewId,
    kind: OverlayKind,
    overlay_json: String,
    result: CommandResult,
) {
    let target = Arc::clone(module);
    module.run_on_main(result, move || {
        let Some(view) = target.view(view_id) else {
            return Ok(Output::Unit);
        };
        let Some(existing) = view.find_first(kind) else {
            debug!(view_id, ?kind, "no overlay to replace");
            return Ok(Output::Unit);
        };
        view.remove_overlay(&existing);
        target.add_overlay(&overlay_json, view);
        Ok(Output::Unit)
    });
}
