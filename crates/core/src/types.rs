//! Identifier aliases shared by every layer.
//!
//! The host addresses native objects with plain integers; these aliases keep
//! signatures readable without introducing conversion friction at the
//! argument-bag boundary.

/// Opaque identifier of a label capture mode, assigned by the host.
pub type ModeId = i64;

/// Opaque identifier of a data capture view, assigned by the host.
///
/// Views may also carry a parent id that names the mode owning them; see
/// `DataCaptureView::parent_id` in the engine crate.
pub type ViewId = i64;

/// Tracking identifier of a captured label.
///
/// Stable across frames for the same physical label while it is tracked and
/// unique within one [`SessionSnapshot`](crate::SessionSnapshot).
pub type TrackingId = i64;
