//! Core types for Labelbridge
//!
//! This crate defines the values that cross the boundary between the label
//! capture SDK and the host bridge:
//! - CapturedLabel / LabelField: what one processed frame recognized
//! - LabelCaptureSession: the raw per-frame result handed over by the SDK
//! - SessionSnapshot: immutable per-frame index of labels and fields
//! - FieldKey: composite `<trackingId>§<fieldName>` addressing codec
//! - Brush, Anchor, PointWithUnit: overlay payloads parsed from host JSON
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod label;
pub mod payload;
pub mod session;
pub mod types;

pub use error::{Error, Result};
pub use key::{FieldKey, FIELD_KEY_SEPARATOR};
pub use label::{BarcodeData, CapturedLabel, LabelField, LabelFieldState, LabelFieldType};
pub use payload::{Anchor, Brush, Color, FloatWithUnit, MeasureUnit, PointWithUnit};
pub use session::{LabelCaptureSession, SessionSnapshot};
pub use types::{ModeId, TrackingId, ViewId};
