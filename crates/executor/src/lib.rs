//! # Labelbridge Executor
//!
//! Host-facing half of the label capture bridge.
//!
//! This crate provides:
//! - [`LabelCaptureModule`] - owner of the session holder, mode registry,
//!   main context and view cache, driven by Vision Engine lifecycle calls
//! - [`Executor`] - turns host [`MethodCall`]s into typed [`Command`]s and
//!   answers them through a [`CommandResult`]
//! - [`Emitter`] - the asynchronous event channel back to the host
//! - Event bridges ([`listeners`]) installed on native modes and overlays
//!
//! ## Quick Start
//!
//! ```text
//! let module = LabelCaptureModule::new(config, emitter, deserializer, views)?;
//! module.on_start();
//! module.add_mode(r#"{"type":"labelCapture","modeId":1,"hasListeners":true}"#);
//!
//! let executor = Executor::new(module);
//! executor.dispatch(
//!     MethodCall::new("finishLabelCaptureListenerDidUpdateSession", json!({"modeId":1,"isEnabled":true})),
//!     Box::new(|outcome| host.answer(outcome)),
//! );
//! ```
//!
//! ## Results
//!
//! | Outcome | Host sees |
//! |---------|-----------|
//! | `Ok(Output::Unit)` | success |
//! | `Ok(Output::Value(v))` | success with `v` |
//! | `Ok(Output::Retained)` | success, callback kept for events |
//! | `Err(e)` | error `e.code()`, `e.message()`, `e.details()` |
//!
//! A label, field, mode, view or overlay that no longer exists is never an
//! error: the frame that produced the reference has simply been superseded.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arguments;
mod callbacks;
mod command;
mod convert;
mod emitter;
mod error;
mod events;
mod executor;
mod module;
mod output;
mod registry;
mod result;

pub mod listeners;
pub mod logging;
pub mod mode;
pub mod view_cache;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API
// =============================================================================

pub use arguments::{Arguments, MethodCall};
pub use callbacks::{CallbackRegistry, EventScope};
pub use command::Command;
pub use emitter::{BufferedEmitter, EmitError, Emitter, Event};
pub use error::Error;
pub use events::LabelCaptureEvent;
pub use executor::{Dispatch, Executor};
pub use module::LabelCaptureModule;
pub use output::Output;
pub use registry::{CommandConstructor, CommandRegistry};
pub use result::{CommandResult, Responder};

// Re-export the collaborator interface so hosts need a single dependency
pub use labelbridge_core::{
    Anchor, Brush, CapturedLabel, FieldKey, LabelCaptureSession, LabelField, ModeId, PointWithUnit,
    SessionSnapshot, TrackingId, ViewId,
};
pub use labelbridge_engine::{BridgeConfig, DataCaptureView, FrameData, LabelCaptureDeserializer, ViewRegistry};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
