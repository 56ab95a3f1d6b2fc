//! Labelbridge - session identity cache and command protocol for label capture
//!
//! Labelbridge sits between a native label capture SDK (the Vision Engine)
//! and a cross-platform host. The Vision Engine publishes one session per
//! processed frame; the host refers back to labels and fields of that frame
//! by tracking id or field key (`<trackingId>§<fieldName>`) in method calls.
//!
//! # Quick Start
//!
//! ```ignore
//! use labelbridge::{BridgeConfig, BufferedEmitter, Executor, LabelCaptureModule, MethodCall, ViewRegistry};
//!
//! let module = LabelCaptureModule::new(BridgeConfig::default(), emitter, deserializer, views)?;
//! module.on_start();
//!
//! // Vision Engine lifecycle
//! module.add_mode(r#"{"type":"labelCapture","modeId":1,"hasListeners":true}"#);
//!
//! // Host method calls
//! let executor = Executor::new(module);
//! executor.dispatch(
//!     MethodCall::new("setLabelCaptureModeEnabledState", json!({"modeId": 1, "isEnabled": false})),
//!     Box::new(|outcome| println!("{:?}", outcome)),
//! );
//! ```
//!
//! # Architecture
//!
//! All host calls go through the [`Executor`], which answers each one exactly
//! once. Shared state (session holder, mode registry, acknowledgement slot,
//! main context) and the Vision Engine interface live in internal crates;
//! only the executor API and the collaborator types a host implements are
//! exposed here.

// Re-export the public API from labelbridge-executor
pub use labelbridge_executor::*;
