//! Event bridges: native delegate callbacks forwarded to the host.
//!
//! | Module | Native interface | Answer when gated |
//! |--------|------------------|-------------------|
//! | `session` | `LabelCaptureListener` | the mode's current enabled state |
//! | `basic` | `BasicOverlayDelegate` | no brush |
//! | `advanced` | `AdvancedOverlayDelegate` | no view, center, zero offset |
//! | `validation_flow` | `ValidationFlowDelegate` | - |
//! | `adaptive_recognition` | `AdaptiveRecognitionDelegate` | - |
//!
//! Every callback first checks its listener's own enable flag, toggled by the
//! add/remove listener commands, then whether the host listens for the event.
//! Only the session listener waits for the host.

pub mod adaptive_recognition;
pub mod advanced;
pub mod basic;
pub mod session;
pub mod validation_flow;

pub use adaptive_recognition::AdaptiveRecognitionListener;
pub use advanced::AdvancedOverlayListener;
pub use basic::BasicOverlayListener;
pub use session::{PublishHook, SessionListener};
pub use validation_flow::ValidationFlowListener;
