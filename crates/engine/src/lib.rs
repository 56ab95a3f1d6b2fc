//! Vision Engine collaborator interface for Labelbridge
//!
//! The native SDK is opaque to the bridge. This crate names everything the
//! bridge needs from it, and nothing more:
//! - NativeMode and the overlay traits: objects the SDK builds from JSON
//! - Overlay: tagged union over the four overlay kinds
//! - Delegate traits: callbacks the SDK invokes on the bridge
//! - LabelCaptureDeserializer: mode and overlay construction
//! - DataCaptureView / ViewRegistry: host views owning overlays
//! - ModeCreationData / OverlayCreationData: lifecycle payload parsing
//! - FrameCache: frame handles exposed to the host during a session update
//! - BridgeConfig: `labelbridge.toml` settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod creation;
pub mod delegate;
pub mod deserializer;
pub mod frame;
pub mod native;
pub mod view;

pub use config::{BridgeConfig, CONFIG_FILE_NAME};
pub use creation::{mode_identity, ModeCreationData, OverlayCreationData, OverlayType, LABEL_CAPTURE_MODE_TYPE};
pub use delegate::{
    AdaptiveRecognitionDelegate, AdvancedOverlayDelegate, BasicOverlayDelegate,
    LabelCaptureListener, ValidationFlowDelegate,
};
pub use deserializer::LabelCaptureDeserializer;
pub use frame::{FrameCache, FrameData, FrameHandle};
pub use native::{
    AdaptiveRecognitionOverlay, AdvancedOverlay, BasicOverlay, NativeMode, Overlay, OverlayKind,
    ValidationFlowOverlay,
};
pub use view::{DataCaptureView, LabelView, TapHandler, ViewContent, ViewRegistry};
