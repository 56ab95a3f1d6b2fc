//! Command registration table: method name to command constructor.
//!
//! Every entry of the default table is part of the host protocol. A
//! constructor reads the argument bag in a fixed order and fails with
//! `MISSING_PARAMETER` on the first required argument that is absent, of the
//! wrong type, or an empty string. No native call happens before that.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{Arguments, Command, Error, Result};

/// Builds a [`Command`] from an argument bag.
pub type CommandConstructor = Arc<dyn Fn(&Arguments) -> Result<Command> + Send + Sync>;

type DefaultConstructor = fn(&Arguments) -> Result<Command>;

const VIEW_ID: &str = "dataCaptureViewId";
const MODE_ID: &str = "modeId";
const TRACKING_ID: &str = "trackingId";
const IDENTIFIER: &str = "identifier";

static DEFAULT_COMMANDS: Lazy<Vec<(&'static str, DefaultConstructor)>> = Lazy::new(|| {
    vec![
        // Mode
        entry("finishLabelCaptureListenerDidUpdateSession", |a| {
            Ok(Command::FinishDidUpdateSession {
                mode_id: a.required_i64(MODE_ID)?,
                is_enabled: a.required_bool("isEnabled")?,
            })
        }),
        entry("addLabelCaptureListener", |a| {
            Ok(Command::AddListener {
                mode_id: a.required_i64(MODE_ID)?,
            })
        }),
        entry("removeLabelCaptureListener", |a| {
            Ok(Command::RemoveListener {
                mode_id: a.required_i64(MODE_ID)?,
            })
        }),
        entry("setLabelCaptureModeEnabledState", |a| {
            Ok(Command::SetModeEnabledState {
                mode_id: a.required_i64(MODE_ID)?,
                enabled: a.required_bool("isEnabled")?,
            })
        }),
        entry("updateLabelCaptureMode", |a| {
            let mode_json = a.required_str("modeJson")?;
            Ok(Command::UpdateMode {
                mode_id: mode_id_of(&mode_json)?,
                mode_json,
            })
        }),
        entry("updateLabelCaptureSettings", |a| {
            Ok(Command::UpdateSettings {
                mode_id: a.required_i64(MODE_ID)?,
                settings_json: a.required_str("settingsJson")?,
            })
        }),
        entry("updateLabelCaptureFeedback", |a| {
            Ok(Command::UpdateFeedback {
                mode_id: a.required_i64(MODE_ID)?,
                feedback_json: a.required_str("feedbackJson")?,
            })
        }),
        // Advanced overlay
        entry("setViewForCapturedLabel", |a| {
            Ok(Command::SetViewForLabel {
                view_id: a.required_i64(VIEW_ID)?,
                tracking_id: a.required_i64(TRACKING_ID)?,
                view_json: a.optional_str("viewJson")?,
            })
        }),
        entry("setViewForCapturedLabelFromBytes", |a| {
            Ok(Command::SetViewForLabelFromBytes {
                view_id: a.required_i64(VIEW_ID)?,
                tracking_id: a.required_i64(TRACKING_ID)?,
                view_bytes: a.optional_bytes("viewBytes")?,
            })
        }),
        entry("setViewForCapturedLabelField", |a| {
            Ok(Command::SetViewForField {
                view_id: a.required_i64(VIEW_ID)?,
                identifier: a.required_str(IDENTIFIER)?,
                view_json: a.optional_str("viewJson")?,
            })
        }),
        entry("setViewForCapturedLabelFieldFromBytes", |a| {
            Ok(Command::SetViewForFieldFromBytes {
                view_id: a.required_i64(VIEW_ID)?,
                identifier: a.required_str(IDENTIFIER)?,
                view_bytes: a.optional_bytes("viewBytes")?,
            })
        }),
        entry("setAnchorForCapturedLabel", |a| {
            Ok(Command::SetAnchorForLabel {
                view_id: a.required_i64(VIEW_ID)?,
                anchor_json: a.required_str("anchorJson")?,
                tracking_id: a.required_i64(TRACKING_ID)?,
            })
        }),
        entry("setAnchorForCapturedLabelField", |a| {
            Ok(Command::SetAnchorForField {
                view_id: a.required_i64(VIEW_ID)?,
                anchor_json: a.required_str("anchorJson")?,
                identifier: a.required_str(IDENTIFIER)?,
            })
        }),
        entry("setOffsetForCapturedLabel", |a| {
            Ok(Command::SetOffsetForLabel {
                view_id: a.required_i64(VIEW_ID)?,
                offset_json: a.required_str("offsetJson")?,
                tracking_id: a.required_i64(TRACKING_ID)?,
            })
        }),
        entry("setOffsetForCapturedLabelField", |a| {
            Ok(Command::SetOffsetForField {
                view_id: a.required_i64(VIEW_ID)?,
                offset_json: a.required_str("offsetJson")?,
                identifier: a.required_str(IDENTIFIER)?,
            })
        }),
        entry("clearCapturedLabelViews", |a| {
            Ok(Command::ClearLabelViews {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("addLabelCaptureAdvancedOverlayListener", |a| {
            Ok(Command::AddAdvancedOverlayListener {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("removeLabelCaptureAdvancedOverlayListener", |a| {
            Ok(Command::RemoveAdvancedOverlayListener {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("updateLabelCaptureAdvancedOverlay", |a| {
            Ok(Command::UpdateAdvancedOverlay {
                view_id: a.required_i64(VIEW_ID)?,
                overlay_json: a.required_str("advancedOverlayJson")?,
            })
        }),
        // Basic overlay
        entry("addLabelCaptureBasicOverlayListener", |a| {
            Ok(Command::AddBasicOverlayListener {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("removeLabelCaptureBasicOverlayListener", |a| {
            Ok(Command::RemoveBasicOverlayListener {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("updateLabelCaptureBasicOverlay", |a| {
            Ok(Command::UpdateBasicOverlay {
                view_id: a.required_i64(VIEW_ID)?,
                overlay_json: a.required_str("basicOverlayJson")?,
            })
        }),
        entry("setLabelCaptureBasicOverlayBrushForLabel", |a| {
            Ok(Command::SetBrushForLabel {
                view_id: a.required_i64(VIEW_ID)?,
                tracking_id: a.required_i64(TRACKING_ID)?,
                brush_json: a.optional_str("brushJson")?,
            })
        }),
        entry("setLabelCaptureBasicOverlayBrushForFieldOfLabel", |a| {
            Ok(Command::SetBrushForFieldOfLabel {
                view_id: a.required_i64(VIEW_ID)?,
                field_name: a.required_str("fieldName")?,
                tracking_id: a.required_i64(TRACKING_ID)?,
                brush_json: a.optional_str("brushJson")?,
            })
        }),
        // Validation flow
        entry("registerListenerForValidationFlowEvents", |a| {
            Ok(Command::RegisterValidationFlowListener {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("unregisterListenerForValidationFlowEvents", |a| {
            Ok(Command::UnregisterValidationFlowListener {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("updateLabelCaptureValidationFlowOverlay", |a| {
            Ok(Command::UpdateValidationFlowOverlay {
                view_id: a.required_i64(VIEW_ID)?,
                overlay_json: a.required_str("overlayJson")?,
            })
        }),
        // Adaptive recognition
        entry("registerListenerForAdaptiveRecognitionOverlayEvents", |a| {
            Ok(Command::RegisterAdaptiveRecognitionListener {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("unregisterListenerForAdaptiveRecognitionOverlayEvents", |a| {
            Ok(Command::UnregisterAdaptiveRecognitionListener {
                view_id: a.required_i64(VIEW_ID)?,
            })
        }),
        entry("applyLabelCaptureAdaptiveRecognitionSettings", |a| {
            Ok(Command::ApplyAdaptiveRecognitionSettings {
                view_id: a.required_i64(VIEW_ID)?,
                overlay_json: a.required_str("overlayJson")?,
            })
        }),
    ]
});

fn entry(name: &'static str, constructor: DefaultConstructor) -> (&'static str, DefaultConstructor) {
    (name, constructor)
}

/// `modeId` embedded in a mode JSON.
fn mode_id_of(mode_json: &str) -> Result<i64> {
    let value: serde_json::Value = serde_json::from_str(mode_json)
        .map_err(|e| Error::invalid_payload("modeJson", e))?;
    value
        .get(MODE_ID)
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| Error::missing(MODE_ID))
}

/// Method name to constructor table used by the [`Executor`](crate::Executor).
#[derive(Clone)]
pub struct CommandRegistry {
    constructors: HashMap<String, CommandConstructor>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let constructors = DEFAULT_COMMANDS
            .iter()
            .map(|&(name, ctor)| (name.to_string(), Arc::new(ctor) as CommandConstructor))
            .collect();
        CommandRegistry { constructors }
    }
}

impl CommandRegistry {
    /// Registry with every default command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no commands.
    pub fn empty() -> Self {
        CommandRegistry {
            constructors: HashMap::new(),
        }
    }

    /// Register `constructor` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&Arguments) -> Result<Command> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    /// Constructor registered under `name`.
    pub fn get(&self, name: &str) -> Option<&CommandConstructor> {
        self.constructors.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered method names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.constructors.len())
            .finish()
    }
}
