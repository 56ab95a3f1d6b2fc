//! Per-frame session values
//!
//! `LabelCaptureSession` is what the SDK hands over for one processed frame.
//! `SessionSnapshot` is the immutable index built from it once, inside the
//! session-update callback, and then published to the session holder.
//!
//! ## Invariants
//!
//! - Every key in the field index decodes to a tracking id that identifies
//!   exactly one label of the same snapshot.
//! - A snapshot is never mutated after construction. Newer frames produce new
//!   snapshots; nothing is merged.
//! - When the SDK reports the same tracking id twice in one frame, the first
//!   label wins and the duplicate is left out of both indexes.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::key::{self, FieldKey};
use crate::label::{CapturedLabel, LabelField};
use crate::types::TrackingId;

/// Raw result of one processed frame, as reported by the SDK.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCaptureSession {
    /// Labels detected in the frame
    pub captured_labels: Vec<CapturedLabel>,
    /// Monotonic frame counter of the SDK
    #[serde(default)]
    pub frame_sequence_id: i64,
}

impl LabelCaptureSession {
    /// Create a session from its labels.
    pub fn new(frame_sequence_id: i64, captured_labels: Vec<CapturedLabel>) -> Self {
        LabelCaptureSession {
            captured_labels,
            frame_sequence_id,
        }
    }
}

/// Immutable, indexed view of one frame's labels and fields.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    session: LabelCaptureSession,
    labels: Vec<Arc<CapturedLabel>>,
    by_tracking_id: HashMap<TrackingId, usize>,
    fields: HashMap<String, (usize, usize)>,
}

impl SessionSnapshot {
    /// Build the snapshot and its field-key index.
    pub fn new(session: LabelCaptureSession) -> Self {
        let mut labels = Vec::with_capacity(session.captured_labels.len());
        let mut by_tracking_id = HashMap::with_capacity(session.captured_labels.len());
        let mut fields = HashMap::new();

        for label in &session.captured_labels {
            if by_tracking_id.contains_key(&label.tracking_id) {
                continue;
            }
            let label_index = labels.len();
            by_tracking_id.insert(label.tracking_id, label_index);
            for (field_index, field) in label.fields.iter().enumerate() {
                fields
                    .entry(FieldKey::encode(label.tracking_id, &field.name).into_string())
                    .or_insert((label_index, field_index));
            }
            labels.push(Arc::new(label.clone()));
        }

        SessionSnapshot {
            session,
            labels,
            by_tracking_id,
            fields,
        }
    }

    /// The raw session this snapshot was built from.
    pub fn session(&self) -> &LabelCaptureSession {
        &self.session
    }

    /// Frame counter of the underlying session.
    pub fn frame_sequence_id(&self) -> i64 {
        self.session.frame_sequence_id
    }

    /// Labels in SDK order, without duplicates.
    pub fn labels(&self) -> &[Arc<CapturedLabel>] {
        &self.labels
    }

    /// Look up a label by tracking id.
    pub fn label(&self, tracking_id: TrackingId) -> Option<&Arc<CapturedLabel>> {
        self.by_tracking_id.get(&tracking_id).map(|&i| &self.labels[i])
    }

    /// Look up a field by its composite key.
    pub fn field(&self, key: &str) -> Option<&LabelField> {
        let (label_index, field_index) = self.lookup(key)?;
        self.labels[label_index].fields.get(field_index)
    }

    /// Look up the label owning the field addressed by `key`.
    ///
    /// Only the tracking id prefix is consulted; the field itself need not exist.
    pub fn label_by_field_key(&self, key: &str) -> Option<&Arc<CapturedLabel>> {
        let (tracking_id, _) = key::decode(key).ok()?;
        self.label(tracking_id)
    }

    /// Look up a field of a label by name.
    pub fn field_of(&self, tracking_id: TrackingId, field_name: &str) -> Option<&LabelField> {
        self.field(FieldKey::encode(tracking_id, field_name).as_str())
    }

    /// Resolve a key to both its label and its field.
    pub fn label_and_field(&self, key: &str) -> Option<(&Arc<CapturedLabel>, &LabelField)> {
        let (label_index, field_index) = self.lookup(key)?;
        let label = &self.labels[label_index];
        label.fields.get(field_index).map(|field| (label, field))
    }

    /// All field keys in the index.
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the frame detected no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// JSON form of the session, as put in the session-update event.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.session).unwrap_or(serde_json::Value::Null)
    }

    fn lookup(&self, key: &str) -> Option<(usize, usize)> {
        self.fields.get(key).copied()
    }
}

impl From<LabelCaptureSession> for SessionSnapshot {
    fn from(session: LabelCaptureSession) -> Self {
        SessionSnapshot::new(session)
    }
}
