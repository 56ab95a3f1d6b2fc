//! Outbound event channel to the host.
//!
//! The host implements [`Emitter`]. [`BufferedEmitter`] is an in-process
//! implementation that records events and lets a consumer wait for them; it
//! backs tests and hosts that poll instead of receiving pushes.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::events::LabelCaptureEvent;

/// Reasons an event could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// The host side of the channel is gone
    #[error("event channel closed")]
    Closed,
    /// The host refused the event
    #[error("event rejected: {0}")]
    Rejected(String),
}

/// An event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event name
    pub name: String,
    /// JSON payload; entity fields are JSON strings
    pub payload: Value,
}

impl Event {
    /// Parse a payload field that carries a JSON string.
    pub fn payload_json(&self, field: &str) -> Option<Value> {
        let raw = self.payload.get(field)?.as_str()?;
        serde_json::from_str(raw).ok()
    }
}

/// Sends events to the host.
pub trait Emitter: Send + Sync {
    /// Deliver an event.
    fn emit(&self, name: &str, payload: Value) -> Result<(), EmitError>;

    /// Whether the host currently listens for `name`.
    fn has_listener(&self, name: &str) -> bool;
}

/// Helpers over [`Emitter`] keyed by [`LabelCaptureEvent`].
pub(crate) trait EmitterExt {
    fn has_listener_for(&self, event: LabelCaptureEvent) -> bool;

    /// Emit when the host listens, logging delivery failures. Returns whether
    /// the event went out.
    fn emit_if_listened(&self, event: LabelCaptureEvent, payload: Value) -> bool;
}

impl<E: Emitter + ?Sized> EmitterExt for E {
    fn has_listener_for(&self, event: LabelCaptureEvent) -> bool {
        self.has_listener(event.name())
    }

    fn emit_if_listened(&self, event: LabelCaptureEvent, payload: Value) -> bool {
        if !self.has_listener_for(event) {
            return false;
        }
        match self.emit(event.name(), payload) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(event = %event, error = %e, "failed to emit event");
                false
            }
        }
    }
}

#[derive(Debug, Default)]
struct Buffer {
    listeners: HashSet<String>,
    events: VecDeque<Event>,
    closed: bool,
}

/// Emitter that queues events in memory.
///
/// `has_listener` answers from an explicit listener set, so a consumer
/// subscribes with [`listen`](Self::listen) before events flow.
#[derive(Debug, Default)]
pub struct BufferedEmitter {
    buffer: Mutex<Buffer>,
    arrived: Condvar,
}

impl BufferedEmitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `name`.
    pub fn listen(&self, name: impl Into<String>) {
        self.buffer.lock().listeners.insert(name.into());
    }

    /// Subscribe to several events.
    pub fn listen_all(&self, events: &[LabelCaptureEvent]) {
        let mut buffer = self.buffer.lock();
        for event in events {
            buffer.listeners.insert(event.name().to_string());
        }
    }

    /// Unsubscribe from `name`.
    pub fn unlisten(&self, name: &str) {
        self.buffer.lock().listeners.remove(name);
    }

    /// Refuse every further event.
    pub fn close(&self) {
        self.buffer.lock().closed = true;
        self.arrived.notify_all();
    }

    /// Remove and return everything queued.
    pub fn take(&self) -> Vec<Event> {
        self.buffer.lock().events.drain(..).collect()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.buffer.lock().events.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().events.is_empty()
    }

    /// Remove and return the first queued event named `name`, waiting up to
    /// `timeout` for it to arrive.
    pub fn wait_for(&self, name: &str, timeout: Duration) -> Option<Event> {
        let deadline = Instant::now() + timeout;
        let mut buffer = self.buffer.lock();
        loop {
            if let Some(index) = buffer.events.iter().position(|e| e.name == name) {
                return buffer.events.remove(index);
            }
            if buffer.closed || self.arrived.wait_until(&mut buffer, deadline).timed_out() {
                return buffer
                    .events
                    .iter()
                    .position(|e| e.name == name)
                    .and_then(|index| buffer.events.remove(index));
            }
        }
    }
}

impl Emitter for BufferedEmitter {
    fn emit(&self, name: &str, payload: Value) -> Result<(), EmitError> {
        let mut buffer = self.buffer.lock();
        if buffer.closed {
            return Err(EmitError::Closed);
        }
        buffer.events.push_back(Event {
            name: name.to_string(),
            payload,
        });
        self.arrived.notify_all();
        Ok(())
    }

    fn has_listener(&self, name: &str) -> bool {
        self.buffer.lock().listeners.contains(name)
    }
}
