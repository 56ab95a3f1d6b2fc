//! Frame data handed over with a session update, and the cache exposing it.
//!
//! While the host handles a session-update event it may ask for the frame
//! that produced it, identified by the `frameId` in the payload. The entry
//! lives exactly as long as the callback: [`FrameCache::insert`] returns a
//! [`FrameHandle`] that removes the entry when dropped.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

/// Metadata of one processed camera frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Clockwise rotation in degrees needed to display the frame upright
    #[serde(default)]
    pub orientation: u32,
    /// Capture timestamp in milliseconds
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl FrameData {
    /// Frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        FrameData {
            width,
            height,
            ..Default::default()
        }
    }
}

/// Frames currently exposed to the host, by generated id.
#[derive(Debug, Default)]
pub struct FrameCache {
    frames: DashMap<String, Arc<FrameData>>,
}

impl FrameCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a frame under a fresh id.
    pub fn insert(self: &Arc<Self>, frame: FrameData) -> FrameHandle {
        let id = Uuid::new_v4().to_string();
        self.frames.insert(id.clone(), Arc::new(frame));
        trace!(frame_id = %id, "cached frame");
        FrameHandle {
            cache: Arc::clone(self),
            id,
        }
    }

    /// Frame stored under `id`.
    pub fn get(&self, id: &str) -> Option<Arc<FrameData>> {
        self.frames.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove the frame stored under `id`.
    pub fn remove(&self, id: &str) -> Option<Arc<FrameData>> {
        self.frames.remove(id).map(|(_, frame)| frame)
    }

    /// Number of cached frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame is cached.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every cached frame.
    pub fn clear(&self) {
        self.frames.clear();
    }
}

/// Keeps a cached frame alive; removes it on drop.
#[derive(Debug)]
pub struct FrameHandle {
    cache: Arc<FrameCache>,
    id: String,
}

impl FrameHandle {
    /// Id put in the event payload.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.cache.remove(&self.id);
        trace!(frame_id = %self.id, "released frame");
    }
}
