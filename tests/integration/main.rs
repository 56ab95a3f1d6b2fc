//! Integration Tests
//!
//! End-to-end scenarios driving the bridge from both sides at once: a
//! simulated Vision Engine thread producing frames and a simulated host
//! dispatching method calls and answering events.
//! - Session flow: the per-frame acknowledgement round trip
//! - Addressing: tracking ids and field keys across superseded frames
//! - Lifecycle: construction order, pending replay, disposal, configuration

#[path = "../common/mod.rs"]
mod common;

mod addressing;
mod lifecycle;
mod session_flow;
