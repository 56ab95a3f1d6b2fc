//! Shared state crossing the Vision Engine / host dispatch boundary
//!
//! This crate holds the only mutable state touched by both threads of
//! control:
//! - SessionHolder: single-slot cell with the latest SessionSnapshot
//! - ModeRegistry: live modes by id and parent id, plus the pending action
//!   queue replayed when a mode is constructed
//! - Rendezvous: single-slot blocking acknowledgement for session updates
//! - MainContext: the single serial context for overlay mutation
//!
//! All locks are `parking_lot` locks; none of them are held while user
//! callbacks run.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod main_context;
pub mod registry;
pub mod rendezvous;
pub mod session_holder;

pub use main_context::{MainContext, MainContextStats, SubmitError};
pub use registry::{ActionError, ModeRegistry, PendingAction, PendingKey, Registered};
pub use rendezvous::Rendezvous;
pub use session_holder::SessionHolder;
