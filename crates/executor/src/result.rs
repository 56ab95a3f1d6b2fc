//! Completion handle of one host call.
//!
//! A [`CommandResult`] is consumed by exactly one of
//! [`success`](CommandResult::success),
//! [`success_with`](CommandResult::success_with),
//! [`success_keep_callback`](CommandResult::success_keep_callback),
//! [`reject`](CommandResult::reject) or [`complete`](CommandResult::complete),
//! so a command can neither answer twice nor answer both ways. A handle
//! dropped unanswered (for example inside a discarded pending action)
//! completes with plain success and logs a warning, so the host never waits
//! forever on a call.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{trace, warn};

use crate::callbacks::{CallbackRegistry, EventScope};
use crate::events::LabelCaptureEvent;
use crate::{Error, Output, Result};

/// Receives the outcome of a host call.
pub type Responder = Box<dyn FnOnce(Result<Output>) + Send>;

/// One-shot completion handle passed to every command.
pub struct CommandResult {
    method: String,
    responder: Option<Responder>,
    callbacks: Arc<CallbackRegistry>,
}

impl CommandResult {
    /// Wrap the host's responder for `method`.
    pub fn new(method: impl Into<String>, callbacks: Arc<CallbackRegistry>, responder: Responder) -> Self {
        CommandResult {
            method: method.into(),
            responder: Some(responder),
            callbacks,
        }
    }

    /// Method this handle answers.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Declare events the host should expect for `scope`.
    pub fn register_callback_for_events(&self, scope: EventScope, events: &[LabelCaptureEvent]) {
        self.callbacks.register(scope, events);
    }

    /// Withdraw events previously declared for `scope`.
    pub fn unregister_callback_for_events(&self, scope: EventScope, events: &[LabelCaptureEvent]) {
        self.callbacks.unregister(scope, events);
    }

    /// Complete with no payload.
    pub fn success(self) {
        self.complete(Ok(Output::Unit));
    }

    /// Complete with a payload.
    pub fn success_with(self, value: Value) {
        self.complete(Ok(Output::Value(value)));
    }

    /// Complete, keeping the host callback for subsequent events.
    pub fn success_keep_callback(self) {
        self.complete(Ok(Output::Retained));
    }

    /// Complete with an error.
    pub fn reject(self, error: Error) {
        self.complete(Err(error));
    }

    /// Complete with `outcome`.
    pub fn complete(mut self, outcome: Result<Output>) {
        if let Err(e) = &outcome {
            warn!(method = %self.method, code = e.code(), error = %e, "command rejected");
        } else {
            trace!(method = %self.method, "command succeeded");
        }
        if let Some(responder) = self.responder.take() {
            responder(outcome);
        }
    }
}

impl Drop for CommandResult {
    fn drop(&mut self) {
        if let Some(responder) = self.responder.take() {
            warn!(method = %self.method, "command dropped without an answer, completing with success");
            responder(Ok(Output::Unit));
        }
    }
}

impl fmt::Debug for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResult")
            .field("method", &self.method)
            .field("answered", &self.responder.is_none())
            .finish()
    }
}
