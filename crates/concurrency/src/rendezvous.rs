//! Single-slot blocking rendezvous
//!
//! Used by the session-update bridge: the Vision Engine thread arms the slot,
//! emits the event to the host and blocks in [`Rendezvous::wait`] until the
//! host's "finish" command calls [`Rendezvous::send`]. This bounds the number
//! of in-flight session updates per mode to one.
//!
//! ## Semantics
//!
//! - `arm` opens the slot for exactly one value and must precede the emit, so
//!   an acknowledgement racing ahead of `wait` is not lost.
//! - `send` fills the slot only while it is armed and empty. Late or duplicate
//!   acknowledgements are dropped and reported as `false`.
//! - `release` fills an armed slot with a default value, overriding nothing
//!   already delivered. It is how disposal unblocks a waiting thread.
//! - There is no timeout in [`wait`](Rendezvous::wait); a host that never
//!   acknowledges stalls the waiter. [`wait_timeout`](Rendezvous::wait_timeout)
//!   exists for tests and diagnostics.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct Slot<T> {
    armed: bool,
    value: Option<T>,
}

/// Single-slot channel with a force-release.
#[derive(Debug)]
pub struct Rendezvous<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

impl<T> Default for Rendezvous<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Rendezvous<T> {
    /// Create a disarmed rendezvous.
    pub fn new() -> Self {
        Rendezvous {
            slot: Mutex::new(Slot {
                armed: false,
                value: None,
            }),
            ready: Condvar::new(),
        }
    }

    /// Open the slot for one value, discarding anything stale.
    pub fn arm(&self) {
        let mut slot = self.slot.lock();
        slot.armed = true;
        slot.value = None;
    }

    /// Cancel an armed slot without delivering anything.
    pub fn disarm(&self) {
        let mut slot = self.slot.lock();
        slot.armed = false;
        slot.value = None;
    }

    /// Whether a waiter is expected or blocked.
    pub fn is_armed(&self) -> bool {
        self.slot.lock().armed
    }

    /// Deliver `value` to the armed slot. Returns whether it was accepted.
    pub fn send(&self, value: T) -> bool {
        let mut slot = self.slot.lock();
        if !slot.armed || slot.value.is_some() {
            return false;
        }
        slot.value = Some(value);
        self.ready.notify_all();
        true
    }

    /// Unblock a waiter with `default`, if one is armed and not yet served.
    pub fn release(&self, default: T) -> bool {
        self.send(default)
    }

    /// Block until a value is delivered, then disarm.
    ///
    /// Returns `None` immediately if the slot is not armed.
    pub fn wait(&self) -> Option<T> {
        let mut slot = self.slot.lock();
        if !slot.armed {
            return None;
        }
        while slot.value.is_none() {
            self.ready.wait(&mut slot);
        }
        slot.armed = false;
        slot.value.take()
    }

    /// Like [`wait`](Self::wait), giving up after `timeout`.
    ///
    /// On timeout the slot stays armed, so a later acknowledgement is still
    /// accepted and a later `wait` still receives it.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.slot.lock();
        if !slot.armed {
            return None;
        }
        while slot.value.is_none() {
            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                break;
            }
        }
        let value = slot.value.take()?;
        slot.armed = false;
        Some(value)
    }
}
