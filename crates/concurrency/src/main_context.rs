//! The designated "main" execution context.
//!
//! All overlay and view mutation is marshaled onto one serial worker thread,
//! whichever thread initiated it. Work runs in submission order; one closure
//! finishes before the next starts.
//!
//! The queue is bounded. Submissions beyond capacity, or after shutdown, are
//! rejected with [`SubmitError`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{JoinHandle, ThreadId};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::{debug, error};

/// Reasons a closure could not be queued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Queue is at capacity
    #[error("main context queue is full (capacity {capacity})")]
    QueueFull {
        /// Configured capacity
        capacity: usize,
    },
    /// The context was shut down
    #[error("main context is shut down")]
    ShutDown,
    /// The closure panicked before producing a value
    #[error("main context task panicked")]
    Panicked,
}

/// Counters of the main context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainContextStats {
    /// Closures waiting to run
    pub queue_depth: usize,
    /// Closures run since creation, panicked ones included
    pub tasks_completed: u64,
}

type Work = Box<dyn FnOnce() + Send>;

type DeliverySlot<T> = (Mutex<(bool, Option<T>)>, Condvar);

/// Marks a `run_sync` slot done when dropped, value or not.
struct Delivery<T> {
    slot: Arc<DeliverySlot<T>>,
}

impl<T> Drop for Delivery<T> {
    fn drop(&mut self) {
        let (lock, cond) = &*self.slot;
        lock.lock().0 = true;
        cond.notify_all();
    }
}

struct Shared {
    queue: Mutex<VecDeque<Work>>,
    work_ready: Condvar,
    idle: Condvar,
    running: AtomicBool,
    shutdown: AtomicBool,
    queue_depth: AtomicUsize,
    tasks_completed: AtomicU64,
    capacity: usize,
}

/// Single-threaded serial executor for UI-affine work.
pub struct MainContext {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
}

impl MainContext {
    /// Spawn the worker thread.
    pub fn new(thread_name: impl Into<String>, capacity: usize) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            work_ready: Condvar::new(),
            idle: Condvar::new(),
            running: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            queue_depth: AtomicUsize::new(0),
            tasks_completed: AtomicU64::new(0),
            capacity,
        });

        let worker_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name(thread_name.into())
            .spawn(move || worker_loop(&worker_shared))?;
        let worker_id = handle.thread().id();

        Ok(MainContext {
            shared,
            worker: Mutex::new(Some(handle)),
            worker_id,
        })
    }

    /// Whether the caller is running on the main context.
    pub fn is_current(&self) -> bool {
        std::thread::current().id() == self.worker_id
    }

    /// Queue `work` to run on the main context.
    pub fn submit(&self, work: impl FnOnce() + Send + 'static) -> Result<(), SubmitError> {
        if self.shared.shutdown.load(Ordering::Acquire) {
            return Err(SubmitError::ShutDown);
        }
        {
            let mut queue = self.shared.queue.lock();
            if queue.len() >= self.shared.capacity {
                return Err(SubmitError::QueueFull {
                    capacity: self.shared.capacity,
                });
            }
            queue.push_back(Box::new(work));
            self.shared.queue_depth.store(queue.len(), Ordering::Release);
        }
        self.shared.work_ready.notify_one();
        Ok(())
    }

    /// Run `work` on the main context and wait for its result.
    ///
    /// Runs inline when already on the main context.
    pub fn run_sync<T, F>(&self, work: F) -> Result<T, SubmitError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if self.is_current() {
            return Ok(work());
        }
        let slot: Arc<DeliverySlot<T>> = Arc::new((Mutex::new((false, None)), Condvar::new()));
        let delivery = Delivery {
            slot: Arc::clone(&slot),
        };
        self.submit(move || {
            let value = work();
            delivery.slot.0.lock().1 = Some(value);
            // `delivery` drops here, or during unwinding if `work` panicked
        })?;

        let (lock, cond) = &*slot;
        let mut state = lock.lock();
        while !state.0 {
            cond.wait(&mut state);
        }
        state.1.take().ok_or(SubmitError::Panicked)
    }

    /// Block until every queued closure has run.
    ///
    /// Returns immediately when called from the main context itself.
    pub fn drain(&self) {
        if self.is_current() {
            return;
        }
        let mut queue = self.shared.queue.lock();
        while !queue.is_empty() || self.shared.running.load(Ordering::Acquire) {
            self.shared.idle.wait(&mut queue);
        }
    }

    /// Stop accepting work, run what is queued and join the worker.
    pub fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::Release);
        {
            let _queue = self.shared.queue.lock();
            self.shared.work_ready.notify_all();
        }
        if self.is_current() {
            return;
        }
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }

    /// Counters snapshot.
    pub fn stats(&self) -> MainContextStats {
        MainContextStats {
            queue_depth: self.shared.queue_depth.load(Ordering::Relaxed),
            tasks_completed: self.shared.tasks_completed.load(Ordering::Relaxed),
        }
    }
}

impl Drop for MainContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for MainContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainContext")
            .field("stats", &self.stats())
            .field("capacity", &self.shared.capacity)
            .finish()
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let work = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(work) = queue.pop_front() {
                    shared.queue_depth.store(queue.len(), Ordering::Release);
                    shared.running.store(true, Ordering::Release);
                    break work;
                }
                if shared.shutdown.load(Ordering::Acquire) {
                    debug!("main context worker exiting");
                    return;
                }
                shared.work_ready.wait(&mut queue);
            }
        };

        if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(work)) {
            error!(
                "main context task panicked: {:?}",
                e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
            );
        }
        shared.tasks_completed.fetch_add(1, Ordering::Relaxed);

        // Lock before notifying so drain() cannot miss the wakeup between its
        // condition check and its wait.
        let queue = shared.queue.lock();
        shared.running.store(false, Ordering::Release);
        if queue.is_empty() {
            shared.idle.notify_all();
        }
    }
}
