//! Shared viewer context
//!
//! The process-wide state both execution contexts touch: the message queue,
//! the loading-spinner flag and the current document handle. Everything lives
//! under a single mutex, which doubles as the cross-thread fence the design
//! requires: flag and handle writes happen under the same lock as the message
//! push that publishes them, so the scheduler can never observe a message
//! before the state it signals.
//!
//! The context is created before either thread starts and handed to both as
//! an explicit `Arc`; there is no global state.

use std::collections::VecDeque;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::loader::DocumentHandle;
use crate::message::Message;

// ----------------------------------------------------------------------------
// Viewer Context
// ----------------------------------------------------------------------------

/// Shared application context for one viewer instance.
///
/// Owned longest: constructed during bootstrap, dropped only after the worker
/// and the scheduler have both released their references.
#[derive(Debug, Default)]
pub struct ViewerContext {
    shared: Mutex<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    queue: VecDeque<Message>,
    showing_spinner: bool,
    document: Option<DocumentHandle>,
}

impl ViewerContext {
    /// Create an empty context: no queued messages, spinner off, no document.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        // A panicking tick must not wedge the worker thread (or vice versa);
        // the shared state is valid after any individual operation.
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Message queue
    // ------------------------------------------------------------------

    /// Append a message (or a whole chain) at the tail of the queue.
    ///
    /// Safe to call from either thread; never blocks beyond the critical
    /// section of the insert and always succeeds.
    pub fn push_message(&self, message: impl Into<Message>) {
        self.lock().queue.push_back(message.into());
    }

    /// Atomically remove and return all queued messages in FIFO order.
    ///
    /// Called only by the scheduler. Every message pushed before this call is
    /// part of this drain or a later one, never lost and never duplicated.
    /// An empty result is not an error.
    pub fn drain_messages(&self) -> VecDeque<Message> {
        mem::take(&mut self.lock().queue)
    }

    /// Number of currently queued messages (chains count as one entry).
    pub fn pending_messages(&self) -> usize {
        self.lock().queue.len()
    }

    // ------------------------------------------------------------------
    // Spinner flag
    // ------------------------------------------------------------------

    /// Set or clear the loading-spinner flag.
    pub fn set_spinner(&self, showing: bool) {
        self.lock().showing_spinner = showing;
    }

    /// Whether the loading spinner should keep animating.
    pub fn spinner_showing(&self) -> bool {
        self.lock().showing_spinner
    }

    // ------------------------------------------------------------------
    // Document handle
    // ------------------------------------------------------------------

    /// Start a new load cycle: spinner on, previous document handle dropped.
    pub fn begin_load_cycle(&self) {
        let mut shared = self.lock();
        shared.showing_spinner = true;
        shared.document = None;
    }

    /// Publish the document handle produced by a successful load.
    ///
    /// Set at most once per load cycle; a second publish within the same
    /// cycle indicates a loader contract violation and is logged.
    pub fn publish_document(&self, handle: DocumentHandle) {
        let mut shared = self.lock();
        if shared.document.is_some() {
            warn!("document handle published twice in one load cycle; replacing");
        }
        shared.document = Some(handle);
    }

    /// The currently viewed document, if a load has completed.
    pub fn document(&self) -> Option<DocumentHandle> {
        self.lock().document.clone()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
