//! Listener bookkeeping shared by environment implementations.

use crate::environment::{ChangeSignal, ListenerId, SignalHandler};
use crate::error::Result;
use parking_lot::{Mutex, ReentrantMutex};
use std::sync::atomic::{AtomicU64, Ordering};

struct Entry {
    id: ListenerId,
    signal: ChangeSignal,
    handler: SignalHandler,
}

/// Per-signal handler table with serialized dispatch.
///
/// Dispatch takes a reentrant lock, so signals raised from different threads never
/// interleave, while a handler that dispatches again from inside a callback still
/// makes progress. Handlers are cloned out of the table before they run, which lets
/// a callback add or remove listeners. A listener removed by an earlier callback of
/// the same dispatch is skipped.
pub struct ListenerRegistry {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
    dispatch_lock: ReentrantMutex<()>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            dispatch_lock: ReentrantMutex::new(()),
        }
    }

    pub fn add(&self, signal: ChangeSignal, handler: SignalHandler) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().push(Entry {
            id,
            signal,
            handler,
        });
        log::trace!("listener {} added for {}", id, signal);
        id
    }

    pub fn remove(&self, signal: ChangeSignal, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|entry| !(entry.id == id && entry.signal == signal));
        let removed = entries.len() != before;
        if removed {
            log::trace!("listener {} removed from {}", id, signal);
        }
        removed
    }

    /// Number of registered listeners for `signal`.
    pub fn count(&self, signal: ChangeSignal) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.signal == signal)
            .count()
    }

    fn is_registered(&self, signal: ChangeSignal, id: ListenerId) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|entry| entry.id == id && entry.signal == signal)
    }

    /// Invoke every handler registered for `signal`, in registration order.
    ///
    /// All handlers run even if one fails; the first failure is returned.
    pub fn dispatch(&self, signal: ChangeSignal) -> Result<()> {
        let _serialized = self.dispatch_lock.lock();

        let handlers: Vec<(ListenerId, SignalHandler)> = self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.signal == signal)
            .map(|entry| (entry.id, entry.handler.clone()))
            .collect();

        let mut first_error = None;
        for (id, handler) in handlers {
            if !self.is_registered(signal, id) {
                log::trace!("listener {} removed during {} dispatch", id, signal);
                continue;
            }
            if let Err(err) = handler(signal) {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
