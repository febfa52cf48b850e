//! RAII guard over a set of environment listeners.

use crate::environment::{ChangeSignal, ListenerId, MediaEnvironment, SignalHandler};
use std::sync::Arc;

/// Listeners registered with one handler on several signals.
///
/// [`Subscription::cancel`] removes every listener exactly once; later calls and the
/// drop that follows are no-ops.
pub struct Subscription<E: MediaEnvironment + ?Sized> {
    env: Arc<E>,
    listeners: Vec<(ChangeSignal, ListenerId)>,
}

impl<E: MediaEnvironment + ?Sized> Subscription<E> {
    /// Register `handler` for each of `signals`.
    pub fn listen(env: &Arc<E>, signals: &[ChangeSignal], handler: SignalHandler) -> Self {
        let listeners = signals
            .iter()
            .map(|&signal| (signal, env.add_listener(signal, Arc::clone(&handler))))
            .collect();

        Self {
            env: Arc::clone(env),
            listeners,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn cancel(&mut self) {
        for (signal, id) in self.listeners.drain(..) {
            if !self.env.remove_listener(signal, id) {
                log::debug!("listener {} for {} was already gone", id, signal);
            }
        }
    }
}

impl<E: MediaEnvironment + ?Sized> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.cancel();
    }
}
