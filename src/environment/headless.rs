//! Non-interactive execution context (batch jobs, servers, CI).

use crate::environment::{ChangeSignal, ListenerId, MediaEnvironment, ScreenSize, SignalHandler};
use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};

/// Environment that is never available. Sessions built on it hold the default
/// classification and a zero screen width.
#[derive(Debug, Default)]
pub struct HeadlessEnvironment {
    next_id: AtomicU64,
}

impl HeadlessEnvironment {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MediaEnvironment for HeadlessEnvironment {
    fn is_available(&self) -> bool {
        false
    }

    fn matches(&self, _query: &str) -> Result<bool> {
        Ok(false)
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        None
    }

    // Nothing ever fires here, so handlers are dropped immediately.
    fn add_listener(&self, _signal: ChangeSignal, _handler: SignalHandler) -> ListenerId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn remove_listener(&self, _signal: ChangeSignal, _id: ListenerId) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_available_and_never_matches() {
        let env = HeadlessEnvironment::new();
        assert!(!env.is_available());
        assert!(!env.matches("(pointer: fine)").unwrap());
        assert_eq!(env.screen_size(), None);
    }
}
