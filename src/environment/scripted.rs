//! In-memory environment driven entirely by the caller.
//!
//! Used by tests, benchmarks and the one-shot CLI path: capability answers, screen
//! size and availability are plain settable values, and change signals are raised
//! explicitly with [`ScriptedEnvironment::emit`].

use crate::classifier::CapabilitySignals;
use crate::environment::{
    answer_from, ChangeSignal, DeviceProfile, ListenerId, ListenerRegistry, MediaEnvironment,
    ScreenSize, SignalHandler,
};
use crate::error::{DetectError, Result};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub struct ScriptedEnvironment {
    available: AtomicBool,
    signals: RwLock<CapabilitySignals>,
    screen: RwLock<Option<ScreenSize>>,
    failing: AtomicBool,
    queries: AtomicU64,
    listeners: ListenerRegistry,
}

impl ScriptedEnvironment {
    /// Available environment with the given answers and no screen.
    pub fn new(signals: CapabilitySignals) -> Self {
        Self {
            available: AtomicBool::new(true),
            signals: RwLock::new(signals),
            screen: RwLock::new(None),
            failing: AtomicBool::new(false),
            queries: AtomicU64::new(0),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn with_screen(self, width: u32, height: u32) -> Self {
        *self.screen.write() = Some(ScreenSize::new(width, height));
        self
    }

    pub fn from_profile(profile: &DeviceProfile) -> Self {
        let env = Self::new(profile.pointer);
        *env.screen.write() = profile.screen;
        env
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Replace the answers seen by subsequent queries.
    pub fn set_signals(&self, signals: CapabilitySignals) {
        *self.signals.write() = signals;
    }

    pub fn set_screen(&self, screen: Option<ScreenSize>) {
        *self.screen.write() = screen;
    }

    /// Make every subsequent query fault (or stop faulting).
    pub fn fail_queries(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Deliver a change signal to every listener registered for it.
    pub fn emit(&self, signal: ChangeSignal) -> Result<()> {
        self.listeners.dispatch(signal)
    }

    /// Total number of predicate evaluations so far.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self, signal: ChangeSignal) -> usize {
        self.listeners.count(signal)
    }
}

impl MediaEnvironment for ScriptedEnvironment {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn matches(&self, query: &str) -> Result<bool> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DetectError::query_failed(query, "scripted fault"));
        }
        Ok(answer_from(&self.signals.read(), query))
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        *self.screen.read()
    }

    fn add_listener(&self, signal: ChangeSignal, handler: SignalHandler) -> ListenerId {
        self.listeners.add(signal, handler)
    }

    fn remove_listener(&self, signal: ChangeSignal, id: ListenerId) -> bool {
        self.listeners.remove(signal, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn answers_follow_updates() {
        let env = ScriptedEnvironment::new(CapabilitySignals::default());
        assert!(!env.matches("(any-pointer: coarse)").unwrap());

        env.set_signals(CapabilitySignals {
            any_coarse: true,
            ..CapabilitySignals::default()
        });
        assert!(env.matches("(any-pointer: coarse)").unwrap());
        assert_eq!(env.query_count(), 2);
    }

    #[test]
    fn emit_without_listeners_is_ok() {
        let env = ScriptedEnvironment::new(CapabilitySignals::default());
        assert!(env.emit(ChangeSignal::Resize).is_ok());
    }

    #[test]
    fn listeners_are_tracked_per_signal() {
        let env = ScriptedEnvironment::new(CapabilitySignals::default());
        let id = env.add_listener(ChangeSignal::OrientationChange, Arc::new(|_| Ok(())));

        assert_eq!(env.listener_count(ChangeSignal::OrientationChange), 1);
        assert_eq!(env.listener_count(ChangeSignal::Resize), 0);
        assert!(env.remove_listener(ChangeSignal::OrientationChange, id));
        assert_eq!(env.listener_count(ChangeSignal::OrientationChange), 0);
    }

    #[test]
    fn from_profile_copies_pointer_and_screen() {
        let profile = DeviceProfile::preset("phone").unwrap();
        let env = ScriptedEnvironment::from_profile(&profile);

        assert_eq!(env.screen_size(), Some(ScreenSize::new(390, 844)));
        assert!(env.matches("(any-pointer: coarse)").unwrap());
        assert!(!env.matches("(any-hover: hover)").unwrap());
    }
}
