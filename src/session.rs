//! Detection sessions.
//!
//! A [`DetectionSession`] owns the cached classification for one caller. It classifies
//! once on creation and, when reactive, again on every resize or orientation change
//! until it is torn down. Readers never trigger work: every accessor returns cached
//! state.
//!
//! The cached [`DeviceInfo`] lives in a `tokio::sync::watch` channel. Each
//! reclassification replaces the whole value, so readers observe either the old or
//! the new classification, and [`DetectionSession::watch`] hands out receivers that
//! are notified on every publish.

pub mod subscription;

pub use subscription::Subscription;

use crate::classifier::{classify, DeviceInfo, DeviceType, PrimaryInput};
use crate::environment::{max_screen_width, read_signals, ChangeSignal, MediaEnvironment, SignalHandler};
use crate::error::Result;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Read-only view handed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "camelCase"))]
pub struct DeviceSnapshot {
    pub device_type: DeviceType,
    pub primary_input: PrimaryInput,
    pub max_width: u32,
}

impl fmt::Display for DeviceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deviceType={} primaryInput={} maxWidth={}",
            self.device_type, self.primary_input, self.max_width
        )
    }
}

/// Cached device classification with an optional live subscription.
pub struct DetectionSession<E: MediaEnvironment + ?Sized + 'static> {
    env: Arc<E>,
    /// Kept as given: `None` and `Some(false)` are distinct settings
    reactive: Option<bool>,
    /// Computed once at creation, never refreshed
    max_width: u32,
    state: Arc<watch::Sender<DeviceInfo>>,
    updates: Arc<AtomicU64>,
    subscription: Option<Subscription<E>>,
    /// Shared with the handler of the current subscription; cleared on teardown
    listening: Arc<AtomicBool>,
}

impl<E: MediaEnvironment + ?Sized + 'static> DetectionSession<E> {
    /// Start a session. `reactive` defaults to false.
    ///
    /// # Returns
    /// * A session holding the current classification, or the mouse-only default
    ///   with `max_width == 0` when the environment is unavailable
    /// * `Err` if a capability query faults
    pub fn new(env: Arc<E>, reactive: Option<bool>) -> Result<Self> {
        let (state, _) = watch::channel(DeviceInfo::default());
        let max_width = max_screen_width(&*env);

        let mut session = Self {
            env,
            reactive,
            max_width,
            state: Arc::new(state),
            updates: Arc::new(AtomicU64::new(0)),
            subscription: None,
            listening: Arc::new(AtomicBool::new(false)),
        };
        let info = session.classify_now()?;
        session.activate(info);
        Ok(session)
    }

    /// Query the environment. `None` when it is unavailable.
    fn classify_now(&self) -> Result<Option<DeviceInfo>> {
        if !self.env.is_available() {
            log::debug!("environment unavailable; keeping {:?}", *self.state.borrow());
            return Ok(None);
        }
        Ok(Some(classify(read_signals(&*self.env)?)))
    }

    /// Publish a fresh classification and, if reactive, start listening for change
    /// signals.
    fn activate(&mut self, info: Option<DeviceInfo>) {
        let Some(info) = info else {
            return;
        };

        self.state.send_replace(info);
        log::debug!("classified device as {}/{}", info.device_type, info.primary_input);

        if self.is_reactive() {
            self.listening = Arc::new(AtomicBool::new(true));
            self.subscription = Some(Subscription::listen(
                &self.env,
                &ChangeSignal::ALL,
                self.change_handler(),
            ));
            log::debug!("listening for resize and orientation changes");
        }
    }

    // Holds the environment weakly: the environment owns this handler through its
    // listener table.
    fn change_handler(&self) -> SignalHandler {
        let env = Arc::downgrade(&self.env);
        let state = Arc::clone(&self.state);
        let updates = Arc::clone(&self.updates);
        let listening = Arc::clone(&self.listening);

        Arc::new(move |signal| {
            if !listening.load(Ordering::SeqCst) {
                return Ok(());
            }
            let Some(env) = env.upgrade() else {
                return Ok(());
            };

            let info = classify(read_signals(&*env)?);
            state.send_replace(info);
            updates.fetch_add(1, Ordering::SeqCst);
            log::debug!(
                "{} reclassified device as {}/{}",
                signal,
                info.device_type,
                info.primary_input
            );
            Ok(())
        })
    }

    /// Remove change listeners. Safe to call any number of times.
    ///
    /// A signal already being dispatched when this runs does not reclassify.
    pub fn teardown(&mut self) {
        self.listening.store(false, Ordering::SeqCst);
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            log::debug!("detection session torn down");
        }
    }

    /// Change the reactive flag.
    ///
    /// Setting the current value does nothing; `None` and `Some(false)` count as
    /// different values. A different value classifies again, tears down any
    /// subscription, and subscribes if the new value is true. If the classification
    /// faults the session is left exactly as it was. `max_width` is kept from
    /// creation.
    pub fn set_reactive(&mut self, reactive: Option<bool>) -> Result<()> {
        if reactive == self.reactive {
            return Ok(());
        }

        let info = self.classify_now()?;
        self.teardown();
        self.reactive = reactive;
        self.activate(info);
        Ok(())
    }

    pub fn is_reactive(&self) -> bool {
        self.reactive.unwrap_or(false)
    }

    /// Whether change listeners are currently registered.
    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .as_ref()
            .map(Subscription::is_active)
            .unwrap_or(false)
    }

    pub fn device_info(&self) -> DeviceInfo {
        *self.state.borrow()
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_info().device_type
    }

    pub fn primary_input(&self) -> PrimaryInput {
        self.device_info().primary_input
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        let info = self.device_info();
        DeviceSnapshot {
            device_type: info.device_type,
            primary_input: info.primary_input,
            max_width: self.max_width,
        }
    }

    /// Receiver notified on every published classification.
    pub fn watch(&self) -> watch::Receiver<DeviceInfo> {
        self.state.subscribe()
    }

    /// Number of reclassifications triggered by change signals.
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::SeqCst)
    }

}

impl<E: MediaEnvironment + ?Sized + 'static> Drop for DetectionSession<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// One-shot detection without keeping a session.
pub fn detect<E: MediaEnvironment + ?Sized + 'static>(env: Arc<E>) -> Result<DeviceSnapshot> {
    DetectionSession::new(env, None).map(|session| session.snapshot())
}
