//! Host environment abstraction.
//!
//! A [`MediaEnvironment`] answers media-feature predicates, reports the display size,
//! and delivers change signals to registered listeners. Sessions only ever talk to
//! this trait, so the same detection code runs against a terminal host, an in-memory
//! script, or a headless context where nothing can be queried.

pub mod headless;
pub mod listeners;
pub mod profile;
pub mod scripted;
pub mod terminal;

use crate::classifier::{CapabilitySignals, MediaQuery};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

pub use headless::HeadlessEnvironment;
pub use listeners::ListenerRegistry;
pub use profile::DeviceProfile;
pub use scripted::ScriptedEnvironment;
pub use terminal::TerminalEnvironment;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Change notifications that may alter pointer capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeSignal {
    Resize,
    OrientationChange,
}

impl ChangeSignal {
    pub const ALL: [ChangeSignal; 2] = [ChangeSignal::Resize, ChangeSignal::OrientationChange];

    /// Event name as a host would spell it.
    pub fn name(self) -> &'static str {
        match self {
            ChangeSignal::Resize => "resize",
            ChangeSignal::OrientationChange => "orientationchange",
        }
    }
}

impl fmt::Display for ChangeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier returned by [`MediaEnvironment::add_listener`].
pub type ListenerId = u64;

/// Callback invoked on the dispatching thread for each delivered signal.
pub type SignalHandler = Arc<dyn Fn(ChangeSignal) -> Result<()> + Send + Sync>;

/// Display dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Square displays count as landscape.
    pub fn orientation(&self) -> Orientation {
        if self.width >= self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Host capabilities consumed by a detection session.
///
/// Implementations must be thread-safe; listener callbacks run on whichever thread
/// dispatches the signal.
pub trait MediaEnvironment: Send + Sync {
    /// Whether this is an interactive context that can be queried at all.
    ///
    /// When false, callers skip every other method and fall back to defaults.
    fn is_available(&self) -> bool;

    /// Evaluate a media-feature predicate such as `(pointer: fine)`.
    ///
    /// # Returns
    /// * `Ok(true)` / `Ok(false)` for the predicate's current value
    /// * `Ok(false)` for predicates the host does not recognise
    /// * `Err` when the query mechanism itself faults
    fn matches(&self, query: &str) -> Result<bool>;

    /// Physical display size, if the host exposes one.
    fn screen_size(&self) -> Option<ScreenSize>;

    /// Register a handler for one change signal.
    fn add_listener(&self, signal: ChangeSignal, handler: SignalHandler) -> ListenerId;

    /// Remove a handler. Returns false when the id was not registered for `signal`.
    fn remove_listener(&self, signal: ChangeSignal, id: ListenerId) -> bool;
}

/// Query all five capability predicates.
///
/// The first faulting query aborts the read and its error is returned unchanged.
pub fn read_signals<E: MediaEnvironment + ?Sized>(env: &E) -> Result<CapabilitySignals> {
    let mut signals = CapabilitySignals::default();
    for query in MediaQuery::ALL {
        signals.set(query, env.matches(query.as_str())?);
    }
    Ok(signals)
}

/// Larger display dimension, or 0 when nothing can be measured.
pub fn max_screen_width<E: MediaEnvironment + ?Sized>(env: &E) -> u32 {
    if !env.is_available() {
        return 0;
    }
    env.screen_size()
        .map(|size| size.max_dimension())
        .unwrap_or(0)
}

/// Shared answer for environments backed by a [`CapabilitySignals`] value:
/// recognised predicates read the matching field, anything else is false.
pub(crate) fn answer_from(signals: &CapabilitySignals, query: &str) -> bool {
    query
        .parse::<MediaQuery>()
        .map(|parsed| signals.get(parsed))
        .unwrap_or(false)
}
