//! Terminal host environment.
//!
//! A terminal cannot report pointer hardware, so capability answers come from a
//! [`DeviceProfile`]. Everything else is live: availability follows whether stdout is
//! a terminal, the display size falls back to the terminal size in cells, and
//! crossterm resize events become [`ChangeSignal::Resize`] dispatches. A resize that
//! flips the aspect between landscape and portrait also raises
//! [`ChangeSignal::OrientationChange`].

use crate::environment::{
    answer_from, ChangeSignal, DeviceProfile, ListenerId, ListenerRegistry, MediaEnvironment,
    ScreenSize, SignalHandler,
};
use crate::error::Result;
use parking_lot::Mutex;
use ratatui::crossterm::{event, terminal};
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Poll timeout used when the caller does not provide one.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

pub struct TerminalEnvironment {
    profile: DeviceProfile,
    listeners: ListenerRegistry,
    last_size: Mutex<Option<ScreenSize>>,
}

impl TerminalEnvironment {
    pub fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            listeners: ListenerRegistry::new(),
            last_size: Mutex::new(terminal_size()),
        }
    }

    /// Translate one terminal event into change-signal dispatches.
    ///
    /// Non-resize events are ignored.
    pub fn handle_event(&self, event: &event::Event) -> Result<()> {
        match event {
            event::Event::Resize(width, height) => {
                self.handle_resize(ScreenSize::new(u32::from(*width), u32::from(*height)))
            }
            _ => Ok(()),
        }
    }

    fn handle_resize(&self, size: ScreenSize) -> Result<()> {
        let previous = self.last_size.lock().replace(size);
        let rotated = previous
            .map(|prev| prev.orientation() != size.orientation())
            .unwrap_or(false);

        log::debug!(
            "terminal resized to {}x{}{}",
            size.width,
            size.height,
            if rotated { " (orientation flipped)" } else { "" }
        );

        let resized = self.listeners.dispatch(ChangeSignal::Resize);
        if rotated {
            let oriented = self.listeners.dispatch(ChangeSignal::OrientationChange);
            resized.and(oriented)
        } else {
            resized
        }
    }

    /// Spawn a blocking thread that polls crossterm and dispatches change signals.
    ///
    /// The thread exits when `shutdown` is set, when polling fails, or when a
    /// listener returns an error; the error is the thread's result.
    pub fn spawn_event_thread(
        env: &Arc<Self>,
        shutdown: Arc<AtomicBool>,
        poll_interval: Option<Duration>,
    ) -> thread::JoinHandle<Result<()>> {
        let env = Arc::clone(env);
        let poll_interval =
            poll_interval.unwrap_or(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));

        thread::spawn(move || {
            while !shutdown.load(Ordering::SeqCst) {
                if !event::poll(poll_interval)? {
                    // No event this tick; check shutdown again.
                    continue;
                }

                let event = event::read()?;
                if let Err(err) = env.handle_event(&event) {
                    log::warn!("change listener failed: {}", err);
                    return Err(err);
                }
            }
            Ok(())
        })
    }
}

fn terminal_size() -> Option<ScreenSize> {
    terminal::size()
        .ok()
        .map(|(cols, rows)| ScreenSize::new(u32::from(cols), u32::from(rows)))
}

impl MediaEnvironment for TerminalEnvironment {
    fn is_available(&self) -> bool {
        std::io::stdout().is_terminal()
    }

    fn matches(&self, query: &str) -> Result<bool> {
        Ok(answer_from(&self.profile.pointer, query))
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        self.profile.screen.or_else(terminal_size)
    }

    fn add_listener(&self, signal: ChangeSignal, handler: SignalHandler) -> ListenerId {
        self.listeners.add(signal, handler)
    }

    fn remove_listener(&self, signal: ChangeSignal, id: ListenerId) -> bool {
        self.listeners.remove(signal, id)
    }
}
