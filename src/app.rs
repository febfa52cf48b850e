//! Application orchestration layer
//!
//! Wires a device profile, an environment and a detection session together for the
//! `devsense` binary. One-shot runs print a single snapshot; watch runs keep a
//! reactive session on the terminal host and print every published change.

use crate::environment::{
    DeviceProfile, HeadlessEnvironment, MediaEnvironment, ScriptedEnvironment, TerminalEnvironment,
};
use crate::error::{DetectError, Result};
use crate::session::{detect, DetectionSession, DeviceSnapshot};
use futures::StreamExt;
use std::future::Future;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

/// Profile used when none is given and none is discovered.
pub const DEFAULT_PRESET: &str = "desktop";

/// Options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Preset name or profile file path
    pub profile: Option<String>,
    /// Pretend to run outside an interactive environment
    pub headless: bool,
    /// Keep a live session on the terminal host
    pub watch: bool,
    /// Reactive flag for one-shot runs (no change source, so no effect on output)
    pub reactive: bool,
}

pub struct Application {
    options: AppOptions,
}

impl Application {
    pub fn new(options: AppOptions) -> Self {
        Self { options }
    }

    /// Explicit profile, then the user's profile file, then the default preset.
    pub fn resolve_profile(&self) -> Result<DeviceProfile> {
        if let Some(spec) = &self.options.profile {
            return DeviceProfile::resolve(spec);
        }

        if let Some(profile) = discovered_profile()? {
            return Ok(profile);
        }

        DeviceProfile::preset(DEFAULT_PRESET)
            .ok_or_else(|| DetectError::other("default preset missing"))
    }

    /// Classify once without listening for changes.
    pub fn snapshot_once(&self) -> Result<DeviceSnapshot> {
        if self.options.headless {
            return detect(Arc::new(HeadlessEnvironment::new()));
        }

        let profile = self.resolve_profile()?;
        log::info!("using device profile '{}'", profile.name);
        let env = Arc::new(ScriptedEnvironment::from_profile(&profile));
        let session = DetectionSession::new(env, Some(self.options.reactive))?;
        Ok(session.snapshot())
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.options.watch && !self.options.headless {
            return self.watch(out).await;
        }

        if self.options.watch {
            return Err(DetectError::invalid_argument(
                "--watch cannot be combined with --headless",
            ));
        }

        writeln!(out, "{}", self.snapshot_once()?)?;
        Ok(())
    }

    async fn watch<W: Write>(&self, out: &mut W) -> Result<()> {
        let profile = self.resolve_profile()?;
        log::info!("watching with device profile '{}'", profile.name);

        let env = Arc::new(TerminalEnvironment::new(profile));
        let session = DetectionSession::new(Arc::clone(&env), Some(true))?;
        writeln!(out, "{}", session.snapshot())?;

        if !env.is_available() {
            log::warn!("stdout is not a terminal; nothing to watch");
            return Ok(());
        }

        let shutdown = Arc::new(AtomicBool::new(false));
        let handle = TerminalEnvironment::spawn_event_thread(&env, Arc::clone(&shutdown), None);
        let mut pump = tokio::task::spawn_blocking(move || handle.join());

        let stop = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                log::warn!("cannot listen for Ctrl-C: {}", err);
            }
        };
        let end = relay_changes(out, &session, stop, async { flatten_join((&mut pump).await) })
            .await;

        shutdown.store(true, Ordering::SeqCst);
        let outcome = match end {
            // Event thread ended on its own (poll failure or listener fault)
            Ok(RelayEnd::PumpExited(result)) => result,
            other => {
                flatten_join(pump.await)?;
                other.map(|_| ())
            }
        };
        log::info!("stopped after {} reclassifications", session.updates());
        outcome
    }
}

/// Why [`relay_changes`] returned.
#[derive(Debug)]
enum RelayEnd {
    Stopped,
    Closed,
    PumpExited(Result<()>),
}

/// Print a snapshot for every published classification until `stop` resolves, the
/// change pump finishes, or the session's channel closes.
async fn relay_changes<W, E, S, P>(
    out: &mut W,
    session: &DetectionSession<E>,
    stop: S,
    pump: P,
) -> Result<RelayEnd>
where
    W: Write,
    E: MediaEnvironment + ?Sized + 'static,
    S: Future<Output = ()>,
    P: Future<Output = Result<()>>,
{
    tokio::pin!(stop);
    tokio::pin!(pump);
    let mut changes = WatchStream::from_changes(session.watch());

    loop {
        tokio::select! {
            _ = &mut stop => return Ok(RelayEnd::Stopped),
            result = &mut pump => return Ok(RelayEnd::PumpExited(result)),
            change = changes.next() => match change {
                Some(_) => writeln!(out, "{}", session.snapshot())?,
                None => return Ok(RelayEnd::Closed),
            },
        }
    }
}

#[cfg(feature = "config")]
fn discovered_profile() -> Result<Option<DeviceProfile>> {
    DeviceProfile::discover()
}

#[cfg(not(feature = "config"))]
fn discovered_profile() -> Result<Option<DeviceProfile>> {
    Ok(None)
}

type JoinOutcome =
    std::result::Result<std::thread::Result<Result<()>>, tokio::task::JoinError>;

fn flatten_join(joined: JoinOutcome) -> Result<()> {
    match joined {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(DetectError::other("terminal event thread panicked")),
        Err(err) => Err(DetectError::other(format!("event thread join failed: {}", err))),
    }
}
