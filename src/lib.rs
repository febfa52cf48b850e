//! # devsense - Pointing-Input Capability Detection
//!
//! Classifies the host's pointing hardware as mouse-only, touch-only or hybrid from
//! five media-feature predicates, and optionally keeps that classification live
//! across resize and orientation changes.
//!
//! ## Features
//!
//! - **Deterministic classification**: a pure, ordered decision over five booleans
//! - **Live sessions**: reactive sessions reclassify on every change signal and
//!   publish the result through a watch channel
//! - **Leak-free teardown**: listeners are removed exactly once, on every exit path
//! - **Pluggable hosts**: terminal, scripted and headless environments behind one trait
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`classifier`] - Capability signals and the classification decision
//! - [`environment`] - Host abstraction, listener registry, profiles and hosts
//! - [`session`] - Cached classification with subscription lifecycle
//! - [`app`] - Command-line orchestration

// Core modules
pub mod classifier;
pub mod error;

// Host integration
pub mod environment;
pub mod session;

pub mod app;

// Re-export commonly used types for convenience
pub use error::{DetectError, Result};

// Public API surface for external usage
pub use classifier::{classify, CapabilitySignals, DeviceInfo, DeviceType, MediaQuery, PrimaryInput};
pub use environment::{ChangeSignal, MediaEnvironment, ScreenSize};
pub use session::{detect, DetectionSession, DeviceSnapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
