//! Pointing-input capability classification.
//!
//! Five boolean media-feature answers go in, one [`DeviceInfo`] comes out. The
//! decision is a pure function with a fixed priority order, because several signal
//! combinations are simultaneously true on real hardware (a touchscreen laptop
//! reports both fine and coarse pointers).

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// The five media predicates a classification depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaQuery {
    /// `(pointer: fine)`
    PrimaryFine,
    /// `(hover: hover)`
    PrimaryHover,
    /// `(any-pointer: fine)`
    AnyFine,
    /// `(any-hover: hover)`
    AnyHover,
    /// `(any-pointer: coarse)`
    AnyCoarse,
}

impl MediaQuery {
    /// Query order used when reading signals from an environment.
    pub const ALL: [MediaQuery; 5] = [
        MediaQuery::PrimaryFine,
        MediaQuery::PrimaryHover,
        MediaQuery::AnyFine,
        MediaQuery::AnyHover,
        MediaQuery::AnyCoarse,
    ];

    /// Canonical media-feature string for this predicate.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaQuery::PrimaryFine => "(pointer: fine)",
            MediaQuery::PrimaryHover => "(hover: hover)",
            MediaQuery::AnyFine => "(any-pointer: fine)",
            MediaQuery::AnyHover => "(any-hover: hover)",
            MediaQuery::AnyCoarse => "(any-pointer: coarse)",
        }
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaQuery {
    type Err = ();

    /// Parse a media-feature string, ignoring whitespace.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        MediaQuery::ALL
            .into_iter()
            .find(|query| {
                let canonical: String = query
                    .as_str()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                canonical.eq_ignore_ascii_case(&compact)
            })
            .ok_or(())
    }
}

/// Answers to the five media predicates at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CapabilitySignals {
    pub primary_fine: bool,
    pub primary_hover: bool,
    pub any_fine: bool,
    pub any_hover: bool,
    pub any_coarse: bool,
}

impl CapabilitySignals {
    /// Answer for a single predicate.
    pub fn get(&self, query: MediaQuery) -> bool {
        match query {
            MediaQuery::PrimaryFine => self.primary_fine,
            MediaQuery::PrimaryHover => self.primary_hover,
            MediaQuery::AnyFine => self.any_fine,
            MediaQuery::AnyHover => self.any_hover,
            MediaQuery::AnyCoarse => self.any_coarse,
        }
    }

    /// Set the answer for a single predicate.
    pub fn set(&mut self, query: MediaQuery, value: bool) {
        match query {
            MediaQuery::PrimaryFine => self.primary_fine = value,
            MediaQuery::PrimaryHover => self.primary_hover = value,
            MediaQuery::AnyFine => self.any_fine = value,
            MediaQuery::AnyHover => self.any_hover = value,
            MediaQuery::AnyCoarse => self.any_coarse = value,
        }
    }

    pub fn classify(self) -> DeviceInfo {
        classify(self)
    }
}

/// Broad class of pointing hardware attached to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "camelCase"))]
pub enum DeviceType {
    #[default]
    MouseOnly,
    TouchOnly,
    Hybrid,
}

impl DeviceType {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::MouseOnly => "mouseOnly",
            DeviceType::TouchOnly => "touchOnly",
            DeviceType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input method that dominates user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum PrimaryInput {
    #[default]
    Mouse,
    Touch,
}

impl PrimaryInput {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimaryInput::Mouse => "mouse",
            PrimaryInput::Touch => "touch",
        }
    }
}

impl fmt::Display for PrimaryInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result. The default is a mouse-only device, which is what
/// callers see when no environment can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "camelCase"))]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub primary_input: PrimaryInput,
}

impl DeviceInfo {
    pub const fn new(device_type: DeviceType, primary_input: PrimaryInput) -> Self {
        Self {
            device_type,
            primary_input,
        }
    }
}

impl From<CapabilitySignals> for DeviceInfo {
    fn from(signals: CapabilitySignals) -> Self {
        classify(signals)
    }
}

/// Classify pointing hardware from the five capability signals.
///
/// Rules are evaluated in order and the first match wins:
///
/// 1. a coarse pointer exists and nothing can hover: touch-only
/// 2. a fine pointer exists, no coarse pointer, and something can hover: mouse-only
/// 3. anything else is hybrid, and only the primary pointer decides the input:
///    mouse when it is both fine and hover-capable, touch otherwise
pub fn classify(signals: CapabilitySignals) -> DeviceInfo {
    if signals.any_coarse && !signals.any_hover {
        return DeviceInfo::new(DeviceType::TouchOnly, PrimaryInput::Touch);
    }

    if signals.any_fine && !signals.any_coarse && signals.any_hover {
        return DeviceInfo::new(DeviceType::MouseOnly, PrimaryInput::Mouse);
    }

    let primary_input = if signals.primary_fine && signals.primary_hover {
        PrimaryInput::Mouse
    } else {
        PrimaryInput::Touch
    };
    DeviceInfo::new(DeviceType::Hybrid, primary_input)
}
