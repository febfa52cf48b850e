//! Device profiles: named capability answers plus an optional screen size.
//!
//! Profiles feed environments that cannot ask the hardware directly (the terminal
//! host, scripted runs). A handful of presets cover common hardware; with the
//! `config` feature a profile can also be read from a TOML file:
//!
//! ```toml
//! name = "kiosk"
//!
//! [pointer]
//! primary_fine = false
//! primary_hover = false
//! any_fine = false
//! any_hover = false
//! any_coarse = true
//!
//! [screen]
//! width = 1080
//! height = 1920
//! ```

use crate::classifier::CapabilitySignals;
use crate::environment::ScreenSize;
use crate::error::{DetectError, Result};

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "config")]
use std::path::{Path, PathBuf};

/// Preset names accepted by [`DeviceProfile::preset`].
pub const PRESET_NAMES: [&str; 5] = ["desktop", "phone", "tablet", "touch-laptop", "stylus-tablet"];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct DeviceProfile {
    #[cfg_attr(feature = "config", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "config", serde(default))]
    pub pointer: CapabilitySignals,
    #[cfg_attr(feature = "config", serde(default))]
    pub screen: Option<ScreenSize>,
}

impl DeviceProfile {
    /// Look up a built-in profile by name.
    pub fn preset(name: &str) -> Option<Self> {
        let (pointer, screen) = match name {
            // Mouse or trackpad only
            "desktop" => (
                CapabilitySignals {
                    primary_fine: true,
                    primary_hover: true,
                    any_fine: true,
                    any_hover: true,
                    any_coarse: false,
                },
                None,
            ),
            "phone" => (touch_only(), Some(ScreenSize::new(390, 844))),
            "tablet" => (touch_only(), Some(ScreenSize::new(820, 1180))),
            // Trackpad is primary, touchscreen is secondary
            "touch-laptop" => (
                CapabilitySignals {
                    primary_fine: true,
                    primary_hover: true,
                    any_fine: true,
                    any_hover: true,
                    any_coarse: true,
                },
                Some(ScreenSize::new(1920, 1080)),
            ),
            // Pen is primary and cannot hover; a paired keyboard trackpad can
            "stylus-tablet" => (
                CapabilitySignals {
                    primary_fine: true,
                    primary_hover: false,
                    any_fine: true,
                    any_hover: true,
                    any_coarse: true,
                },
                Some(ScreenSize::new(2048, 2732)),
            ),
            _ => return None,
        };

        Some(Self {
            name: name.to_string(),
            pointer,
            screen,
        })
    }

    /// Resolve a preset name or, with the `config` feature, a profile file path.
    pub fn resolve(spec: &str) -> Result<Self> {
        if let Some(profile) = Self::preset(spec) {
            return Ok(profile);
        }

        if let Some(profile) = load_if_file(spec)? {
            return Ok(profile);
        }

        Err(DetectError::UnknownProfile {
            name: spec.to_string(),
        })
    }
}

#[cfg(feature = "config")]
fn load_if_file(spec: &str) -> Result<Option<DeviceProfile>> {
    let path = Path::new(spec);
    if path.is_file() {
        DeviceProfile::load(path).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(not(feature = "config"))]
fn load_if_file(_spec: &str) -> Result<Option<DeviceProfile>> {
    Ok(None)
}

fn touch_only() -> CapabilitySignals {
    CapabilitySignals {
        primary_fine: false,
        primary_hover: false,
        any_fine: false,
        any_hover: false,
        any_coarse: true,
    }
}

#[cfg(feature = "config")]
impl DeviceProfile {
    /// Parse a profile from TOML text. A missing name is filled with `fallback_name`.
    pub fn from_toml_str(text: &str, fallback_name: &str) -> Result<Self> {
        let mut profile: DeviceProfile =
            toml::from_str(text).map_err(|e| DetectError::config(e.to_string()))?;
        if profile.name.is_empty() {
            profile.name = fallback_name.to_string();
        }
        Ok(profile)
    }

    /// Load a profile file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DetectError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let fallback = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_toml_str(&text, &fallback)
    }

    /// Default profile location: `<config_dir>/devsense/profile.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| profile_path_in(&dir))
    }

    /// Load the user's profile if one exists at [`DeviceProfile::default_path`].
    pub fn discover() -> Result<Option<Self>> {
        match dirs::config_dir() {
            Some(dir) => Self::discover_in(&dir),
            None => Ok(None),
        }
    }

    /// Load `<config_dir>/devsense/profile.toml` if it exists.
    pub fn discover_in(config_dir: &Path) -> Result<Option<Self>> {
        let path = profile_path_in(config_dir);
        if !path.is_file() {
            return Ok(None);
        }
        log::debug!("loading device profile from {}", path.display());
        Self::load(&path).map(Some)
    }
}

#[cfg(feature = "config")]
fn profile_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join("devsense").join("profile.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, DeviceType, PrimaryInput};

    #[test]
    fn presets_classify_as_named() {
        let expect = [
            ("desktop", DeviceType::MouseOnly, PrimaryInput::Mouse),
            ("phone", DeviceType::TouchOnly, PrimaryInput::Touch),
            ("tablet", DeviceType::TouchOnly, PrimaryInput::Touch),
            ("touch-laptop", DeviceType::Hybrid, PrimaryInput::Mouse),
            ("stylus-tablet", DeviceType::Hybrid, PrimaryInput::Touch),
        ];

        for (name, device_type, primary_input) in expect {
            let profile = DeviceProfile::preset(name).unwrap();
            let info = classify(profile.pointer);
            assert_eq!(info.device_type, device_type, "{}", name);
            assert_eq!(info.primary_input, primary_input, "{}", name);
        }
    }

    #[test]
    fn every_listed_preset_exists() {
        for name in PRESET_NAMES {
            assert!(DeviceProfile::preset(name).is_some(), "{}", name);
        }
        assert!(DeviceProfile::preset("toaster").is_none());
    }

    #[test]
    fn resolve_rejects_unknown_names() {
        let err = DeviceProfile::resolve("definitely-not-a-profile").unwrap_err();
        assert!(matches!(err, DetectError::UnknownProfile { .. }));
    }

    #[cfg(feature = "config")]
    #[test]
    fn parses_profile_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[pointer]\nany_coarse = true\n\n[screen]\nwidth = 1080\nheight = 1920"
        )
        .unwrap();

        let profile = DeviceProfile::resolve(file.path().to_str().unwrap()).unwrap();
        assert!(!profile.name.is_empty());
        assert!(profile.pointer.any_coarse);
        assert!(!profile.pointer.any_hover);
        assert_eq!(profile.screen, Some(ScreenSize::new(1080, 1920)));
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_profile_is_config_error() {
        let err = DeviceProfile::from_toml_str("[pointer]\nany_coarse = \"yes\"", "bad").unwrap_err();
        assert!(matches!(err, DetectError::ConfigError { .. }));
    }

    #[cfg(feature = "config")]
    #[test]
    fn discover_finds_profile_in_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(DeviceProfile::discover_in(dir.path()).unwrap(), None);

        let app_dir = dir.path().join("devsense");
        std::fs::create_dir(&app_dir).unwrap();
        std::fs::write(
            app_dir.join("profile.toml"),
            "[pointer]\nprimary_fine = true\nany_fine = true\nany_coarse = true",
        )
        .unwrap();

        let profile = DeviceProfile::discover_in(dir.path()).unwrap().unwrap();
        assert_eq!(profile.name, "profile");
        assert!(profile.pointer.primary_fine);
        assert!(profile.pointer.any_coarse);
        assert_eq!(profile.screen, None);
    }

    #[cfg(feature = "config")]
    #[test]
    fn discover_reports_broken_profile() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("devsense");
        std::fs::create_dir(&app_dir).unwrap();
        std::fs::write(app_dir.join("profile.toml"), "pointer = 3").unwrap();

        let err = DeviceProfile::discover_in(dir.path()).unwrap_err();
        assert!(matches!(err, DetectError::ConfigError { .. }));
    }

    #[cfg(feature = "config")]
    #[test]
    fn default_path_lives_under_app_dir() {
        if let Some(path) = DeviceProfile::default_path() {
            assert!(path.ends_with("devsense/profile.toml"));
        }
    }
}
