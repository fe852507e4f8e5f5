//! Page configuration: element ids and scanner tuning.
//!
//! Defaults match the catalogue page templates. The browser build reads
//! optional overrides from `data-*` attributes on the scanner mount element,
//! e.g. `<div id="reader" data-autostart="false" data-fps="15">`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::scanner::strategy::ScanSettings;

pub const DEFAULT_FPS: u32 = 10;
pub const DEFAULT_QRBOX: u32 = 250;
pub const DEFAULT_START_TIMEOUT_MS: u64 = 7_000;
pub const DEFAULT_PREVIEW_MS: u64 = 5_000;
pub const DEFAULT_AUTO_START: bool = true;

pub const ATTR_FPS: &str = "data-fps";
pub const ATTR_QRBOX: &str = "data-qrbox";
pub const ATTR_START_TIMEOUT_MS: &str = "data-start-timeout-ms";
pub const ATTR_PREVIEW_MS: &str = "data-preview-ms";
pub const ATTR_AUTO_START: &str = "data-autostart";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Ids of the elements the page scripts bind to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    /// Mount element for the live decode view. Required for scanning.
    pub reader: &'static str,
    pub hidden_isbn: &'static str,
    pub visible_isbn: &'static str,
    pub form: &'static str,
    pub camera_select: &'static str,
    pub start_button: &'static str,
    pub stop_button: &'static str,
    pub test_button: &'static str,
    pub diagnostics: &'static str,
    pub theme_toggle: &'static str,
    pub navbar: &'static str,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            reader: "reader",
            hidden_isbn: "scanned-isbn",
            visible_isbn: "scanned-isbn-display",
            form: "isbn-form",
            camera_select: "camera-select",
            start_button: "start-scanner",
            stop_button: "stop-scanner",
            test_button: "test-camera",
            diagnostics: "scanner-diagnostics",
            theme_toggle: "theme-toggle",
            navbar: "main-navbar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    pub settings: ScanSettings,
    /// Upper bound on a single start attempt before moving to the next strategy.
    pub start_timeout: Duration,
    /// How long the camera test preview stays up.
    pub preview_duration: Duration,
    /// Start scanning as soon as the page has loaded.
    pub auto_start: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            settings: ScanSettings { fps: DEFAULT_FPS, qrbox: DEFAULT_QRBOX },
            start_timeout: Duration::from_millis(DEFAULT_START_TIMEOUT_MS),
            preview_duration: Duration::from_millis(DEFAULT_PREVIEW_MS),
            auto_start: DEFAULT_AUTO_START,
        }
    }
}

impl ScannerConfig {
    /// Build config from a key lookup, falling back to defaults for absent keys.
    ///
    /// Keys are the `ATTR_*` attribute names. Values are trimmed; an empty
    /// value counts as absent.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for a value that does not parse, or a zero fps,
    /// box size or timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let fps = parse_positive(ATTR_FPS, read(ATTR_FPS), u64::from(DEFAULT_FPS))?;
        let qrbox = parse_positive(ATTR_QRBOX, read(ATTR_QRBOX), u64::from(DEFAULT_QRBOX))?;
        let start_timeout_ms = parse_positive(ATTR_START_TIMEOUT_MS, read(ATTR_START_TIMEOUT_MS), DEFAULT_START_TIMEOUT_MS)?;
        let preview_ms = parse_positive(ATTR_PREVIEW_MS, read(ATTR_PREVIEW_MS), DEFAULT_PREVIEW_MS)?;
        let auto_start = parse_bool(ATTR_AUTO_START, read(ATTR_AUTO_START), DEFAULT_AUTO_START)?;

        Ok(Self {
            settings: ScanSettings { fps: narrow(ATTR_FPS, fps)?, qrbox: narrow(ATTR_QRBOX, qrbox)? },
            start_timeout: Duration::from_millis(start_timeout_ms),
            preview_duration: Duration::from_millis(preview_ms),
            auto_start,
        })
    }
}

fn parse_positive(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

fn narrow(key: &'static str, value: u64) -> Result<u32, ConfigError> {
    u32::try_from(value).map_err(|_| ConfigError::Invalid { key, value: value.to_string() })
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}
