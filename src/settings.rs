use serde::{Deserialize, Serialize};

use crate::overlay::OverlayLayer;

/// Shell configuration. Every field carries a serde default so settings
/// files written by older builds keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Movement in points before a press stops being a tap candidate and
    /// becomes a drag.
    #[serde(default = "default_drag_slop")]
    pub drag_slop: f32,
    /// Maximum interval between two taps that still counts as a double tap.
    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u64,
    /// Maximum distance between two taps that still counts as a double tap.
    #[serde(default = "default_double_tap_slop")]
    pub double_tap_slop: f32,
    /// Hold duration before a stationary press is recognized as a long press.
    #[serde(default = "default_long_press_hold_ms")]
    pub long_press_hold_ms: u64,
    /// Seconds a toast stays up before it dismisses itself.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// Append presented toast labels to `toast.log`.
    #[serde(default)]
    pub toast_log: bool,
    /// When enabled the host should initialise the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Feature panels dismiss on any tap unless turned off.
    #[serde(default = "default_true")]
    pub dismiss_on_tap: bool,
    /// Feature panels dismiss when the player status changes unless turned
    /// off.
    #[serde(default = "default_true")]
    pub dismiss_on_status_changed: bool,
    /// Overlay layers enabled at startup. If `None`, all layers are enabled.
    #[serde(default)]
    pub enabled_overlays: Option<Vec<OverlayLayer>>,
}

fn default_drag_slop() -> f32 {
    8.0
}

fn default_double_tap_window_ms() -> u64 {
    300
}

fn default_double_tap_slop() -> f32 {
    24.0
}

fn default_long_press_hold_ms() -> u64 {
    500
}

fn default_toast_duration() -> f32 {
    3.0
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            drag_slop: default_drag_slop(),
            double_tap_window_ms: default_double_tap_window_ms(),
            double_tap_slop: default_double_tap_slop(),
            long_press_hold_ms: default_long_press_hold_ms(),
            toast_duration: default_toast_duration(),
            toast_log: false,
            debug_logging: false,
            dismiss_on_tap: true,
            dismiss_on_status_changed: true,
            enabled_overlays: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
