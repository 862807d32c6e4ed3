//! Utility configuration

use serde::{Deserialize, Serialize};

/// Floor used when the caller passes no usable minimum font size
pub const DEFAULT_MIN_FONT_SIZE_PX: f64 = 10.0;

/// Throttled listener delay when none is given
pub const DEFAULT_THROTTLE_DELAY_MS: f64 = 500.0;

/// Elements Enter / Shift+Enter move focus between
pub const DEFAULT_FOCUSABLE_SELECTOR: &str = r#"input,select,textarea,button,[tabindex="0"]"#;

/// Utility configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Floor for text fitting when the requested one is missing or invalid
    pub default_min_font_size_px: f64,

    /// Default delay between throttled listener invocations (ms)
    pub throttle_delay_ms: f64,

    /// Focus traversal order for text inputs
    pub focusable_selector: String,
}

impl Config {
    /// Default floor, falling back to the built-in one if misconfigured
    pub fn min_font_size_px(&self) -> f64 {
        if self.default_min_font_size_px.is_nan() || self.default_min_font_size_px < 1.0 {
            DEFAULT_MIN_FONT_SIZE_PX
        } else {
            self.default_min_font_size_px
        }
    }

    /// Default throttle delay, falling back to the built-in one if misconfigured
    pub fn throttle_delay_ms(&self) -> f64 {
        if self.throttle_delay_ms.is_finite() && self.throttle_delay_ms >= 0.0 {
            self.throttle_delay_ms
        } else {
            DEFAULT_THROTTLE_DELAY_MS
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_min_font_size_px: DEFAULT_MIN_FONT_SIZE_PX,
            throttle_delay_ms: DEFAULT_THROTTLE_DELAY_MS,
            focusable_selector: DEFAULT_FOCUSABLE_SELECTOR.to_string(),
        }
    }
}
