//! Static parameters of the rain canvas.
//!
//! Every field has a default; a page may override any subset through a JSON
//! object in the canvas's `data-rain-config` attribute.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_MESSAGES: [&str; 6] = [
    "Admission is not the door. Curiosity is.",
    "Seek the pattern behind the noise. It\u{2019}s always there.",
    "Stanford OHS is not a school. It\u{2019}s a portal.",
    "The robot roams the neighborhood. The future roams with it.",
    "Every piano key is a choice. Every choice alters the system.",
    "CS and Math are two halves of the same equation.",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RainConfig {
    /// `<body id>` of the page the rain runs on.
    pub page_id: String,
    pub canvas_id: String,
    pub font_family: String,
    pub base_font_size_desktop: f64,
    pub base_font_size_mobile: f64,
    /// Viewport widths at or below this use the mobile font size.
    pub mobile_breakpoint: f64,
    /// Rows advanced per simulation step.
    pub drop_speed: f64,
    /// Visible trail length in character rows.
    pub trail_rows: f64,
    /// Brightness left at the end of the trail.
    pub trail_epsilon: f64,
    /// Horizontal cell width as a multiple of the base font size.
    pub column_spacing: f64,
    pub text_color: String,
    pub head_color: String,
    pub message_color: String,
    pub message_interval_min: f64,
    pub message_interval_max: f64,
    pub message_duration: f64,
    pub max_messages: usize,
    /// Minimum milliseconds between two simulation steps.
    pub step_interval_ms: f64,
    /// Per-step chance that a column below the screen restarts at the top.
    pub reset_probability: f64,
    pub messages: Vec<String>,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            page_id: "cs".into(),
            canvas_id: "cs-matrix-canvas".into(),
            font_family: "'Inconsolata', monospace".into(),
            base_font_size_desktop: 16.0,
            base_font_size_mobile: 12.0,
            mobile_breakpoint: 768.0,
            drop_speed: 1.2,
            trail_rows: 25.0,
            trail_epsilon: 0.1,
            column_spacing: 1.1,
            text_color: "#0f0".into(),
            head_color: "#ffffff".into(),
            message_color: "#aaffaa".into(),
            message_interval_min: 8000.0,
            message_interval_max: 16000.0,
            message_duration: 10000.0,
            max_messages: 3,
            step_interval_ms: 120.0,
            reset_probability: 0.025,
            messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl RainConfig {
    /// Parses a (possibly partial) JSON override and validates the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("baseFontSizeDesktop", self.base_font_size_desktop),
            ("baseFontSizeMobile", self.base_font_size_mobile),
            ("columnSpacing", self.column_spacing),
            ("messageDuration", self.message_duration),
            ("stepIntervalMs", self.step_interval_ms),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(self.trail_epsilon > 0.0 && self.trail_epsilon < 1.0) {
            return Err(ConfigError::Epsilon(self.trail_epsilon));
        }
        if self.message_interval_min > self.message_interval_max {
            return Err(ConfigError::IntervalOrder {
                min: self.message_interval_min,
                max: self.message_interval_max,
            });
        }
        if self.messages.is_empty() {
            return Err(ConfigError::NoMessages);
        }
        if self.max_messages == 0 {
            return Err(ConfigError::NoMessageSlots);
        }
        Ok(())
    }

    /// Base glyph size for a viewport of the given logical width.
    pub fn base_font_size(&self, viewport_width: f64) -> f64 {
        if viewport_width <= self.mobile_breakpoint {
            self.base_font_size_mobile
        } else {
            self.base_font_size_desktop
        }
    }
}
