use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::validate_aspect_ratio;
use crate::error::{ChartError, ChartResult};

/// What happens to the overlay instance when the overlay is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlayClosePolicy {
    /// The instance stays alive while hidden, so zoom survives reopening.
    #[default]
    KeepMounted,
    /// The instance is destroyed on close and rebuilt on the next open.
    DestroyOnClose,
}

/// Public chart component configuration.
///
/// Serializable so hosts can ship chart setup alongside the data stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartComponentConfig {
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    #[serde(default)]
    pub overlay_close_policy: OverlayClosePolicy,
    /// Retained window used until a message carries its own limit.
    #[serde(default)]
    pub history_limit: Option<usize>,
    /// The inline view is a static preview unless this is set.
    #[serde(default)]
    pub inline_interactive: bool,
    /// Opaque drawing-library options shared by both views.
    #[serde(default = "default_render_options")]
    pub render_options: Value,
}

impl Default for ChartComponentConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartComponentConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
            resize_debounce_ms: default_resize_debounce_ms(),
            overlay_close_policy: OverlayClosePolicy::default(),
            history_limit: None,
            inline_interactive: false,
            render_options: default_render_options(),
        }
    }

    /// Sets height/width ratio of both views.
    #[must_use]
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Sets quiet period before a container resize is applied.
    #[must_use]
    pub fn with_resize_debounce_ms(mut self, resize_debounce_ms: u64) -> Self {
        self.resize_debounce_ms = resize_debounce_ms;
        self
    }

    #[must_use]
    pub fn with_overlay_close_policy(mut self, policy: OverlayClosePolicy) -> Self {
        self.overlay_close_policy = policy;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, history_limit: Option<usize>) -> Self {
        self.history_limit = history_limit;
        self
    }

    #[must_use]
    pub fn with_inline_interactive(mut self, interactive: bool) -> Self {
        self.inline_interactive = interactive;
        self
    }

    #[must_use]
    pub fn with_render_options(mut self, render_options: Value) -> Self {
        self.render_options = render_options;
        self
    }

    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn validate(self) -> ChartResult<Self> {
        validate_aspect_ratio(self.aspect_ratio)?;
        if self.history_limit == Some(0) {
            return Err(ChartError::InvalidData(
                "history limit must be >= 1".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()
    }
}

fn default_aspect_ratio() -> f64 {
    0.6
}

fn default_resize_debounce_ms() -> u64 {
    100
}

fn default_render_options() -> Value {
    Value::Object(serde_json::Map::new())
}
