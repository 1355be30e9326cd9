//! Host configuration.

use serde::{Deserialize, Serialize};
use vecnote_core::EngineConfig;
use vecnote_core::storage::DEFAULT_STORAGE_KEY;
use vecnote_render::{RenderConfig, parse_css_color};

/// Browser host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Id of the `<canvas>` element to mount on.
    pub canvas_id: String,
    /// Id of the element that scrolls the canvas; the window when unset.
    pub scroll_container_id: Option<String>,
    /// Local storage key for the file system.
    pub storage_key: String,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    /// CSS background painted under the strokes.
    pub background: Option<String>,
    pub engine: EngineConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            canvas_id: "vecnote-canvas".to_string(),
            scroll_container_id: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: "info".to_string(),
            background: None,
            engine: EngineConfig::default(),
        }
    }
}

impl WebConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parsed log level, `Info` if unrecognized.
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            background: self.background.as_deref().map(parse_css_color),
            selection_padding: self.engine.selection_padding,
            ..RenderConfig::default()
        }
    }
}
