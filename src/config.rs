use crate::collapse::RootChangePolicy;
use crate::discovery::DiscoveryMode;
use crate::layout::{Orientation, PathStyle};
use crate::measure::TextMetrics;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Geometry of the evolution tree layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub orientation: Orientation,
    /// Defaults to the orientation's style when unset
    pub path_style: Option<PathStyle>,
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between consecutive stage columns
    pub stage_gap: f64,
    /// Distance between siblings spread around their parent
    pub sibling_spacing: f64,
    /// Minimum gap between neighbouring nodes in a column
    pub row_gap: f64,
    /// Smallest coordinate on the sibling axis after normalization
    pub padding: f64,
    /// Fraction of the node side used to spread ports
    pub port_spread: f64,
    pub label: TextMetrics,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            path_style: None,
            node_width: 160.0,
            node_height: 200.0,
            stage_gap: 240.0,
            sibling_spacing: 252.0,
            row_gap: 40.0,
            padding: 40.0,
            port_spread: 0.6,
            label: TextMetrics::default(),
        }
    }
}

impl LayoutConfig {
    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
            ..Self::default()
        }
    }

    pub fn path_style(&self) -> PathStyle {
        self.path_style
            .unwrap_or_else(|| self.orientation.default_path_style())
    }
}

/// Appearance of rendered SVG output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub line_color: String,
    pub dark_mode: bool,
    pub font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_color: "#C084FC".to_string(),
            dark_mode: false,
            font_family: "system-ui".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub discovery: DiscoveryMode,
    pub root_change: RootChangePolicy,
}

impl Config {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Load configuration from a JSON file, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Config::from_json(&contents)
}
