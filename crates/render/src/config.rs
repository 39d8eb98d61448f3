use std::path::Path;

use serde::{Deserialize, Serialize};

use section::DEFAULT_ARC_SAMPLES;

/// Presentation knobs. Every field has a default so partial JSON files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Viewports narrower than this use the mobile layout.
    pub mobile_breakpoint: f64,
    pub width_factor: f64,
    pub height_factor: f64,
    pub margin: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub arc_samples: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 900.0,
            width_factor: 0.98,
            height_factor: 0.6,
            margin: 10.0,
            min_width: 320.0,
            min_height: 240.0,
            arc_samples: DEFAULT_ARC_SAMPLES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(e) => write!(f, "invalid render config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RenderConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&payload)
    }
}
