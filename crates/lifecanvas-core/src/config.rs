#![forbid(unsafe_code)]

//! Page-supplied configuration for the control layer.

use serde::{Deserialize, Serialize};

use crate::error::LifeError;
use crate::strategy::RenderStrategy;

/// Control-layer configuration, deserialized from the JSON options the page
/// passes in. Every field has a default, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LifeConfig {
    /// Cell edge length in canvas pixels.
    pub cell_size: u32,
    pub live_color: String,
    pub dead_color: String,
    pub grid_color: String,
    /// Strategy active at startup.
    pub strategy: RenderStrategy,
    /// Start the animation right after the first frame is drawn.
    pub autoplay: bool,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            cell_size: 5,
            live_color: "#000000".to_owned(),
            dead_color: "#FFFFFF".to_owned(),
            grid_color: "#CCCCCC".to_owned(),
            strategy: RenderStrategy::DirectDraw,
            autoplay: true,
        }
    }
}

impl LifeConfig {
    /// Parse a JSON options document.
    pub fn from_json(json: &str) -> Result<Self, LifeError> {
        Ok(serde_json::from_str(json)?)
    }
}
