#![forbid(unsafe_code)]

//! Construction options for [`crate::Universe`].

use lifecanvas_core::{GridSize, LifeError};
use serde::{Deserialize, Serialize};

/// Grid dimensions and initial fill, deserialized from camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct UniverseConfig {
    pub width: u32,
    pub height: u32,
    /// Probability that a cell starts (and is re-randomized) alive.
    pub density: f64,
    /// Fixed RNG seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            density: 0.5,
            seed: None,
        }
    }
}

impl UniverseConfig {
    pub fn from_json(json: &str) -> Result<Self, LifeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check dimensions and density.
    pub fn validate(&self) -> Result<GridSize, LifeError> {
        if !(0.0..=1.0).contains(&self.density) {
            return Err(LifeError::Config(format!(
                "density {} is outside [0, 1]",
                self.density
            )));
        }
        GridSize::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let cfg = UniverseConfig::from_json("{}").unwrap();
        assert_eq!(cfg, UniverseConfig::default());
        assert_eq!(cfg.validate().unwrap(), GridSize::new(128, 128).unwrap());
    }

    #[test]
    fn parses_seed_and_density() {
        let cfg = UniverseConfig::from_json(r#"{"width": 64, "density": 0.25, "seed": 7}"#).unwrap();
        assert_eq!(cfg.width, 64);
        assert_eq!(cfg.height, 128);
        assert_eq!(cfg.seed, Some(7));
        assert!((cfg.density - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = UniverseConfig {
            density: 1.5,
            ..UniverseConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(LifeError::Config(_))));

        let cfg = UniverseConfig {
            density: f64::NAN,
            ..UniverseConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = UniverseConfig {
            height: 0,
            ..UniverseConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(LifeError::InvalidDimensions { .. })
        ));
    }
}
