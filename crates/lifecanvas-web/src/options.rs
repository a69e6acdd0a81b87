#![forbid(unsafe_code)]

//! Page-supplied options and DOM ids.

use lifecanvas_core::{LifeConfig, LifeError, RenderStrategy};
use lifecanvas_engine::UniverseConfig;
use serde::{Deserialize, Serialize};

/// Options JSON accepted by `new LifeCanvas(canvas, options)`.
///
/// ```json
/// { "canvas": { "cellSize": 5, "strategy": "blit" }, "universe": { "width": 64 } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebOptions {
    pub canvas: LifeConfig,
    pub universe: UniverseConfig,
}

impl WebOptions {
    /// Parse the options document; absent or blank means all defaults.
    pub fn parse(json: Option<&str>) -> Result<Self, LifeError> {
        match json.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(doc) => Ok(serde_json::from_str(doc)?),
        }
    }
}

/// Element ids of the optional page controls, each prefixed by the caller's
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlIds {
    prefix: String,
}

impl ControlIds {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
        }
    }

    #[must_use]
    pub fn play_pause(&self) -> String {
        self.id("btn-play-pause")
    }

    #[must_use]
    pub fn blank(&self) -> String {
        self.id("btn-blank")
    }

    #[must_use]
    pub fn random(&self) -> String {
        self.id("btn-random")
    }

    #[must_use]
    pub fn step(&self) -> String {
        self.id("btn-step")
    }

    #[must_use]
    pub fn fps(&self) -> String {
        self.id("fps")
    }

    #[must_use]
    pub fn strategy(&self, strategy: RenderStrategy) -> String {
        self.id(&format!("strategy-{}", strategy.name()))
    }

    fn id(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_or_blank_options_use_defaults() {
        assert_eq!(WebOptions::parse(None).unwrap(), WebOptions::default());
        assert_eq!(WebOptions::parse(Some("  ")).unwrap(), WebOptions::default());
        assert_eq!(WebOptions::parse(Some("{}")).unwrap(), WebOptions::default());
    }

    #[test]
    fn nested_sections() {
        let opts = WebOptions::parse(Some(
            r#"{"canvas": {"cellSize": 3, "strategy": "delegated"}, "universe": {"width": 40, "seed": 5}}"#,
        ))
        .unwrap();
        assert_eq!(opts.canvas.cell_size, 3);
        assert_eq!(opts.canvas.strategy, RenderStrategy::DelegatedDraw);
        assert_eq!(opts.universe.width, 40);
        assert_eq!(opts.universe.height, 128);
        assert_eq!(opts.universe.seed, Some(5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(WebOptions::parse(Some(r#"{"cellSize": 3}"#)).is_err());
        assert!(WebOptions::parse(Some(r#"{"canvas": {"cellsize": 3}}"#)).is_err());
        assert!(matches!(
            WebOptions::parse(Some("not json")),
            Err(LifeError::Config(_))
        ));
    }

    #[test]
    fn control_ids() {
        let ids = ControlIds::new("");
        assert_eq!(ids.play_pause(), "btn-play-pause");
        assert_eq!(ids.blank(), "btn-blank");
        assert_eq!(ids.random(), "btn-random");
        assert_eq!(ids.step(), "btn-step");
        assert_eq!(ids.fps(), "fps");
        assert_eq!(ids.strategy(RenderStrategy::DelegatedPixelBlit), "strategy-blit");

        let ids = ControlIds::new("life-");
        assert_eq!(ids.play_pause(), "life-btn-play-pause");
    }
}
