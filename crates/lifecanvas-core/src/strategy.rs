#![forbid(unsafe_code)]

//! Render strategy selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LifeError;

/// Which party performs pixel-level work for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderStrategy {
    /// The renderer walks the borrowed cell view and issues fill calls itself.
    #[default]
    #[serde(rename = "direct")]
    DirectDraw,
    /// The engine's own draw routines paint onto the surface.
    #[serde(rename = "delegated")]
    DelegatedDraw,
    /// The engine renders a full raster which is blitted in one operation.
    #[serde(rename = "blit")]
    DelegatedPixelBlit,
}

impl RenderStrategy {
    pub const ALL: [Self; 3] = [Self::DirectDraw, Self::DelegatedDraw, Self::DelegatedPixelBlit];

    /// Short name used by config files and control element ids.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DirectDraw => "direct",
            Self::DelegatedDraw => "delegated",
            Self::DelegatedPixelBlit => "blit",
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderStrategy {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LifeError::Config(format!("unknown render strategy {s:?}")))
    }
}

/// Three-state switch holding the active strategy.
///
/// Any strategy can be selected from any other. Selecting does not redraw;
/// the new strategy applies to the next render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrategySelector {
    current: RenderStrategy,
}

impl StrategySelector {
    #[must_use]
    pub const fn new(initial: RenderStrategy) -> Self {
        Self { current: initial }
    }

    #[must_use]
    pub const fn current(&self) -> RenderStrategy {
        self.current
    }

    /// Make `strategy` active. Returns the previously active strategy.
    pub fn select(&mut self, strategy: RenderStrategy) -> RenderStrategy {
        std::mem::replace(&mut self.current, strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_transition_is_allowed() {
        for from in RenderStrategy::ALL {
            for to in RenderStrategy::ALL {
                let mut sel = StrategySelector::new(from);
                assert_eq!(sel.select(to), from);
                assert_eq!(sel.current(), to);
            }
        }
    }

    #[test]
    fn names_round_trip() {
        for strategy in RenderStrategy::ALL {
            assert_eq!(strategy.name().parse::<RenderStrategy>().unwrap(), strategy);
        }
        assert_eq!(
            " BLIT ".parse::<RenderStrategy>().unwrap(),
            RenderStrategy::DelegatedPixelBlit
        );
        assert!("webgl".parse::<RenderStrategy>().is_err());
    }

    #[test]
    fn default_is_direct_draw() {
        assert_eq!(StrategySelector::default().current(), RenderStrategy::DirectDraw);
    }
}
