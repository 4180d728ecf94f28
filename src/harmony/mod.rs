//! Color harmony generation
//!
//! Two kinds of harmony share one building block, the [`HarmonyStep`]:
//!
//! - built-in schemes from the [`catalog`] (complementary, triadic, ...),
//! - user-defined [`CustomHarmonyRule`]s, either edited by hand or derived
//!   from an image's dominant colors via [`derive`].
//!
//! Both evaluate to a [`Palette`](crate::Palette) whose first color is the
//! base color, followed by one color per step.

pub mod catalog;
pub mod derive;
pub mod fill;
pub mod library;
pub mod rule;

use serde::{Deserialize, Serialize};

use crate::color::{Color, HsvOffset};

pub use catalog::{HarmonyCatalog, HarmonyScheme};
pub use derive::{DerivedHarmony, derive_rule, derive_rule_from_colors};
pub use fill::FillPolicy;
pub use library::RuleLibrary;
pub use rule::CustomHarmonyRule;

/// One color generator in a harmony.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyStep {
    /// Absolute color; the base is ignored
    Fixed(Color),
    /// Relative to the base color in HSV space
    Offset(HsvOffset),
}

impl HarmonyStep {
    pub fn offset(hue: f32, saturation: f32, value: f32) -> Self {
        Self::Offset(HsvOffset::new(hue, saturation, value))
    }

    pub fn apply(&self, base: Color) -> Color {
        match self {
            HarmonyStep::Fixed(color) => *color,
            HarmonyStep::Offset(offset) => base.offset(*offset),
        }
    }
}

impl From<Color> for HarmonyStep {
    fn from(color: Color) -> Self {
        Self::Fixed(color)
    }
}

impl From<HsvOffset> for HarmonyStep {
    fn from(offset: HsvOffset) -> Self {
        Self::Offset(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_ignores_base() {
        let step = HarmonyStep::Fixed(Color::new(1, 2, 3));
        assert_eq!(step.apply(Color::WHITE), Color::new(1, 2, 3));
        assert_eq!(step.apply(Color::BLACK), Color::new(1, 2, 3));
    }

    #[test]
    fn test_offset_step_follows_base() {
        let step = HarmonyStep::offset(180.0, 0.0, 0.0);
        assert_eq!(step.apply(Color::new(255, 0, 0)), Color::new(0, 255, 255));
        assert_eq!(step.apply(Color::new(0, 0, 255)), Color::new(255, 255, 0));
    }

    #[test]
    fn test_step_serialization_shape() {
        let fixed = serde_json::to_value(HarmonyStep::Fixed(Color::new(255, 255, 255))).unwrap();
        assert_eq!(fixed, serde_json::json!({ "fixed": "#FFFFFF" }));

        let offset = serde_json::to_value(HarmonyStep::offset(30.0, -10.0, 5.0)).unwrap();
        assert_eq!(
            offset,
            serde_json::json!({ "offset": { "hue": 30.0, "saturation": -10.0, "value": 5.0 } })
        );
    }
}
